use crate::utils::error::{ReportError, Result};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 初始化終端機日誌；同一個行程只能呼叫一次
pub fn init_cli_logger(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("scantron_report=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("scantron_report=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .without_time()
                .compact(),
        )
        .try_init()
        .map_err(|_| ReportError::LoggingAlreadyInitialized)
}

enum Target {
    File(BufWriter<File>),
    Memory(Vec<u8>),
}

/// Append-only diagnostic log for a single run.
///
/// Opened once at the start of a run and handed by `&mut` to every stage
/// that needs it. Every message goes to the log target and is mirrored as a
/// `tracing` event, so `log_and_print` output reaches the console through
/// the CLI subscriber.
pub struct RunLog {
    target: Target,
    path: Option<PathBuf>,
}

impl RunLog {
    /// 建立新的日誌檔 (覆寫舊檔)
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        tracing::info!("Logging information to file: {}", path.display());
        let file = File::create(&path)?;
        let mut log = Self {
            target: Target::File(BufWriter::new(file)),
            path: Some(path),
        };
        log.log(format!(
            "run started at {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ))?;
        Ok(log)
    }

    /// In-memory log, used by tests and library callers that do not want a file.
    pub fn sink() -> Self {
        Self {
            target: Target::Memory(Vec::new()),
            path: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Contents of an in-memory log. File-backed logs return `None`.
    pub fn contents(&self) -> Option<&str> {
        match &self.target {
            Target::Memory(buf) => std::str::from_utf8(buf).ok(),
            Target::File(_) => None,
        }
    }

    fn write_line(&mut self, msg: &str) -> Result<()> {
        match &mut self.target {
            Target::File(w) => writeln!(w, "{}", msg)?,
            Target::Memory(buf) => writeln!(buf, "{}", msg)?,
        }
        Ok(())
    }

    pub fn log(&mut self, msg: impl Display) -> Result<()> {
        let msg = msg.to_string();
        tracing::debug!("{}", msg);
        self.write_line(&msg)
    }

    pub fn log_and_print(&mut self, msg: impl Display) -> Result<()> {
        let msg = msg.to_string();
        tracing::info!("{}", msg);
        self.write_line(&msg)
    }

    pub fn warn(&mut self, msg: impl Display) -> Result<()> {
        let msg = msg.to_string();
        tracing::warn!("{}", msg);
        self.write_line(&msg)
    }

    /// 記錄致命錯誤後原樣回傳，呼叫端直接 `return Err(log.fail(err))`
    pub fn fail(&mut self, err: ReportError) -> ReportError {
        let msg = err.to_string();
        tracing::error!("{}", msg);
        match self.write_line(&msg).and_then(|_| self.flush()) {
            Ok(()) => err,
            Err(log_err) => log_err,
        }
    }

    /// 以 `name array: (dim = n, ...)` 的格式記錄二維表格
    pub fn log_grid<T: Display>(
        &mut self,
        name: &str,
        dim_names: [&str; 2],
        rows: &[Vec<T>],
        columns: usize,
    ) -> Result<()> {
        self.log(format!(
            "{} array: ({} = {}, {} = {})",
            name,
            dim_names[0],
            rows.len(),
            dim_names[1],
            columns
        ))?;
        for row in rows {
            let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            self.log(format!("[{}]", cells.join(" ")))?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        if let Target::File(w) = &mut self.target {
            w.flush()?;
        }
        Ok(())
    }

    /// 結束本次執行並關閉日誌
    pub fn close(mut self) -> Result<()> {
        self.log("run finished")?;
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sink_collects_lines_in_order() {
        let mut log = RunLog::sink();
        log.log("first").unwrap();
        log.warn("second").unwrap();
        log.log_and_print("third").unwrap();
        assert_eq!(log.contents().unwrap(), "first\nsecond\nthird\n");
    }

    #[test]
    fn test_fail_records_the_error() {
        let mut log = RunLog::sink();
        let err = log.fail(ReportError::LoggingAlreadyInitialized);
        assert!(matches!(err, ReportError::LoggingAlreadyInitialized));
        assert!(log.contents().unwrap().contains("logging already initialized"));
    }

    #[test]
    fn test_log_grid_header() {
        let mut log = RunLog::sink();
        let rows = vec![vec!['A', '*'], vec!['B', 'C']];
        log.log_grid("a", ["N_s", "N_q"], &rows, 2).unwrap();
        let contents = log.contents().unwrap();
        assert!(contents.starts_with("a array: (N_s = 2, N_q = 2)\n"));
        assert!(contents.contains("[A *]\n[B C]\n"));
    }

    #[test]
    fn test_second_logger_init_fails() {
        let _ = init_cli_logger(false);
        assert!(matches!(
            init_cli_logger(false),
            Err(ReportError::LoggingAlreadyInitialized)
        ));
    }

    #[test]
    fn test_file_log_truncates_and_closes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.log");
        std::fs::write(&path, "stale contents\n").unwrap();

        let mut log = RunLog::create(&path).unwrap();
        log.log("hello").unwrap();
        log.close().unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("stale"));
        assert!(written.contains("hello\n"));
        assert!(written.ends_with("run finished\n"));
    }
}
