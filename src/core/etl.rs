use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::logger::RunLog;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// 依序執行 extract / transform / load，回傳寫出的檔案
    pub fn run(&self, log: &mut RunLog) -> Result<Vec<String>> {
        log.log_and_print(format!("scantron-report version {}", VERSION))?;

        let input = self.pipeline.extract(log)?;
        tracing::info!(
            "Extracted {} questions and {} students",
            input.library.question_count(),
            input.scantron.student_count()
        );

        let data = self.pipeline.transform(input, log)?;

        let written = self.pipeline.load(data, log)?;
        tracing::info!("Wrote {} files", written.len());

        Ok(written)
    }
}
