use crate::core::library::parse_library;
use crate::core::scantron::ScantronReader;
use crate::core::statistics::compute_statistics;
use crate::domain::model::{ReportData, SurveyInput};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::output::{answers::render_answers_csv, report_tex::render_report, stats::render_statistics};
use crate::utils::error::{ReportError, Result};
use crate::utils::logger::RunLog;

/// Library + Scantron file in, answers CSV, statistics CSVs and LaTeX report out.
pub struct ReportPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ReportPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn read_text(&self, path: &str, log: &mut RunLog) -> Result<String> {
        let bytes = self.storage.read_file(path).map_err(|e| log.fail(e))?;
        String::from_utf8(bytes).map_err(|e| {
            log.fail(ReportError::ReadFileError {
                kind: "library".to_string(),
                path: self.storage.full_path(path).display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            })
        })
    }

    fn write(&self, path: &str, data: &[u8], log: &mut RunLog) -> Result<String> {
        self.storage.write_file(path, data).map_err(|e| log.fail(e))?;
        Ok(self.storage.full_path(path).display().to_string())
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for ReportPipeline<S, C> {
    fn extract(&self, log: &mut RunLog) -> Result<SurveyInput> {
        let library_file = self.config.library_filename();
        log.log_and_print(format!("Reading library file: {}", library_file))?;
        let source = self.read_text(&library_file, log)?;
        let library = parse_library(&source, &library_file, log)?;
        tracing::debug!(
            "Library has {} zones and {} questions",
            library.zones.len(),
            library.question_count()
        );

        let scantron_file = self.config.scantron_filename();
        log.log_and_print(format!("Reading Scantron file: {}", scantron_file))?;
        let data = self
            .storage
            .read_file(&scantron_file)
            .map_err(|e| log.fail(e))?;
        let scantron = ScantronReader::new(
            scantron_file,
            library.question_count(),
            self.config.max_answers(),
        )
        .with_question_slots(self.config.scantron_question_slots())
        .read(&data, log)?;

        Ok(SurveyInput { library, scantron })
    }

    fn transform(&self, input: SurveyInput, log: &mut RunLog) -> Result<ReportData> {
        log.log_and_print("Generating statistics")?;
        let statistics = compute_statistics(
            &input.scantron.answers,
            input.scantron.question_count,
            self.config.max_answers(),
        );
        log.log("Successfully completed generating statistics")?;

        Ok(ReportData {
            library: input.library,
            scantron: input.scantron,
            statistics,
        })
    }

    fn load(&self, data: ReportData, log: &mut RunLog) -> Result<Vec<String>> {
        let mut written = Vec::new();

        let answers_file = self.config.answers_filename();
        log.log_and_print(format!("Writing answers CSV file: {}", answers_file))?;
        let answers = render_answers_csv(&data.library, &data.scantron).map_err(|e| log.fail(e))?;
        written.push(self.write(&answers_file, &answers, log)?);
        log.log("Successfully completed writing answers CSV file")?;

        let tables = render_statistics(&self.config.stats_prefix(), &data.statistics)
            .map_err(|e| log.fail(e))?;
        for (name, contents) in tables {
            log.log_and_print(format!("Writing statistics file: {}", name))?;
            written.push(self.write(&name, &contents, log)?);
            log.log("Successfully completed writing statistics file")?;
        }

        let report_file = self.config.report_filename();
        log.log_and_print(format!("Writing statistics tex file: {}", report_file))?;
        let report = render_report(&data.library, &data.statistics, self.config.plot_style())
            .map_err(|e| log.fail(e))?;
        written.push(self.write(&report_file, report.as_bytes(), log)?);
        log.log("Successfully completed writing statistics tex file")?;

        Ok(written)
    }
}
