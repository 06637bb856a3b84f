use crate::domain::model::{PlotStyle, ReportData, SurveyInput};
use crate::utils::error::Result;
use crate::utils::logger::RunLog;
use std::path::PathBuf;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
    fn full_path(&self, path: &str) -> PathBuf;
}

pub trait ConfigProvider {
    fn filename_prefix(&self) -> &str;
    fn max_answers(&self) -> usize;
    fn scantron_question_slots(&self) -> Option<usize>;
    fn plot_style(&self) -> PlotStyle;

    fn library_filename(&self) -> String {
        format!("{}library.tex", self.filename_prefix())
    }

    fn scantron_filename(&self) -> String {
        format!("{}scantron.dat", self.filename_prefix())
    }

    fn answers_filename(&self) -> String {
        format!("{}answers.csv", self.filename_prefix())
    }

    fn report_filename(&self) -> String {
        format!("{}report.tex", self.filename_prefix())
    }

    fn stats_prefix(&self) -> String {
        format!("{}stats", self.filename_prefix())
    }

    fn log_filename(&self) -> String {
        format!("{}proc_report.log", self.filename_prefix())
    }
}

pub trait Pipeline {
    fn extract(&self, log: &mut RunLog) -> Result<SurveyInput>;
    fn transform(&self, input: SurveyInput, log: &mut RunLog) -> Result<ReportData>;
    /// 回傳寫出的檔案清單
    fn load(&self, data: ReportData, log: &mut RunLog) -> Result<Vec<String>>;
}
