use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Formatting error: {0}")]
    FormatError(#[from] std::fmt::Error),

    #[error("Unable to open {kind} file for reading: {path}: {source}")]
    ReadFileError {
        kind: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{file}:{line}: ERROR: no matches found for line")]
    NoRuleMatched { file: String, line: usize },

    #[error("{file}:{line}: ERROR: invalid extra text following '{rule}': {text}")]
    TrailingContent {
        file: String,
        line: usize,
        rule: String,
        text: String,
    },

    #[error("{file}:{line}: ERROR: '{rule}' not allowed in state '{state}'")]
    BadTransition {
        file: String,
        line: usize,
        rule: String,
        state: String,
    },

    #[error("{file}:{line}: ERROR: unexpected end of input in state '{state}'")]
    UnexpectedEndOfInput {
        file: String,
        line: usize,
        state: String,
    },

    #[error("{file}:{line}: ERROR: line length {length} less than expected {expected}")]
    RecordTooShort {
        file: String,
        line: usize,
        length: usize,
        expected: usize,
    },

    #[error("failed to initialize logging: logging already initialized")]
    LoggingAlreadyInitialized,

    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl ReportError {
    /// 錯誤發生時給使用者的建議
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ReportError::IoError(_) | ReportError::ReadFileError { .. } => {
                "Check that the input files exist under the configured directory and prefix"
            }
            ReportError::CsvError(_) | ReportError::FormatError(_) => {
                "Check that the output directory is writable"
            }
            ReportError::TomlError(_) | ReportError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line options"
            }
            ReportError::NoRuleMatched { .. }
            | ReportError::TrailingContent { .. }
            | ReportError::BadTransition { .. }
            | ReportError::UnexpectedEndOfInput { .. } => {
                "Fix the library file at the reported line and run again"
            }
            ReportError::RecordTooShort { .. } => {
                "Check the Scantron export; every record must cover all question columns"
            }
            ReportError::LoggingAlreadyInitialized => "Initialize logging exactly once per run",
        }
    }

    /// 是否為題庫檔案語法錯誤
    pub fn is_library_syntax_error(&self) -> bool {
        matches!(
            self,
            ReportError::NoRuleMatched { .. }
                | ReportError::TrailingContent { .. }
                | ReportError::BadTransition { .. }
                | ReportError::UnexpectedEndOfInput { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
