#[cfg(feature = "cli")]
pub mod cli;

use crate::domain::model::PlotStyle;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{validate_filename_prefix, validate_path, validate_range, Validate};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

pub const DEFAULT_FILENAME_PREFIX: &str = "tam251_";
pub const DEFAULT_MAX_ANSWERS: usize = 5;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// 所有輸入/輸出檔名的前綴
    pub filename_prefix: String,
    /// 每題最多選項數 N_a
    pub max_answers: usize,
    /// Scantron 表單上的答案欄位數，紀錄至少要涵蓋這麼多欄
    pub scantron_question_slots: Option<usize>,
    pub plot_style: PlotStyle,
    pub base_dir: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            filename_prefix: DEFAULT_FILENAME_PREFIX.to_string(),
            max_answers: DEFAULT_MAX_ANSWERS,
            scantron_question_slots: None,
            plot_style: PlotStyle::Bar,
            base_dir: ".".to_string(),
        }
    }
}

impl ReportConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| ReportError::ReadFileError {
                kind: "configuration".to_string(),
                path: path.display().to_string(),
                source,
            })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置，`${VAR}` 以環境變數取代
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = ENV_VAR.replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });
        Ok(toml::from_str(&processed)?)
    }
}

impl Validate for ReportConfig {
    fn validate(&self) -> Result<()> {
        validate_filename_prefix("filename_prefix", &self.filename_prefix)?;
        // 答案欄位以單一數字 1..N_a 編碼
        validate_range("max_answers", self.max_answers, 1, 9)?;
        if let Some(slots) = self.scantron_question_slots {
            validate_range("scantron_question_slots", slots, 1, 1000)?;
        }
        validate_path("base_dir", &self.base_dir)?;
        Ok(())
    }
}

impl ConfigProvider for ReportConfig {
    fn filename_prefix(&self) -> &str {
        &self.filename_prefix
    }

    fn max_answers(&self) -> usize {
        self.max_answers
    }

    fn scantron_question_slots(&self) -> Option<usize> {
        self.scantron_question_slots
    }

    fn plot_style(&self) -> PlotStyle {
        self.plot_style
    }
}
