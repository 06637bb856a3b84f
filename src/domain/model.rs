use crate::core::letters::{letter_to_index, UNANSWERED_MARKER};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parsed question library: the title block plus the zones in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Library {
    pub title_block: String,
    pub zones: Vec<Zone>,
}

impl Library {
    /// 所有區塊的題目總數
    pub fn question_count(&self) -> usize {
        self.zones.iter().map(|z| z.questions.len()).sum()
    }

    /// 依檔案順序走訪所有題目
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.zones.iter().flat_map(|z| z.questions.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub title: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub body: String,
    pub left_choice: String,
    pub right_choice: String,
}

/// One student's answer to one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Choice(char),
    Unanswered,
}

impl Answer {
    /// 由 0 起算的選項索引 (`A` -> 0)
    pub fn index(&self) -> Option<usize> {
        match self {
            Answer::Choice(c) => letter_to_index(*c),
            Answer::Unanswered => None,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Choice(c) => write!(f, "{}", c),
            Answer::Unanswered => write!(f, "{}", UNANSWERED_MARKER),
        }
    }
}

/// Decoded Scantron file: `sections[s]` and `answers[s][q]` for student `s`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScantronData {
    pub sections: Vec<String>,
    pub answers: Vec<Vec<Answer>>,
    pub question_count: usize,
}

impl ScantronData {
    pub fn student_count(&self) -> usize {
        self.answers.len()
    }
}

/// Per-question aggregates over all students.
///
/// Indexing is `[q]` or `[q][a]` with `q` the 0-based question number and
/// `a` the 0-based answer index. Ratios are over the total number of
/// students, not the number who answered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    pub student_count: usize,
    pub question_count: usize,
    pub answer_count: usize,
    /// n_s(q,a)
    pub choice_counts: Vec<Vec<usize>>,
    /// n_s(q)
    pub answered: Vec<usize>,
    /// n_na(q)
    pub unanswered: Vec<usize>,
    /// p(q), 1-based mean chosen position
    pub mean_position: Vec<f64>,
    /// r_s(q,a)
    pub choice_ratio: Vec<Vec<f64>>,
    /// r_na(q)
    pub unanswered_ratio: Vec<f64>,
}

impl Statistics {
    /// 各選項佔作答者的百分比；無人作答時全為 0
    pub fn respondent_percentages(&self, question: usize) -> Vec<f64> {
        let ratios = &self.choice_ratio[question];
        let total: f64 = ratios.iter().sum();
        ratios
            .iter()
            .map(|r| if total > 0.0 { r / total * 100.0 } else { 0.0 })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotStyle {
    #[default]
    Bar,
    Stacked,
}

impl fmt::Display for PlotStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlotStyle::Bar => write!(f, "bar"),
            PlotStyle::Stacked => write!(f, "stacked"),
        }
    }
}

/// Extract stage output.
#[derive(Debug, Clone)]
pub struct SurveyInput {
    pub library: Library,
    pub scantron: ScantronData,
}

/// Transform stage output, everything the load stage writes.
#[derive(Debug, Clone)]
pub struct ReportData {
    pub library: Library,
    pub scantron: ScantronData,
    pub statistics: Statistics,
}
