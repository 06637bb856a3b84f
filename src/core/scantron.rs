//! Fixed-width Scantron record decoding.
//!
//! One record per line. The section id sits at byte offset 60 (3 bytes) and
//! the answers start at byte offset 72, one byte per question: `1`..`N_a`
//! for a choice or a space for no answer. Malformed fields are cleaned and
//! warned about; a record too short to hold every answer is fatal.

use crate::core::letters::index_to_letter;
use crate::domain::model::{Answer, ScantronData};
use crate::utils::error::{ReportError, Result};
use crate::utils::logger::RunLog;

pub const SECTION_OFFSET: usize = 60;
pub const SECTION_WIDTH: usize = 3;
pub const ANSWERS_OFFSET: usize = 72;
/// A record holding only this byte (SUB) marks the end of the data.
pub const END_OF_DATA: u8 = 0x1A;

struct FieldLayout<'f> {
    name: &'f str,
    offset: usize,
    min_length: usize,
    strip: bool,
}

pub struct ScantronReader {
    file: String,
    question_count: usize,
    max_answers: usize,
    question_slots: Option<usize>,
}

impl ScantronReader {
    pub fn new(file: impl Into<String>, question_count: usize, max_answers: usize) -> Self {
        Self {
            file: file.into(),
            question_count,
            max_answers,
            question_slots: None,
        }
    }

    /// 固定的答案欄位數 (例如 96)；紀錄長度以較大者為準
    pub fn with_question_slots(mut self, slots: Option<usize>) -> Self {
        self.question_slots = slots;
        self
    }

    pub fn min_record_length(&self) -> usize {
        ANSWERS_OFFSET + self.question_count.max(self.question_slots.unwrap_or(0))
    }

    pub fn read(&self, data: &[u8], log: &mut RunLog) -> Result<ScantronData> {
        let mut sections = Vec::new();
        let mut answers = Vec::new();
        let min_length = self.min_record_length();

        for (i, record) in split_records(data).enumerate() {
            let line_number = i + 1;

            if record == [END_OF_DATA] {
                continue;
            }

            if record.len() < min_length {
                return Err(log.fail(ReportError::RecordTooShort {
                    file: self.file.clone(),
                    line: line_number,
                    length: record.len(),
                    expected: min_length,
                }));
            }

            let section = self.clean_field(
                log,
                line_number,
                &latin1(&record[SECTION_OFFSET..SECTION_OFFSET + SECTION_WIDTH]),
                FieldLayout {
                    name: "Section",
                    offset: SECTION_OFFSET,
                    min_length: SECTION_WIDTH,
                    strip: true,
                },
                |c| c.is_ascii_digit(),
            )?;

            let max_answers = self.max_answers;
            let raw_answers = self.clean_field(
                log,
                line_number,
                &latin1(&record[ANSWERS_OFFSET..ANSWERS_OFFSET + self.question_count]),
                FieldLayout {
                    name: "Answers",
                    offset: ANSWERS_OFFSET,
                    min_length: 0,
                    strip: false,
                },
                |c| c == ' ' || is_choice_digit(c, max_answers),
            )?;

            log.log(format!("{}:{}: section {}", self.file, line_number, section))?;
            sections.push(section);
            answers.push(raw_answers.chars().map(decode_answer).collect());
        }

        let data = ScantronData {
            sections,
            answers,
            question_count: self.question_count,
        };
        log.log_grid("a", ["N_s", "N_q"], &data.answers, self.question_count)?;
        log.log("Successfully completed reading Scantron file")?;
        Ok(data)
    }

    /// 清理欄位：非法字元換成空白並記錄警告，不中斷處理
    fn clean_field(
        &self,
        log: &mut RunLog,
        line_number: usize,
        raw: &str,
        layout: FieldLayout<'_>,
        is_valid: impl Fn(char) -> bool,
    ) -> Result<String> {
        let value = if layout.strip { raw.trim() } else { raw };
        let mut cleaned: String = value
            .chars()
            .map(|c| if is_valid(c) { c } else { ' ' })
            .collect();
        if layout.strip {
            cleaned = cleaned.trim().to_string();
        }

        let length = value.chars().count();
        if length == 0 && layout.min_length > 0 {
            log.warn(format!(
                "{}:{}: WARNING: field '{}' at character {} is empty",
                self.file,
                line_number,
                layout.name,
                layout.offset + 1
            ))?;
            return Ok(cleaned);
        }
        if length < layout.min_length {
            log.warn(format!(
                "{}:{}: WARNING: field '{}' at character {} has length {} but should be at least {}: {}",
                self.file,
                line_number,
                layout.name,
                layout.offset + 1,
                length,
                layout.min_length,
                value
            ))?;
            return Ok(cleaned);
        }

        for (i, c) in value.chars().enumerate().filter(|(_, c)| !is_valid(*c)) {
            log.warn(format!(
                "{}:{}: WARNING: invalid character '{}' at character {} at position {} in field '{}': {}",
                self.file,
                line_number,
                c.escape_default(),
                i + layout.offset + 1,
                i + 1,
                layout.name,
                value
            ))?;
        }
        Ok(cleaned)
    }
}

fn is_choice_digit(c: char, max_answers: usize) -> bool {
    c.to_digit(10)
        .map(|d| d >= 1 && d as usize <= max_answers)
        .unwrap_or(false)
}

/// 已清理的答案字元：空白為未作答，`1` -> `A`
pub fn decode_answer(c: char) -> Answer {
    match c.to_digit(10) {
        Some(d) if d >= 1 => Answer::Choice(index_to_letter(d as i64 - 1)),
        _ => Answer::Unanswered,
    }
}

/// 每個位元組對應一個字元，欄位位置才不會因為非 ASCII 資料而偏移
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn split_records(data: &[u8]) -> impl Iterator<Item = &[u8]> {
    let data = data.strip_suffix(b"\n").unwrap_or(data);
    data.split(|&b| b == b'\n')
        .filter(move |_| !data.is_empty())
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}
