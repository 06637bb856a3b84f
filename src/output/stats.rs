use crate::core::letters::index_to_letter;
use crate::domain::model::Statistics;
use crate::utils::error::{ReportError, Result};
use csv::Writer;
use std::fmt::Display;

/// One `q,<name>` table with a row per question.
pub fn render_column<T: Display>(name: &str, values: &[T]) -> Result<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(["q", name])?;
    for (q, value) in values.iter().enumerate() {
        writer.write_record([(q + 1).to_string(), value.to_string()])?;
    }
    writer.flush()?;
    finish(writer)
}

/// A question × answer table; the columns are named `<name>(q,a=<letter>)`.
pub fn render_table<T: Display>(name: &str, answer_count: usize, rows: &[Vec<T>]) -> Result<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());
    let header: Vec<String> = std::iter::once("q".to_string())
        .chain((0..answer_count).map(|a| format!("{}(q,a={})", name, index_to_letter(a as i64))))
        .collect();
    writer.write_record(&header)?;
    for (q, row) in rows.iter().enumerate() {
        let record: Vec<String> = std::iter::once((q + 1).to_string())
            .chain(row.iter().map(|v| v.to_string()))
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    finish(writer)
}

fn finish(writer: Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| ReportError::IoError(e.into_error()))
}

/// 所有統計表：(檔名, 內容)
pub fn render_statistics(prefix: &str, stats: &Statistics) -> Result<Vec<(String, Vec<u8>)>> {
    let n = stats.answer_count;
    Ok(vec![
        (
            format!("{}_n_s_qa.csv", prefix),
            render_table("n_s", n, &stats.choice_counts)?,
        ),
        (
            format!("{}_n_s_q.csv", prefix),
            render_column("n_s(q)", &stats.answered)?,
        ),
        (
            format!("{}_n_na_q.csv", prefix),
            render_column("n_na(q)", &stats.unanswered)?,
        ),
        (
            format!("{}_p_q.csv", prefix),
            render_column("p(q)", &stats.mean_position)?,
        ),
        (
            format!("{}_r_s_qa.csv", prefix),
            render_table("r_s", n, &stats.choice_ratio)?,
        ),
        (
            format!("{}_r_na_q.csv", prefix),
            render_column("r_na(q)", &stats.unanswered_ratio)?,
        ),
    ])
}
