use crate::domain::model::{Library, ScantronData};
use crate::utils::error::Result;
use csv::{QuoteStyle, WriterBuilder};

/// Per-student answers CSV.
///
/// The header holds one quoted `"<n>. <body>"` cell per question; each row
/// holds the 0-based answer index per question, empty when unanswered.
pub fn render_answers_csv(library: &Library, scantron: &ScantronData) -> Result<Vec<u8>> {
    let mut buf = Vec::new();

    {
        let mut header = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .from_writer(&mut buf);
        header.write_record(
            library
                .questions()
                .enumerate()
                .map(|(i, q)| format!("{}. {}", i + 1, q.body)),
        )?;
        header.flush()?;
    }

    {
        let mut rows = WriterBuilder::new().from_writer(&mut buf);
        for answers in &scantron.answers {
            rows.write_record(
                answers
                    .iter()
                    .map(|a| a.index().map(|i| i.to_string()).unwrap_or_default()),
            )?;
        }
        rows.flush()?;
    }

    Ok(buf)
}
