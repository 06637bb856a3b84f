//! Library file parser.
//!
//! Classified lines drive an explicit state machine that builds the
//! [`Library`] tree:
//!
//! ```text
//! preamble      --begin_document-->  title_block
//! title_block   --begin_zone------>  zone
//! zone          --end_zone-------->  between_zones
//! between_zones --begin_zone------>  zone
//! between_zones --end_document---->  finished
//! ```
//!
//! Any other directive in a state is fatal, as is running out of input
//! before `\end{document}`.

use crate::core::classifier::{classify, strip_comment, LineKind, Rule};
use crate::domain::model::{Library, Question, Zone};
use crate::utils::error::{ReportError, Result};
use crate::utils::logger::RunLog;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    Preamble,
    TitleBlock,
    Zone,
    BetweenZones,
    Finished,
}

impl ParseState {
    pub fn name(&self) -> &'static str {
        match self {
            ParseState::Preamble => "preamble",
            ParseState::TitleBlock => "title_block",
            ParseState::Zone => "zone",
            ParseState::BetweenZones => "between_zones",
            ParseState::Finished => "finished",
        }
    }
}

impl fmt::Display for ParseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Whether the parser wants more input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Finished,
}

pub struct LibraryParser {
    file: String,
    state: ParseState,
    library: Library,
    current_zone: Option<usize>,
    current_question: Option<usize>,
    lines_read: usize,
}

impl LibraryParser {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            state: ParseState::Preamble,
            library: Library::default(),
            current_zone: None,
            current_question: None,
            lines_read: 0,
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn current_zone(&self) -> Option<&Zone> {
        self.current_zone.and_then(|z| self.library.zones.get(z))
    }

    pub fn current_question(&self) -> Option<&Question> {
        let zone = self.current_zone()?;
        self.current_question.and_then(|q| zone.questions.get(q))
    }

    fn file_log(&self, log: &mut RunLog, line_number: usize, msg: impl fmt::Display) -> Result<()> {
        log.log(format!("{}:{}: {}", self.file, line_number, msg))
    }

    /// Consumes one raw input line (1-based `line_number`).
    pub fn feed(&mut self, line_number: usize, raw: &str, log: &mut RunLog) -> Result<Step> {
        if self.state == ParseState::Finished {
            return Ok(Step::Finished);
        }
        self.lines_read = line_number;

        let line = raw.trim();
        self.file_log(log, line_number, format_args!("read line: \"{}\"", line))?;

        let stripped = strip_comment(line);
        if stripped.len() != line.len() {
            self.file_log(log, line_number, format_args!("stripped comments: \"{}\"", stripped))?;
        }

        let kind = match classify(stripped, &self.file, line_number) {
            Ok(kind) => kind,
            Err(e) => return Err(log.fail(e)),
        };
        let rule = kind.rule();
        self.file_log(log, line_number, format_args!("found match '{}'", rule))?;

        match (self.state, kind) {
            (ParseState::Preamble, LineKind::BeginDocument) => {
                self.transition(ParseState::TitleBlock, line_number, log)?;
            }
            (ParseState::Preamble, LineKind::Text) => {
                self.file_log(log, line_number, "skipping text line")?;
            }
            (ParseState::Preamble, LineKind::Blank) => {
                self.file_log(log, line_number, "skipping blank line")?;
            }

            (ParseState::TitleBlock, LineKind::Text | LineKind::Blank) => {
                self.file_log(log, line_number, "appending line to title block")?;
                if !self.library.title_block.is_empty() {
                    self.library.title_block.push('\n');
                }
                self.library.title_block.push_str(stripped);
            }
            (ParseState::TitleBlock | ParseState::BetweenZones, LineKind::BeginZone { title }) => {
                self.transition(ParseState::Zone, line_number, log)?;
                self.file_log(log, line_number, "starting new zone")?;
                self.library.zones.push(Zone {
                    title,
                    questions: Vec::new(),
                });
                self.current_zone = Some(self.library.zones.len() - 1);
                self.current_question = None;
            }

            (ParseState::Zone, LineKind::Blank) => {}
            (ParseState::Zone, LineKind::Text) => {
                self.file_log(log, line_number, "skipping text line")?;
            }
            (
                ParseState::Zone,
                LineKind::Question {
                    body,
                    left_choice,
                    right_choice,
                },
            ) => {
                self.file_log(log, line_number, "starting new question")?;
                let zone = match self.current_zone.and_then(|z| self.library.zones.get_mut(z)) {
                    Some(zone) => zone,
                    None => return Err(log.fail(self.bad_transition(rule, line_number))),
                };
                zone.questions.push(Question {
                    body,
                    left_choice,
                    right_choice,
                });
                self.current_question = Some(zone.questions.len() - 1);
            }
            (ParseState::Zone, LineKind::EndZone) => {
                self.transition(ParseState::BetweenZones, line_number, log)?;
            }

            (ParseState::BetweenZones, LineKind::Blank | LineKind::Text) => {}
            (ParseState::BetweenZones, LineKind::EndDocument) => {
                self.file_log(log, line_number, "stopping file reading")?;
                self.state = ParseState::Finished;
                return Ok(Step::Finished);
            }

            _ => return Err(log.fail(self.bad_transition(rule, line_number))),
        }

        Ok(Step::Continue)
    }

    fn transition(&mut self, next: ParseState, line_number: usize, log: &mut RunLog) -> Result<()> {
        self.file_log(
            log,
            line_number,
            format_args!("state transition: '{}' -> '{}'", self.state, next),
        )?;
        self.state = next;
        Ok(())
    }

    fn bad_transition(&self, rule: Rule, line_number: usize) -> ReportError {
        ReportError::BadTransition {
            file: self.file.clone(),
            line: line_number,
            rule: rule.name().to_string(),
            state: self.state.name().to_string(),
        }
    }

    /// Returns the tree once `\end{document}` has been seen.
    pub fn finish(self, log: &mut RunLog) -> Result<Library> {
        if self.state != ParseState::Finished {
            return Err(log.fail(ReportError::UnexpectedEndOfInput {
                file: self.file,
                line: self.lines_read,
                state: self.state.name().to_string(),
            }));
        }
        log.log("Successfully completed library reading")?;
        Ok(self.library)
    }
}

/// Parses a whole library file; lines after `\end{document}` are not read.
pub fn parse_library(source: &str, file: &str, log: &mut RunLog) -> Result<Library> {
    let mut parser = LibraryParser::new(file);
    for (i, raw) in source.lines().enumerate() {
        if parser.feed(i + 1, raw, log)? == Step::Finished {
            break;
        }
    }
    parser.finish(log)
}
