//! Line classification for library files.
//!
//! Each line is matched against an ordered rule table and the first rule
//! that matches wins. Directive rules forbid any text after the directive;
//! the catch-all `text` and `blank` rules come last.

use crate::utils::error::{ReportError, Result};
use regex::{Captures, Regex};
use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    BeginDocument,
    BeginZone,
    Question,
    EndZone,
    EndDocument,
    Text,
    Blank,
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::BeginDocument => "begin_document",
            Rule::BeginZone => "begin_zone",
            Rule::Question => "question",
            Rule::EndZone => "end_zone",
            Rule::EndDocument => "end_document",
            Rule::Text => "text",
            Rule::Blank => "blank",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A classified line with its captured fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    BeginDocument,
    BeginZone {
        title: String,
    },
    Question {
        body: String,
        left_choice: String,
        right_choice: String,
    },
    EndZone,
    EndDocument,
    Text,
    Blank,
}

impl LineKind {
    pub fn rule(&self) -> Rule {
        match self {
            LineKind::BeginDocument => Rule::BeginDocument,
            LineKind::BeginZone { .. } => Rule::BeginZone,
            LineKind::Question { .. } => Rule::Question,
            LineKind::EndZone => Rule::EndZone,
            LineKind::EndDocument => Rule::EndDocument,
            LineKind::Text => Rule::Text,
            LineKind::Blank => Rule::Blank,
        }
    }
}

struct ClassificationRule {
    rule: Rule,
    regex: Regex,
    no_tail: bool,
}

impl ClassificationRule {
    fn new(rule: Rule, pattern: &str, no_tail: bool) -> Self {
        Self {
            rule,
            regex: Regex::new(pattern).expect("library rule patterns are valid"),
            no_tail,
        }
    }
}

static RULES: LazyLock<Vec<ClassificationRule>> = LazyLock::new(|| {
    vec![
        ClassificationRule::new(
            Rule::BeginDocument,
            r"^\s*\\begin\{document\}(?P<tail>.*)$",
            true,
        ),
        ClassificationRule::new(
            Rule::BeginZone,
            r"^\s*\\begin\{zone\}\{(?P<title>[^}]+)\}(?P<tail>.*)$",
            true,
        ),
        ClassificationRule::new(
            Rule::Question,
            r"^\s*\\question\{(?P<body>.*)\}\{(?P<left_choice>[^}]*)\}\{(?P<right_choice>[^}]*)\}(?P<tail>.*)$",
            true,
        ),
        ClassificationRule::new(Rule::EndZone, r"^\s*\\end\{zone\}(?P<tail>.*)$", true),
        ClassificationRule::new(
            Rule::EndDocument,
            r"^\s*\\end\{document\}(?P<tail>.*)$",
            true,
        ),
        ClassificationRule::new(Rule::Text, r"^.*\S.*$", false),
        ClassificationRule::new(Rule::Blank, r"^\s*$", false),
    ]
});

/// Removes the first `%` not preceded by a backslash and everything after it.
pub fn strip_comment(line: &str) -> &str {
    let mut prev = None;
    for (i, c) in line.char_indices() {
        if c == '%' && prev != Some('\\') {
            return &line[..i];
        }
        prev = Some(c);
    }
    line
}

fn capture(caps: &Captures<'_>, name: &str) -> String {
    caps.name(name)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Classifies a comment-stripped line. `file` and `line_number` only feed
/// the diagnostics.
pub fn classify(line: &str, file: &str, line_number: usize) -> Result<LineKind> {
    for rule in RULES.iter() {
        let Some(caps) = rule.regex.captures(line) else {
            continue;
        };

        if rule.no_tail {
            let extra = capture(&caps, "tail");
            if !extra.is_empty() {
                return Err(ReportError::TrailingContent {
                    file: file.to_string(),
                    line: line_number,
                    rule: rule.rule.name().to_string(),
                    text: extra,
                });
            }
        }

        let kind = match rule.rule {
            Rule::BeginDocument => LineKind::BeginDocument,
            Rule::BeginZone => LineKind::BeginZone {
                title: capture(&caps, "title"),
            },
            Rule::Question => LineKind::Question {
                body: capture(&caps, "body"),
                left_choice: capture(&caps, "left_choice"),
                right_choice: capture(&caps, "right_choice"),
            },
            Rule::EndZone => LineKind::EndZone,
            Rule::EndDocument => LineKind::EndDocument,
            Rule::Text => LineKind::Text,
            Rule::Blank => LineKind::Blank,
        };
        return Ok(kind);
    }

    Err(ReportError::NoRuleMatched {
        file: file.to_string(),
        line: line_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(line: &str) -> LineKind {
        classify(line, "library.tex", 1).unwrap()
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("abc % comment"), "abc ");
        assert_eq!(strip_comment("abc \\% notcomment"), "abc \\% notcomment");
        assert_eq!(strip_comment("% whole line"), "");
        assert_eq!(strip_comment("50\\% off % note"), "50\\% off ");
        assert_eq!(strip_comment("no comment"), "no comment");
    }

    #[test]
    fn test_strip_comment_is_idempotent() {
        for line in ["abc % comment", "abc \\% x % y", "plain", "%"] {
            let once = strip_comment(line);
            assert_eq!(strip_comment(once), once);
        }
    }

    #[test]
    fn test_directives() {
        assert_eq!(kind("\\begin{document}"), LineKind::BeginDocument);
        assert_eq!(kind("  \\end{document}  "), LineKind::EndDocument);
        assert_eq!(kind("\\end{zone}"), LineKind::EndZone);
        assert_eq!(
            kind("\\begin{zone}{ Basics }"),
            LineKind::BeginZone {
                title: "Basics".to_string()
            }
        );
    }

    #[test]
    fn test_question_captures_are_trimmed() {
        assert_eq!(
            kind("\\question{ The lectures were {\\em useful}. }{ Disagree }{Agree }"),
            LineKind::Question {
                body: "The lectures were {\\em useful}.".to_string(),
                left_choice: "Disagree".to_string(),
                right_choice: "Agree".to_string(),
            }
        );
    }

    #[test]
    fn test_question_allows_empty_choices() {
        assert_eq!(
            kind("\\question{Rate the course}{}{}"),
            LineKind::Question {
                body: "Rate the course".to_string(),
                left_choice: String::new(),
                right_choice: String::new(),
            }
        );
    }

    #[test]
    fn test_text_and_blank() {
        assert_eq!(kind("\\section*{Course survey}"), LineKind::Text);
        assert_eq!(kind("   "), LineKind::Blank);
        assert_eq!(kind(""), LineKind::Blank);
    }

    #[test]
    fn test_zone_without_title_is_text() {
        assert_eq!(kind("\\begin{zone}{}"), LineKind::Text);
    }

    #[test]
    fn test_trailing_content_is_rejected() {
        let err = classify("\\end{zone} extra", "library.tex", 7).unwrap_err();
        match err {
            ReportError::TrailingContent {
                line, rule, text, ..
            } => {
                assert_eq!(line, 7);
                assert_eq!(rule, "end_zone");
                assert_eq!(text, "extra");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(matches!(
            classify("\\begin{document} x", "library.tex", 1),
            Err(ReportError::TrailingContent { .. })
        ));
        assert!(matches!(
            classify("\\question{a}{b}{c} d", "library.tex", 1),
            Err(ReportError::TrailingContent { .. })
        ));
    }

    #[test]
    fn test_trailing_whitespace_is_allowed() {
        assert_eq!(kind("\\end{zone}   \t"), LineKind::EndZone);
    }

    #[test]
    fn test_diagnostic_format() {
        let err = classify("\\end{document} tail", "lib.tex", 12).unwrap_err();
        assert_eq!(
            err.to_string(),
            "lib.tex:12: ERROR: invalid extra text following 'end_document': tail"
        );
    }
}
