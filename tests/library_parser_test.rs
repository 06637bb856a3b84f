use scantron_report::{parse_library, ReportError, RunLog};

/// 依區塊題數產生題庫檔
fn build_library(zone_sizes: &[usize]) -> String {
    let mut source = String::from("% generated\n\\begin{document}\nTitle line\n\n");
    for (z, &size) in zone_sizes.iter().enumerate() {
        source.push_str(&format!("\\begin{{zone}}{{Zone {}}}\n", z + 1));
        for q in 0..size {
            source.push_str(&format!(
                "\\question{{Zone {} question {}}}{{Low}}{{High}}\n",
                z + 1,
                q + 1
            ));
            if q % 2 == 0 {
                source.push_str("free commentary inside the zone\n\n");
            }
        }
        source.push_str("\\end{zone}\n\n");
    }
    source.push_str("\\end{document}\n");
    source
}

#[test]
fn test_zone_and_question_counts_match_directives() {
    let layouts: [&[usize]; 4] = [&[0], &[1], &[2, 3], &[4, 0, 1, 7]];
    for layout in layouts {
        let mut log = RunLog::sink();
        let library = parse_library(&build_library(layout), "library.tex", &mut log).unwrap();
        assert_eq!(library.zones.len(), layout.len());
        for (z, (zone, &size)) in library.zones.iter().zip(layout).enumerate() {
            assert_eq!(zone.title, format!("Zone {}", z + 1));
            assert_eq!(zone.questions.len(), size);
            for (q, question) in zone.questions.iter().enumerate() {
                assert_eq!(question.body, format!("Zone {} question {}", z + 1, q + 1));
            }
        }
        assert_eq!(library.title_block, "Title line\n");
    }
}

#[test]
fn test_empty_document_needs_a_zone() {
    // \end{document} is only accepted between zones
    let mut log = RunLog::sink();
    let err = parse_library(
        "\\begin{document}\n\\end{document}\n",
        "library.tex",
        &mut log,
    )
    .unwrap_err();
    assert!(matches!(err, ReportError::BadTransition { line: 2, .. }));
}

#[test]
fn test_end_zone_with_trailing_text_fails_everywhere() {
    let prefixes = [
        "",
        "\\begin{document}\n",
        "\\begin{document}\n\\begin{zone}{A}\n",
        "\\begin{document}\n\\begin{zone}{A}\n\\end{zone}\n",
    ];
    for prefix in prefixes {
        let source = format!("{}\\end{{zone}} extra\n", prefix);
        let mut log = RunLog::sink();
        let err = parse_library(&source, "library.tex", &mut log).unwrap_err();
        assert!(err.is_library_syntax_error());
        assert!(
            matches!(err, ReportError::TrailingContent { ref text, .. } if text == "extra"),
            "prefix {prefix:?} gave {err:?}"
        );
    }
}

#[test]
fn test_missing_end_document_is_fatal() {
    let source = build_library(&[2]).replace("\\end{document}\n", "");
    let mut log = RunLog::sink();
    let err = parse_library(&source, "library.tex", &mut log).unwrap_err();
    assert!(matches!(
        err,
        ReportError::UnexpectedEndOfInput { ref state, .. } if state == "between_zones"
    ));
}
