use anyhow::Result;
use scantron_report::domain::model::PlotStyle;
use scantron_report::{LocalStorage, ReportConfig, ReportEngine, ReportError, ReportPipeline, RunLog};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const LIBRARY: &str = r"\documentclass{article}
\begin{document}
\section*{TAM 251 mid-semester survey}
\begin{zone}{Basics}
\question{The lectures are well paced.}{Too slow}{Too fast}
\question{Homework takes 50\% of my time.}{Disagree}{Agree} % percent is escaped
\end{zone}
\end{document}
";

fn record(section: &str, answers: &str) -> String {
    format!("{:<60}{:<12}{}", "STUDENT 000000000", section, answers)
}

fn setup(dir: &Path, library: &str, scantron: &str) -> ReportConfig {
    fs::write(dir.join("tam251_library.tex"), library).unwrap();
    fs::write(dir.join("tam251_scantron.dat"), scantron).unwrap();
    ReportConfig {
        base_dir: dir.to_str().unwrap().to_string(),
        ..ReportConfig::default()
    }
}

fn run(config: ReportConfig, dir: &Path) -> scantron_report::Result<Vec<String>> {
    let mut log = RunLog::create(dir.join("tam251_proc_report.log"))?;
    let storage = LocalStorage::new(config.base_dir.clone());
    let engine = ReportEngine::new(ReportPipeline::new(storage, config));
    let written = engine.run(&mut log)?;
    log.close()?;
    Ok(written)
}

fn read_csv(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(|s| s.to_string()).collect());
    }
    Ok(rows)
}

#[test]
fn test_end_to_end_report() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path();
    let scantron = format!("{}\n{}\n\x1a", record("001", "14"), record("002", "1 "));
    let config = setup(dir, LIBRARY, &scantron);

    let written = run(config, dir)?;
    assert_eq!(written.len(), 8);

    let answers = read_csv(&dir.join("tam251_answers.csv"))?;
    assert_eq!(answers.len(), 3);
    assert_eq!(
        answers[0],
        vec![
            "1. The lectures are well paced.".to_string(),
            "2. Homework takes 50\\% of my time.".to_string(),
        ]
    );
    assert_eq!(answers[1], vec!["0", "3"]);
    assert_eq!(answers[2], vec!["0", ""]);

    let counts = read_csv(&dir.join("tam251_stats_n_s_qa.csv"))?;
    let answered = read_csv(&dir.join("tam251_stats_n_s_q.csv"))?;
    assert_eq!(counts[0][0], "q");
    assert_eq!(counts[0][1], "n_s(q,a=A)");
    for q in 1..=2 {
        let sum: usize = counts[q][1..].iter().map(|c| c.parse::<usize>().unwrap()).sum();
        assert_eq!(sum.to_string(), answered[q][1]);
    }
    assert_eq!(answered[1], vec!["1", "2"]);
    assert_eq!(answered[2], vec!["2", "1"]);

    let unanswered = read_csv(&dir.join("tam251_stats_n_na_q.csv"))?;
    assert_eq!(unanswered[2], vec!["2", "1"]);

    let ratios = read_csv(&dir.join("tam251_stats_r_s_qa.csv"))?;
    let unanswered_ratio = read_csv(&dir.join("tam251_stats_r_na_q.csv"))?;
    for q in 1..=2 {
        let total: f64 = ratios[q][1..].iter().map(|r| r.parse::<f64>().unwrap()).sum::<f64>()
            + unanswered_ratio[q][1].parse::<f64>()?;
        assert!((total - 1.0).abs() < 1e-9);
    }

    let report = fs::read_to_string(dir.join("tam251_report.tex"))?;
    assert!(report.contains("\\section*{TAM 251 mid-semester survey}"));
    assert!(report.contains("\\subsection*{Basics}"));
    assert!(report.contains("title={\\scriptsize N = 2},"));
    assert!(report.contains("title={\\scriptsize N = 1},"));

    let log = fs::read_to_string(dir.join("tam251_proc_report.log"))?;
    assert!(log.contains("scantron-report version"));
    assert!(log.contains("tam251_library.tex:8: stopping file reading"));
    assert!(log.contains("a array: (N_s = 2, N_q = 2)"));
    assert!(log.ends_with("run finished\n"));
    Ok(())
}

#[test]
fn test_stacked_plot_style() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path();
    let scantron = format!("{}\n", record("001", "25"));
    let mut config = setup(dir, LIBRARY, &scantron);
    config.plot_style = PlotStyle::Stacked;

    run(config, dir)?;

    let report = fs::read_to_string(dir.join("tam251_report.tex"))?;
    assert!(report.contains("xbar stacked,"));
    assert!(!report.contains("symbolic x coords"));
    Ok(())
}

#[test]
fn test_bad_library_aborts_without_outputs() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path();
    let library = LIBRARY.replace("\\end{zone}\n", "\\end{zone}\n\\question{Orphan}{a}{b}\n");
    let config = setup(dir, &library, &record("001", "11"));

    let err = run(config, dir).unwrap_err();
    assert!(matches!(err, ReportError::BadTransition { line: 8, .. }));
    assert!(!dir.join("tam251_answers.csv").exists());
    assert!(!dir.join("tam251_report.tex").exists());

    let log = fs::read_to_string(dir.join("tam251_proc_report.log"))?;
    assert!(log.contains("ERROR: 'question' not allowed in state 'between_zones'"));
    Ok(())
}

#[test]
fn test_short_scantron_record_aborts() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path();
    let scantron = format!("{}\n{}\n", record("001", "11"), record("002", "1"));
    let config = setup(dir, LIBRARY, &scantron);

    let err = run(config, dir).unwrap_err();
    assert!(matches!(
        err,
        ReportError::RecordTooShort {
            line: 2,
            length: 73,
            expected: 74,
            ..
        }
    ));
    assert!(!dir.join("tam251_answers.csv").exists());
    Ok(())
}

#[test]
fn test_noisy_scantron_data_warns_and_continues() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path();
    let scantron = format!("{}\n", record("0?2", "7x"));
    let config = setup(dir, LIBRARY, &scantron);

    run(config, dir)?;

    let answers = read_csv(&dir.join("tam251_answers.csv"))?;
    assert_eq!(answers[1], vec!["", ""]);
    let log = fs::read_to_string(dir.join("tam251_proc_report.log"))?;
    assert_eq!(log.matches("WARNING: invalid character").count(), 3);
    Ok(())
}

#[test]
fn test_missing_library_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = ReportConfig {
        base_dir: temp_dir.path().to_str().unwrap().to_string(),
        ..ReportConfig::default()
    };

    let err = run(config, temp_dir.path()).unwrap_err();
    assert!(matches!(err, ReportError::ReadFileError { .. }));
    assert!(err.to_string().contains("tam251_library.tex"));
    Ok(())
}
