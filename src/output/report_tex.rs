//! LaTeX report: the title block followed by one longtable per zone, each
//! question paired with a pgfplots chart of its answer distribution.

use crate::core::letters::index_to_letter;
use crate::domain::model::{Library, PlotStyle, Question, Statistics};
use crate::utils::error::Result;
use std::fmt::Write;

const CHART_WIDTH_CM: f64 = 5.0;

/// Stacked-bar segments narrower than this (in percent) get no letter label.
const STACKED_LABEL_MIN_PERCENT: f64 = 7.0;

const STACKED_CYCLE_LIST: &str = r"cycle list={{fill=blue!50!white,font={\tiny}},{fill=blue!20!white,font={\tiny}},{fill=black!10!white,font={\tiny}},{fill=red!20!white,font={\tiny}},{fill=red!50!white,font={\tiny}}},";

/// `%g`-style number: at most six significant digits, no trailing zeros.
pub fn format_number(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (5 - magnitude).max(0) as usize;
    let s = format!("{:.*}", decimals, value);
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

pub fn render_report(library: &Library, stats: &Statistics, style: PlotStyle) -> Result<String> {
    let mut out = String::new();
    writeln!(out, r"\documentclass{{article}}")?;
    writeln!(out, r"\usepackage[margin=2.5cm]{{geometry}}")?;
    writeln!(out, r"\usepackage{{pgfplots}}")?;
    writeln!(out, r"\pgfplotsset{{compat=1.10}}")?;
    writeln!(out, r"\usepackage{{longtable}}")?;
    writeln!(out, r"\begin{{document}}")?;
    writeln!(out)?;
    writeln!(out, "{}", library.title_block)?;
    writeln!(out)?;

    let mut q = 0;
    for zone in &library.zones {
        writeln!(out, r"\vspace{{2em}}")?;
        writeln!(out, r"\subsection*{{{}}}\ \\[-1.5em]", zone.title)?;
        writeln!(out, r"\vspace{{-2em}}")?;
        writeln!(out, r"\begin{{longtable}}{{p{{7.5cm}}p{{2cm}}cp{{2cm}}}}")?;
        writeln!(out, r"\hline\\[0.2em]")?;
        for question in &zone.questions {
            write_question(&mut out, q, question, stats, style)?;
            q += 1;
        }
        writeln!(out, r"\end{{longtable}}")?;
    }

    writeln!(out, r"\end{{document}}")?;
    Ok(out)
}

fn write_question(
    out: &mut String,
    q: usize,
    question: &Question,
    stats: &Statistics,
    style: PlotStyle,
) -> Result<()> {
    writeln!(
        out,
        r"\parbox[b]{{\hsize}}{{\raggedright {}. {}}}",
        q + 1,
        question.body
    )?;
    writeln!(
        out,
        r"& \parbox[b]{{\hsize}}{{\raggedleft \scriptsize {}}}",
        question.left_choice
    )?;
    writeln!(out, "&")?;
    writeln!(out, r"\hspace*{{-1.3em}}")?;

    let answered = stats.answered.get(q).copied().unwrap_or(0);
    let percentages = if q < stats.question_count {
        stats.respondent_percentages(q)
    } else {
        vec![0.0; stats.answer_count]
    };
    match style {
        PlotStyle::Bar => write_bar_chart(out, answered, &percentages)?,
        PlotStyle::Stacked => write_stacked_chart(out, answered, &percentages)?,
    }

    writeln!(out, r"\hspace*{{-1em}}")?;
    writeln!(
        out,
        r"& \parbox[b]{{\hsize}}{{\raggedright \scriptsize {}}} \\[1.1em]",
        question.right_choice
    )?;
    writeln!(out, r"\hline\\[0.2em]")?;
    Ok(())
}

fn write_bar_chart(out: &mut String, answered: usize, percentages: &[f64]) -> Result<()> {
    let letters: Vec<String> = (0..percentages.len())
        .map(|a| index_to_letter(a as i64).to_string())
        .collect();
    let bar_width = if percentages.is_empty() {
        0.0
    } else {
        CHART_WIDTH_CM / percentages.len() as f64 / 2.0
    };

    writeln!(out, r"\begin{{tikzpicture}}[baseline]")?;
    writeln!(out, r"\begin{{axis}}[")?;
    writeln!(out, r"title={{\scriptsize N = {}}},", answered)?;
    writeln!(out, "every axis title shift=0pt,")?;
    writeln!(out, "ybar, ymin=0,")?;
    writeln!(out, "width={}cm, height=2.5cm,", format_number(CHART_WIDTH_CM))?;
    writeln!(out, "symbolic x coords={{{}}},", letters.join(","))?;
    writeln!(out, "xtick=data,")?;
    writeln!(out, "enlarge x limits=0.12,")?;
    writeln!(out, r"xticklabel style={{font=\scriptsize}},")?;
    writeln!(out, r"yticklabel style={{font=\scriptsize}},")?;
    writeln!(out, "xtick pos=left,")?;
    writeln!(out, "bar width={}cm,", format_number(bar_width))?;
    writeln!(out, "]")?;
    writeln!(out, r"\addplot coordinates {{")?;
    for (letter, value) in letters.iter().zip(percentages) {
        writeln!(out, "({},{})", letter, format_number(*value))?;
    }
    writeln!(out, "}};")?;
    writeln!(out, r"\end{{axis}}")?;
    writeln!(out, r"\end{{tikzpicture}}")?;
    Ok(())
}

fn write_stacked_chart(out: &mut String, answered: usize, percentages: &[f64]) -> Result<()> {
    writeln!(out, r"\begin{{tikzpicture}}[baseline]")?;
    writeln!(out, r"\begin{{axis}}[")?;
    writeln!(out, r"title={{\scriptsize N = {}}},", answered)?;
    writeln!(out, "every axis title shift=0pt,")?;
    writeln!(out, "width={}cm,height=2.1cm,", format_number(CHART_WIDTH_CM))?;
    writeln!(out, "xbar stacked,")?;
    writeln!(out, r"ytick=\empty,")?;
    writeln!(out, "xmin=0, xmax=100,")?;
    writeln!(out, "xtick={{0,25,50,75,100}},")?;
    writeln!(out, r"xticklabel style={{font=\scriptsize}},")?;
    writeln!(out, "nodes near coords,")?;
    writeln!(out, "point meta=explicit symbolic,")?;
    writeln!(out, "{}", STACKED_CYCLE_LIST)?;
    writeln!(out, "]")?;
    for (a, pct) in percentages.iter().enumerate() {
        // 略為縮短，總和剛好超過 100 時 pgfplots 會漏畫標籤
        let value = pct * 0.999;
        let label = if value > STACKED_LABEL_MIN_PERCENT {
            index_to_letter(a as i64).to_string()
        } else {
            String::new()
        };
        writeln!(out, r"\addplot coordinates {{")?;
        writeln!(out, "({},1) [{}]", format_number(value), label)?;
        writeln!(out, "}};")?;
    }
    writeln!(out, r"\end{{axis}}")?;
    writeln!(out, r"\end{{tikzpicture}}")?;
    Ok(())
}
