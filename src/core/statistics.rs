//! Per-question answer statistics.

use crate::domain::model::{Answer, Statistics};

fn ratio(numerator: f64, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}

/// Aggregates the answer grid (`answers[student][question]`).
///
/// Answers whose index is not below `max_answers` are not counted and so
/// end up in the unanswered totals.
pub fn compute_statistics(
    answers: &[Vec<Answer>],
    question_count: usize,
    max_answers: usize,
) -> Statistics {
    let student_count = answers.len();

    let mut choice_counts = vec![vec![0usize; max_answers]; question_count];
    for row in answers {
        for (q, answer) in row.iter().take(question_count).enumerate() {
            if let Some(a) = answer.index().filter(|a| *a < max_answers) {
                choice_counts[q][a] += 1;
            }
        }
    }

    let answered: Vec<usize> = choice_counts.iter().map(|c| c.iter().sum()).collect();
    let unanswered: Vec<usize> = answered.iter().map(|n| student_count - n).collect();

    // 以作答人數加權的平均選項位置 (1 起算)
    let mean_position = choice_counts
        .iter()
        .zip(&answered)
        .map(|(counts, &n)| {
            let weighted: usize = counts.iter().enumerate().map(|(a, c)| (a + 1) * c).sum();
            ratio(weighted as f64, n)
        })
        .collect();

    let choice_ratio = choice_counts
        .iter()
        .map(|counts| {
            counts
                .iter()
                .map(|&c| ratio(c as f64, student_count))
                .collect::<Vec<f64>>()
        })
        .collect();

    let unanswered_ratio = unanswered
        .iter()
        .map(|&n| ratio(n as f64, student_count))
        .collect();

    Statistics {
        student_count,
        question_count,
        answer_count: max_answers,
        choice_counts,
        answered,
        unanswered,
        mean_position,
        choice_ratio,
        unanswered_ratio,
    }
}
