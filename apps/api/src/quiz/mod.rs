// Quiz Runner: one question at a time, a wall-clock countdown, and scoring.

pub mod countdown;
pub mod runner;

use crate::models::question::Question;

/// Number of positions where the chosen option equals the correct answer.
/// Answers beyond the question batch are ignored.
pub fn score_answers(questions: &[Question], answers: &[String]) -> u32 {
    questions
        .iter()
        .zip(answers)
        .filter(|(q, a)| q.correct_answer == **a)
        .count() as u32
}

/// `score / total * 100`, or 0 for an empty quiz.
pub fn quiz_percentage(score: u32, total_questions: usize) -> f64 {
    if total_questions == 0 {
        return 0.0;
    }
    f64::from(score) / total_questions as f64 * 100.0
}

/// `m:ss`, as shown next to the clock icon.
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
