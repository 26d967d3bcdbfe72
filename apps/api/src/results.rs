//! Results Presenter: score summary and recommendation list for the final screen.

use serde::Serialize;

use crate::models::career::CareerRecommendation;
use crate::quiz::quiz_percentage;

/// Scores at or above this percentage get the highlighted badge.
pub const HIGHLIGHT_PERCENT: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PerformanceLabel {
    Excellent,
    Good,
    Fair,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl PerformanceLabel {
    pub fn for_percentage(pct: f64) -> Self {
        if pct >= 80.0 {
            PerformanceLabel::Excellent
        } else if pct >= 60.0 {
            PerformanceLabel::Good
        } else if pct >= 40.0 {
            PerformanceLabel::Fair
        } else {
            PerformanceLabel::NeedsImprovement
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultsView {
    pub student_name: String,
    pub score: u32,
    pub total_questions: usize,
    pub percentage: f64,
    pub label: PerformanceLabel,
    pub highlight: bool,
    pub recommendations: Vec<CareerRecommendation>,
}

impl ResultsView {
    pub fn build(
        student_name: Option<&str>,
        score: u32,
        total_questions: usize,
        recommendations: &[CareerRecommendation],
    ) -> Self {
        let percentage = quiz_percentage(score, total_questions);
        ResultsView {
            student_name: student_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or("Student")
                .to_string(),
            score,
            total_questions,
            percentage,
            label: PerformanceLabel::for_percentage(percentage),
            highlight: percentage >= HIGHLIGHT_PERCENT,
            recommendations: recommendations.to_vec(),
        }
    }
}
