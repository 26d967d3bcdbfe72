use serde::{Deserialize, Serialize};

/// A suggested career path shown on the results screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerRecommendation {
    pub title: String,
    pub description: String,
    /// 0 – 100
    pub match_percentage: u8,
    pub learning_path: Vec<String>,
    pub skills_needed: Vec<String>,
}
