use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Subject name → mark out of 100. Ordered so ties break alphabetically.
pub type Marks = BTreeMap<String, u8>;

/// A submitted student profile. Immutable once built by the collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub age: String,
    pub grade: String,
    pub interests: Vec<String>,
    pub marks: Marks,
}

/// Up to `n` subjects, highest mark first. Equal marks keep alphabetical order.
pub fn top_subjects(marks: &Marks, n: usize) -> Vec<(&str, u8)> {
    let mut ranked: Vec<(&str, u8)> = marks.iter().map(|(s, m)| (s.as_str(), *m)).collect();
    // stable sort preserves the BTreeMap order among ties
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

/// Mean of all marks, 0.0 when there are none.
pub fn average_mark(marks: &Marks) -> f64 {
    if marks.is_empty() {
        return 0.0;
    }
    let total: u32 = marks.values().map(|m| u32::from(*m)).sum();
    f64::from(total) / marks.len() as f64
}
