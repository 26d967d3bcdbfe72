use crate::models::profile::{Marks, Profile};

pub const MAX_MARK: u8 = 100;

/// Accumulates form fields until the profile is complete.
#[derive(Debug, Clone, Default)]
pub struct ProfileCollector {
    name: String,
    age: String,
    grade: String,
    interests: Vec<String>,
    marks: Marks,
}

impl ProfileCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.trim().to_string();
    }

    /// Free text; no numeric validation.
    pub fn set_age(&mut self, age: &str) {
        self.age = age.trim().to_string();
    }

    pub fn set_grade(&mut self, grade: &str) {
        self.grade = grade.trim().to_string();
    }

    /// Adds the tag if absent, removes it if present.
    pub fn toggle_interest(&mut self, interest: &str) {
        let interest = interest.trim();
        if interest.is_empty() {
            return;
        }
        if let Some(pos) = self.interests.iter().position(|i| i == interest) {
            self.interests.remove(pos);
        } else {
            self.interests.push(interest.to_string());
        }
    }

    /// Records a mark from raw form input. Unparsable input becomes 0;
    /// out-of-range values are clamped to 0..=100.
    pub fn set_mark(&mut self, subject: &str, raw: &str) {
        let subject = subject.trim();
        if subject.is_empty() {
            return;
        }
        self.marks.insert(subject.to_string(), parse_mark(raw));
    }

    pub fn interests(&self) -> &[String] {
        &self.interests
    }

    pub fn marks(&self) -> &Marks {
        &self.marks
    }

    pub fn is_complete(&self) -> bool {
        !self.name.is_empty()
            && !self.age.is_empty()
            && !self.grade.is_empty()
            && !self.interests.is_empty()
            && !self.marks.is_empty()
    }

    /// Snapshot of a complete profile; `None` while any field is missing.
    pub fn submit(self) -> Option<Profile> {
        if !self.is_complete() {
            return None;
        }
        Some(Profile {
            name: self.name,
            age: self.age,
            grade: self.grade,
            interests: self.interests,
            marks: self.marks,
        })
    }
}

/// Leading-integer parse of the trimmed input ("87.5" → 87, "abc" → 0),
/// clamped to the mark range.
pub fn parse_mark(raw: &str) -> u8 {
    let raw = raw.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let leading: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
    if negative || leading.is_empty() {
        return 0;
    }
    // anything too long for u32 is far above the cap anyway
    leading
        .parse::<u32>()
        .map(|v| v.min(u32::from(MAX_MARK)) as u8)
        .unwrap_or(MAX_MARK)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_collector() -> ProfileCollector {
        let mut c = ProfileCollector::new();
        c.set_name("Asha");
        c.set_age("16");
        c.set_grade("11th");
        c.toggle_interest("Computer Science");
        c.set_mark("Mathematics", "90");
        c
    }

    #[test]
    fn test_empty_collector_is_incomplete_and_submit_is_noop() {
        let c = ProfileCollector::new();
        assert!(!c.is_complete());
        assert!(c.submit().is_none());
    }

    #[test]
    fn test_complete_collector_submits_snapshot() {
        let profile = complete_collector().submit().expect("complete profile");
        assert_eq!(profile.name, "Asha");
        assert_eq!(profile.interests, vec!["Computer Science".to_string()]);
        assert_eq!(profile.marks.get("Mathematics"), Some(&90));
    }

    #[test]
    fn test_each_required_field_blocks_completion() {
        let mut c = complete_collector();
        c.set_grade("   ");
        assert!(!c.is_complete());

        let mut c = complete_collector();
        c.toggle_interest("Computer Science");
        assert!(c.interests().is_empty());
        assert!(!c.is_complete());

        let mut c = ProfileCollector::new();
        c.set_name("Asha");
        c.set_age("16");
        c.set_grade("11th");
        c.toggle_interest("Music");
        assert!(!c.is_complete(), "marks must have at least one entry");
    }

    #[test]
    fn test_toggle_interest_twice_removes_it() {
        let mut c = ProfileCollector::new();
        c.toggle_interest("Music");
        c.toggle_interest("Art & Design");
        c.toggle_interest("Music");
        assert_eq!(c.interests(), &["Art & Design".to_string()]);
    }

    #[test]
    fn test_parse_mark_is_best_effort() {
        assert_eq!(parse_mark("87"), 87);
        assert_eq!(parse_mark(" 87.5 "), 87);
        assert_eq!(parse_mark("abc"), 0);
        assert_eq!(parse_mark(""), 0);
        assert_eq!(parse_mark("-12"), 0);
        assert_eq!(parse_mark("150"), 100);
        assert_eq!(parse_mark("99999999999999999999"), 100);
        assert_eq!(parse_mark("42abc"), 42);
    }

    #[test]
    fn test_set_mark_overwrites_subject() {
        let mut c = ProfileCollector::new();
        c.set_mark("Physics", "40");
        c.set_mark("Physics", "75");
        assert_eq!(c.marks().get("Physics"), Some(&75));
        assert_eq!(c.marks().len(), 1);
    }
}
