use serde::Serialize;

use crate::profile::collector::MAX_MARK;

/// Interest tags offered on the profile form.
pub const INTEREST_OPTIONS: &[&str] = &[
    "Computer Science",
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "English Literature",
    "History",
    "Geography",
    "Economics",
    "Psychology",
    "Art & Design",
    "Music",
    "Sports",
    "Business",
    "Engineering",
];

/// Subjects the student can enter marks (out of 100) for.
pub const SUBJECTS: &[&str] = &[
    "Mathematics",
    "English",
    "Physics",
    "Chemistry",
    "Biology",
    "History",
    "Geography",
    "Computer Science",
    "Economics",
];

#[derive(Debug, Serialize)]
pub struct Catalog {
    pub interests: &'static [&'static str],
    pub subjects: &'static [&'static str],
    pub max_mark: u8,
}

pub fn catalog() -> Catalog {
    Catalog {
        interests: INTEREST_OPTIONS,
        subjects: SUBJECTS,
        max_mark: MAX_MARK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::collector::parse_mark;

    #[test]
    fn test_catalog_max_mark_matches_clamp() {
        let c = catalog();
        assert_eq!(c.max_mark, MAX_MARK);
        assert_eq!(parse_mark("250"), c.max_mark);
        assert_eq!(c.interests.len(), 15);
        assert_eq!(c.subjects.len(), 9);
    }
}
