use serde::{Deserialize, Serialize};

/// One multiple-choice question. Field names match the JSON shape the
/// generation prompt asks the model for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl Question {
    /// Checks that the question has text, at least two options, and that the
    /// correct answer is one of them.
    pub fn validate(&self) -> Result<(), String> {
        if self.question.trim().is_empty() {
            return Err("question text is empty".to_string());
        }
        if self.options.len() < 2 {
            return Err(format!(
                "question {:?} has {} option(s), need at least 2",
                self.question,
                self.options.len()
            ));
        }
        if !self.options.contains(&self.correct_answer) {
            return Err(format!(
                "correct answer {:?} is not among the options of {:?}",
                self.correct_answer, self.question
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: &[&str], correct: &str) -> Question {
        Question {
            question: "Which is prime?".to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: correct.to_string(),
        }
    }

    #[test]
    fn test_valid_question() {
        assert!(question(&["4", "7"], "7").validate().is_ok());
    }

    #[test]
    fn test_correct_answer_must_be_an_option() {
        let err = question(&["4", "6"], "7").validate().unwrap_err();
        assert!(err.contains("not among the options"));
    }

    #[test]
    fn test_needs_two_options() {
        assert!(question(&["7"], "7").validate().is_err());
    }

    #[test]
    fn test_deserializes_model_shape() {
        let q: Question = serde_json::from_str(
            r#"{"question": "2+2?", "options": ["3", "4"], "correct_answer": "4"}"#,
        )
        .unwrap();
        assert_eq!(q.correct_answer, "4");
    }
}
