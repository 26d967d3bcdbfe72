//! Quiz state machine.
//!
//! `Active(index, selection, answers, remaining) → … → Completed`. Completion is
//! terminal: whichever of the manual path and the countdown gets there first
//! fires the callback, the other is a no-op.

use serde::Serialize;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::question::Question;
use crate::quiz::{format_time, quiz_percentage, score_answers};

/// Below this many seconds the clock is rendered as a warning.
pub const LOW_TIME_SECS: u32 = 60;

pub type CompletionCallback = Box<dyn FnOnce(QuizOutcome) + Send>;

/// Final result handed to the completion callback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizOutcome {
    pub score: u32,
    pub answers: Vec<String>,
    pub total_questions: usize,
    pub timed_out: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved on to this (0-based) question.
    Next(usize),
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running(u32),
    Expired,
    /// Runner had already completed; nothing changed.
    Idle,
}

pub struct QuizRunner {
    questions: Vec<Question>,
    index: usize,
    selection: Option<String>,
    answers: Vec<String>,
    remaining_secs: u32,
    outcome: Option<QuizOutcome>,
    on_complete: Option<CompletionCallback>,
}

impl QuizRunner {
    pub fn new(
        questions: Vec<Question>,
        duration_secs: u32,
        on_complete: CompletionCallback,
    ) -> Result<Self, AppError> {
        if questions.is_empty() {
            return Err(AppError::Validation(
                "cannot start a quiz without questions".to_string(),
            ));
        }
        Ok(Self {
            questions,
            index: 0,
            selection: None,
            answers: Vec::new(),
            remaining_secs: duration_secs,
            outcome: None,
            on_complete: Some(on_complete),
        })
    }

    pub fn is_completed(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<&QuizOutcome> {
        self.outcome.as_ref()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.is_completed() {
            return None;
        }
        self.questions.get(self.index)
    }

    /// Sets the pending choice for the current question. Only offered
    /// options are accepted.
    pub fn select_option(&mut self, value: &str) -> Result<(), AppError> {
        let question = self.current_question().ok_or_else(already_completed)?;
        if !question.options.iter().any(|o| o == value) {
            return Err(AppError::Validation(format!(
                "{value:?} is not an option for this question"
            )));
        }
        self.selection = Some(value.to_string());
        Ok(())
    }

    /// Records the pending choice and moves on; completes after the last question.
    pub fn advance(&mut self) -> Result<Advance, AppError> {
        if self.is_completed() {
            return Err(already_completed());
        }
        let Some(choice) = self.selection.take() else {
            return Err(AppError::Validation(
                "Please select an answer. Choose one option before proceeding.".to_string(),
            ));
        };
        self.answers.push(choice);

        if self.index + 1 >= self.questions.len() {
            self.complete(false);
            Ok(Advance::Completed)
        } else {
            self.index += 1;
            debug!("Advanced to question {}", self.index + 1);
            Ok(Advance::Next(self.index))
        }
    }

    /// One second of wall clock. Forces completion when time runs out.
    pub fn tick(&mut self) -> Tick {
        if self.is_completed() {
            return Tick::Idle;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            info!(
                "Quiz time expired with {}/{} answers recorded",
                self.answers.len(),
                self.questions.len()
            );
            self.complete(true);
            Tick::Expired
        } else {
            Tick::Running(self.remaining_secs)
        }
    }

    fn complete(&mut self, timed_out: bool) {
        if self.is_completed() {
            return;
        }

        let mut answers = std::mem::take(&mut self.answers);
        // a pending choice counts only if it belongs to the current question
        if let Some(pending) = self.selection.take() {
            if answers.len() == self.index {
                answers.push(pending);
            }
        }

        let outcome = QuizOutcome {
            score: score_answers(&self.questions, &answers),
            answers: answers.clone(),
            total_questions: self.questions.len(),
            timed_out,
        };
        self.answers = answers;
        self.outcome = Some(outcome.clone());

        info!(
            "Quiz completed: {}/{} (timed_out={})",
            outcome.score, outcome.total_questions, timed_out
        );
        if let Some(callback) = self.on_complete.take() {
            callback(outcome);
        }
    }

    pub fn view(&self) -> QuizView {
        let total = self.questions.len();
        let position = (self.index + 1).min(total);
        let is_last = position == total;
        QuizView {
            question: self.current_question().cloned(),
            position,
            total_questions: total,
            answered: self.answers.len(),
            selection: self.selection.clone(),
            remaining_secs: self.remaining_secs,
            clock: format_time(self.remaining_secs),
            low_time: self.remaining_secs < LOW_TIME_SECS,
            progress_percent: quiz_percentage(position as u32, total),
            action_label: if is_last {
                "Complete Assessment"
            } else {
                "Next Question"
            },
            completed: self.is_completed(),
        }
    }
}

fn already_completed() -> AppError {
    AppError::Validation("quiz already completed".to_string())
}

/// What the quiz screen renders.
#[derive(Debug, Clone, Serialize)]
pub struct QuizView {
    pub question: Option<Question>,
    /// 1-based
    pub position: usize,
    pub total_questions: usize,
    pub answered: usize,
    pub selection: Option<String>,
    pub remaining_secs: u32,
    pub clock: String,
    pub low_time: bool,
    pub progress_percent: f64,
    pub action_label: &'static str,
    pub completed: bool,
}
