// Quiz and career generation.
// Implements: live generation through llm_client and the deterministic rule table.
// All model calls go through llm_client; nothing here talks HTTP directly.

pub mod generator;
pub mod prompts;
pub mod rules;

/// Target size of a quiz batch.
pub const QUESTION_COUNT: usize = 5;
/// Upper bound on recommendations returned to the student.
pub const MAX_RECOMMENDATIONS: usize = 4;
/// How many of the strongest subjects feed prompts and rule triggers.
pub const TOP_SUBJECT_COUNT: usize = 3;
