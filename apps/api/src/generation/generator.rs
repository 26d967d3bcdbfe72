//! Generator: pluggable, trait-based source of quiz questions and career
//! recommendations.
//!
//! `LlmGenerator` asks the text-generation service and bracket-scans its reply.
//! `RuleBasedGenerator` answers from the fixed rule table with no network.
//!
//! The wizard holds an `Arc<dyn Generator>`, chosen at startup via config.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::credential::CredentialHolder;
use crate::errors::AppError;
use crate::generation::prompts::{
    CAREER_MAX_TOKENS, CAREER_PROMPT_TEMPLATE, CAREER_SYSTEM, CAREER_TEMPERATURE,
    QUIZ_MAX_TOKENS, QUIZ_PROMPT_TEMPLATE, QUIZ_SYSTEM, QUIZ_TEMPERATURE,
};
use crate::generation::rules::{rule_questions, rule_recommendations};
use crate::generation::{MAX_RECOMMENDATIONS, QUESTION_COUNT, TOP_SUBJECT_COUNT};
use crate::llm_client::prompts::{AUDIENCE_INSTRUCTION, JSON_ARRAY_INSTRUCTION};
use crate::llm_client::{CompletionRequest, LlmClient};
use crate::models::career::CareerRecommendation;
use crate::models::profile::{average_mark, top_subjects, Marks};
use crate::models::question::Question;
use crate::quiz::quiz_percentage;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap generation backends without touching the wizard.
///
/// Both operations check the credential first and fail with
/// `MissingCredential` when it is absent.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate_questions(
        &self,
        credential: &CredentialHolder,
        interests: &[String],
        marks: &Marks,
    ) -> Result<Vec<Question>, AppError>;

    async fn generate_recommendations(
        &self,
        credential: &CredentialHolder,
        interests: &[String],
        marks: &Marks,
        score: u32,
        total_questions: usize,
    ) -> Result<Vec<CareerRecommendation>, AppError>;

    /// "llm" | "rules", reported in session views.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// RuleBasedGenerator
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic generator backed by the rule table. Cannot fail once a
/// credential is present.
pub struct RuleBasedGenerator;

#[async_trait]
impl Generator for RuleBasedGenerator {
    async fn generate_questions(
        &self,
        credential: &CredentialHolder,
        interests: &[String],
        marks: &Marks,
    ) -> Result<Vec<Question>, AppError> {
        credential.require()?;
        let questions = rule_questions(interests, marks);
        info!("Rule table produced {} questions", questions.len());
        Ok(questions)
    }

    async fn generate_recommendations(
        &self,
        credential: &CredentialHolder,
        interests: &[String],
        marks: &Marks,
        score: u32,
        total_questions: usize,
    ) -> Result<Vec<CareerRecommendation>, AppError> {
        credential.require()?;
        let recommendations = rule_recommendations(interests, marks, score, total_questions);
        info!("Rule table produced {} recommendations", recommendations.len());
        Ok(recommendations)
    }

    fn backend(&self) -> &'static str {
        "rules"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmGenerator
// ────────────────────────────────────────────────────────────────────────────

/// Live generator. One model call per operation, no retries.
pub struct LlmGenerator(pub LlmClient);

#[async_trait]
impl Generator for LlmGenerator {
    async fn generate_questions(
        &self,
        credential: &CredentialHolder,
        interests: &[String],
        marks: &Marks,
    ) -> Result<Vec<Question>, AppError> {
        let token = credential.require()?;
        let prompt = build_quiz_prompt(interests, marks);

        let questions: Vec<Question> = self
            .0
            .call_json_array(
                token,
                &CompletionRequest {
                    system: QUIZ_SYSTEM,
                    prompt: &prompt,
                    temperature: QUIZ_TEMPERATURE,
                    max_tokens: QUIZ_MAX_TOKENS,
                },
            )
            .await?;

        let questions = finalize_questions(questions)?;
        info!("Model produced {} questions", questions.len());
        Ok(questions)
    }

    async fn generate_recommendations(
        &self,
        credential: &CredentialHolder,
        interests: &[String],
        marks: &Marks,
        score: u32,
        total_questions: usize,
    ) -> Result<Vec<CareerRecommendation>, AppError> {
        let token = credential.require()?;
        let prompt = build_career_prompt(interests, marks, score, total_questions);

        let raw: Vec<RawCareer> = self
            .0
            .call_json_array(
                token,
                &CompletionRequest {
                    system: CAREER_SYSTEM,
                    prompt: &prompt,
                    temperature: CAREER_TEMPERATURE,
                    max_tokens: CAREER_MAX_TOKENS,
                },
            )
            .await?;

        let recommendations = finalize_recommendations(raw)?;
        info!("Model produced {} recommendations", recommendations.len());
        Ok(recommendations)
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

/// Career entry as the model writes it. Percentages sometimes arrive as floats.
#[derive(Debug, Deserialize)]
struct RawCareer {
    title: String,
    description: String,
    match_percentage: f64,
    #[serde(default)]
    learning_path: Vec<String>,
    #[serde(default)]
    skills_needed: Vec<String>,
}

impl RawCareer {
    fn into_recommendation(self) -> CareerRecommendation {
        let mut skills_needed: Vec<String> = Vec::with_capacity(self.skills_needed.len());
        for skill in self.skills_needed {
            if !skills_needed.contains(&skill) {
                skills_needed.push(skill);
            }
        }
        CareerRecommendation {
            title: self.title,
            description: self.description,
            match_percentage: self.match_percentage.round().clamp(0.0, 100.0) as u8,
            learning_path: self.learning_path,
            skills_needed,
        }
    }
}

/// Rejects empty or invalid batches and trims to `QUESTION_COUNT`.
fn finalize_questions(mut questions: Vec<Question>) -> Result<Vec<Question>, AppError> {
    if questions.is_empty() {
        return Err(AppError::MalformedResponse(
            "model returned no questions".to_string(),
        ));
    }
    if questions.len() > QUESTION_COUNT {
        warn!(
            "Model returned {} questions, keeping the first {}",
            questions.len(),
            QUESTION_COUNT
        );
        questions.truncate(QUESTION_COUNT);
    }
    for question in &questions {
        question.validate().map_err(AppError::MalformedResponse)?;
    }
    Ok(questions)
}

fn finalize_recommendations(raw: Vec<RawCareer>) -> Result<Vec<CareerRecommendation>, AppError> {
    if raw.is_empty() {
        return Err(AppError::MalformedResponse(
            "model returned no career recommendations".to_string(),
        ));
    }
    let recommendations: Vec<CareerRecommendation> = raw
        .into_iter()
        .filter(|c| !c.title.trim().is_empty())
        .take(MAX_RECOMMENDATIONS)
        .map(RawCareer::into_recommendation)
        .collect();
    if recommendations.is_empty() {
        return Err(AppError::MalformedResponse(
            "every career recommendation was missing a title".to_string(),
        ));
    }
    Ok(recommendations)
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt builders
// ────────────────────────────────────────────────────────────────────────────

fn build_quiz_prompt(interests: &[String], marks: &Marks) -> String {
    let top = top_subjects(marks, TOP_SUBJECT_COUNT)
        .into_iter()
        .map(|(subject, _)| subject)
        .collect::<Vec<_>>()
        .join(", ");

    QUIZ_PROMPT_TEMPLATE
        .replace("{question_count}", &QUESTION_COUNT.to_string())
        .replace("{interests}", &interests.join(", "))
        .replace("{top_subjects}", &top)
        .replace("{audience_instruction}", AUDIENCE_INSTRUCTION)
        .replace("{json_instruction}", JSON_ARRAY_INSTRUCTION)
}

fn build_career_prompt(
    interests: &[String],
    marks: &Marks,
    score: u32,
    total_questions: usize,
) -> String {
    let top = top_subjects(marks, TOP_SUBJECT_COUNT)
        .into_iter()
        .map(|(subject, mark)| format!("{subject} ({mark}%)"))
        .collect::<Vec<_>>()
        .join(", ");

    CAREER_PROMPT_TEMPLATE
        .replace("{interests}", &interests.join(", "))
        .replace("{average}", &format!("{:.1}", average_mark(marks)))
        .replace("{top_subjects}", &top)
        .replace("{score}", &score.to_string())
        .replace("{total}", &total_questions.to_string())
        .replace(
            "{percentage}",
            &format!("{:.1}", quiz_percentage(score, total_questions)),
        )
        .replace("{audience_instruction}", AUDIENCE_INSTRUCTION)
        .replace("{json_instruction}", JSON_ARRAY_INSTRUCTION)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
