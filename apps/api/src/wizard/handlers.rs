use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::profile::collector::ProfileCollector;
use crate::quiz::runner::QuizView;
use crate::results::ResultsView;
use crate::state::AppState;
use crate::wizard::session::SessionView;

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CredentialRequest {
    pub token: String,
}

/// Form inputs arrive as typed into the page: marks may be numbers or text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MarkInput {
    Number(f64),
    Text(String),
}

impl MarkInput {
    fn as_raw(&self) -> String {
        match self {
            MarkInput::Number(n) => n.to_string(),
            MarkInput::Text(t) => t.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub marks: BTreeMap<String, MarkInput>,
}

impl ProfileRequest {
    fn into_collector(self) -> ProfileCollector {
        let mut collector = ProfileCollector::new();
        collector.set_name(&self.name);
        collector.set_age(&self.age);
        collector.set_grade(&self.grade);
        for interest in &self.interests {
            // the form is a multi-select; repeated tags are one selection
            if !collector.interests().iter().any(|i| i == interest.trim()) {
                collector.toggle_interest(interest);
            }
        }
        for (subject, mark) in &self.marks {
            collector.set_mark(subject, &mark.as_raw());
        }
        collector
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub option: String,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let (session_id, _) = state.sessions.create().await;
    (StatusCode::CREATED, Json(CreateSessionResponse { session_id }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.get(id).await?;
    Ok(Json(state.wizard.view(&session).await))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/credential
pub async fn handle_set_credential(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CredentialRequest>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.get(id).await?;
    state.wizard.accept_credential(&session, &req.token).await?;
    Ok(Json(state.wizard.view(&session).await))
}

/// POST /api/v1/sessions/:id/profile
///
/// Generates the quiz; responds once it has started.
pub async fn handle_submit_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<QuizView>, AppError> {
    let session = state.sessions.get(id).await?;
    state
        .wizard
        .submit_profile(&session, req.into_collector())
        .await?;
    Ok(Json(state.wizard.quiz_view(&session).await?))
}

/// GET /api/v1/sessions/:id/quiz
pub async fn handle_get_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuizView>, AppError> {
    let session = state.sessions.get(id).await?;
    Ok(Json(state.wizard.quiz_view(&session).await?))
}

/// POST /api/v1/sessions/:id/quiz/select
pub async fn handle_select_option(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<QuizView>, AppError> {
    let session = state.sessions.get(id).await?;
    Ok(Json(state.wizard.select_option(&session, &req.option).await?))
}

/// POST /api/v1/sessions/:id/quiz/advance
///
/// After the last question the response has `completed: true`; poll the
/// session until it reaches the results step or carries a notice.
pub async fn handle_advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuizView>, AppError> {
    let session = state.sessions.get(id).await?;
    Ok(Json(state.wizard.advance(&session).await?))
}

/// POST /api/v1/sessions/:id/quiz/retry
pub async fn handle_retry_results(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResultsView>, AppError> {
    let session = state.sessions.get(id).await?;
    state.wizard.retry_results(&session).await?;
    Ok(Json(state.wizard.results_view(&session).await?))
}

/// GET /api/v1/sessions/:id/results
pub async fn handle_get_results(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResultsView>, AppError> {
    let session = state.sessions.get(id).await?;
    Ok(Json(state.wizard.results_view(&session).await?))
}

/// POST /api/v1/sessions/:id/restart
pub async fn handle_restart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.get(id).await?;
    state.wizard.restart(&session).await?;
    Ok(Json(state.wizard.view(&session).await))
}

/// DELETE /api/v1/sessions/:id/notice
pub async fn handle_dismiss_notice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let session = state.sessions.get(id).await?;
    state.wizard.dismiss_notice(&session).await;
    Ok(StatusCode::NO_CONTENT)
}
