pub mod health;

use axum::{
    extract::State,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;

use crate::profile::catalog::{catalog, Catalog};
use crate::state::AppState;
use crate::wizard::handlers;

#[derive(Serialize)]
pub struct CatalogResponse {
    #[serde(flatten)]
    pub catalog: Catalog,
    pub credential_prefix: String,
    pub quiz_duration_secs: u32,
}

/// GET /api/v1/catalog
/// Options the profile form and token screen render.
async fn handle_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        catalog: catalog(),
        credential_prefix: state.config.credential_prefix.clone(),
        quiz_duration_secs: state.config.quiz_duration_secs,
    })
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/catalog", get(handle_catalog))
        // Wizard sessions
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/credential",
            post(handlers::handle_set_credential),
        )
        .route(
            "/api/v1/sessions/:id/profile",
            post(handlers::handle_submit_profile),
        )
        .route("/api/v1/sessions/:id/quiz", get(handlers::handle_get_quiz))
        .route(
            "/api/v1/sessions/:id/quiz/select",
            post(handlers::handle_select_option),
        )
        .route(
            "/api/v1/sessions/:id/quiz/advance",
            post(handlers::handle_advance),
        )
        .route(
            "/api/v1/sessions/:id/quiz/retry",
            post(handlers::handle_retry_results),
        )
        .route(
            "/api/v1/sessions/:id/results",
            get(handlers::handle_get_results),
        )
        .route(
            "/api/v1/sessions/:id/restart",
            post(handlers::handle_restart),
        )
        .route(
            "/api/v1/sessions/:id/notice",
            delete(handlers::handle_dismiss_notice),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::generation::generator::RuleBasedGenerator;
    use crate::wizard::controller::Wizard;
    use crate::wizard::store::SessionStore;

    fn test_app() -> Router {
        let config = Config::default();
        let wizard = Wizard::new(
            Arc::new(RuleBasedGenerator),
            config.credential_prefix.clone(),
            config.quiz_duration_secs,
        );
        build_router(AppState {
            sessions: SessionStore::new(),
            wizard,
            config,
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health_reports_backend() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["generator"], "rules");
    }

    #[tokio::test]
    async fn test_catalog_lists_form_options() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/api/v1/catalog", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["interests"].as_array().unwrap().len(), 15);
        assert_eq!(body["subjects"].as_array().unwrap().len(), 9);
        assert_eq!(body["credential_prefix"], "hf_");
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let app = test_app();
        let uri = format!("/api/v1/sessions/{}", uuid::Uuid::new_v4());
        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_bad_token_is_validation_error() {
        let app = test_app();
        let (_, created) = send(&app, "POST", "/api/v1/sessions", None).await;
        let id = created["session_id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/v1/sessions/{id}/credential"),
            Some(json!({"token": "sk-not-hf"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_full_wizard_over_http() {
        let app = test_app();
        let (status, created) = send(&app, "POST", "/api/v1/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        let base = format!("/api/v1/sessions/{}", created["session_id"].as_str().unwrap());

        let (status, view) = send(
            &app,
            "POST",
            &format!("{base}/credential"),
            Some(json!({"token": "hf_demo"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["step"], "profile");

        // incomplete form is refused and leaves the step alone
        let (status, _) = send(
            &app,
            "POST",
            &format!("{base}/profile"),
            Some(json!({"name": "Asha", "interests": [], "marks": {}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, quiz) = send(
            &app,
            "POST",
            &format!("{base}/profile"),
            Some(json!({
                "name": "Asha",
                "age": "16",
                "grade": "11th",
                "interests": ["Computer Science"],
                "marks": {"Mathematics": 90, "English": "70"}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(quiz["total_questions"], 4);
        assert_eq!(quiz["clock"], "5:00");

        let (status, body) = send(&app, "POST", &format!("{base}/quiz/advance"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("select an answer"));

        let mut quiz = quiz;
        while !quiz["completed"].as_bool().unwrap() {
            let answer = quiz["question"]["correct_answer"].clone();
            let (status, _) = send(
                &app,
                "POST",
                &format!("{base}/quiz/select"),
                Some(json!({"option": answer})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            let (_, next) = send(&app, "POST", &format!("{base}/quiz/advance"), None).await;
            quiz = next;
        }

        let mut session = Value::Null;
        for _ in 0..100 {
            tokio::task::yield_now().await;
            let (_, view) = send(&app, "GET", &base, None).await;
            session = view;
            if session["step"] == "results" {
                break;
            }
        }
        assert_eq!(session["step"], "results");
        assert_eq!(session["score"], 4);

        let (status, results) = send(&app, "GET", &format!("{base}/results"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(results["label"], "Excellent");
        assert!(!results["recommendations"].as_array().unwrap().is_empty());

        let (status, view) = send(&app, "POST", &format!("{base}/restart"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["step"], "profile");
        assert_eq!(view["has_credential"], true);
        assert!(view["profile"].is_null());

        let (status, _) = send(&app, "DELETE", &base, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", &base, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
