//! Local chat-completions endpoint for tests. Answers every request with a
//! fixed status and body and records what it was sent.

use std::sync::{Arc, Mutex};

use axum::{
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::Value;

pub const CHAT_PATH: &str = "/v1/chat/completions";

/// One request as the stub saw it: the Authorization header and the JSON body.
#[derive(Debug, Clone)]
pub struct Captured {
    pub authorization: Option<String>,
    pub body: Value,
}

pub struct Stub {
    pub url: String,
    captured: Arc<Mutex<Vec<Captured>>>,
}

impl Stub {
    pub fn captured(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }
}

/// Serves `body` with `status` on an ephemeral port.
pub async fn serve(status: StatusCode, body: impl Into<String>) -> Stub {
    let body: String = body.into();
    let captured = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&captured);

    let app = Router::new().route(
        CHAT_PATH,
        post(move |headers: HeaderMap, Json(request): Json<Value>| {
            let sink = Arc::clone(&sink);
            let body = body.clone();
            async move {
                sink.lock().unwrap().push(Captured {
                    authorization: headers
                        .get(header::AUTHORIZATION)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string),
                    body: request,
                });
                (status, [(header::CONTENT_TYPE, "application/json")], body)
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Stub {
        url: format!("http://{addr}{CHAT_PATH}"),
        captured,
    }
}

/// URL of a port nothing listens on.
pub async fn closed_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}{CHAT_PATH}")
}

/// Wraps `content` in a minimal chat-completions reply.
pub fn chat_reply(content: &str) -> String {
    serde_json::json!({
        "choices": [{"message": {"content": content}}],
        "usage": {"prompt_tokens": 12, "completion_tokens": 34}
    })
    .to_string()
}
