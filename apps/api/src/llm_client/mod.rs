/// LLM Client: the single point of entry for all text-generation calls.
///
/// ARCHITECTURAL RULE: No other module may call the generation service directly.
/// All model interactions MUST go through this module.
///
/// Speaks the OpenAI-compatible chat-completions protocol. The bearer token is
/// supplied per call from the student's session; the client itself holds none.
use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;
#[cfg(test)]
pub mod stub;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned empty content")]
    EmptyContent,

    #[error("no JSON array found in model output")]
    MissingJsonArray,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Sampling parameters and prompts for one completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, if it carries any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiErrorBody {
    Detailed { message: String },
    Plain(String),
}

impl ApiErrorBody {
    fn into_message(self) -> String {
        match self {
            ApiErrorBody::Detailed { message } => message,
            ApiErrorBody::Plain(message) => message,
        }
    }
}

/// Shared client for the chat-completions endpoint. Cheap to clone.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_url: String, model: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_url,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes one call to the completion endpoint and returns the reply text.
    /// No retries: failures are surfaced to the caller as-is.
    pub async fn call(&self, token: &str, request: &CompletionRequest<'_>) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.into_message())
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        // a 200 that is not the chat shape is a bad reply, not a transport failure
        let raw = response.text().await?;
        let chat: ChatResponse = serde_json::from_str(&raw)?;
        if let Some(usage) = &chat.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        chat.text().map(str::to_owned).ok_or(LlmError::EmptyContent)
    }

    /// Calls the model and parses the first bracketed JSON array in its reply.
    pub async fn call_json_array<T: DeserializeOwned>(
        &self,
        token: &str,
        request: &CompletionRequest<'_>,
    ) -> Result<Vec<T>, LlmError> {
        let text = self.call(token, request).await?;
        parse_json_array(&text)
    }
}

/// Locates the region from the first `[` to the last `]` in free text.
/// Preamble or trailing commentary around the array is ignored.
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

/// Bracket-scans `text` and deserializes the array it finds.
pub fn parse_json_array<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, LlmError> {
    let array = extract_json_array(text).ok_or(LlmError::MissingJsonArray)?;
    serde_json::from_str(array).map_err(LlmError::Parse)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn test_extract_array_with_preamble() {
        let input = "Here is your quiz:\n[{\"a\": 1}]\nGood luck!";
        assert_eq!(extract_json_array(input), Some("[{\"a\": 1}]"));
    }

    #[test]
    fn test_extract_array_inside_code_fence() {
        let input = "```json\n[1, 2, 3]\n```";
        assert_eq!(extract_json_array(input), Some("[1, 2, 3]"));
    }

    #[test]
    fn test_extract_array_spans_nested_brackets() {
        let input = "[{\"options\": [\"a\", \"b\"]}]";
        assert_eq!(extract_json_array(input), Some(input));
    }

    #[test]
    fn test_extract_array_missing_brackets() {
        assert_eq!(extract_json_array("I cannot help with that."), None);
        assert_eq!(extract_json_array("] reversed ["), None);
    }

    #[test]
    fn test_parse_truncated_output_fails() {
        let result: Result<Vec<serde_json::Value>, _> = parse_json_array("[{\"a\": 1}, {\"b\": ]");
        assert!(matches!(result, Err(LlmError::Parse(_))));
    }

    #[test]
    fn test_parse_without_array_fails() {
        let result: Result<Vec<serde_json::Value>, _> = parse_json_array("{\"a\": 1}");
        assert!(matches!(result, Err(LlmError::MissingJsonArray)));
    }

    #[test]
    fn test_chat_response_text_skips_blank_content() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"content": "   "}}], "usage": null}"#,
        )
        .unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_api_error_body_variants() {
        let detailed: ApiErrorEnvelope =
            serde_json::from_str(r#"{"error": {"message": "bad token", "type": "auth"}}"#).unwrap();
        assert_eq!(detailed.error.into_message(), "bad token");

        let plain: ApiErrorEnvelope = serde_json::from_str(r#"{"error": "Model is loading"}"#).unwrap();
        assert_eq!(plain.error.into_message(), "Model is loading");
    }

    #[tokio::test]
    async fn test_call_sends_chat_request_with_bearer_token() {
        let stub = stub::serve(StatusCode::OK, stub::chat_reply("Sure! [1, 2] done")).await;
        let client = LlmClient::new(stub.url.clone(), "test-model".to_string()).unwrap();

        let text = client
            .call(
                "hf_secret",
                &CompletionRequest {
                    system: "be brief",
                    prompt: "list two numbers",
                    temperature: 0.7,
                    max_tokens: 2000,
                },
            )
            .await
            .unwrap();
        assert_eq!(text, "Sure! [1, 2] done");

        let seen = stub.captured();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].authorization.as_deref(), Some("Bearer hf_secret"));
        let body = &seen[0].body;
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["max_tokens"], 2000);
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "be brief");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "list two numbers");
    }

    #[tokio::test]
    async fn test_call_json_array_ignores_preamble() {
        let stub = stub::serve(StatusCode::OK, stub::chat_reply("Here you go:\n[1, 2, 3]\nEnjoy")).await;
        let client = LlmClient::new(stub.url.clone(), "m".to_string()).unwrap();
        let numbers: Vec<u32> = client.call_json_array("hf_x", &request()).await.unwrap();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_call_maps_error_envelope_to_api_error() {
        let stub = stub::serve(
            StatusCode::UNAUTHORIZED,
            r#"{"error": {"message": "Invalid credentials in Authorization header"}}"#,
        )
        .await;
        let client = LlmClient::new(stub.url.clone(), "m".to_string()).unwrap();
        match client.call("hf_bad", &request()).await {
            Err(LlmError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid credentials in Authorization header");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_call_to_closed_port_is_http_error() {
        let client = LlmClient::new(stub::closed_url().await, "m".to_string()).unwrap();
        let result = client.call("hf_x", &request()).await;
        assert!(matches!(result, Err(LlmError::Http(_))));
    }

    #[tokio::test]
    async fn test_non_chat_success_body_is_parse_error() {
        let stub = stub::serve(StatusCode::OK, "<html>gateway page</html>").await;
        let client = LlmClient::new(stub.url.clone(), "m".to_string()).unwrap();
        let result = client.call("hf_x", &request()).await;
        assert!(matches!(result, Err(LlmError::Parse(_))));
    }

    #[tokio::test]
    async fn test_blank_content_is_empty_content_error() {
        let stub = stub::serve(StatusCode::OK, stub::chat_reply("  ")).await;
        let client = LlmClient::new(stub.url.clone(), "m".to_string()).unwrap();
        let result = client.call("hf_x", &request()).await;
        assert!(matches!(result, Err(LlmError::EmptyContent)));
    }

    fn request() -> CompletionRequest<'static> {
        CompletionRequest {
            system: "sys",
            prompt: "prompt",
            temperature: 0.7,
            max_tokens: 100,
        }
    }
}
