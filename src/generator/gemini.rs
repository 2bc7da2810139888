//! Client for the Generative Language `generateContent` endpoint.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{GenerationError, GenerationSettings, TextGenerator};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiClient {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, GenerationError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GenerationError::MissingApiKey);
        }
        Ok(Self {
            client: Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key,
            model: model.into(),
        })
    }

    /// Points the client at a different deployment of the API.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        settings: &GenerationSettings,
    ) -> Result<String, GenerationError> {
        let body = request_body(prompt, settings);
        debug!("requesting completion from {} with model {}", self.api_base, self.model);

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        let parsed: GenerateResponse = response.json().await?;
        parsed.into_text().ok_or(GenerationError::EmptyResponse)
    }
}

/// Maps a failed response status onto the error the retry loop understands.
fn status_error(status: StatusCode, body: String) -> GenerationError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        GenerationError::RateLimited(body)
    } else {
        GenerationError::Api {
            status: status.as_u16(),
            body,
        }
    }
}

fn request_body(prompt: &str, settings: &GenerationSettings) -> serde_json::Value {
    json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "temperature": settings.temperature,
            "maxOutputTokens": settings.max_output_tokens,
        },
    })
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|part| part.text).collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Answers a single HTTP request with a fixed status and body.
    async fn serve_once(listener: TcpListener, status_line: &'static str, body: &'static str) {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&request[..end]).to_ascii_lowercase();
                let content_length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= end + 4 + content_length {
                    break;
                }
            }
        }

        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    }

    async fn local_client(status_line: &'static str, body: &'static str) -> GeminiClient {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve_once(listener, status_line, body));

        GeminiClient::new("key", "gemini-1.5-flash")
            .unwrap()
            .with_api_base(format!("http://{}", addr))
    }

    #[tokio::test]
    async fn test_generate_reports_rate_limit() {
        let client = local_client("429 Too Many Requests", r#"{"error":"RESOURCE_EXHAUSTED"}"#).await;
        let result = client.generate("prompt", &GenerationSettings::default()).await;
        assert!(matches!(result, Err(GenerationError::RateLimited(body)) if body.contains("RESOURCE_EXHAUSTED")));
    }

    #[tokio::test]
    async fn test_generate_reports_server_error() {
        let client = local_client("500 Internal Server Error", "{}").await;
        let result = client.generate("prompt", &GenerationSettings::default()).await;
        assert!(matches!(result, Err(GenerationError::Api { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_generate_returns_candidate_text() {
        let client = local_client(
            "200 OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"Question 1: Why?"}]}}]}"#,
        )
        .await;
        let text = client
            .generate("prompt", &GenerationSettings::default())
            .await
            .unwrap();
        assert_eq!(text, "Question 1: Why?");
    }

    #[test]
    fn test_extracts_candidate_text() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Question 1: "}, {"text": "Why?"}], "role": "model"}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;
        let response: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.into_text().as_deref(), Some("Question 1: Why?"));
    }

    #[test]
    fn test_missing_text_is_empty() {
        for raw in [
            r#"{}"#,
            r#"{"candidates": []}"#,
            r#"{"candidates": [{"finishReason": "SAFETY"}]}"#,
            r#"{"candidates": [{"content": {"parts": [{"text": "  "}]}}]}"#,
        ] {
            let response: GenerateResponse = serde_json::from_str(raw).unwrap();
            assert_eq!(response.into_text(), None, "{}", raw);
        }
    }

    #[test]
    fn test_rate_limit_status_is_retryable() {
        let error = status_error(StatusCode::TOO_MANY_REQUESTS, "RESOURCE_EXHAUSTED".to_string());
        assert!(matches!(&error, GenerationError::RateLimited(body) if body == "RESOURCE_EXHAUSTED"));
        assert!(error.is_retryable());
    }

    #[test]
    fn test_other_statuses_map_to_api_error() {
        for code in [StatusCode::BAD_REQUEST, StatusCode::FORBIDDEN, StatusCode::INTERNAL_SERVER_ERROR] {
            let error = status_error(code, "nope".to_string());
            assert!(!error.is_retryable());
            match error {
                GenerationError::Api { status, body } => {
                    assert_eq!(status, code.as_u16());
                    assert_eq!(body, "nope");
                }
                other => panic!("unexpected error for {}: {}", code, other),
            }
        }
    }

    #[test]
    fn test_request_body_carries_settings() {
        let body = request_body("hello", &GenerationSettings::default());
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 800);
        assert!(body["generationConfig"]["temperature"].as_f64().unwrap() > 0.69);
    }

    #[test]
    fn test_client_requires_key() {
        assert!(matches!(
            GeminiClient::new("  ", "gemini-1.5-flash"),
            Err(GenerationError::MissingApiKey)
        ));
        let client = GeminiClient::new("key", "gemini-1.5-flash")
            .unwrap()
            .with_api_base("http://localhost:8080/v1/");
        assert_eq!(
            client.endpoint(),
            "http://localhost:8080/v1/models/gemini-1.5-flash:generateContent"
        );
    }
}
