use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::http_client::generation_client;
use super::invoker::{InvocationError, TransformInvoker};
use super::prompts::PromptTemplate;
use crate::config::GenerationConfig;

/// Text part of a request or response
#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

/// A single content block
#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

/// API request body
#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

/// One candidate in the API response
#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// API response body
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// API error response
#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Client for the Gemini `generateContent` endpoint
pub struct GeminiClient {
    client: Client,
    config: GenerationConfig,
}

impl GeminiClient {
    /// Create a client on the shared connection pool
    pub fn new(config: GenerationConfig) -> Self {
        Self::with_client(generation_client().clone(), config)
    }

    pub fn with_client(client: Client, config: GenerationConfig) -> Self {
        Self { client, config }
    }

    /// Send a single free-text prompt and return the first candidate's text
    ///
    /// The text is returned as-is, markdown fences included.
    pub async fn generate_content(&self, prompt: &str) -> Result<String, InvocationError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        let response = self
            .client
            .post(&self.config.base_url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiError>(&body) {
                Ok(api_error) => api_error.error.message,
                Err(_) => body,
            };
            return Err(InvocationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        extract_candidate_text(&body)
    }
}

#[async_trait]
impl TransformInvoker for GeminiClient {
    async fn invoke(&self, template: &PromptTemplate, content: &str) -> Result<String, InvocationError> {
        let prompt = template.render(content);
        self.generate_content(&prompt).await
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a response body
fn extract_candidate_text(body: &str) -> Result<String, InvocationError> {
    let parsed: GenerateResponse = serde_json::from_str(body)?;

    parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or(InvocationError::MissingText)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::prompts::GENERATE_TESTS_PROMPT;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    const OK_BODY: &str = r#"{"candidates":[{"content":{"parts":[{"text":"```dart\nvoid main() {}\n```"}],"role":"model"}}]}"#;

    fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    /// Accept one connection, answer it with `status_line` and `body`,
    /// and hand back the raw request text.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!(
            "http://{}/v1beta/models/test:generateContent",
            listener.local_addr().unwrap()
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];

            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);

                if let Some(header_end) = find_subslice(&buf, b"\r\n\r\n") {
                    let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
                    let body_len = headers
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if buf.len() >= header_end + 4 + body_len {
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
            let _ = socket.shutdown().await;

            String::from_utf8_lossy(&buf).to_string()
        });

        (url, handle)
    }

    fn test_client(base_url: String) -> GeminiClient {
        let client = Client::builder().no_proxy().build().unwrap();
        GeminiClient::with_client(
            client,
            GenerationConfig {
                api_key: "test-key".to_string(),
                base_url,
            },
        )
    }

    #[test]
    fn test_extract_candidate_text() {
        let text = extract_candidate_text(OK_BODY).unwrap();
        assert_eq!(text, "```dart\nvoid main() {}\n```");
    }

    #[test]
    fn test_extract_missing_candidates() {
        let err = extract_candidate_text(r#"{"candidates":[]}"#).unwrap_err();
        assert!(matches!(err, InvocationError::MissingText));

        let err = extract_candidate_text(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap_err();
        assert!(matches!(err, InvocationError::MissingText));
    }

    #[test]
    fn test_extract_missing_parts() {
        let err = extract_candidate_text(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap_err();
        assert!(matches!(err, InvocationError::MissingText));

        let err = extract_candidate_text(r#"{"candidates":[{"content":{"parts":[]}}]}"#).unwrap_err();
        assert!(matches!(err, InvocationError::MissingText));
    }

    #[test]
    fn test_extract_malformed_body() {
        let err = extract_candidate_text("<html>gateway</html>").unwrap_err();
        assert!(matches!(err, InvocationError::MalformedResponse(_)));
    }

    #[test]
    fn test_request_body_shape() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some("hello".to_string()),
                }],
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"contents": [{"parts": [{"text": "hello"}]}]}));
    }

    #[tokio::test]
    async fn test_invoke_success_sends_key_and_prompt() {
        let (url, server) = serve_once("200 OK", OK_BODY).await;
        let client = test_client(url);

        let text = client
            .invoke(&GENERATE_TESTS_PROMPT, "class Widget {}")
            .await
            .unwrap();
        assert_eq!(text, "```dart\nvoid main() {}\n```");

        let request = server.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("POST /v1beta/models/test:generateContent?key=test-key"));
        assert!(request.contains(r#""contents""#));
        assert!(request.contains("class Widget {}"));
    }

    #[tokio::test]
    async fn test_invoke_surfaces_api_error_message() {
        let (url, server) = serve_once(
            "400 Bad Request",
            r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#,
        )
        .await;
        let client = test_client(url);

        let err = client.generate_content("prompt").await.unwrap_err();
        match err {
            InvocationError::Api { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("API key not valid"));
            }
            other => panic!("unexpected error: {other}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_invoke_non_json_error_body() {
        let (url, server) = serve_once("503 Service Unavailable", "upstream overloaded").await;
        let client = test_client(url);

        let err = client.generate_content("prompt").await.unwrap_err();
        assert!(matches!(
            err,
            InvocationError::Api { status: 503, ref message } if message == "upstream overloaded"
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_invoke_transport_failure() {
        // Bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = test_client(format!("http://{}/generate", addr));
        let err = client.generate_content("prompt").await.unwrap_err();
        assert!(matches!(err, InvocationError::Transport(_)));
    }
}
