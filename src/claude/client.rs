// HTTP client for Claude API
//
// One request per call. Retry policy belongs to the caller.

use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::Duration;

use super::types::{ApiErrorBody, MessageRequest, MessageResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Failure of a single Messages API call, before any domain interpretation.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Claude API returned {status} ({kind}): {message}")]
    Status {
        status: StatusCode,
        kind: String,
        message: String,
    },

    #[error("Claude API request timed out")]
    Timeout,

    #[error("Failed to reach Claude API: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Failed to parse Claude API response: {0}")]
    Decode(#[source] reqwest::Error),
}

pub struct ClaudeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for ClaudeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClaudeClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl ClaudeClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Send a single message request (no retry)
    pub async fn send_message(
        &self,
        request: &MessageRequest,
    ) -> Result<MessageResponse, ClientError> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending request to Claude API"
        );

        let response = self
            .client
            .post(format!("{}{}", self.base_url, MESSAGES_PATH))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout
                } else {
                    ClientError::Transport(e)
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let (kind, message) = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(parsed) => (parsed.error.kind, parsed.error.message),
                Err(_) => ("unknown".to_string(), body),
            };
            return Err(ClientError::Status {
                status,
                kind,
                message,
            });
        }

        let message_response: MessageResponse =
            response.json().await.map_err(ClientError::Decode)?;

        tracing::debug!(
            id = %message_response.id,
            blocks = message_response.content.len(),
            stop_reason = ?message_response.stop_reason,
            "Received response from Claude API"
        );

        Ok(message_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claude::types::Message;

    #[test]
    fn test_client_creation() {
        let client = ClaudeClient::new("test-key", DEFAULT_BASE_URL, Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_debug_redacts_key() {
        let client =
            ClaudeClient::new("sk-ant-secret", "http://localhost/", Duration::from_secs(5))
                .unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("sk-ant-secret"));
        assert!(debug.contains("http://localhost\""));
    }

    #[tokio::test]
    async fn test_error_envelope_is_parsed() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/messages")
            .with_status(429)
            .with_header("content-type", "application/json")
            .with_body(r#"{"type":"error","error":{"type":"rate_limit_error","message":"slow down"}}"#)
            .create_async()
            .await;

        let client = ClaudeClient::new("k", server.url(), Duration::from_secs(5)).unwrap();
        let request = MessageRequest::new("m", vec![Message::user("hi")]);
        match client.send_message(&request).await {
            Err(ClientError::Status {
                status,
                kind,
                message,
            }) => {
                assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
                assert_eq!(kind, "rate_limit_error");
                assert_eq!(message, "slow down");
            }
            other => panic!("unexpected result: {:?}", other.map(|r| r.id)),
        }
    }
}
