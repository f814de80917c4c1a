// Gateway failure taxonomy and classification of raw API errors

use reqwest::StatusCode;
use std::time::Duration;

use crate::claude::ClientError;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// No API key configured. Callers route to fallback and do not retry.
    #[error("no API key configured")]
    MissingCredential,

    #[error("API key rejected: {0}")]
    InvalidCredential(String),

    /// Callers may retry later, not immediately.
    #[error("rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("model \"{model}\" rejected: {message}")]
    ModelError { model: String, message: String },

    #[error("response contained no text content")]
    NoTextContent,

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Unknown(String),
}

impl GatewayError {
    /// Short diagnostic worth showing to the user, if any.
    ///
    /// Missing credentials, empty replies and transport problems stay silent;
    /// the fallback text speaks for itself.
    pub fn user_notice(&self) -> Option<String> {
        match self {
            GatewayError::InvalidCredential(_) => Some(
                "The configured Anthropic API key was rejected. Continuing with guided \
                 questions; check ANTHROPIC_API_KEY to re-enable AI coaching."
                    .to_string(),
            ),
            GatewayError::RateLimited(_) => Some(
                "The AI coach is rate limited right now. Please try again in a moment."
                    .to_string(),
            ),
            GatewayError::ModelError { model, .. } => Some(format!(
                "Model error: check that the model name \"{model}\" is correct."
            )),
            _ => None,
        }
    }

    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::MissingCredential => "missing_credential",
            GatewayError::InvalidCredential(_) => "invalid_credential",
            GatewayError::RateLimited(_) => "rate_limited",
            GatewayError::ModelError { .. } => "model_error",
            GatewayError::NoTextContent => "no_text_content",
            GatewayError::Timeout(_) => "timeout",
            GatewayError::Unknown(_) => "unknown",
        }
    }

    /// Interpret a raw client failure for the given model id.
    pub fn classify(err: ClientError, model: &str, timeout: Duration) -> Self {
        match err {
            ClientError::Status {
                status,
                kind,
                message,
            } => classify_status(status, &kind, message, model),
            ClientError::Timeout => GatewayError::Timeout(timeout),
            ClientError::Transport(e) => GatewayError::Unknown(e.to_string()),
            ClientError::Decode(e) => GatewayError::Unknown(e.to_string()),
        }
    }
}

fn classify_status(status: StatusCode, kind: &str, message: String, model: &str) -> GatewayError {
    match (status, kind) {
        (StatusCode::UNAUTHORIZED, _) | (StatusCode::FORBIDDEN, _) => {
            GatewayError::InvalidCredential(message)
        }
        (_, "authentication_error") | (_, "permission_error") => {
            GatewayError::InvalidCredential(message)
        }
        (StatusCode::TOO_MANY_REQUESTS, _) | (_, "rate_limit_error") => {
            GatewayError::RateLimited(message)
        }
        (StatusCode::NOT_FOUND, _) | (StatusCode::BAD_REQUEST, _)
            if message.to_lowercase().contains("model") =>
        {
            GatewayError::ModelError {
                model: model.to_string(),
                message,
            }
        }
        _ => GatewayError::Unknown(format!("{status} ({kind}): {message}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_err(status: StatusCode, kind: &str, message: &str) -> ClientError {
        ClientError::Status {
            status,
            kind: kind.to_string(),
            message: message.to_string(),
        }
    }

    const T: Duration = Duration::from_secs(30);

    #[test]
    fn test_classify_auth() {
        let err = GatewayError::classify(
            status_err(StatusCode::UNAUTHORIZED, "authentication_error", "invalid x-api-key"),
            "m",
            T,
        );
        assert!(matches!(err, GatewayError::InvalidCredential(_)));
    }

    #[test]
    fn test_classify_rate_limit_by_kind() {
        let err = GatewayError::classify(
            status_err(StatusCode::SERVICE_UNAVAILABLE, "rate_limit_error", "busy"),
            "m",
            T,
        );
        assert!(matches!(err, GatewayError::RateLimited(_)));
    }

    #[test]
    fn test_classify_unknown_model() {
        let err = GatewayError::classify(
            status_err(StatusCode::NOT_FOUND, "not_found_error", "model: claude-nope"),
            "claude-nope",
            T,
        );
        match err {
            GatewayError::ModelError { model, .. } => assert_eq!(model, "claude-nope"),
            other => panic!("expected ModelError, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_other_bad_request_is_unknown() {
        let err = GatewayError::classify(
            status_err(StatusCode::BAD_REQUEST, "invalid_request_error", "messages: empty"),
            "m",
            T,
        );
        assert!(matches!(err, GatewayError::Unknown(_)));
    }

    #[test]
    fn test_classify_timeout_carries_duration() {
        let err = GatewayError::classify(ClientError::Timeout, "m", T);
        assert!(matches!(err, GatewayError::Timeout(d) if d == T));
    }

    #[test]
    fn test_notices_only_for_user_actionable_errors() {
        assert!(GatewayError::MissingCredential.user_notice().is_none());
        assert!(GatewayError::NoTextContent.user_notice().is_none());
        assert!(GatewayError::InvalidCredential("x".into()).user_notice().is_some());
        assert!(GatewayError::RateLimited("x".into()).user_notice().is_some());

        let notice = GatewayError::ModelError {
            model: "claude-nope".into(),
            message: "not found".into(),
        }
        .user_notice();
        assert!(notice.is_some_and(|n| n.contains("claude-nope")));
    }
}
