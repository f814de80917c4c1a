// Crate-level error taxonomy
//
// Gateway failures map onto the first six variants and are downgraded to the
// offline fallback by the engine; only `IncompleteInput` fails its caller
// outright. The rest guard misuse of the engine API and storage.

use crate::engine::Phase;
use crate::gateway::GatewayError;

#[derive(Debug, thiserror::Error)]
pub enum CoachError {
    /// No LLM credential configured; routes to fallback, never shown as a failure
    #[error("LLM not configured: {0}")]
    Configuration(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("LLM response contained no usable text")]
    ContentExtraction,

    #[error("LLM unavailable: {0}")]
    Unavailable(String),

    #[error("All three module reports are required: {0}")]
    IncompleteInput(String),

    #[error("Operation requires phase {expected}, session is in {actual}")]
    InvalidPhase { expected: Phase, actual: Phase },

    #[error("A turn is already in progress for this session")]
    TurnInFlight,

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl From<GatewayError> for CoachError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::MissingCredential => CoachError::Configuration(err.to_string()),
            GatewayError::InvalidCredential(msg) => CoachError::Authentication(msg),
            GatewayError::RateLimited(msg) => CoachError::RateLimit(msg),
            GatewayError::ModelError { model, message } => {
                CoachError::Model(format!("{message} (model \"{model}\")"))
            }
            GatewayError::NoTextContent => CoachError::ContentExtraction,
            GatewayError::Timeout(_) | GatewayError::Unknown(_) => {
                CoachError::Unavailable(err.to_string())
            }
        }
    }
}
