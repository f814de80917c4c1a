// LLM gateway
// The single text-generation seam used by the phase engine
//
// `LlmGateway` is the trait the engine depends on; `ClaudeGateway` is the
// production implementation over the Messages API. Tests substitute their own.

use async_trait::async_trait;
use std::time::Duration;

use crate::coaching::ModuleType;
use crate::engine::Message;

pub mod claude;
pub mod error;

pub use claude::{module_system_prompt, to_api_messages, ClaudeGateway};
pub use error::GatewayError;

/// Produces the next assistant text for a transcript.
///
/// Implementations keep no state between calls and never retry; retry and
/// fallback policy belongs to the caller.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    async fn generate(
        &self,
        history: &[Message],
        module: ModuleType,
        model: &str,
    ) -> Result<String, GatewayError>;

    /// Name for logs ("claude", "offline", ...)
    fn name(&self) -> &str;
}

/// Gateway used when no credential is configured: every call reports
/// `MissingCredential`, which the engine treats as "use fallback".
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineGateway;

#[async_trait]
impl LlmGateway for OfflineGateway {
    async fn generate(
        &self,
        _history: &[Message],
        _module: ModuleType,
        _model: &str,
    ) -> Result<String, GatewayError> {
        Err(GatewayError::MissingCredential)
    }

    fn name(&self) -> &str {
        "offline"
    }
}

/// Default upper bound on a single gateway call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
