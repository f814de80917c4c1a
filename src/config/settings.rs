// Configuration structs

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::constants::*;
use crate::claude::DEFAULT_BASE_URL;

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Anthropic API key. `None` runs every session in offline fallback mode.
    pub api_key: Option<String>,

    pub model: String,

    pub max_tokens: u32,

    pub base_url: String,

    pub request_timeout_secs: u64,

    /// Conversations, reports, plans and the turn log live here
    pub data_dir: PathBuf,

    /// Start sessions with a warm-up exchange before the first question
    pub use_warmup: bool,

    /// Append every completed turn to `<data_dir>/turns.jsonl`
    pub turn_log: bool,

    /// Extra phrases that mark a model reply as "ready to draft"
    pub completion_phrases: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            data_dir: default_data_dir(),
            use_warmup: false,
            turn_log: false,
            completion_phrases: Vec::new(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(APP_DIR_NAME))
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            bail!("model must not be empty");
        }
        if self.max_tokens == 0 {
            bail!("max_tokens must be greater than zero");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The API key, when one is set and not blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn turn_log_path(&self) -> PathBuf {
        self.data_dir.join(TURN_LOG_FILE_NAME)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("data_dir", &self.data_dir)
            .field("use_warmup", &self.use_warmup)
            .field("turn_log", &self.turn_log)
            .field("completion_phrases", &self.completion_phrases)
            .finish()
    }
}
