// Project-wide constants
//
// Import via `use crate::config::constants::*;`.

/// Default Messages API model.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";

/// Default maximum output tokens per model call.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Default upper bound on one model call, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Directory under `$HOME` holding config, records and logs.
pub const APP_DIR_NAME: &str = ".homerun";

pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const TURN_LOG_FILE_NAME: &str = "turns.jsonl";

pub const ENV_API_KEY: &str = "ANTHROPIC_API_KEY";
pub const ENV_MODEL: &str = "HOMERUN_MODEL";
pub const ENV_DATA_DIR: &str = "HOMERUN_DATA_DIR";
