// Turn logger
// One JSONL line per completed coaching turn

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::coaching::ModuleType;
use crate::engine::Phase;

/// Where the assistant text of a turn came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnSource {
    Llm,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnLogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub conversation_id: String,
    pub module: ModuleType,
    /// Phase after the turn was applied
    pub phase: Phase,
    pub user: String,
    pub assistant: String,
    pub source: TurnSource,
    /// Model id when `source` is `llm`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Buffered JSONL writer. Flushes every `flush_threshold` entries, on
/// explicit `flush()`, and on drop.
pub struct TurnLogger {
    log_path: PathBuf,
    buffer: Vec<TurnLogEntry>,
    flush_threshold: usize,
}

impl TurnLogger {
    pub fn new(log_path: PathBuf) -> Result<Self> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create turn log directory")?;
        }

        Ok(Self {
            log_path,
            buffer: Vec::new(),
            flush_threshold: 10,
        })
    }

    pub fn with_flush_threshold(mut self, threshold: usize) -> Self {
        self.flush_threshold = threshold.max(1);
        self
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn log_turn(
        &mut self,
        conversation_id: &str,
        module: ModuleType,
        phase: Phase,
        user: &str,
        assistant: &str,
        source: TurnSource,
        model: Option<&str>,
    ) -> Result<String> {
        let entry = TurnLogEntry {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            conversation_id: conversation_id.to_string(),
            module,
            phase,
            user: user.to_string(),
            assistant: assistant.to_string(),
            source,
            model: model.map(str::to_string),
        };

        let id = entry.id.clone();
        self.buffer.push(entry);

        if self.buffer.len() >= self.flush_threshold {
            self.flush().await?;
        }

        Ok(id)
    }

    pub async fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        debug!("Flushing {} turn log entries", self.buffer.len());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .context("Failed to open turn log")?;

        for entry in &self.buffer {
            let json = serde_json::to_string(entry).context("Failed to serialize turn entry")?;
            writeln!(file, "{}", json).context("Failed to write turn entry")?;
        }

        self.buffer.clear();
        Ok(())
    }

    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

impl Drop for TurnLogger {
    fn drop(&mut self) {
        if !self.buffer.is_empty() {
            if let Err(e) = futures::executor::block_on(self.flush()) {
                tracing::error!("Failed to flush turn log on drop: {}", e);
            }
        }
    }
}
