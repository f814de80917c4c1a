// Turn log written by a running session

mod common;

use anyhow::Result;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Mutex;

use common::*;
use homerun_coach::coaching::ModuleType;
use homerun_coach::engine::Phase;
use homerun_coach::logging::{TurnLogEntry, TurnLogger, TurnSource};
use homerun_coach::storage::Stores;

#[tokio::test]
async fn test_session_turns_are_logged() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("turns.jsonl");
    let logger = Arc::new(Mutex::new(TurnLogger::new(path.clone())?));

    let gateway = Arc::new(ScriptedGateway::replies(&["Tell me about your clients."]));
    let engine = engine_with(ModuleType::Story, "proj_1", gateway, Stores::in_memory())
        .with_turn_logger(Arc::clone(&logger));
    engine.initialize().await?;

    engine.send_message("We help new parents").await;
    // Script exhausted: this turn falls back
    engine.send_message("Mostly first-time dads").await;

    logger.lock().await.flush().await?;

    let entries: Vec<TurnLogEntry> = fs::read_to_string(&path)?
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].conversation_id, engine.id());
    assert_eq!(entries[0].source, TurnSource::Llm);
    assert_eq!(entries[0].model.as_deref(), Some("claude-sonnet-4-5"));
    assert_eq!(entries[0].assistant, "Tell me about your clients.");
    assert_eq!(entries[1].source, TurnSource::Fallback);
    assert!(entries[1].model.is_none());
    assert_eq!(entries[1].user, "Mostly first-time dads");
    assert!(entries.iter().all(|e| e.phase == Phase::Questions));
    Ok(())
}

#[tokio::test]
async fn test_dropping_logger_flushes() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("turns.jsonl");

    {
        let mut logger = TurnLogger::new(path.clone())?;
        logger
            .log_turn(
                "conv_x",
                ModuleType::Success,
                Phase::Draft,
                "Make it shorter",
                "Sure.",
                TurnSource::Fallback,
                None,
            )
            .await?;
    }

    let contents = fs::read_to_string(&path)?;
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.contains("\"conversation_id\":\"conv_x\""));
    Ok(())
}
