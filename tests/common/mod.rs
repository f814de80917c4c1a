// Shared test doubles and helpers
#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use homerun_coach::coaching::{self, ModuleType};
use homerun_coach::engine::{
    EngineSettings, FixedAcknowledgment, Message, Phase, PhaseEngine, TurnOutcome,
};
use homerun_coach::gateway::{GatewayError, LlmGateway, OfflineGateway};
use homerun_coach::report::Report;
use homerun_coach::storage::{FieldFilter, MemoryRepository, Record, Repository, Stores};

/// Gateway that replays a fixed script of results.
///
/// With a pause set, every call waits for one `notify_one()` before
/// answering. Calls beyond the script fail with `Unknown`.
pub struct ScriptedGateway {
    script: Mutex<VecDeque<Result<String, GatewayError>>>,
    pause: Option<Arc<Notify>>,
    calls: AtomicUsize,
    histories: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedGateway {
    pub fn new(script: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            pause: None,
            calls: AtomicUsize::new(0),
            histories: Mutex::new(Vec::new()),
        }
    }

    pub fn replies(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn paused(script: Vec<Result<String, GatewayError>>, pause: Arc<Notify>) -> Self {
        Self {
            pause: Some(pause),
            ..Self::new(script)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Transcript passed on each call, in call order.
    pub fn histories(&self) -> Vec<Vec<Message>> {
        self.histories.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn generate(
        &self,
        history: &[Message],
        _module: ModuleType,
        _model: &str,
    ) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.histories.lock().unwrap().push(history.to_vec());

        if let Some(pause) = &self.pause {
            pause.notified().await;
        }

        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Unknown("script exhausted".into())))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Gateway whose every call panics.
pub struct PanickingGateway;

#[async_trait]
impl LlmGateway for PanickingGateway {
    async fn generate(
        &self,
        _history: &[Message],
        _module: ModuleType,
        _model: &str,
    ) -> Result<String, GatewayError> {
        panic!("gateway blew up");
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

/// In-memory repository whose next `put` fails once armed.
pub struct FailOnceRepository<T: Record> {
    inner: MemoryRepository<T>,
    armed: AtomicBool,
}

impl<T: Record> FailOnceRepository<T> {
    pub fn new() -> Self {
        Self {
            inner: MemoryRepository::new(),
            armed: AtomicBool::new(false),
        }
    }

    pub fn fail_next_put(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl<T: Record> Repository<T> for FailOnceRepository<T> {
    async fn get(&self, id: &str) -> Result<Option<T>> {
        self.inner.get(id).await
    }

    async fn put(&self, record: &T) -> Result<()> {
        if self.armed.swap(false, Ordering::SeqCst) {
            anyhow::bail!("disk full");
        }
        self.inner.put(record).await
    }

    async fn scan_by_field(&self, filters: &[FieldFilter]) -> Result<Vec<T>> {
        self.inner.scan_by_field(filters).await
    }
}

pub const ACK: &str = "Got it.";

/// Engine with a pinned acknowledgment phrase.
pub fn engine_with(
    module: ModuleType,
    project: &str,
    gateway: Arc<dyn LlmGateway>,
    stores: Stores,
) -> PhaseEngine {
    PhaseEngine::new(module, project, gateway, stores, EngineSettings::default())
        .with_acknowledgments(Arc::new(FixedAcknowledgment(ACK)))
}

pub fn offline_engine(module: ModuleType, project: &str, stores: Stores) -> PhaseEngine {
    engine_with(module, project, Arc::new(OfflineGateway), stores)
}

/// One distinct answer per fixed question of the module.
pub fn answers_for(module: ModuleType) -> Vec<String> {
    (0..coaching::question_list(module).len())
        .map(|i| format!("{module} answer number {i}"))
        .collect()
}

/// Run an offline session to Draft and complete it.
pub async fn complete_offline(module: ModuleType, project: &str, stores: &Stores) -> Result<Report> {
    let engine = offline_engine(module, project, stores.clone());
    engine.initialize().await?;

    for answer in answers_for(module) {
        match engine.send_message(&answer).await {
            TurnOutcome::Completed(_) => {}
            TurnOutcome::Ignored(reason) => anyhow::bail!("turn ignored: {:?}", reason),
        }
    }
    assert_eq!(engine.current_phase().await, Phase::Draft);

    Ok(engine.complete_module(project).await?)
}
