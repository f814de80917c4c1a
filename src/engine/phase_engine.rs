// Phase engine
// Drives one coaching session through its phases
//
// Each turn runs in three steps: snapshot the transcript under the state
// lock, produce the reply (model call or offline fallback) with the lock
// released, then commit the user message, answer, reply and any phase change
// in one locked section. The turn flag keeps a second turn out for the whole
// sequence, so commits never interleave.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::completion::CompletionDetector;
use super::fallback::{self, AcknowledgmentPicker, RandomAcknowledgment, TURN_ERROR_REPLY};
use super::guard::TurnGuard;
use super::types::{AnswerKey, Conversation, Message, Phase, PhaseState, Role};
use crate::coaching::{self, ModuleType};
use crate::config::Settings;
use crate::errors::CoachError;
use crate::gateway::{GatewayError, LlmGateway, DEFAULT_REQUEST_TIMEOUT};
use crate::logging::{TurnLogger, TurnSource};
use crate::report::{generate_report, Report};
use crate::storage::Stores;

/// Per-engine knobs, usually derived from [`Settings`].
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub model: String,
    pub request_timeout: Duration,
    pub use_warmup: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            model: crate::config::constants::DEFAULT_MODEL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            use_warmup: false,
        }
    }
}

impl From<&Settings> for EngineSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            model: settings.model.clone(),
            request_timeout: settings.request_timeout(),
            use_warmup: settings.use_warmup,
        }
    }
}

/// Why `send_message` did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    EmptyInput,
    TurnInFlight,
    /// The module is completed; input is no longer accepted
    SessionClosed,
    NotInitialized,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    /// The assistant message appended for this turn
    pub reply: Message,
    pub source: TurnSource,
    /// Phase after the turn
    pub phase: Phase,
    /// This turn moved the session from Questions to Draft
    pub entered_draft: bool,
    /// Separate draft message appended after the reply, if one was produced
    pub draft: Option<Message>,
    /// Diagnostic for the user (bad key, rate limit, ...). Never part of
    /// the transcript.
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Ignored(IgnoredReason),
    Completed(TurnReport),
}

impl TurnOutcome {
    pub fn report(&self) -> Option<&TurnReport> {
        match self {
            TurnOutcome::Completed(report) => Some(report),
            TurnOutcome::Ignored(_) => None,
        }
    }
}

enum Generation {
    Text(String),
    Failed(GatewayError),
    /// The gateway task panicked or was cancelled
    Crashed(String),
}

/// Reply and state change decided for a turn, not yet applied.
struct PlannedTurn {
    reply: String,
    source: TurnSource,
    record_answer: bool,
    next_phase: Phase,
    draft: Option<String>,
    notice: Option<String>,
}

impl PlannedTurn {
    fn failed(phase: Phase) -> Self {
        Self {
            reply: TURN_ERROR_REPLY.to_string(),
            source: TurnSource::Fallback,
            record_answer: false,
            next_phase: phase,
            draft: None,
            notice: None,
        }
    }
}

pub struct PhaseEngine {
    conversation_id: String,
    module: ModuleType,
    gateway: Arc<dyn LlmGateway>,
    stores: Stores,
    settings: EngineSettings,
    completion: CompletionDetector,
    acknowledgments: Arc<dyn AcknowledgmentPicker>,
    turn_log: Option<Arc<Mutex<TurnLogger>>>,
    state: Mutex<Conversation>,
    initialized: AtomicBool,
    turn_in_flight: AtomicBool,
    /// Set once the gateway reports a missing or rejected credential
    llm_disabled: AtomicBool,
}

impl PhaseEngine {
    pub fn new(
        module: ModuleType,
        project_id: impl Into<String>,
        gateway: Arc<dyn LlmGateway>,
        stores: Stores,
        settings: EngineSettings,
    ) -> Self {
        Self::from_conversation(
            Conversation::new(module, project_id),
            gateway,
            stores,
            settings,
            false,
        )
    }

    /// Continue a persisted session where it left off.
    pub fn resume(
        conversation: Conversation,
        gateway: Arc<dyn LlmGateway>,
        stores: Stores,
        settings: EngineSettings,
    ) -> Self {
        info!(
            conversation_id = %conversation.id,
            phase = %conversation.current_phase,
            answers = conversation.phase_state.answers.len(),
            "Resuming session"
        );
        Self::from_conversation(conversation, gateway, stores, settings, true)
    }

    fn from_conversation(
        conversation: Conversation,
        gateway: Arc<dyn LlmGateway>,
        stores: Stores,
        settings: EngineSettings,
        initialized: bool,
    ) -> Self {
        Self {
            conversation_id: conversation.id.clone(),
            module: conversation.module_type,
            gateway,
            stores,
            settings,
            completion: CompletionDetector::default(),
            acknowledgments: Arc::new(RandomAcknowledgment),
            turn_log: None,
            state: Mutex::new(conversation),
            initialized: AtomicBool::new(initialized),
            turn_in_flight: AtomicBool::new(false),
            llm_disabled: AtomicBool::new(false),
        }
    }

    pub fn with_completion_detector(mut self, detector: CompletionDetector) -> Self {
        self.completion = detector;
        self
    }

    pub fn with_acknowledgments(mut self, picker: Arc<dyn AcknowledgmentPicker>) -> Self {
        self.acknowledgments = picker;
        self
    }

    pub fn with_turn_logger(mut self, logger: Arc<Mutex<TurnLogger>>) -> Self {
        self.turn_log = Some(logger);
        self
    }

    pub fn id(&self) -> &str {
        &self.conversation_id
    }

    pub fn module(&self) -> ModuleType {
        self.module
    }

    pub fn is_turn_in_flight(&self) -> bool {
        self.turn_in_flight.load(Ordering::Acquire)
    }

    /// False once the gateway has been given up on for this session.
    pub fn llm_enabled(&self) -> bool {
        !self.llm_disabled.load(Ordering::Acquire)
    }

    pub async fn snapshot(&self) -> Conversation {
        self.state.lock().await.clone()
    }

    pub async fn current_phase(&self) -> Phase {
        self.state.lock().await.current_phase
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.state.lock().await.messages.clone()
    }

    /// Start (or restart) the session: clears the transcript and answers and
    /// emits the opening messages. Returns the messages emitted.
    pub async fn initialize(&self) -> Result<Vec<Message>, CoachError> {
        let _guard = TurnGuard::acquire(&self.turn_in_flight).ok_or(CoachError::TurnInFlight)?;

        let phase = if self.settings.use_warmup {
            Phase::Warmup
        } else {
            Phase::Questions
        };

        let opening = match phase {
            Phase::Warmup => coaching::warmup_prompt(self.module),
            _ => coaching::question_list(self.module)
                .first()
                .map(|q| q.to_string())
                .unwrap_or_else(|| coaching::focus_description(self.module).to_string()),
        };

        let emitted = vec![
            Message::new(
                Role::System,
                format!("Starting {} module...", self.module),
                None,
            ),
            Message::new(Role::Assistant, opening, Some(phase)),
        ];

        let snapshot = {
            let mut conv = self.state.lock().await;
            conv.messages = emitted.clone();
            conv.current_phase = phase;
            conv.phase_state = PhaseState::default();
            conv.completed = false;
            conv.touch();
            conv.clone()
        };
        self.initialized.store(true, Ordering::Release);

        self.stores.conversations.put(&snapshot).await?;
        info!(
            conversation_id = %self.conversation_id,
            module = %self.module,
            %phase,
            "Session initialized"
        );
        Ok(emitted)
    }

    /// Process one user message.
    ///
    /// Appends exactly one user and one assistant message (plus a draft
    /// message when the turn enters Draft and a separate draft was
    /// produced). Model failures never escape; they fall back to offline
    /// text for this turn.
    pub async fn send_message(&self, content: &str) -> TurnOutcome {
        let content = content.trim();
        if content.is_empty() {
            return TurnOutcome::Ignored(IgnoredReason::EmptyInput);
        }

        let Some(_guard) = TurnGuard::acquire(&self.turn_in_flight) else {
            debug!(conversation_id = %self.conversation_id, "Turn already in flight, ignoring input");
            return TurnOutcome::Ignored(IgnoredReason::TurnInFlight);
        };

        if !self.initialized.load(Ordering::Acquire) {
            return TurnOutcome::Ignored(IgnoredReason::NotInitialized);
        }

        let (phase, user_message, pending_state, history) = {
            let conv = self.state.lock().await;
            if conv.completed || conv.current_phase == Phase::Review {
                return TurnOutcome::Ignored(IgnoredReason::SessionClosed);
            }

            let phase = conv.current_phase;
            let user_message = Message::new(Role::User, content, Some(phase));

            let mut pending_state = conv.phase_state.clone();
            if phase == Phase::Questions {
                let key = AnswerKey(pending_state.answers.len());
                pending_state.answers.insert(key, content.to_string());
            }

            let mut history = conv.messages.clone();
            history.push(user_message.clone());
            (phase, user_message, pending_state, history)
        };

        let planned = match phase {
            Phase::Warmup => self.plan_warmup(),
            Phase::Questions => self.plan_questions(history, &pending_state).await,
            Phase::Draft => self.plan_refinement(history).await,
            Phase::Review => PlannedTurn::failed(phase),
        };

        self.commit(user_message, phase, pending_state, planned).await
    }

    /// Mark the module complete and produce its report.
    ///
    /// Only valid in Draft. The session moves to Review, takes `project_id`
    /// as its owner, and both the report and the final conversation are
    /// stored.
    pub async fn complete_module(&self, project_id: &str) -> Result<Report, CoachError> {
        let _guard = TurnGuard::acquire(&self.turn_in_flight).ok_or(CoachError::TurnInFlight)?;

        let mut finished = self.snapshot().await;
        if finished.current_phase != Phase::Draft {
            return Err(CoachError::InvalidPhase {
                expected: Phase::Draft,
                actual: finished.current_phase,
            });
        }

        finished.project_id = project_id.to_string();
        finished.current_phase = Phase::Review;
        finished.completed = true;
        finished.phase_state.completed = true;
        finished.touch();

        // Engine state stays in Draft until both writes land
        let report = generate_report(&finished);
        self.stores.conversations.put(&finished).await?;
        self.stores.reports.put(&report).await?;

        *self.state.lock().await = finished;

        info!(
            conversation_id = %self.conversation_id,
            report_id = %report.id,
            project_id,
            "Module completed"
        );
        Ok(report)
    }

    fn plan_warmup(&self) -> PlannedTurn {
        PlannedTurn {
            reply: fallback::opening_question_turn(self.module, self.acknowledgments.pick()),
            source: TurnSource::Fallback,
            record_answer: false,
            next_phase: Phase::Questions,
            draft: None,
            notice: None,
        }
    }

    async fn plan_questions(&self, history: Vec<Message>, state: &PhaseState) -> PlannedTurn {
        let mut notice = None;

        if self.llm_enabled() {
            match self.generate(history.clone()).await {
                Generation::Text(reply) => {
                    if !self.completion.signals_completion(&reply) {
                        return PlannedTurn {
                            reply,
                            source: TurnSource::Llm,
                            record_answer: true,
                            next_phase: Phase::Questions,
                            draft: None,
                            notice: None,
                        };
                    }

                    debug!(conversation_id = %self.conversation_id, "Model signalled completion");
                    let (draft, draft_notice) = if self.completion.reply_is_draft(&reply) {
                        (None, None)
                    } else {
                        let mut draft_history = history;
                        draft_history.push(Message::new(Role::Assistant, reply.clone(), None));
                        let (draft, notice) = self.synthesize_draft(draft_history, state).await;
                        (Some(draft), notice)
                    };

                    return PlannedTurn {
                        reply,
                        source: TurnSource::Llm,
                        record_answer: true,
                        next_phase: Phase::Draft,
                        draft,
                        notice: draft_notice,
                    };
                }
                Generation::Failed(err) => notice = self.note_failure(&err),
                Generation::Crashed(reason) => {
                    error!(conversation_id = %self.conversation_id, "Turn failed: {}", reason);
                    return PlannedTurn::failed(Phase::Questions);
                }
            }
        }

        let turn = fallback::next_question_turn(
            self.module,
            state.question_index,
            self.acknowledgments.pick(),
        );
        let (next_phase, draft) = if turn.exhausted {
            (
                Phase::Draft,
                Some(fallback::draft_from_answers(self.module, state)),
            )
        } else {
            (Phase::Questions, None)
        };

        PlannedTurn {
            reply: turn.text,
            source: TurnSource::Fallback,
            record_answer: true,
            next_phase,
            draft,
            notice,
        }
    }

    /// Turn taken while the draft is on the table.
    async fn plan_refinement(&self, history: Vec<Message>) -> PlannedTurn {
        let mut notice = None;

        if self.llm_enabled() {
            match self.generate(history).await {
                Generation::Text(reply) => {
                    return PlannedTurn {
                        reply,
                        source: TurnSource::Llm,
                        record_answer: false,
                        next_phase: Phase::Draft,
                        draft: None,
                        notice: None,
                    }
                }
                Generation::Failed(err) => notice = self.note_failure(&err),
                Generation::Crashed(reason) => {
                    error!(conversation_id = %self.conversation_id, "Turn failed: {}", reason);
                    return PlannedTurn::failed(Phase::Draft);
                }
            }
        }

        PlannedTurn {
            reply: fallback::draft_review_reply(self.module),
            source: TurnSource::Fallback,
            record_answer: false,
            next_phase: Phase::Draft,
            draft: None,
            notice,
        }
    }

    /// Ask the model for the full draft; offline draft if that fails.
    async fn synthesize_draft(
        &self,
        mut history: Vec<Message>,
        state: &PhaseState,
    ) -> (String, Option<String>) {
        history.push(Message::new(
            Role::User,
            coaching::draft_instructions(self.module),
            None,
        ));

        match self.generate(history).await {
            Generation::Text(draft) => (draft, None),
            Generation::Failed(err) => {
                let notice = self.note_failure(&err);
                (fallback::draft_from_answers(self.module, state), notice)
            }
            Generation::Crashed(reason) => {
                error!(conversation_id = %self.conversation_id, "Draft synthesis failed: {}", reason);
                (fallback::draft_from_answers(self.module, state), None)
            }
        }
    }

    async fn generate(&self, history: Vec<Message>) -> Generation {
        let gateway = Arc::clone(&self.gateway);
        let model = self.settings.model.clone();
        let module = self.module;
        let timeout = self.settings.request_timeout;

        let mut task =
            tokio::spawn(async move { gateway.generate(&history, module, &model).await });

        match tokio::time::timeout(timeout, &mut task).await {
            Ok(Ok(Ok(text))) if text.trim().is_empty() => {
                Generation::Failed(GatewayError::NoTextContent)
            }
            Ok(Ok(Ok(text))) => Generation::Text(text),
            Ok(Ok(Err(err))) => Generation::Failed(err),
            Ok(Err(join_error)) => Generation::Crashed(join_error.to_string()),
            Err(_) => {
                task.abort();
                Generation::Failed(GatewayError::Timeout(timeout))
            }
        }
    }

    /// Log a gateway failure and decide whether the gateway stays in use.
    fn note_failure(&self, err: &GatewayError) -> Option<String> {
        match err {
            GatewayError::MissingCredential => {
                debug!(gateway = self.gateway.name(), "No LLM credential, using fallback");
            }
            _ => warn!(
                conversation_id = %self.conversation_id,
                gateway = self.gateway.name(),
                kind = err.kind(),
                "LLM call failed, using fallback: {}",
                err
            ),
        }

        if matches!(
            err,
            GatewayError::MissingCredential | GatewayError::InvalidCredential(_)
        ) {
            self.llm_disabled.store(true, Ordering::Release);
        }

        err.user_notice()
    }

    async fn commit(
        &self,
        user_message: Message,
        phase: Phase,
        pending_state: PhaseState,
        planned: PlannedTurn,
    ) -> TurnOutcome {
        let reply = Message::new(Role::Assistant, planned.reply, Some(phase));
        let entered_draft = phase == Phase::Questions && planned.next_phase == Phase::Draft;
        let draft = planned
            .draft
            .map(|text| Message::new(Role::Assistant, text, Some(Phase::Draft)));

        let snapshot = {
            let mut conv = self.state.lock().await;
            conv.messages.push(user_message.clone());

            if planned.record_answer && phase == Phase::Questions {
                let question_count = coaching::question_list(self.module).len();
                conv.phase_state.answers = pending_state.answers;
                conv.phase_state.question_index =
                    (conv.phase_state.question_index + 1).min(question_count);
            }

            conv.messages.push(reply.clone());
            if let Some(draft) = &draft {
                conv.messages.push(draft.clone());
            }

            if planned.next_phase > conv.current_phase {
                conv.current_phase = planned.next_phase;
            }
            if entered_draft {
                conv.phase_state.completed = true;
            }
            conv.touch();
            conv.clone()
        };

        let mut notice = planned.notice;
        if let Err(e) = self.stores.conversations.put(&snapshot).await {
            error!(conversation_id = %self.conversation_id, "Failed to save conversation: {:#}", e);
            let saving = "Your latest progress could not be saved.".to_string();
            notice = Some(match notice {
                Some(existing) => format!("{existing}\n{saving}"),
                None => saving,
            });
        }

        if entered_draft {
            info!(
                conversation_id = %self.conversation_id,
                answers = snapshot.phase_state.answers.len(),
                "Questions complete, draft ready"
            );
        }

        self.log_turn(&user_message, &reply, snapshot.current_phase, planned.source)
            .await;

        TurnOutcome::Completed(TurnReport {
            reply,
            source: planned.source,
            phase: snapshot.current_phase,
            entered_draft,
            draft,
            notice,
        })
    }

    async fn log_turn(&self, user: &Message, reply: &Message, phase: Phase, source: TurnSource) {
        let Some(logger) = &self.turn_log else {
            return;
        };

        let model = match source {
            TurnSource::Llm => Some(self.settings.model.as_str()),
            TurnSource::Fallback => None,
        };

        let result = logger
            .lock()
            .await
            .log_turn(
                &self.conversation_id,
                self.module,
                phase,
                &user.content,
                &reply.content,
                source,
                model,
            )
            .await;

        if let Err(e) = result {
            warn!("Failed to write turn log: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fallback::FixedAcknowledgment;
    use crate::gateway::OfflineGateway;

    fn offline_engine(module: ModuleType, use_warmup: bool) -> PhaseEngine {
        PhaseEngine::new(
            module,
            "proj_test",
            Arc::new(OfflineGateway),
            Stores::in_memory(),
            EngineSettings {
                use_warmup,
                ..EngineSettings::default()
            },
        )
        .with_acknowledgments(Arc::new(FixedAcknowledgment("Got it.")))
    }

    #[tokio::test]
    async fn test_initialize_emits_system_and_first_question() {
        let engine = offline_engine(ModuleType::Solution, false);
        let emitted = engine.initialize().await.unwrap();

        assert_eq!(emitted.len(), 2);
        assert_eq!(emitted[0].role, Role::System);
        assert_eq!(emitted[0].content, "Starting solution module...");
        assert_eq!(
            emitted[1].content,
            coaching::question_list(ModuleType::Solution)[0]
        );
        assert_eq!(engine.current_phase().await, Phase::Questions);
    }

    #[tokio::test]
    async fn test_uninitialized_engine_ignores_input() {
        let engine = offline_engine(ModuleType::Story, false);
        assert_eq!(
            engine.send_message("hello").await,
            TurnOutcome::Ignored(IgnoredReason::NotInitialized)
        );
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let engine = offline_engine(ModuleType::Story, false);
        engine.initialize().await.unwrap();
        assert_eq!(
            engine.send_message("   \n").await,
            TurnOutcome::Ignored(IgnoredReason::EmptyInput)
        );
        assert_eq!(engine.messages().await.len(), 2);
    }

    #[tokio::test]
    async fn test_warmup_reply_moves_to_questions_without_answer() {
        let engine = offline_engine(ModuleType::Success, true);
        engine.initialize().await.unwrap();
        assert_eq!(engine.current_phase().await, Phase::Warmup);

        let outcome = engine.send_message("Hi! Excited to start.").await;
        let report = outcome.report().unwrap();
        assert_eq!(report.phase, Phase::Questions);
        assert!(report
            .reply
            .content
            .ends_with(coaching::question_list(ModuleType::Success)[0]));

        let conv = engine.snapshot().await;
        assert!(conv.phase_state.answers.is_empty());
        assert_eq!(conv.phase_state.question_index, 0);
    }

    #[tokio::test]
    async fn test_offline_gateway_disables_llm_after_first_turn() {
        let engine = offline_engine(ModuleType::Story, false);
        engine.initialize().await.unwrap();
        assert!(engine.llm_enabled());

        let outcome = engine.send_message("Because of my dad").await;
        let report = outcome.report().unwrap();
        assert_eq!(report.source, TurnSource::Fallback);
        assert!(report.notice.is_none());
        assert!(!engine.llm_enabled());
    }

    #[tokio::test]
    async fn test_complete_module_requires_draft() {
        let engine = offline_engine(ModuleType::Story, false);
        engine.initialize().await.unwrap();

        let err = engine.complete_module("proj_test").await.unwrap_err();
        assert!(matches!(
            err,
            CoachError::InvalidPhase {
                expected: Phase::Draft,
                actual: Phase::Questions
            }
        ));
    }
}
