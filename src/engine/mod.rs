// Phase engine
// Guided session state machine
//
// Warmup (optional) → Questions → Draft → Review. The engine owns one
// conversation, talks to the model through `LlmGateway`, falls back to the
// fixed question lists when the model is unavailable, and persists the whole
// conversation after every state change.

pub mod completion;
pub mod fallback;
pub mod guard;
pub mod phase_engine;
pub mod types;

pub use completion::CompletionDetector;
pub use fallback::{
    AcknowledgmentPicker, FixedAcknowledgment, RandomAcknowledgment, ACKNOWLEDGMENTS,
    READY_TO_DRAFT, TURN_ERROR_REPLY,
};
pub use guard::TurnGuard;
pub use phase_engine::{EngineSettings, IgnoredReason, PhaseEngine, TurnOutcome, TurnReport};
pub use types::{AnswerKey, Conversation, InvalidAnswerKey, Message, Phase, PhaseState, Role};

pub use crate::logging::TurnSource;
