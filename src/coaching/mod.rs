// Prompt library for the Story / Solution / Success coaching modules
//
// Pure lookups keyed by module selector: role titles, focus lines, the fixed
// question lists used by the offline fallback, and the instructions sent to
// the model on the system channel and for draft synthesis.

pub mod module;
pub mod prompts;

pub use module::{ModuleType, UnknownModule};
pub use prompts::{
    draft_instructions, focus_description, question_list, reflection_prompt, role, system_prompt,
    warmup_prompt,
};

/// Shared coach persona, embedded at compile time.
///
/// Combined with per-module goals by [`system_prompt`].
pub const COACHING_PERSONA: &str = include_str!("coaching_persona.md");
