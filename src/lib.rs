// HomeRun coach
// Guided Story / Solution / Success coaching sessions
// Library exports

pub mod claude;
pub mod coaching;
pub mod config;
pub mod engine;
pub mod errors;
pub mod gateway;
pub mod logging;
pub mod report;
pub mod storage;

pub use errors::CoachError;
