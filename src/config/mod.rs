// Configuration module
// Settings file + environment loading

pub mod constants;
mod loader;
mod settings;

pub use loader::{load_settings, load_settings_from};
pub use settings::Settings;
