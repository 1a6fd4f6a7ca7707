//! Configuration for dynamic-preferences
//!
//! Settings come from the first TOML file found by [`SettingsLoader`], falling
//! back to built-in defaults. Command-line flags override file values.

mod loader;
mod settings;

pub use loader::{SettingsLoader, CONFIG_ENV};
pub use settings::Settings;
