use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error("No preferences registered for app: {0}")]
    AppNotFound(String),

    #[error("Preference not found: {app}.{name}")]
    PreferenceNotFound { app: String, name: String },

    #[error("Failed to load preference module {module}: {reason}")]
    ModuleLoad { module: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl PreferenceError {
    /// Whether this is a lookup miss on either key.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PreferenceError::AppNotFound(_) | PreferenceError::PreferenceNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PreferenceError>;
