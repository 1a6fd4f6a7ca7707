//! Settings file parsing

use crate::discovery::{is_module_name, DEFAULT_PACKAGE};
use crate::types::{PreferenceError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Apps scanned by discovery, in order
    pub installed_apps: Vec<String>,
    /// Root of on-disk preference modules
    pub apps_dir: Option<PathBuf>,
    /// Module name looked up inside each app
    pub package: String,
    pub test_mode: bool,
    pub log_level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            installed_apps: Vec::new(),
            apps_dir: None,
            package: DEFAULT_PACKAGE.to_string(),
            test_mode: false,
            log_level: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if !is_module_name(&self.package) {
            return Err(PreferenceError::ConfigError(format!(
                "Invalid package name '{}'",
                self.package
            )));
        }

        if let Some(app) = self.installed_apps.iter().find(|app| !is_module_name(app)) {
            return Err(PreferenceError::ConfigError(format!(
                "Invalid app identifier '{}'",
                app
            )));
        }

        Ok(())
    }
}
