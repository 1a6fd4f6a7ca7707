//! Settings loader
//!
//! Lookup order (first existing file wins):
//! 1. ./.dynprefs.toml (project-specific)
//! 2. $DYNPREFS_CONFIG
//! 3. ~/.config/dynprefs/config.toml (user-global)
//!
//! Without any file, built-in defaults apply.

use crate::config::Settings;
use crate::types::{PreferenceError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONFIG_ENV: &str = "DYNPREFS_CONFIG";

pub struct SettingsLoader {
    candidates: Vec<PathBuf>,
}

impl SettingsLoader {
    pub fn new() -> Self {
        let mut candidates = Vec::new();

        // Project-specific config
        if let Ok(cwd) = std::env::current_dir() {
            candidates.push(cwd.join(".dynprefs.toml"));
        }

        // Environment variable
        if let Ok(config_path) = std::env::var(CONFIG_ENV) {
            candidates.push(PathBuf::from(config_path));
        }

        // User-global config
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("dynprefs").join("config.toml"));
        }

        Self { candidates }
    }

    pub fn with_candidates(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Load the first settings file found, or the defaults
    pub fn load(&self) -> Result<Settings> {
        for path in &self.candidates {
            if path.exists() {
                return Self::load_file(path);
            }
        }

        debug!("No settings file found, using defaults");
        Ok(Settings::default())
    }

    /// Load a specific settings file. A relative `apps_dir` is resolved
    /// against the file's directory.
    pub fn load_file(path: &Path) -> Result<Settings> {
        debug!("Loading settings from: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| {
            PreferenceError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let mut settings: Settings = toml::from_str(&content).map_err(|e| {
            PreferenceError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        if let Some(apps_dir) = settings.apps_dir.take() {
            settings.apps_dir = Some(match path.parent() {
                Some(base) if apps_dir.is_relative() => base.join(apps_dir),
                _ => apps_dir,
            });
        }

        settings.validate()?;

        info!(
            "Loaded settings from {} ({} installed apps)",
            path.display(),
            settings.installed_apps.len()
        );
        Ok(settings)
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_candidates_include_project_file() {
        let loader = SettingsLoader::new();
        assert!(loader
            .candidates()
            .iter()
            .any(|p| p.ends_with(".dynprefs.toml")));
    }

    #[test]
    fn test_env_candidate_sits_between_project_and_user_config() {
        let dir = TempDir::new().unwrap();
        let env_file = dir.path().join("from-env.toml");
        std::env::set_var(CONFIG_ENV, &env_file);
        let loader = SettingsLoader::new();
        std::env::remove_var(CONFIG_ENV);

        let candidates = loader.candidates();
        let env_index = candidates
            .iter()
            .position(|p| p == &env_file)
            .expect("env candidate should be listed");
        let project_index = candidates
            .iter()
            .position(|p| p.ends_with(".dynprefs.toml"))
            .unwrap();
        assert!(project_index < env_index);

        if let Some(user_index) = candidates
            .iter()
            .position(|p| p.ends_with("dynprefs/config.toml"))
        {
            assert!(env_index < user_index);
        }
    }

    #[test]
    fn test_no_candidates_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let loader = SettingsLoader::with_candidates(vec![dir.path().join("missing.toml")]);
        assert_eq!(loader.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_first_existing_candidate_wins() {
        let dir = TempDir::new().unwrap();
        let second = dir.path().join("second.toml");
        let third = dir.path().join("third.toml");
        fs::write(&second, "installed_apps = [\"blog\"]\n").unwrap();
        fs::write(&third, "installed_apps = [\"shop\"]\n").unwrap();

        let loader = SettingsLoader::with_candidates(vec![
            dir.path().join("first.toml"),
            second,
            third,
        ]);
        assert_eq!(loader.load().unwrap().installed_apps, vec!["blog"]);
    }

    #[test]
    fn test_relative_apps_dir_is_resolved() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("settings.toml");
        fs::write(&file, "apps_dir = \"apps\"\n").unwrap();

        let settings = SettingsLoader::load_file(&file).unwrap();
        assert_eq!(settings.apps_dir, Some(dir.path().join("apps")));
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("settings.toml");
        fs::write(&file, "installed_apps = \"blog\"\n").unwrap();

        let err = SettingsLoader::load_file(&file).unwrap_err();
        assert!(matches!(err, PreferenceError::ConfigError(_)));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(SettingsLoader::load_file(&dir.path().join("nope.toml")).is_err());
    }
}
