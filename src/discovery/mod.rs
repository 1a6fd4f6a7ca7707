//! Preference autodiscovery
//!
//! For every configured app, discovery forms the conventional module path
//! `{app}[.tests].{package}`, asks its loaders in order for that module, and
//! calls the module's entry point with the registry being populated. Apps
//! without a preference module are skipped.

mod files;
mod loader;

pub use files::{DirectoryLoader, EmbeddedLoader};
pub use loader::{ModuleLoader, PreferenceModule, StaticLoader};

use crate::config::Settings;
use crate::registry::PreferenceRegistry;
use crate::types::Result;
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::{debug, info};

/// Package name looked up inside each app
pub const DEFAULT_PACKAGE: &str = "preferences";

/// Infix inserted before the package in test mode
const TEST_INFIX: &str = "tests";

/// Whether `name` is a dotted module name such as `django.contrib.auth`:
/// every segment starts with a letter or `_` and holds only ASCII
/// alphanumerics and `_`.
pub fn is_module_name(name: &str) -> bool {
    name.split('.').all(|segment| {
        let mut chars = segment.chars();
        chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}

/// Dotted path of an app's preference module
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModulePath {
    app: String,
    package: String,
    test: bool,
}

impl ModulePath {
    pub fn new(app: impl Into<String>, package: impl Into<String>, test: bool) -> Self {
        Self {
            app: app.into(),
            package: package.into(),
            test,
        }
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    /// Path components, e.g. `["blog", "tests", "preferences"]`
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        let infix = self.test.then_some(TEST_INFIX);
        self.app
            .split('.')
            .chain(infix)
            .chain(self.package.split('.'))
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self.segments().collect();
        f.write_str(&parts.join("."))
    }
}

/// Populates registries from the preference modules of the configured apps.
///
/// Holds loader caches between passes, so it is not meant for concurrent use.
pub struct Autodiscovery<P> {
    installed_apps: Vec<String>,
    package: String,
    test_mode: bool,
    loaders: Vec<Box<dyn ModuleLoader<P>>>,
}

impl<P> Autodiscovery<P> {
    /// Discovery over `installed_apps` with no loaders attached yet
    pub fn new(installed_apps: Vec<String>) -> Self {
        Self {
            installed_apps,
            package: DEFAULT_PACKAGE.to_string(),
            test_mode: false,
            loaders: Vec::new(),
        }
    }

    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// Look up `{app}.tests.{package}` instead of `{app}.{package}`
    pub fn test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    /// Append a loader; earlier loaders take precedence
    pub fn with_loader(mut self, loader: impl ModuleLoader<P> + 'static) -> Self {
        self.loaders.push(Box::new(loader));
        self
    }

    pub fn installed_apps(&self) -> &[String] {
        &self.installed_apps
    }

    pub fn module_path(&self, app: &str) -> ModulePath {
        ModulePath::new(app, self.package.as_str(), self.test_mode)
    }

    /// Clear `registry` and repopulate it from every configured app.
    ///
    /// A module that no loader knows about is skipped. Any other loader or
    /// registration error aborts the pass. With `force_reload`, loaders drop
    /// cached modules and load them afresh.
    pub fn autodiscover<'r>(
        &mut self,
        registry: &'r mut PreferenceRegistry<P>,
        force_reload: bool,
    ) -> Result<&'r mut PreferenceRegistry<P>>
    where
        P: fmt::Debug,
    {
        registry.clear();
        debug!(
            "Discovering {} preferences across {} apps",
            registry.scope(),
            self.installed_apps.len()
        );

        for app in &self.installed_apps {
            let path = ModulePath::new(app.as_str(), self.package.as_str(), self.test_mode);
            let mut found = false;

            for loader in self.loaders.iter_mut() {
                let Some(module) = loader.load(&path, force_reload)? else {
                    continue;
                };
                module.register(registry)?;
                debug!("Registered {} via {} loader", path, loader.name());
                found = true;
                break;
            }

            if !found {
                debug!("No preference module {} for app {}", path, app);
            }
        }

        info!("autodiscovered: {}", registry);
        Ok(registry)
    }

    /// Reset-and-reload for test harnesses: rediscover with every loader
    /// cache dropped
    pub fn reload<'r>(
        &mut self,
        registry: &'r mut PreferenceRegistry<P>,
    ) -> Result<&'r mut PreferenceRegistry<P>>
    where
        P: fmt::Debug,
    {
        self.autodiscover(registry, true)
    }
}

impl<P: DeserializeOwned + Clone + 'static> Autodiscovery<P> {
    /// Discovery configured from settings: modules under `apps_dir` first,
    /// then the modules bundled with this crate
    pub fn from_settings(settings: &Settings) -> Self {
        let mut discovery = Self::new(settings.installed_apps.clone())
            .package(settings.package.as_str())
            .test_mode(settings.test_mode);

        if let Some(apps_dir) = &settings.apps_dir {
            info!("Loading preference modules from {}", apps_dir.display());
            discovery = discovery.with_loader(DirectoryLoader::new(apps_dir.clone()));
        }

        discovery.with_loader(EmbeddedLoader::new())
    }
}
