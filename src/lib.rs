//! dynamic-preferences - per-application preference registries
//!
//! Applications declare preferences in a conventionally named module
//! (`{app}.preferences`). Autodiscovery walks the configured app list, loads
//! each app's module and lets it register its preferences into the registry
//! for a scope (global, user or site).
//!
//! ```
//! use dynamic_preferences::{Autodiscovery, PreferenceRegistry, Scope, StaticLoader};
//!
//! let mut discovery = Autodiscovery::new(vec!["blog".into(), "shop".into()]).with_loader(
//!     StaticLoader::<&'static str>::new().module_fn("blog.preferences", |registry| {
//!         registry.register("blog", "theme", "dark");
//!         Ok(())
//!     }),
//! );
//!
//! let mut registry = PreferenceRegistry::new(Scope::User);
//! registry.autodiscover(&mut discovery, false).unwrap();
//!
//! assert_eq!(*registry.get("blog", "theme").unwrap(), "dark");
//! assert!(registry.app("shop").is_err());
//! ```

pub mod config;
pub mod discovery;
pub mod registry;
pub mod types;

pub use config::{Settings, SettingsLoader};
pub use discovery::{
    Autodiscovery, DirectoryLoader, EmbeddedLoader, ModuleLoader, ModulePath, PreferenceModule,
    StaticLoader,
};
pub use registry::{PreferenceRegistry, Registries, Scope};
pub use types::{Preference, PreferenceError};
