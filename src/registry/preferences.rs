//! Two-level preference registry (app -> name -> descriptor)

use crate::discovery::Autodiscovery;
use crate::registry::Scope;
use crate::types::{PreferenceError, Result};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Registry of preference descriptors for a single scope.
///
/// Descriptors are opaque to the registry. Registering the same `(app, name)`
/// pair twice keeps the last descriptor. Mutation takes `&mut self` and there
/// is no internal locking, so a registry is not meant to be shared across
/// threads while it is being populated.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceRegistry<P> {
    scope: Scope,
    apps: BTreeMap<String, BTreeMap<String, P>>,
}

impl<P> PreferenceRegistry<P> {
    /// Create an empty registry for a scope
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            apps: BTreeMap::new(),
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Register a preference under `(app, name)`, returning the descriptor it replaced
    pub fn register(
        &mut self,
        app: impl Into<String>,
        name: impl Into<String>,
        preference: P,
    ) -> Option<P> {
        let app = app.into();
        let name = name.into();

        let previous = self
            .apps
            .entry(app.clone())
            .or_default()
            .insert(name.clone(), preference);

        if previous.is_some() {
            debug!("Overwrote {} preference {}.{}", self.scope, app, name);
        } else {
            debug!("Registered {} preference {}.{}", self.scope, app, name);
        }

        previous
    }

    /// Look up a preference, failing on a missing app or a missing name
    pub fn get(&self, app: &str, name: &str) -> Result<&P> {
        self.app(app)?
            .get(name)
            .ok_or_else(|| PreferenceError::PreferenceNotFound {
                app: app.to_string(),
                name: name.to_string(),
            })
    }

    /// Look up a preference, falling back to `default` when either the app
    /// or the name is unknown
    pub fn get_or<'a>(&'a self, app: &str, name: &str, default: &'a P) -> &'a P {
        self.apps
            .get(app)
            .and_then(|prefs| prefs.get(name))
            .unwrap_or(default)
    }

    /// All preferences registered for an app
    pub fn app(&self, app: &str) -> Result<&BTreeMap<String, P>> {
        self.apps
            .get(app)
            .ok_or_else(|| PreferenceError::AppNotFound(app.to_string()))
    }

    pub fn contains(&self, app: &str, name: &str) -> bool {
        self.apps
            .get(app)
            .is_some_and(|prefs| prefs.contains_key(name))
    }

    /// Registered app identifiers, sorted
    pub fn apps(&self) -> impl Iterator<Item = &str> {
        self.apps.keys().map(String::as_str)
    }

    /// Every `(app, name, preference)` triple, sorted by app then name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &P)> {
        self.apps.iter().flat_map(|(app, prefs)| {
            prefs
                .iter()
                .map(move |(name, pref)| (app.as_str(), name.as_str(), pref))
        })
    }

    /// Number of registered preferences across all apps
    pub fn len(&self) -> usize {
        self.apps.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    pub fn clear(&mut self) {
        self.apps.clear();
    }

    /// Clear and repopulate this registry from the configured apps.
    ///
    /// See [`Autodiscovery::autodiscover`].
    pub fn autodiscover(
        &mut self,
        discovery: &mut Autodiscovery<P>,
        force_reload: bool,
    ) -> Result<&mut Self>
    where
        P: fmt::Debug,
    {
        discovery.autodiscover(self, force_reload)
    }
}

impl<P: fmt::Debug> fmt::Display for PreferenceRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (app, prefs)) in self.apps.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:?}", app, prefs)?;
        }
        write!(f, "}}")
    }
}

impl<P: Serialize> Serialize for PreferenceRegistry<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.apps.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> PreferenceRegistry<&'static str> {
        PreferenceRegistry::new(Scope::Global)
    }

    #[test]
    fn test_register_then_get() {
        let mut reg = registry();
        assert!(reg.register("blog", "theme", "dark").is_none());

        assert_eq!(*reg.get("blog", "theme").unwrap(), "dark");
        assert!(reg.contains("blog", "theme"));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_register_overwrites() {
        let mut reg = registry();
        reg.register("blog", "theme", "dark");
        let previous = reg.register("blog", "theme", "light");

        assert_eq!(previous, Some("dark"));
        assert_eq!(*reg.get("blog", "theme").unwrap(), "light");
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_app_missing() {
        let reg = registry();
        let err = reg.app("shop").unwrap_err();
        assert!(matches!(err, PreferenceError::AppNotFound(ref app) if app == "shop"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_get_missing_app_and_missing_name() {
        let mut reg = registry();
        reg.register("blog", "theme", "dark");

        assert!(matches!(
            reg.get("shop", "theme"),
            Err(PreferenceError::AppNotFound(_))
        ));
        assert!(matches!(
            reg.get("blog", "title"),
            Err(PreferenceError::PreferenceNotFound { .. })
        ));
    }

    #[test]
    fn test_get_or_honors_default_for_both_misses() {
        let mut reg = registry();
        reg.register("blog", "theme", "dark");

        assert_eq!(*reg.get_or("blog", "theme", &"fallback"), "dark");
        assert_eq!(*reg.get_or("blog", "title", &"fallback"), "fallback");
        assert_eq!(*reg.get_or("shop", "theme", &"fallback"), "fallback");
    }

    #[test]
    fn test_app_returns_inner_map() {
        let mut reg = registry();
        reg.register("blog", "theme", "dark");
        reg.register("blog", "posts_per_page", "10");
        reg.register("shop", "currency", "EUR");

        let blog = reg.app("blog").unwrap();
        assert_eq!(blog.len(), 2);
        assert_eq!(blog.get("posts_per_page"), Some(&"10"));

        assert_eq!(reg.apps().collect::<Vec<_>>(), vec!["blog", "shop"]);
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn test_iter_is_sorted() {
        let mut reg = registry();
        reg.register("shop", "currency", "EUR");
        reg.register("blog", "theme", "dark");
        reg.register("blog", "author", "anon");

        let triples: Vec<_> = reg.iter().collect();
        assert_eq!(
            triples,
            vec![
                ("blog", "author", &"anon"),
                ("blog", "theme", &"dark"),
                ("shop", "currency", &"EUR"),
            ]
        );
    }

    #[test]
    fn test_clear() {
        let mut reg = registry();
        reg.register("blog", "theme", "dark");
        reg.clear();

        assert!(reg.is_empty());
        assert!(reg.app("blog").is_err());
    }

    #[test]
    fn test_display_listing() {
        let mut reg = registry();
        assert_eq!(reg.to_string(), "{}");

        reg.register("blog", "theme", "dark");
        reg.register("shop", "currency", "EUR");
        assert_eq!(
            reg.to_string(),
            r#"{blog: {"theme": "dark"}, shop: {"currency": "EUR"}}"#
        );
    }

    #[test]
    fn test_serialize_as_nested_map() {
        let mut reg = registry();
        reg.register("blog", "theme", "dark");

        let json = serde_json::to_value(&reg).unwrap();
        assert_eq!(json, serde_json::json!({ "blog": { "theme": "dark" } }));
    }
}
