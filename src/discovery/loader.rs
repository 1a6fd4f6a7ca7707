//! Module loader traits and the in-process loader

use crate::discovery::ModulePath;
use crate::registry::PreferenceRegistry;
use crate::types::Result;
use std::collections::HashMap;

/// Entry point of a preference module.
///
/// Discovery calls `register` with the registry being populated; the module
/// registers whatever it declares for that registry's scope.
pub trait PreferenceModule<P> {
    fn register(&self, registry: &mut PreferenceRegistry<P>) -> Result<()>;
}

impl<P, F> PreferenceModule<P> for F
where
    F: Fn(&mut PreferenceRegistry<P>) -> Result<()>,
{
    fn register(&self, registry: &mut PreferenceRegistry<P>) -> Result<()> {
        self(registry)
    }
}

/// Something that can resolve a dotted module path to a preference module.
pub trait ModuleLoader<P> {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Resolve `path` to its entry point.
    ///
    /// Returns `Ok(None)` when the module does not exist, which discovery
    /// treats as "this app declares no preferences". Any other problem with
    /// the module is an error. With `reload` set, cached state for the module
    /// is dropped before loading.
    fn load(&mut self, path: &ModulePath, reload: bool)
        -> Result<Option<&dyn PreferenceModule<P>>>;
}

/// Loader for preference modules compiled into the program
pub struct StaticLoader<P> {
    modules: HashMap<String, Box<dyn PreferenceModule<P>>>,
}

impl<P> StaticLoader<P> {
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    /// Add a module under its dotted path (e.g. `blog.preferences`)
    pub fn module(
        mut self,
        path: impl Into<String>,
        module: impl PreferenceModule<P> + 'static,
    ) -> Self {
        self.modules.insert(path.into(), Box::new(module));
        self
    }

    /// Add a module whose entry point is a plain function or closure
    pub fn module_fn<F>(self, path: impl Into<String>, entry_point: F) -> Self
    where
        F: Fn(&mut PreferenceRegistry<P>) -> Result<()> + 'static,
    {
        self.module(path, entry_point)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl<P> Default for StaticLoader<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> ModuleLoader<P> for StaticLoader<P> {
    fn name(&self) -> &str {
        "static"
    }

    fn load(
        &mut self,
        path: &ModulePath,
        _reload: bool,
    ) -> Result<Option<&dyn PreferenceModule<P>>> {
        Ok(self.modules.get(&path.to_string()).map(|module| &**module))
    }
}
