//! TOML preference modules, on disk and bundled
//!
//! A module file maps each scope to the preferences it declares:
//!
//! ```toml
//! [user.theme]
//! verbose_name = "Theme"
//! default = "light"
//! ```
//!
//! The dotted module path `blog.tests.preferences` resolves to
//! `blog/tests/preferences.toml` under the loader's root.

use crate::discovery::{ModuleLoader, ModulePath, PreferenceModule};
use crate::registry::{PreferenceRegistry, Scope};
use crate::types::{PreferenceError, Result};
use include_dir::{include_dir, Dir};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Component, PathBuf};
use tracing::debug;

// Embed the bundled apps directory at compile time
static APPS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/apps");

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModuleFile<P> {
    #[serde(default = "BTreeMap::new")]
    global: BTreeMap<String, P>,
    #[serde(default = "BTreeMap::new")]
    user: BTreeMap<String, P>,
    #[serde(default = "BTreeMap::new")]
    site: BTreeMap<String, P>,
}

/// A parsed module file, bound to the app it was found for
#[derive(Debug, Clone)]
struct FileModule<P> {
    app: String,
    file: ModuleFile<P>,
}

impl<P> FileModule<P> {
    fn parse(path: &ModulePath, content: &str) -> Result<Self>
    where
        P: DeserializeOwned,
    {
        let file = toml::from_str(content).map_err(|e| PreferenceError::ModuleLoad {
            module: path.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            app: path.app().to_string(),
            file,
        })
    }

    fn declared(&self, scope: Scope) -> &BTreeMap<String, P> {
        match scope {
            Scope::Global => &self.file.global,
            Scope::User => &self.file.user,
            Scope::Site => &self.file.site,
        }
    }
}

impl<P: Clone> PreferenceModule<P> for FileModule<P> {
    fn register(&self, registry: &mut PreferenceRegistry<P>) -> Result<()> {
        for (name, preference) in self.declared(registry.scope()) {
            registry.register(self.app.as_str(), name.as_str(), preference.clone());
        }
        Ok(())
    }
}

/// Parsed modules kept between discovery passes
struct ModuleCache<P> {
    modules: HashMap<ModulePath, FileModule<P>>,
}

impl<P: DeserializeOwned + Clone> ModuleCache<P> {
    fn new() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    /// Return the cached module for `path`, reading it with `read` on a miss.
    /// `read` yields `None` when the module does not exist.
    fn get_or_load(
        &mut self,
        path: &ModulePath,
        reload: bool,
        read: impl FnOnce() -> Result<Option<String>>,
    ) -> Result<Option<&dyn PreferenceModule<P>>> {
        if reload && self.modules.remove(path).is_some() {
            debug!("Dropped cached module {}", path);
        }

        if !self.modules.contains_key(path) {
            let Some(content) = read()? else {
                return Ok(None);
            };
            let module = FileModule::parse(path, &content)?;
            self.modules.insert(path.clone(), module);
        }

        Ok(self
            .modules
            .get(path)
            .map(|module| module as &dyn PreferenceModule<P>))
    }
}

fn relative_file(path: &ModulePath) -> PathBuf {
    let mut file: PathBuf = path.segments().collect();
    file.set_extension("toml");
    file
}

/// Loads preference modules from a directory tree on disk
pub struct DirectoryLoader<P> {
    root: PathBuf,
    cache: ModuleCache<P>,
}

impl<P: DeserializeOwned + Clone> DirectoryLoader<P> {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: ModuleCache::new(),
        }
    }

    /// File a module path resolves to
    pub fn resolve(&self, path: &ModulePath) -> PathBuf {
        self.root.join(relative_file(path))
    }
}

impl<P: DeserializeOwned + Clone> ModuleLoader<P> for DirectoryLoader<P> {
    fn name(&self) -> &str {
        "directory"
    }

    fn load(
        &mut self,
        path: &ModulePath,
        reload: bool,
    ) -> Result<Option<&dyn PreferenceModule<P>>> {
        let relative = relative_file(path);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(PreferenceError::ModuleLoad {
                module: path.to_string(),
                reason: format!("{} escapes {}", relative.display(), self.root.display()),
            });
        }
        let file = self.resolve(path);

        self.cache.get_or_load(path, reload, || {
            match std::fs::read_to_string(&file) {
                Ok(content) => {
                    debug!("Read preference module {} from {}", path, file.display());
                    Ok(Some(content))
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(PreferenceError::ModuleLoad {
                    module: path.to_string(),
                    reason: format!("{}: {}", file.display(), e),
                }),
            }
        })
    }
}

/// Loads preference modules bundled into the binary from `apps/`
pub struct EmbeddedLoader<P> {
    dir: &'static Dir<'static>,
    cache: ModuleCache<P>,
}

impl<P: DeserializeOwned + Clone> EmbeddedLoader<P> {
    pub fn new() -> Self {
        Self {
            dir: &APPS_DIR,
            cache: ModuleCache::new(),
        }
    }

    /// Dotted paths of every bundled module file
    pub fn bundled_modules(&self) -> Vec<String> {
        let mut modules = Vec::new();
        collect_modules(self.dir, &mut modules);
        modules.sort();
        modules
    }
}

fn collect_modules(dir: &Dir<'_>, out: &mut Vec<String>) {
    for file in dir.files() {
        let path = file.path();
        if path.extension().is_some_and(|ext| ext == "toml") {
            let dotted: Vec<String> = path
                .with_extension("")
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            out.push(dotted.join("."));
        }
    }
    for sub in dir.dirs() {
        collect_modules(sub, out);
    }
}

impl<P: DeserializeOwned + Clone> Default for EmbeddedLoader<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: DeserializeOwned + Clone> ModuleLoader<P> for EmbeddedLoader<P> {
    fn name(&self) -> &str {
        "embedded"
    }

    fn load(
        &mut self,
        path: &ModulePath,
        reload: bool,
    ) -> Result<Option<&dyn PreferenceModule<P>>> {
        let dir = self.dir;

        self.cache.get_or_load(path, reload, || {
            let Some(file) = dir.get_file(relative_file(path)) else {
                return Ok(None);
            };

            let content = file
                .contents_utf8()
                .ok_or_else(|| PreferenceError::ModuleLoad {
                    module: path.to_string(),
                    reason: "invalid UTF-8".to_string(),
                })?;

            Ok(Some(content.to_string()))
        })
    }
}
