//! Preference scopes and the per-scope registry set

use crate::discovery::Autodiscovery;
use crate::registry::PreferenceRegistry;
use crate::types::{PreferenceError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Which registry a preference belongs to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Global,
    User,
    Site,
}

impl Scope {
    pub const ALL: [Scope; 3] = [Scope::Global, Scope::User, Scope::Site];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Global => "global",
            Scope::User => "user",
            Scope::Site => "site",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "global" => Ok(Scope::Global),
            "user" => Ok(Scope::User),
            "site" => Ok(Scope::Site),
            other => Err(PreferenceError::ConfigError(format!(
                "Unknown preference scope '{}'",
                other
            ))),
        }
    }
}

/// One registry per scope, handed explicitly to whatever needs them
#[derive(Debug, Clone, PartialEq)]
pub struct Registries<P> {
    pub global: PreferenceRegistry<P>,
    pub user: PreferenceRegistry<P>,
    pub site: PreferenceRegistry<P>,
}

impl<P> Registries<P> {
    pub fn new() -> Self {
        Self {
            global: PreferenceRegistry::new(Scope::Global),
            user: PreferenceRegistry::new(Scope::User),
            site: PreferenceRegistry::new(Scope::Site),
        }
    }

    pub fn get(&self, scope: Scope) -> &PreferenceRegistry<P> {
        match scope {
            Scope::Global => &self.global,
            Scope::User => &self.user,
            Scope::Site => &self.site,
        }
    }

    pub fn get_mut(&mut self, scope: Scope) -> &mut PreferenceRegistry<P> {
        match scope {
            Scope::Global => &mut self.global,
            Scope::User => &mut self.user,
            Scope::Site => &mut self.site,
        }
    }

    /// Run discovery for every scope, in global, user, site order
    pub fn autodiscover_all(
        &mut self,
        discovery: &mut Autodiscovery<P>,
        force_reload: bool,
    ) -> Result<&mut Self>
    where
        P: fmt::Debug,
    {
        for scope in Scope::ALL {
            discovery.autodiscover(self.get_mut(scope), force_reload)?;
        }

        info!(
            "Discovered {} global, {} user and {} site preferences",
            self.global.len(),
            self.user.len(),
            self.site.len()
        );

        Ok(self)
    }
}

impl<P> Default for Registries<P> {
    fn default() -> Self {
        Self::new()
    }
}
