//! Preference registries
//!
//! A registry maps application identifiers to preference names to opaque
//! preference descriptors. There is one registry per [`Scope`]; callers hold
//! them in a [`Registries`] value and pass it where needed.

mod preferences;
mod scope;

pub use preferences::PreferenceRegistry;
pub use scope::{Registries, Scope};
