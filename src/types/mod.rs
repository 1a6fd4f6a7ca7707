//! Shared types

mod errors;
mod preference;

pub use errors::{PreferenceError, Result};
pub use preference::Preference;
