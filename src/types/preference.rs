//! Preference descriptor used by the file-based loaders

use serde::{Deserialize, Serialize};

/// Descriptor for a single preference as declared in a preference module.
///
/// The registry treats descriptors as opaque; none of these fields are
/// interpreted or validated here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl Preference {
    pub fn with_default(default: impl Into<serde_json::Value>) -> Self {
        Self {
            default: Some(default.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_from_toml_table() {
        let pref: Preference = toml::from_str(
            r#"
            section = "display"
            verbose_name = "Theme"
            default = "light"
            "#,
        )
        .unwrap();

        assert_eq!(pref.section.as_deref(), Some("display"));
        assert_eq!(pref.verbose_name.as_deref(), Some("Theme"));
        assert_eq!(pref.help_text, None);
        assert_eq!(pref.default, Some(serde_json::json!("light")));
    }

    #[test]
    fn test_empty_table_is_valid() {
        let pref: Preference = toml::from_str("").unwrap();
        assert_eq!(pref, Preference::default());
    }

    #[test]
    fn test_serialize_skips_missing_fields() {
        let json = serde_json::to_value(Preference::with_default(3)).unwrap();
        assert_eq!(json, serde_json::json!({ "default": 3 }));
    }
}
