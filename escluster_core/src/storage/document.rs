//! The non-secret projection of the registry that is handed to a
//! [`SettingsStore`](crate::SettingsStore).
//!
//! JSON looks like:
//! `{ "profiles": { "prod": { "label":"prod", "url":"https://es-prod:9200" } },
//!    "refreshMode":"DISABLED", "viewMode":"TEXT" }`
//!
//! Field names are part of the on-disk format and must stay stable so older
//! settings files keep loading.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use super::preferences::{RefreshMode, ViewMode};

/// `{label, url}` for one profile. Credentials have no field here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedProfile {
    pub label: String,
    pub url: String,
}

/// A single `profiles` entry as found in a settings document.
///
/// Entries are decoded one by one so a hand-edited or truncated entry only
/// costs that entry, not the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersistedEntry {
    Profile(PersistedProfile),
    Malformed(serde_json::Value),
}

impl PersistedEntry {
    pub fn profile(&self) -> Option<&PersistedProfile> {
        match self {
            PersistedEntry::Profile(p) => Some(p),
            PersistedEntry::Malformed(_) => None,
        }
    }
}

impl From<PersistedProfile> for PersistedEntry {
    fn from(p: PersistedProfile) -> Self {
        PersistedEntry::Profile(p)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDocument {
    #[serde(default, deserialize_with = "or_default")]
    pub profiles: BTreeMap<String, PersistedEntry>,
    #[serde(default, deserialize_with = "or_default")]
    pub refresh_mode: RefreshMode,
    #[serde(default, deserialize_with = "or_default")]
    pub view_mode: ViewMode,
}

impl PersistedDocument {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Unknown or mistyped values fall back to the default.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_are_stable() {
        let mut doc = PersistedDocument::default();
        doc.profiles.insert(
            "prod".into(),
            PersistedProfile {
                label: "prod".into(),
                url: "https://es-prod:9200".into(),
            }
            .into(),
        );
        doc.refresh_mode = RefreshMode::Every10Seconds;

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "profiles": { "prod": { "label": "prod", "url": "https://es-prod:9200" } },
                "refreshMode": "EVERY_10_SECONDS",
                "viewMode": "TEXT"
            })
        );
    }

    #[test]
    fn empty_object_decodes_to_defaults() {
        let doc = PersistedDocument::from_json("{}").unwrap();
        assert_eq!(doc, PersistedDocument::default());
    }

    #[test]
    fn bad_entries_and_unknown_modes_do_not_sink_the_document() {
        let doc = PersistedDocument::from_json(
            r#"{
                "profiles": {
                    "ok":     { "label": "ok", "url": "http://localhost:9200" },
                    "no-url": { "label": "no-url" },
                    "junk":   42
                },
                "refreshMode": "EVERY_FORTNIGHT",
                "viewMode": "TABLE"
            }"#,
        )
        .unwrap();

        assert_eq!(doc.refresh_mode, RefreshMode::Disabled);
        assert_eq!(doc.view_mode, ViewMode::Table);
        assert!(doc.profiles["ok"].profile().is_some());
        assert!(doc.profiles["no-url"].profile().is_none());
        assert!(doc.profiles["junk"].profile().is_none());
    }

    #[test]
    fn profiles_that_are_not_a_map_decode_as_empty() {
        let doc = PersistedDocument::from_json(
            r#"{ "profiles": [], "refreshMode": "EVERY_60_SECONDS", "viewMode": "TABLE" }"#,
        )
        .unwrap();

        assert!(doc.profiles.is_empty());
        assert_eq!(doc.refresh_mode, RefreshMode::Every60Seconds);
        assert_eq!(doc.view_mode, ViewMode::Table);
    }
}
