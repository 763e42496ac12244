// Build profiles: named sets of preprocessor defines from sdk_profiles.json.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SwigppError};

/// Profile available when no table is configured.
pub const FREE_PROFILE: &str = "free";

/// Default profile of a configured table.
pub const STANDARD_PROFILE: &str = "standard";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    /// Semicolon-joined define list.
    #[serde(default)]
    pub defines: String,
}

impl Profile {
    pub fn define_list(&self) -> impl Iterator<Item = &str> {
        self.defines.split(';').map(str::trim).filter(|d| !d.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct ProfileTable {
    profiles: BTreeMap<String, Profile>,
    builtin: bool,
}

impl ProfileTable {
    /// The single-entry table used without a profile file.
    pub fn builtin() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(FREE_PROFILE.to_string(), Profile::default());
        ProfileTable {
            profiles,
            builtin: true,
        }
    }

    /// Load a profile table. The `free` entry of a file is ignored; it only exists
    /// as the built-in fallback.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(SwigppError::io(path))?;
        ProfileTable::parse(&text, path)
    }

    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let mut profiles: BTreeMap<String, Profile> =
            serde_json::from_str(text).map_err(|source| SwigppError::ProfileParse {
                path: path.to_path_buf(),
                source,
            })?;
        profiles.remove(FREE_PROFILE);
        Ok(ProfileTable {
            profiles,
            builtin: false,
        })
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// `free` for the built-in table, `standard` for a loaded one (or its first entry
    /// when it has no `standard`).
    pub fn default_id(&self) -> Option<&str> {
        if self.builtin {
            return Some(FREE_PROFILE);
        }
        if self.profiles.contains_key(STANDARD_PROFILE) {
            return Some(STANDARD_PROFILE);
        }
        self.ids().next()
    }

    pub fn get(&self, id: &str) -> Result<&Profile> {
        self.profiles.get(id).ok_or_else(|| SwigppError::UnknownProfile {
            name: id.to_string(),
            known: self.ids().collect::<Vec<_>>().join(", "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        "free": { "defines": "" },
        "standard": { "defines": "_CARTO_OFFLINE_SUPPORT;_CARTO_ROUTING_SUPPORT" },
        "lite": {}
    }"#;

    #[test]
    fn builtin_table_has_only_free() {
        let table = ProfileTable::builtin();
        assert_eq!(table.ids().collect::<Vec<_>>(), vec!["free"]);
        assert_eq!(table.default_id(), Some("free"));
        assert_eq!(table.get("free").unwrap().define_list().count(), 0);
    }

    #[test]
    fn loaded_table_drops_free_and_defaults_to_standard() {
        let table = ProfileTable::parse(TABLE, Path::new("sdk_profiles.json")).unwrap();
        assert_eq!(table.ids().collect::<Vec<_>>(), vec!["lite", "standard"]);
        assert_eq!(table.default_id(), Some("standard"));
        let defines: Vec<&str> = table.get("standard").unwrap().define_list().collect();
        assert_eq!(defines, vec!["_CARTO_OFFLINE_SUPPORT", "_CARTO_ROUTING_SUPPORT"]);
    }

    #[test]
    fn unknown_profile_lists_known_ones() {
        let table = ProfileTable::parse(TABLE, Path::new("sdk_profiles.json")).unwrap();
        let err = table.get("free").unwrap_err();
        assert_eq!(err.to_string(), "unknown profile 'free' (known: lite, standard)");
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = ProfileTable::parse("{", Path::new("p.json")).unwrap_err();
        assert!(matches!(err, SwigppError::ProfileParse { .. }));
    }
}
