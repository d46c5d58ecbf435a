//! Resolved configuration snapshot
//!
//! The core never reads ambient configuration; every call consumes an
//! explicit `Settings` value that the host resolved beforehand (the CLI
//! layers defaults, a TOML file, and environment variables).

use crate::algorithm::Algorithm;
use log::warn;
use serde::{Deserialize, Serialize};

/// Duplicate detection level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupeLevel {
    /// No duplicate checking.
    #[default]
    Off,
    /// Check against permanent files only.
    Enabled,
    /// Also check against temporary files, closing the concurrent-upload
    /// race window.
    Strict,
}

/// Configuration snapshot consumed by every core operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Algorithm identifiers to compute. Unknown identifiers are dropped at
    /// the catalog intersection; order is preserved and drives dedupe
    /// checking order.
    pub algorithms: Vec<String>,
    /// MIME type allow-list. Empty means hash everything.
    pub mime_types: Vec<String>,
    /// Recompute every enabled digest on save instead of only missing ones.
    pub rehash: bool,
    /// Capture write-once original digests at creation.
    pub original: bool,
    /// Duplicate detection level.
    pub dedupe: DedupeLevel,
    /// Match duplicates against original digests too.
    pub dedupe_original: bool,
    /// Whether violation messages may identify the conflicting file. The
    /// host decides this from the requesting user's permissions.
    pub expose_duplicate: bool,
    /// Hash previously stored files that are missing digests when they are
    /// loaded.
    pub autohash: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            algorithms: vec!["sha256".to_string()],
            mime_types: Vec::new(),
            rehash: false,
            original: false,
            dedupe: DedupeLevel::Off,
            dedupe_original: false,
            expose_duplicate: false,
            autohash: false,
        }
    }
}

impl Settings {
    /// The configured algorithms intersected against the catalog.
    ///
    /// Unknown identifiers are silently dropped (a stale configuration is
    /// not an error), duplicates collapse to their first occurrence, and
    /// configured order is preserved.
    pub fn enabled_algorithms(&self) -> Vec<Algorithm> {
        let mut enabled = Vec::with_capacity(self.algorithms.len());
        for id in &self.algorithms {
            match Algorithm::from_id(id) {
                Some(algo) if !enabled.contains(&algo) => enabled.push(algo),
                Some(_) => {}
                None => warn!("dropping unknown hash algorithm {id:?} from configuration"),
            }
        }
        enabled
    }

    /// Test configuration: one fast algorithm, everything else off.
    pub fn test() -> Self {
        Self {
            algorithms: vec!["sha1".to_string()],
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_set_is_subset_of_catalog() {
        let settings = Settings {
            algorithms: vec![
                "sha1".to_string(),
                "crc32".to_string(),
                "blake2b_256".to_string(),
                "".to_string(),
            ],
            ..Settings::default()
        };
        assert_eq!(
            settings.enabled_algorithms(),
            vec![Algorithm::Sha1, Algorithm::Blake2b256]
        );
    }

    #[test]
    fn test_enabled_set_preserves_configured_order() {
        let settings = Settings {
            algorithms: vec![
                "sha512".to_string(),
                "md5".to_string(),
                "sha1".to_string(),
            ],
            ..Settings::default()
        };
        assert_eq!(
            settings.enabled_algorithms(),
            vec![Algorithm::Sha512, Algorithm::Md5, Algorithm::Sha1]
        );
    }

    #[test]
    fn test_enabled_set_drops_duplicates() {
        let settings = Settings {
            algorithms: vec!["sha1".to_string(), "sha1".to_string()],
            ..Settings::default()
        };
        assert_eq!(settings.enabled_algorithms(), vec![Algorithm::Sha1]);
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.enabled_algorithms(), vec![Algorithm::Sha256]);
        assert_eq!(settings.dedupe, DedupeLevel::Off);
        assert!(!settings.rehash);
        assert!(!settings.original);
    }

    #[test]
    fn test_settings_deserialize_from_toml_shape() {
        let json = serde_json::json!({
            "algorithms": ["sha1", "sha256"],
            "dedupe": "strict",
            "rehash": true,
        });
        let settings: Settings = serde_json::from_value(json).unwrap();
        assert_eq!(settings.dedupe, DedupeLevel::Strict);
        assert!(settings.rehash);
        assert_eq!(
            settings.enabled_algorithms(),
            vec![Algorithm::Sha1, Algorithm::Sha256]
        );
        // Unspecified keys fall back to defaults.
        assert!(!settings.original);
    }
}
