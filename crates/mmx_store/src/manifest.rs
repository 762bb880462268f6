//! The `store.json` manifest.

use crate::error::{Error, Result};
use crate::json::{read_json, write_json};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};

/// Current schema version of the store layout.
pub const STORE_VERSION: u32 = 1;

/// Marks a directory as a store and records its schema version.
///
/// # JSON format
///
/// ```json
/// {
///   "version": 1
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreManifest {
    pub version: u32,
}

impl Default for StoreManifest {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
        }
    }
}

impl StoreManifest {
    /// Load the manifest, returning `Ok(None)` if the file doesn't exist.
    ///
    /// A manifest with a different version is an error.
    pub fn load(path: &Utf8Path) -> Result<Option<Self>> {
        let Some(manifest) = read_json::<Self>(path)? else {
            return Ok(None);
        };
        if manifest.version != STORE_VERSION {
            return Err(Error::UnsupportedVersion {
                found: manifest.version,
                expected: STORE_VERSION,
            });
        }
        Ok(Some(manifest))
    }

    pub fn save(&self, path: &Utf8Path) -> Result<()> {
        write_json(path, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_save_and_load() {
        let temp = NamedTempFile::new().unwrap();
        let path = Utf8Path::from_path(temp.path()).unwrap();

        StoreManifest::default().save(path).unwrap();
        let loaded = StoreManifest::load(path).unwrap().unwrap();
        assert_eq!(loaded.version, STORE_VERSION);
    }

    #[test]
    fn test_load_nonexistent() {
        let path = Utf8Path::new("/nonexistent/path/store.json");
        assert!(StoreManifest::load(path).unwrap().is_none());
    }

    #[test]
    fn test_version_mismatch() {
        let mut temp = NamedTempFile::new().unwrap();
        write!(temp, r#"{{"version": 99}}"#).unwrap();
        let path = Utf8Path::from_path(temp.path()).unwrap();

        let err = StoreManifest::load(path).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedVersion {
                found: 99,
                expected: STORE_VERSION
            }
        ));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut temp = NamedTempFile::new().unwrap();
        write!(temp, "not valid json").unwrap();
        let path = Utf8Path::from_path(temp.path()).unwrap();

        assert!(matches!(
            StoreManifest::load(path),
            Err(Error::Json { .. })
        ));
    }
}
