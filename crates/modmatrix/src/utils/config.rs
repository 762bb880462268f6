//! Application configuration management utilities.

use crate::errors::CliError;
use camino::{Utf8Path, Utf8PathBuf};
use mmx_combination::CreatorOptions;
use mmx_reduce::ReducerOptions;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

/// File name of the configuration looked up next to the executable.
pub const CONFIG_FILE_NAME: &str = "modmatrix.toml";

/// Application-wide configuration stored in modmatrix.toml.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Directory of the JSON store.
    pub store_path: Utf8PathBuf,
    /// Reduce against all ranked parents instead of only the nearest one.
    pub merge_parents: bool,
    /// Treat an entity without parent counterpart as an error.
    pub strict_parents: bool,
    /// Cap on optional mods per combination.
    pub max_optional_mods: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: Utf8PathBuf::from("store"),
            merge_parents: false,
            strict_parents: true,
            max_optional_mods: None,
        }
    }
}

impl AppConfig {
    pub fn reducer_options(&self) -> ReducerOptions {
        ReducerOptions {
            merge_parents: self.merge_parents,
            strict_parents: self.strict_parents,
        }
    }

    pub fn creator_options(&self) -> CreatorOptions {
        CreatorOptions {
            max_optional_mods: self.max_optional_mods,
        }
    }
}

/// Returns the directory where the current executable resides.
pub fn install_dir() -> Option<Utf8PathBuf> {
    let exe = env::current_exe().ok()?;
    let parent = exe.parent()?;
    Utf8PathBuf::from_path_buf(parent.to_path_buf()).ok()
}

/// Returns the default configuration file path (modmatrix.toml next to the executable).
pub fn default_config_path() -> Option<Utf8PathBuf> {
    install_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Loads the application configuration.
///
/// An explicit path must exist and parse. Without one, modmatrix.toml next to the
/// executable is used if present and valid; otherwise the defaults apply.
pub fn load_config(explicit: Option<&Utf8Path>) -> Result<AppConfig, CliError> {
    if let Some(path) = explicit {
        if !path.as_std_path().exists() {
            return Err(CliError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        return read_config(path);
    }

    if let Some(path) = default_config_path() {
        if path.as_std_path().exists() {
            match read_config(&path) {
                Ok(cfg) => return Ok(cfg),
                Err(e) => tracing::warn!("Ignoring {}: {}", path, e),
            }
        }
    }
    Ok(AppConfig::default())
}

fn read_config(path: &Utf8Path) -> Result<AppConfig, CliError> {
    let content = fs::read_to_string(path.as_std_path()).map_err(|_| CliError::ConfigNotFound {
        path: path.to_path_buf(),
    })?;
    toml::from_str(&content).map_err(|source| CliError::ConfigParseError {
        path: path.to_path_buf(),
        source,
    })
}
