//! JSON file helpers.

use crate::error::{Error, Result};
use camino::Utf8Path;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read a JSON file, returning `Ok(None)` if it doesn't exist.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Utf8Path) -> Result<Option<T>> {
    if !path.as_std_path().exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path.as_std_path())?;
    let value = serde_json::from_str(&contents).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(value))
}

/// Read a JSON file, falling back to the default value if it doesn't exist.
pub(crate) fn read_json_or_default<T: DeserializeOwned + Default>(path: &Utf8Path) -> Result<T> {
    Ok(read_json(path)?.unwrap_or_default())
}

/// Write pretty JSON, creating parent directories if needed.
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Utf8Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent.as_std_path())?;
    }

    let contents = serde_json::to_string_pretty(value).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path.as_std_path(), contents)?;
    Ok(())
}
