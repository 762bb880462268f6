//! Import of unpacked mods.
//!
//! Every mod lives in its own directory with an `info.json` at the top:
//!
//! ```text
//! mods/
//!   base/info.json
//!   angelsrefining_0.12.4/info.json
//!   bobplates/info.json
//! ```

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use mmx_mod::{Mod, ModInfo};
use walkdir::WalkDir;

/// Name of the mod descriptor inside each mod directory.
pub const INFO_FILE_NAME: &str = "info.json";

/// Find all `*/info.json` files below `mods_dir`, sorted by path.
pub fn find_info_files(mods_dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(mods_dir.as_std_path())
        .min_depth(2)
        .max_depth(2)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() || entry.file_name() != INFO_FILE_NAME {
            continue;
        }
        let path = Utf8PathBuf::from_path_buf(entry.into_path()).map_err(Error::NonUtf8Path)?;
        files.push(path);
    }
    Ok(files)
}

/// Read one `info.json` into a [`Mod`]. The load order is assigned later.
pub fn read_mod_info(path: &Utf8Path) -> Result<Mod> {
    let contents = std::fs::read_to_string(path.as_std_path())?;
    ModInfo::from_json(&contents)
        .and_then(|info| info.into_mod(0))
        .map_err(|source| Error::ModInfo {
            path: path.to_path_buf(),
            source,
        })
}
