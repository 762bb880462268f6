//! JSON directory store for Mod Matrix.
//!
//! Persists everything the engine reads and writes in one directory:
//!
//! ```text
//! store/
//!   store.json                 # StoreManifest
//!   mods.json                  # ModRegistry
//!   combinations.json          # CombinationRegistry
//!   raw/icons.json             # raw entity registries, filled by exporters
//!   raw/items.json
//!   raw/machines.json
//!   raw/recipes.json
//!   reduced/combinations.json  # reduced combinations
//!   reduced/icons.json         # reduced entity registries
//!   ...
//! ```
//!
//! Missing files load as empty registries, so a fresh directory is a valid store.

pub mod error;
pub mod import;
mod json;
pub mod manifest;

pub use error::{Error, Result};
pub use manifest::{StoreManifest, STORE_VERSION};

use camino::{Utf8Path, Utf8PathBuf};
use json::{read_json_or_default, write_json};
use mmx_combination::{
    register_combinations, Combination, CombinationRegistry, CombinationRepository, ContentHash,
};
use mmx_mod::{assign_load_order, ModRegistry};
use mmx_reduce::EntityRegistries;

const MANIFEST_FILE: &str = "store.json";
const MODS_FILE: &str = "mods.json";
const COMBINATIONS_FILE: &str = "combinations.json";
const RAW_DIR: &str = "raw";
const REDUCED_DIR: &str = "reduced";

/// All persisted data of one store directory, loaded into memory.
#[derive(Debug, Clone)]
pub struct Store {
    root: Utf8PathBuf,
    pub mods: ModRegistry,
    pub combinations: CombinationRegistry,
    pub raw: EntityRegistries,
    pub reduced_combinations: CombinationRegistry,
    pub reduced: EntityRegistries,
}

impl Store {
    /// Open the store at `root`, loading every file that exists.
    pub fn open(root: impl Into<Utf8PathBuf>) -> Result<Self> {
        let root = root.into();
        StoreManifest::load(&root.join(MANIFEST_FILE))?;

        let store = Self {
            mods: read_json_or_default(&root.join(MODS_FILE))?,
            combinations: read_json_or_default(&root.join(COMBINATIONS_FILE))?,
            raw: read_registries(&root.join(RAW_DIR))?,
            reduced_combinations: read_json_or_default(
                &root.join(REDUCED_DIR).join(COMBINATIONS_FILE),
            )?,
            reduced: read_registries(&root.join(REDUCED_DIR))?,
            root,
        };

        tracing::debug!(
            "Opened store {}: {} mods, {} combinations, {} raw entities",
            store.root,
            store.mods.len(),
            store.combinations.len(),
            store.raw.len()
        );
        Ok(store)
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Write every registry and the manifest.
    pub fn save(&self) -> Result<()> {
        write_json(&self.root.join(MANIFEST_FILE), &StoreManifest::default())?;
        write_json(&self.root.join(MODS_FILE), &self.mods)?;
        write_json(&self.root.join(COMBINATIONS_FILE), &self.combinations)?;
        write_registries(&self.root.join(RAW_DIR), &self.raw)?;
        write_json(
            &self.root.join(REDUCED_DIR).join(COMBINATIONS_FILE),
            &self.reduced_combinations,
        )?;
        write_registries(&self.root.join(REDUCED_DIR), &self.reduced)?;

        tracing::info!("Saved store to {}", self.root);
        Ok(())
    }

    /// Import every `*/info.json` below `mods_dir` and recalculate the load order.
    ///
    /// Mods already in the store are replaced, keeping their known combinations.
    /// Returns the names of the imported mods.
    pub fn import_mod_infos(&mut self, mods_dir: &Utf8Path) -> Result<Vec<String>> {
        let mut imported = Vec::new();
        for path in import::find_info_files(mods_dir)? {
            let mut m = import::read_mod_info(&path)?;
            if let Some(previous) = self.mods.get_mut(&m.name) {
                m.combinations = std::mem::take(&mut previous.combinations);
            }

            if imported.contains(&m.name) {
                tracing::warn!("Mod '{}' found twice, using {}", m.name, path);
            } else {
                imported.push(m.name.clone());
            }
            tracing::debug!("Imported mod '{}' from {}", m.name, path);
            self.mods.insert(m);
        }

        assign_load_order(&mut self.mods)?;
        tracing::info!("Imported {} mod(s) from {}", imported.len(), mods_dir);
        Ok(imported)
    }

    /// Persist created combinations and record them against their main mod.
    pub fn register_combinations(&mut self, combinations: Vec<Combination>) -> Vec<ContentHash> {
        register_combinations(&mut self.mods, &mut self.combinations, combinations)
    }

    /// Store reduced combinations, replacing earlier reductions of the same name.
    pub fn record_reduced(&mut self, combinations: Vec<Combination>) {
        for combination in combinations {
            self.reduced_combinations.set(combination);
        }
    }
}

fn read_registries(dir: &Utf8Path) -> Result<EntityRegistries> {
    Ok(EntityRegistries {
        icons: read_json_or_default(&dir.join("icons.json"))?,
        items: read_json_or_default(&dir.join("items.json"))?,
        machines: read_json_or_default(&dir.join("machines.json"))?,
        recipes: read_json_or_default(&dir.join("recipes.json"))?,
    })
}

fn write_registries(dir: &Utf8Path, registries: &EntityRegistries) -> Result<()> {
    write_json(&dir.join("icons.json"), &registries.icons)?;
    write_json(&dir.join("items.json"), &registries.items)?;
    write_json(&dir.join("machines.json"), &registries.machines)?;
    write_json(&dir.join("recipes.json"), &registries.recipes)?;
    Ok(())
}
