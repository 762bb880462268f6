//! Mod repository abstraction and the in-memory [`ModRegistry`].

use crate::natural::natural_cmp;
use crate::Mod;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Read access to the known mods.
///
/// The repository is treated as authoritative: a mod missing from it is treated
/// as not installed.
pub trait ModRepository {
    /// Look up a mod by its unique name.
    fn get(&self, name: &str) -> Option<&Mod>;

    /// All mods, sorted by load order.
    fn all(&self) -> Vec<&Mod>;

    /// Names of all mods.
    fn names(&self) -> BTreeSet<String>;

    /// Load order of a mod, or `None` if the mod is unknown.
    fn order_of(&self, name: &str) -> Option<u32> {
        self.get(name).map(|m| m.order)
    }
}

/// `BTreeMap`-backed mod repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModRegistry {
    mods: BTreeMap<String, Mod>,
}

impl ModRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a mod, returning the previous entry.
    pub fn insert(&mut self, m: Mod) -> Option<Mod> {
        self.mods.insert(m.name.clone(), m)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Mod> {
        self.mods.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    /// Record a combination name against a mod.
    ///
    /// Returns `false` if the mod is unknown. Names already present are not duplicated.
    pub fn add_combination(&mut self, mod_name: &str, combination_name: &str) -> bool {
        let Some(m) = self.mods.get_mut(mod_name) else {
            return false;
        };
        if !m.combinations.iter().any(|c| c == combination_name) {
            m.combinations.push(combination_name.to_string());
        }
        true
    }
}

impl ModRepository for ModRegistry {
    fn get(&self, name: &str) -> Option<&Mod> {
        self.mods.get(name)
    }

    fn all(&self) -> Vec<&Mod> {
        let mut mods: Vec<&Mod> = self.mods.values().collect();
        mods.sort_by(|a, b| a.order.cmp(&b.order).then(natural_cmp(&a.name, &b.name)));
        mods
    }

    fn names(&self) -> BTreeSet<String> {
        self.mods.keys().cloned().collect()
    }
}

impl FromIterator<Mod> for ModRegistry {
    fn from_iter<I: IntoIterator<Item = Mod>>(iter: I) -> Self {
        Self {
            mods: iter.into_iter().map(|m| (m.name.clone(), m)).collect(),
        }
    }
}
