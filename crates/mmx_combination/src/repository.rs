//! Combination repository abstraction and the in-memory [`CombinationRegistry`].

use crate::combination::Combination;
use crate::hash::ContentHash;
use mmx_mod::ModRegistry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Storage for combinations, keyed by name.
pub trait CombinationRepository {
    fn get(&self, name: &str) -> Option<&Combination>;

    /// Store a combination, replacing any previous one with the same name.
    fn set(&mut self, combination: Combination) -> ContentHash;

    /// All combinations whose main mod is `mod_name`, fewest optional mods first.
    fn for_mod(&self, mod_name: &str) -> Vec<&Combination>;
}

/// `BTreeMap`-backed combination repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombinationRegistry {
    combinations: BTreeMap<String, Combination>,
}

impl CombinationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.combinations.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combination> {
        self.combinations.values()
    }
}

impl CombinationRepository for CombinationRegistry {
    fn get(&self, name: &str) -> Option<&Combination> {
        self.combinations.get(name)
    }

    fn set(&mut self, combination: Combination) -> ContentHash {
        let id = combination.id();
        self.combinations.insert(combination.name.clone(), combination);
        id
    }

    fn for_mod(&self, mod_name: &str) -> Vec<&Combination> {
        let mut combinations: Vec<&Combination> = self
            .combinations
            .values()
            .filter(|c| c.main_mod_name == mod_name)
            .collect();
        combinations.sort_by(|a, b| {
            a.loaded_optional_mod_names
                .len()
                .cmp(&b.loaded_optional_mod_names.len())
                .then_with(|| a.name.cmp(&b.name))
        });
        combinations
    }
}

impl FromIterator<Combination> for CombinationRegistry {
    fn from_iter<I: IntoIterator<Item = Combination>>(iter: I) -> Self {
        Self {
            combinations: iter.into_iter().map(|c| (c.name.clone(), c)).collect(),
        }
    }
}

/// Persist freshly created combinations and record them against their main mod,
/// so later parent lookups can find them.
///
/// Returns the ids of the stored combinations, in input order.
pub fn register_combinations<C: CombinationRepository + ?Sized>(
    mods: &mut ModRegistry,
    repository: &mut C,
    combinations: Vec<Combination>,
) -> Vec<ContentHash> {
    let mut ids = Vec::with_capacity(combinations.len());
    for combination in combinations {
        if !mods.add_combination(&combination.main_mod_name, &combination.name) {
            tracing::warn!(
                "Main mod '{}' of combination '{}' is not known",
                combination.main_mod_name,
                combination.name
            );
        }
        ids.push(repository.set(combination));
    }
    ids
}
