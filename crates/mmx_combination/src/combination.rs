//! The [`Combination`] record and the entity kinds it carries hashes for.

use crate::hash::ContentHash;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The kinds of exported entities a combination references.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Icon,
    Item,
    Machine,
    Recipe,
}

impl EntityKind {
    /// All kinds, in the order reducers run.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Icon,
        EntityKind::Item,
        EntityKind::Machine,
        EntityKind::Recipe,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Icon => "icon",
            EntityKind::Item => "item",
            EntityKind::Machine => "machine",
            EntityKind::Recipe => "recipe",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One exportable variant of a mod: the main mod plus a canonically ordered subset
/// of its optional mods.
///
/// # JSON format
///
/// ```json
/// {
///   "name": "base-A",
///   "mainModName": "base",
///   "loadedModNames": ["A", "base"],
///   "loadedOptionalModNames": ["A"],
///   "parentCombinations": ["base"],
///   "iconHashes": [],
///   "itemHashes": ["00000000000000ff"],
///   "machineHashes": [],
///   "recipeHashes": []
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Combination {
    /// Main mod name followed by the `-`-joined optional mod names.
    pub name: String,

    /// The mod being exported.
    pub main_mod_name: String,

    /// Every mod that must be active: the mandatory closure plus the optional mods.
    pub loaded_mod_names: BTreeSet<String>,

    /// Optional mods in strictly increasing load order.
    pub loaded_optional_mod_names: Vec<String>,

    /// Names of the ranked parent combinations, most general first.
    #[serde(default)]
    pub parent_combinations: Vec<String>,

    #[serde(default)]
    pub icon_hashes: Vec<ContentHash>,

    #[serde(default)]
    pub item_hashes: Vec<ContentHash>,

    #[serde(default)]
    pub machine_hashes: Vec<ContentHash>,

    #[serde(default)]
    pub recipe_hashes: Vec<ContentHash>,
}

impl Combination {
    /// Create the base combination of a mod, without optional mods.
    pub fn new<I, S>(main_mod_name: impl Into<String>, mandatory_mod_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let main_mod_name = main_mod_name.into();
        let mut loaded_mod_names: BTreeSet<String> =
            mandatory_mod_names.into_iter().map(Into::into).collect();
        loaded_mod_names.insert(main_mod_name.clone());

        Self {
            name: main_mod_name.clone(),
            main_mod_name,
            loaded_mod_names,
            ..Self::default()
        }
    }

    /// Build the name of a combination from its main mod and optional mods.
    pub fn compose_name<S: AsRef<str>>(main_mod_name: &str, optional_mod_names: &[S]) -> String {
        let mut name = main_mod_name.to_string();
        for optional in optional_mod_names {
            name.push('-');
            name.push_str(optional.as_ref());
        }
        name
    }

    /// Return a new combination with one more optional mod appended.
    ///
    /// Parents and entity hashes are not carried over.
    pub fn with_optional_mod(&self, mod_name: &str) -> Self {
        let mut loaded_optional_mod_names = self.loaded_optional_mod_names.clone();
        loaded_optional_mod_names.push(mod_name.to_string());

        let mut loaded_mod_names = self.loaded_mod_names.clone();
        loaded_mod_names.insert(mod_name.to_string());

        Self {
            name: Self::compose_name(&self.main_mod_name, &loaded_optional_mod_names),
            main_mod_name: self.main_mod_name.clone(),
            loaded_mod_names,
            loaded_optional_mod_names,
            ..Self::default()
        }
    }

    /// Key of the combination in a content-addressed store.
    pub fn id(&self) -> ContentHash {
        ContentHash::of_name(&self.name)
    }

    /// The mandatory mods of this combination: loaded mods that are not optional.
    pub fn mandatory_mod_names(&self) -> impl Iterator<Item = &str> {
        self.loaded_mod_names
            .iter()
            .filter(|name| !self.loaded_optional_mod_names.contains(*name))
            .map(String::as_str)
    }

    /// The optional mods of the combination this one was extended from.
    pub fn direct_parent_optional_mod_names(&self) -> &[String] {
        match self.loaded_optional_mod_names.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    /// Whether this combination's mods are a strict subset of `other`'s.
    pub fn is_proper_subset_of(&self, other: &Combination) -> bool {
        self.loaded_mod_names.len() < other.loaded_mod_names.len()
            && self.loaded_mod_names.is_subset(&other.loaded_mod_names)
    }

    pub fn hashes(&self, kind: EntityKind) -> &[ContentHash] {
        match kind {
            EntityKind::Icon => &self.icon_hashes,
            EntityKind::Item => &self.item_hashes,
            EntityKind::Machine => &self.machine_hashes,
            EntityKind::Recipe => &self.recipe_hashes,
        }
    }

    pub fn set_hashes(&mut self, kind: EntityKind, hashes: Vec<ContentHash>) {
        match kind {
            EntityKind::Icon => self.icon_hashes = hashes,
            EntityKind::Item => self.item_hashes = hashes,
            EntityKind::Machine => self.machine_hashes = hashes,
            EntityKind::Recipe => self.recipe_hashes = hashes,
        }
    }

    pub fn with_hashes(mut self, kind: EntityKind, hashes: Vec<ContentHash>) -> Self {
        self.set_hashes(kind, hashes);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_combination() {
        let base = Combination::new("A", ["base", "A"]);
        assert_eq!(base.name, "A");
        assert_eq!(base.loaded_mod_names.len(), 2);
        assert!(base.loaded_optional_mod_names.is_empty());
        assert_eq!(base.mandatory_mod_names().collect::<Vec<_>>(), vec!["A", "base"]);
    }

    #[test]
    fn test_with_optional_mod() {
        let base = Combination::new("base", ["base"])
            .with_hashes(EntityKind::Item, vec![ContentHash::new(1)]);
        let extended = base.with_optional_mod("A").with_optional_mod("B");

        assert_eq!(extended.name, "base-A-B");
        assert_eq!(extended.loaded_optional_mod_names, vec!["A", "B"]);
        assert_eq!(extended.direct_parent_optional_mod_names(), ["A".to_string()]);
        assert!(extended.item_hashes.is_empty());
        assert!(base.is_proper_subset_of(&extended));
        assert!(!extended.is_proper_subset_of(&base));
        assert!(!base.is_proper_subset_of(&base));
        // Input left untouched.
        assert_eq!(base.name, "base");
    }

    #[test]
    fn test_hash_accessors() {
        let mut combination = Combination::new("base", ["base"]);
        for (idx, kind) in EntityKind::ALL.into_iter().enumerate() {
            combination.set_hashes(kind, vec![ContentHash::new(idx as u64)]);
        }
        assert_eq!(combination.hashes(EntityKind::Machine), [ContentHash::new(2)]);
        assert_eq!(combination.recipe_hashes, vec![ContentHash::new(3)]);
    }

    #[test]
    fn test_serialization_format() {
        let combination = Combination::new("base", ["base"]).with_optional_mod("A");
        let json = serde_json::to_string(&combination).unwrap();

        assert!(json.contains("\"mainModName\":\"base\""));
        assert!(json.contains("\"loadedOptionalModNames\":[\"A\"]"));
        assert!(json.contains("\"loadedModNames\":[\"A\",\"base\"]"));

        let loaded: Combination = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, combination);
    }
}
