//! Content-addressed entity registries.

use crate::entity::{Entity, Icon, Item, Machine, Recipe};
use crate::error::Result;
use mmx_combination::ContentHash;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Storage for one kind of entity, keyed by content hash.
pub trait EntityRepository<T> {
    fn get(&self, hash: ContentHash) -> Option<&T>;

    /// Store an entity and return its hash. Storing identical content twice yields the
    /// same hash and keeps a single copy.
    fn set(&mut self, entity: T) -> Result<ContentHash>;
}

/// Hash of an entity: xxHash3 over its JSON serialization.
///
/// Entities only contain structs, sequences and `BTreeMap`s, so the serialization and
/// therefore the hash are stable across runs.
pub fn content_hash<T: Serialize>(entity: &T) -> Result<ContentHash> {
    let bytes = serde_json::to_vec(entity)?;
    Ok(ContentHash::of_bytes(&bytes))
}

/// `BTreeMap`-backed [`EntityRepository`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityRegistry<T> {
    entities: BTreeMap<ContentHash, T>,
}

impl<T> Default for EntityRegistry<T> {
    fn default() -> Self {
        Self {
            entities: BTreeMap::new(),
        }
    }
}

impl<T> EntityRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, hash: ContentHash) -> bool {
        self.entities.contains_key(&hash)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContentHash, &T)> {
        self.entities.iter().map(|(hash, entity)| (*hash, entity))
    }

    /// Move every entity of `other` into this registry.
    pub fn append(&mut self, mut other: Self) {
        self.entities.append(&mut other.entities);
    }
}

impl<T: Serialize> EntityRepository<T> for EntityRegistry<T> {
    fn get(&self, hash: ContentHash) -> Option<&T> {
        self.entities.get(&hash)
    }

    fn set(&mut self, entity: T) -> Result<ContentHash> {
        let hash = content_hash(&entity)?;
        self.entities.entry(hash).or_insert(entity);
        Ok(hash)
    }
}

/// One registry per entity kind.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistries {
    pub icons: EntityRegistry<Icon>,
    pub items: EntityRegistry<Item>,
    pub machines: EntityRegistry<Machine>,
    pub recipes: EntityRegistry<Recipe>,
}

impl EntityRegistries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: Entity>(&self, hash: ContentHash) -> Option<&T> {
        T::registry(self).get(hash)
    }

    pub fn set<T: Entity>(&mut self, entity: T) -> Result<ContentHash> {
        T::registry_mut(self).set(entity)
    }

    /// Total number of stored entities over all kinds.
    pub fn len(&self) -> usize {
        self.icons.len() + self.items.len() + self.machines.len() + self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
