//! Per-kind reducers.
//!
//! A reducer takes the hash list of one entity kind from a combination and produces
//! the hash list of the reduced entities, written into the reduced registries.
//! Icons are deduplicated as a whole; identified entities are diffed field by field
//! against the entity with the same identity in the [`Baseline`].

use crate::entity::{Entity, Icon, IdentifiedEntity};
use crate::error::{Error, Result};
use crate::registry::EntityRegistries;
use mmx_combination::{Combination, ContentHash, EntityKind};
use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;

/// The parent data a combination is reduced against.
///
/// Holds the parents that make up the baseline, most specific first. In the default
/// mode this is only the nearest parent; in merge mode it is every ranked parent, and
/// an identity provided by a more specific parent is never taken from a less specific
/// one.
#[derive(Debug, Clone, Default)]
pub struct Baseline<'a> {
    parents: Vec<&'a Combination>,
}

impl<'a> Baseline<'a> {
    pub fn new(parents: Vec<&'a Combination>) -> Self {
        Self { parents }
    }

    /// No parent: entities are copied verbatim.
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn parents(&self) -> &[&'a Combination] {
        &self.parents
    }

    /// Icon hashes of all baseline parents.
    pub fn icon_hashes(&self) -> HashSet<ContentHash> {
        self.parents
            .iter()
            .flat_map(|parent| parent.icon_hashes.iter().copied())
            .collect()
    }

    /// Index the baseline's entities of kind `T` by identity.
    ///
    /// Entities are read from the raw registry; the first parent providing an identity
    /// wins.
    pub fn index<'r, T: IdentifiedEntity>(
        &self,
        raw: &'r EntityRegistries,
    ) -> Result<HashMap<String, &'r T>> {
        let mut index = HashMap::new();
        for parent in &self.parents {
            for hash in parent.hashes(T::KIND) {
                let entity = load::<T>(raw, *hash)?;
                index.entry(entity.identifier()).or_insert(entity);
            }
        }
        Ok(index)
    }
}

/// Reduction context for one combination.
pub struct ReductionContext<'a> {
    pub combination: &'a Combination,
    pub baseline: &'a Baseline<'a>,
    pub raw: &'a EntityRegistries,
    /// A missing parent entity is an error instead of being kept verbatim.
    pub strict_parents: bool,
}

/// Reduces the entities of one kind.
pub trait Reducer {
    fn kind(&self) -> EntityKind;

    /// Reduce the hashes of [`Reducer::kind`] and return the reduced hash list.
    fn reduce(
        &self,
        context: &ReductionContext<'_>,
        reduced: &mut EntityRegistries,
    ) -> Result<Vec<ContentHash>>;

    fn hashes_from_combination<'c>(&self, combination: &'c Combination) -> &'c [ContentHash] {
        combination.hashes(self.kind())
    }

    fn set_hashes_to_combination(&self, combination: &mut Combination, hashes: Vec<ContentHash>) {
        combination.set_hashes(self.kind(), hashes);
    }
}

/// Drops icons already present in the baseline; other icons are copied unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct IconReducer;

impl Reducer for IconReducer {
    fn kind(&self) -> EntityKind {
        EntityKind::Icon
    }

    fn reduce(
        &self,
        context: &ReductionContext<'_>,
        reduced: &mut EntityRegistries,
    ) -> Result<Vec<ContentHash>> {
        let parent_icons = context.baseline.icon_hashes();
        let mut hashes = Vec::new();

        for hash in self.hashes_from_combination(context.combination) {
            if parent_icons.contains(hash) {
                continue;
            }
            let icon = load::<Icon>(context.raw, *hash)?;
            hashes.push(reduced.set(icon.clone())?);
        }

        tracing::debug!(
            "Combination '{}': kept {} of {} icon(s)",
            context.combination.name,
            hashes.len(),
            context.combination.icon_hashes.len()
        );
        Ok(hashes)
    }
}

/// Diffs identified entities against the baseline.
pub struct IdentifiedReducer<T> {
    _entity: PhantomData<fn() -> T>,
}

impl<T> IdentifiedReducer<T> {
    pub fn new() -> Self {
        Self {
            _entity: PhantomData,
        }
    }
}

impl<T> Default for IdentifiedReducer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: IdentifiedEntity> Reducer for IdentifiedReducer<T> {
    fn kind(&self) -> EntityKind {
        T::KIND
    }

    fn reduce(
        &self,
        context: &ReductionContext<'_>,
        reduced: &mut EntityRegistries,
    ) -> Result<Vec<ContentHash>> {
        let source = self.hashes_from_combination(context.combination);
        let mut hashes = Vec::with_capacity(source.len());

        if context.baseline.is_empty() {
            for hash in source {
                let entity = load::<T>(context.raw, *hash)?;
                hashes.push(reduced.set(entity.clone())?);
            }
            return Ok(hashes);
        }

        let parent_entities = context.baseline.index::<T>(context.raw)?;
        for hash in source {
            let entity = load::<T>(context.raw, *hash)?;
            let identifier = entity.identifier();

            let reduced_entity = match parent_entities.get(&identifier) {
                Some(parent) => entity.reduce_from(parent),
                None if context.strict_parents => {
                    return Err(Error::MissingParentEntity {
                        combination: context.combination.name.clone(),
                        kind: T::KIND,
                        identifier,
                    });
                }
                None => {
                    tracing::debug!(
                        "Combination '{}': {} '{}' has no parent counterpart, keeping it",
                        context.combination.name,
                        T::KIND,
                        identifier
                    );
                    entity.clone()
                }
            };
            hashes.push(reduced.set(reduced_entity)?);
        }
        Ok(hashes)
    }
}

fn load<T: Entity>(raw: &EntityRegistries, hash: ContentHash) -> Result<&T> {
    raw.get::<T>(hash).ok_or(Error::EntityNotFound {
        kind: T::KIND,
        hash,
    })
}
