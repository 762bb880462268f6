//! Reduction of whole combinations.
//!
//! [`ReducerManager::reduce`] resolves the parents of a persisted combination with the
//! [`ParentCombinationFinder`], builds the [`Baseline`] and runs one [`Reducer`] per
//! entity kind. The input combination is never modified; the result is a new
//! combination whose hash lists point into the reduced registries.

use crate::entity::{Item, Machine, Recipe};
use crate::error::Result;
use crate::reducer::{Baseline, IconReducer, IdentifiedReducer, Reducer, ReductionContext};
use crate::registry::EntityRegistries;
use mmx_combination::{Combination, CombinationRepository, ParentCombinationFinder};
use mmx_mod::ModRepository;
use std::sync::Arc;

/// How the baseline of a combination is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReducerOptions {
    /// Layer all ranked parents instead of using only the nearest one.
    pub merge_parents: bool,
    /// Fail when an entity has no counterpart in an existing parent.
    pub strict_parents: bool,
}

impl Default for ReducerOptions {
    fn default() -> Self {
        Self {
            merge_parents: false,
            strict_parents: true,
        }
    }
}

/// Progress information emitted by [`ReducerManager::reduce_all`].
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReductionProgress {
    pub stage: ReductionStage,
    /// Combination currently being reduced (set during `Reducing`).
    pub current_combination: Option<String>,
    /// 1-based index of the current combination.
    pub current: u32,
    pub total: u32,
}

/// Emitted in order: `Starting` -> `Reducing` (repeated) -> `Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReductionStage {
    Starting,
    Reducing,
    Complete,
}

type ProgressCallback = Arc<dyn Fn(ReductionProgress) + Send + Sync>;

/// Reduces combinations against their parents.
///
/// ```ignore
/// let manager = ReducerManager::new(&mods, &combinations, &raw)
///     .with_options(ReducerOptions { merge_parents: true, ..Default::default() })
///     .with_progress(|p| println!("{:?}", p));
/// let reduced = manager.reduce_all(&names, &mut reduced_registries)?;
/// ```
pub struct ReducerManager<'a, M, C>
where
    M: ModRepository + ?Sized,
    C: CombinationRepository + ?Sized,
{
    finder: ParentCombinationFinder<'a, M, C>,
    combinations: &'a C,
    raw: &'a EntityRegistries,
    reducers: Vec<Box<dyn Reducer>>,
    options: ReducerOptions,
    progress_callback: Option<ProgressCallback>,
}

impl<'a, M, C> ReducerManager<'a, M, C>
where
    M: ModRepository + ?Sized,
    C: CombinationRepository + ?Sized,
{
    pub fn new(mods: &'a M, combinations: &'a C, raw: &'a EntityRegistries) -> Self {
        Self {
            finder: ParentCombinationFinder::new(mods, combinations),
            combinations,
            raw,
            reducers: vec![
                Box::new(IconReducer),
                Box::new(IdentifiedReducer::<Item>::new()),
                Box::new(IdentifiedReducer::<Machine>::new()),
                Box::new(IdentifiedReducer::<Recipe>::new()),
            ],
            options: ReducerOptions::default(),
            progress_callback: None,
        }
    }

    pub fn with_options(mut self, options: ReducerOptions) -> Self {
        self.options = options;
        self
    }

    /// Register a progress callback for [`reduce_all`](Self::reduce_all).
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ReductionProgress) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(callback));
        self
    }

    /// Reduce one combination, writing reduced entities into `reduced`.
    ///
    /// The returned combination carries the re-ranked parent list and the reduced hash
    /// lists. Any data error aborts the whole combination.
    pub fn reduce(
        &self,
        combination: &Combination,
        reduced: &mut EntityRegistries,
    ) -> Result<Combination> {
        let parents = self.finder.find_parents_of_persisted(combination);
        let baseline = self.baseline(&parents);

        tracing::debug!(
            "Reducing '{}' against {} parent(s)",
            combination.name,
            baseline.parents().len()
        );

        // Work on a scratch registry so a failing reducer leaves `reduced` untouched.
        let mut scratch = EntityRegistries::new();
        let context = ReductionContext {
            combination,
            baseline: &baseline,
            raw: self.raw,
            strict_parents: self.options.strict_parents,
        };

        let mut result = Combination {
            parent_combinations: parents.iter().map(|p| p.name.clone()).collect(),
            ..combination.clone()
        };
        for reducer in &self.reducers {
            let hashes = reducer.reduce(&context, &mut scratch)?;
            reducer.set_hashes_to_combination(&mut result, hashes);
        }

        merge_into(reduced, scratch);
        Ok(result)
    }

    /// Reduce the named combinations in order. Unknown names are skipped.
    pub fn reduce_all<S: AsRef<str>>(
        &self,
        names: &[S],
        reduced: &mut EntityRegistries,
    ) -> Result<Vec<Combination>> {
        let total = names.len() as u32;
        tracing::info!("Reducing {} combination(s)...", total);
        self.emit_progress(ReductionProgress {
            stage: ReductionStage::Starting,
            current_combination: None,
            current: 0,
            total,
        });

        let mut results = Vec::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            let name = name.as_ref();
            self.emit_progress(ReductionProgress {
                stage: ReductionStage::Reducing,
                current_combination: Some(name.to_string()),
                current: idx as u32 + 1,
                total,
            });

            let Some(combination) = self.combinations.get(name) else {
                tracing::warn!("Combination '{}' not found, skipping", name);
                continue;
            };
            results.push(self.reduce(combination, reduced)?);
        }

        tracing::info!(
            "Reduced {} combination(s), {} reduced entities stored",
            results.len(),
            reduced.len()
        );
        self.emit_progress(ReductionProgress {
            stage: ReductionStage::Complete,
            current_combination: None,
            current: total,
            total,
        });
        Ok(results)
    }

    /// Parents are ranked most general first, so the nearest one is the last.
    fn baseline<'p>(&self, parents: &[&'p Combination]) -> Baseline<'p> {
        if self.options.merge_parents {
            Baseline::new(parents.iter().rev().copied().collect())
        } else {
            Baseline::new(parents.last().copied().into_iter().collect())
        }
    }

    fn emit_progress(&self, progress: ReductionProgress) {
        if let Some(callback) = &self.progress_callback {
            callback(progress);
        }
    }
}

fn merge_into(target: &mut EntityRegistries, source: EntityRegistries) {
    let EntityRegistries {
        icons,
        items,
        machines,
        recipes,
    } = source;
    target.icons.append(icons);
    target.items.append(items);
    target.machines.append(machines);
    target.recipes.append(recipes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Icon, IconLayer, ItemType, Translations};
    use crate::error::Error;
    use mmx_combination::{CombinationRegistry, ContentHash, EntityKind};
    use mmx_mod::{Mod, ModRegistry};
    use std::sync::Mutex;

    fn mods() -> ModRegistry {
        [Mod::new("base", 0), Mod::new("A", 1), Mod::new("B", 2)]
            .into_iter()
            .collect()
    }

    fn icon(file_name: &str) -> Icon {
        Icon {
            size: 64,
            layers: vec![IconLayer {
                file_name: file_name.to_string(),
                offset_x: 0,
                offset_y: 0,
                scale: 1.0,
                tint: None,
            }],
        }
    }

    fn item(name: &str, labels: &[(&str, &str)]) -> Item {
        Item {
            item_type: ItemType::Item,
            name: name.to_string(),
            labels: labels
                .iter()
                .map(|(locale, text)| (locale.to_string(), text.to_string()))
                .collect(),
            descriptions: Translations::new(),
            icon_hash: None,
        }
    }

    struct Fixture {
        mods: ModRegistry,
        combinations: CombinationRegistry,
        raw: EntityRegistries,
    }

    /// `base`, `base-A` and `base-A-B` with parents recorded as the creator would.
    fn fixture(child_items: Vec<Item>, child_icons: Vec<Icon>) -> Fixture {
        let mut raw = EntityRegistries::new();
        let icon_hash = raw.set(icon("iron-plate.png")).unwrap();
        let plate = raw.set(item("iron-plate", &[("en", "Iron plate")])).unwrap();

        let child_item_hashes: Vec<ContentHash> = child_items
            .into_iter()
            .map(|i| raw.set(i).unwrap())
            .collect();
        let child_icon_hashes: Vec<ContentHash> = child_icons
            .into_iter()
            .map(|i| raw.set(i).unwrap())
            .collect();

        let base = Combination::new("base", ["base"])
            .with_hashes(EntityKind::Icon, vec![icon_hash])
            .with_hashes(EntityKind::Item, vec![plate]);
        let base_a = Combination {
            parent_combinations: vec!["base".to_string()],
            ..base.with_optional_mod("A")
        }
        .with_hashes(EntityKind::Icon, vec![icon_hash])
        .with_hashes(EntityKind::Item, vec![plate]);
        let base_a_b = Combination {
            parent_combinations: vec!["base".to_string(), "base-A".to_string()],
            ..base_a.with_optional_mod("B")
        }
        .with_hashes(EntityKind::Icon, child_icon_hashes)
        .with_hashes(EntityKind::Item, child_item_hashes);

        Fixture {
            mods: mods(),
            combinations: [base, base_a, base_a_b].into_iter().collect(),
            raw,
        }
    }

    #[test]
    fn test_identical_data_is_fully_reduced() {
        let f = fixture(
            vec![item("iron-plate", &[("en", "Iron plate")])],
            vec![icon("iron-plate.png")],
        );
        let manager = ReducerManager::new(&f.mods, &f.combinations, &f.raw);
        let mut reduced = EntityRegistries::new();

        let input = f.combinations.get("base-A-B").unwrap();
        let result = manager.reduce(input, &mut reduced).unwrap();

        assert_eq!(result.parent_combinations, vec!["base", "base-A"]);
        assert!(result.icon_hashes.is_empty());
        assert_eq!(result.item_hashes.len(), 1);
        let reduced_item = reduced.get::<Item>(result.item_hashes[0]).unwrap();
        assert_eq!(reduced_item.name, "iron-plate");
        assert!(reduced_item.labels.is_empty());

        // Input left untouched.
        assert_eq!(input.icon_hashes.len(), 1);
    }

    #[test]
    fn test_no_parent_keeps_data() {
        let f = fixture(vec![], vec![]);
        let manager = ReducerManager::new(&f.mods, &f.combinations, &f.raw);
        let mut reduced = EntityRegistries::new();

        let input = f.combinations.get("base").unwrap();
        let result = manager.reduce(input, &mut reduced).unwrap();

        assert!(result.parent_combinations.is_empty());
        assert_eq!(result.icon_hashes, input.icon_hashes);
        assert_eq!(result.item_hashes, input.item_hashes);
        assert_eq!(
            reduced.get::<Item>(result.item_hashes[0]),
            f.raw.get::<Item>(input.item_hashes[0])
        );
    }

    #[test]
    fn test_missing_parent_entity_aborts() {
        let f = fixture(
            vec![
                item("iron-plate", &[("en", "Iron plate")]),
                item("angels-plate", &[("en", "Angels plate")]),
            ],
            vec![],
        );
        let manager = ReducerManager::new(&f.mods, &f.combinations, &f.raw);
        let mut reduced = EntityRegistries::new();

        let err = manager
            .reduce(f.combinations.get("base-A-B").unwrap(), &mut reduced)
            .unwrap_err();
        match err {
            Error::MissingParentEntity {
                combination,
                kind,
                identifier,
            } => {
                assert_eq!(combination, "base-A-B");
                assert_eq!(kind, EntityKind::Item);
                assert_eq!(identifier, "item.angels-plate");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(reduced.is_empty());
    }

    #[test]
    fn test_merge_parents_layers_baseline() {
        let mut f = fixture(vec![], vec![]);
        // Only the root parent knows the gear; the nearest parent overrides the plate.
        let gear = f.raw.set(item("iron-gear-wheel", &[("en", "Gear")])).unwrap();
        let refined = f.raw.set(item("iron-plate", &[("en", "Refined plate")])).unwrap();
        let mut base = f.combinations.get("base").unwrap().clone();
        base.item_hashes.push(gear);
        let base_a = f
            .combinations
            .get("base-A")
            .unwrap()
            .clone()
            .with_hashes(EntityKind::Item, vec![refined]);
        let base_a_b = f
            .combinations
            .get("base-A-B")
            .unwrap()
            .clone()
            .with_hashes(EntityKind::Item, vec![refined, gear]);
        f.combinations.set(base);
        f.combinations.set(base_a);
        f.combinations.set(base_a_b);

        let input = f.combinations.get("base-A-B").unwrap();

        let single = ReducerManager::new(&f.mods, &f.combinations, &f.raw);
        assert!(single.reduce(input, &mut EntityRegistries::new()).is_err());

        let merged = ReducerManager::new(&f.mods, &f.combinations, &f.raw).with_options(
            ReducerOptions {
                merge_parents: true,
                ..Default::default()
            },
        );
        let mut reduced = EntityRegistries::new();
        let result = merged.reduce(input, &mut reduced).unwrap();

        // Both items match a baseline entity, so both are reduced to their identity.
        for hash in &result.item_hashes {
            assert!(reduced.get::<Item>(*hash).unwrap().labels.is_empty());
        }
        assert_eq!(result.item_hashes.len(), 2);
    }

    #[test]
    fn test_reduce_all_reports_progress() {
        let f = fixture(vec![item("iron-plate", &[("en", "Iron plate")])], vec![]);
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let manager = ReducerManager::new(&f.mods, &f.combinations, &f.raw)
            .with_progress(move |p| sink.lock().unwrap().push((p.stage, p.current)));

        let mut reduced = EntityRegistries::new();
        let results = manager
            .reduce_all(&["base", "missing", "base-A-B"], &mut reduced)
            .unwrap();

        assert_eq!(
            results.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["base", "base-A-B"]
        );
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                (ReductionStage::Starting, 0),
                (ReductionStage::Reducing, 1),
                (ReductionStage::Reducing, 2),
                (ReductionStage::Reducing, 3),
                (ReductionStage::Complete, 3),
            ]
        );
    }
}
