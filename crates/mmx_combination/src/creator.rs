//! Generation of the combination lattice of a mod.
//!
//! # Algorithm
//!
//! 1. Resolve the mandatory closure of the mod and the optional mods reachable from it.
//! 2. Seed the result with the base combination (no optional mods).
//! 3. For `k = 1, 2, ...`, extend every combination accepted at level `k - 1` with each
//!    optional mod whose load order is strictly greater than every optional mod it
//!    already has. Sets are therefore only ever produced in one canonical order.
//! 4. An extension is kept if it passes the filter and, for `k > 1`, its direct parent
//!    (same optional mods minus the last one) was kept. Generation stops at the first
//!    level that keeps nothing, or at [`CreatorOptions::max_optional_mods`].
//!
//! Mod names may contain `-`, so two different sets can compose the same name. The
//! first combination generated under a name keeps it; later ones are skipped with a
//! warning, which also prunes everything extending them.
//!
//! Every kept combination gets its ranked parents from [`ParentCombinationFinder`],
//! using the combinations built so far as additional candidates.

use crate::combination::Combination;
use crate::finder::ParentCombinationFinder;
use crate::repository::CombinationRepository;
use mmx_mod::{natural_cmp, DependencyResolver, Mod, ModRepository};
use std::collections::HashSet;
use std::sync::Arc;

/// Predicate deciding whether a generated combination is worth keeping.
pub type CombinationFilter = Arc<dyn Fn(&Combination) -> bool + Send + Sync>;

/// Tuning knobs for [`CombinationCreator`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatorOptions {
    /// Maximum number of optional mods in one combination. `None` means unbounded.
    pub max_optional_mods: Option<usize>,
}

/// Enumerates the combinations of a mod.
///
/// ```ignore
/// let combinations = CombinationCreator::new(&mods, &repository)
///     .with_options(CreatorOptions { max_optional_mods: Some(2) })
///     .create_combinations(&base_mod);
/// ```
pub struct CombinationCreator<'a, M, C>
where
    M: ModRepository + ?Sized,
    C: CombinationRepository + ?Sized,
{
    mods: &'a M,
    combinations: &'a C,
    options: CreatorOptions,
    filter: Option<CombinationFilter>,
}

impl<'a, M, C> CombinationCreator<'a, M, C>
where
    M: ModRepository + ?Sized,
    C: CombinationRepository + ?Sized,
{
    pub fn new(mods: &'a M, combinations: &'a C) -> Self {
        Self {
            mods,
            combinations,
            options: CreatorOptions::default(),
            filter: None,
        }
    }

    pub fn with_options(mut self, options: CreatorOptions) -> Self {
        self.options = options;
        self
    }

    /// Reject generated combinations for which `filter` returns `false`.
    ///
    /// Combinations extending a rejected one are never generated.
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Combination) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Create all combinations of `main_mod`, base combination first, then level by level.
    pub fn create_combinations(&self, main_mod: &Mod) -> Vec<Combination> {
        let resolver = DependencyResolver::new(self.mods);
        let mandatory = resolver.resolve_mandatory_dependencies([main_mod.name.as_str()]);
        let optional = self.ordered_optional_mods(resolver.resolve_optional_mods(&mandatory));

        tracing::debug!(
            "Mod '{}': {} mandatory, {} optional mod(s)",
            main_mod.name,
            mandatory.len(),
            optional.len()
        );

        let finder = ParentCombinationFinder::new(self.mods, self.combinations);

        let mut base = Combination::new(main_mod.name.clone(), mandatory);
        base.parent_combinations = parent_names(&finder, &base, &[]);
        let mut taken: HashSet<String> = HashSet::from([base.name.clone()]);
        let mut result = vec![base];
        let mut level_start = 0;

        for k in 1.. {
            if self.options.max_optional_mods.is_some_and(|max| k > max) {
                break;
            }

            let mut accepted: Vec<Combination> = Vec::new();
            for current in &result[level_start..] {
                let highest_order = current
                    .loaded_optional_mod_names
                    .iter()
                    .filter_map(|name| self.mods.order_of(name))
                    .max();

                for (order, optional_name) in &optional {
                    if highest_order.is_some_and(|highest| *order <= highest) {
                        continue;
                    }

                    let mut candidate = current.with_optional_mod(optional_name);
                    if !self.accepts(&candidate) {
                        tracing::debug!("Combination '{}' rejected by filter", candidate.name);
                        continue;
                    }
                    if k > 1 && !has_direct_parent(&candidate, &result, &accepted) {
                        tracing::debug!("Combination '{}' has no direct parent", candidate.name);
                        continue;
                    }
                    if taken.contains(&candidate.name)
                        || self.is_registered_elsewhere(&candidate)
                    {
                        tracing::warn!(
                            "Combination name '{}' is already used by another mod set, skipping {:?}",
                            candidate.name,
                            candidate.loaded_optional_mod_names
                        );
                        continue;
                    }

                    let known: Vec<&Combination> = result.iter().chain(&accepted).collect();
                    candidate.parent_combinations = parent_names(&finder, &candidate, &known);
                    taken.insert(candidate.name.clone());
                    accepted.push(candidate);
                }
            }

            if accepted.is_empty() {
                break;
            }
            tracing::debug!("Level {}: {} combination(s)", k, accepted.len());
            level_start = result.len();
            result.extend(accepted);
        }

        tracing::info!(
            "Created {} combination(s) for mod '{}'",
            result.len(),
            main_mod.name
        );
        result
    }

    /// Optional mods with their load order, ascending. Mods without an order are dropped.
    fn ordered_optional_mods<I>(&self, names: I) -> Vec<(u32, String)>
    where
        I: IntoIterator<Item = String>,
    {
        let mut optional: Vec<(u32, String)> = names
            .into_iter()
            .filter_map(|name| match self.mods.order_of(&name) {
                Some(order) => Some((order, name)),
                None => {
                    tracing::debug!("Optional mod '{}' is not known, skipping", name);
                    None
                }
            })
            .collect();
        optional.sort_by(|(a_order, a_name), (b_order, b_name)| {
            a_order.cmp(b_order).then_with(|| natural_cmp(a_name, b_name))
        });
        optional
    }

    /// Whether the repository holds a different combination under the same name.
    fn is_registered_elsewhere(&self, candidate: &Combination) -> bool {
        self.combinations.get(&candidate.name).is_some_and(|existing| {
            existing.main_mod_name != candidate.main_mod_name
                || existing.loaded_mod_names != candidate.loaded_mod_names
        })
    }

    fn accepts(&self, combination: &Combination) -> bool {
        self.filter
            .as_ref()
            .map_or(true, |filter| filter(combination))
    }
}

fn has_direct_parent(
    candidate: &Combination,
    result: &[Combination],
    accepted: &[Combination],
) -> bool {
    let expected = candidate.direct_parent_optional_mod_names();
    result
        .iter()
        .chain(accepted)
        .any(|c| c.loaded_optional_mod_names == expected)
}

/// Ranked parent names of `combination`; the combination itself is offered as a
/// candidate too and filtered out by the finder.
fn parent_names<M, C>(
    finder: &ParentCombinationFinder<'_, M, C>,
    combination: &Combination,
    known: &[&Combination],
) -> Vec<String>
where
    M: ModRepository + ?Sized,
    C: CombinationRepository + ?Sized,
{
    let additional = known.iter().copied().chain(std::iter::once(combination));
    finder
        .find_parent_combinations(combination, additional)
        .into_iter()
        .map(|parent| parent.name.clone())
        .collect()
}
