//! Parent combination discovery and ranking.
//!
//! A combination `P` is a parent of `C` when `P`'s loaded mods are a proper subset of
//! `C`'s. Parents are ranked by a total order so that "the nearest parent" is the same
//! on every run:
//!
//! 1. load order of the parent's main mod,
//! 2. number of loaded mods (fewer first),
//! 3. the load orders of the loaded mods, sorted ascending and compared element-wise,
//! 4. the parent's name.
//!
//! The most general parent therefore comes first and the most specific one last.

use crate::combination::Combination;
use crate::repository::CombinationRepository;
use mmx_mod::ModRepository;
use std::collections::BTreeMap;

/// Order used for mods missing from the repository; they rank after every known mod.
const UNKNOWN_ORDER: u32 = u32::MAX;

/// Finds and ranks the parents of combinations.
pub struct ParentCombinationFinder<'a, M, C>
where
    M: ModRepository + ?Sized,
    C: CombinationRepository + ?Sized,
{
    mods: &'a M,
    combinations: &'a C,
}

impl<'a, M, C> ParentCombinationFinder<'a, M, C>
where
    M: ModRepository + ?Sized,
    C: CombinationRepository + ?Sized,
{
    pub fn new(mods: &'a M, combinations: &'a C) -> Self {
        Self { mods, combinations }
    }

    /// Find the ranked parents of `combination`.
    ///
    /// Candidates are the combinations registered against each loaded mod other than
    /// the main mod, plus `additional` (e.g. combinations of the batch currently being
    /// generated). On a name clash the `additional` entry wins.
    pub fn find_parent_combinations<'s, I>(
        &'s self,
        combination: &Combination,
        additional: I,
    ) -> Vec<&'s Combination>
    where
        I: IntoIterator<Item = &'s Combination>,
    {
        let mut candidates: BTreeMap<&'s str, &'s Combination> = BTreeMap::new();

        for mod_name in &combination.loaded_mod_names {
            if *mod_name == combination.main_mod_name {
                continue;
            }
            let Some(m) = self.mods.get(mod_name) else {
                continue;
            };
            for candidate_name in &m.combinations {
                if let Some(candidate) = self.combinations.get(candidate_name) {
                    candidates.insert(candidate.name.as_str(), candidate);
                }
            }
        }
        for candidate in additional {
            candidates.insert(candidate.name.as_str(), candidate);
        }

        let mut parents: Vec<&'s Combination> = candidates
            .into_values()
            .filter(|candidate| {
                candidate.name != combination.name && candidate.is_proper_subset_of(combination)
            })
            .collect();
        parents.sort_by_cached_key(|parent| self.rank_key(parent));

        tracing::trace!(
            "Combination '{}' has {} parent(s)",
            combination.name,
            parents.len()
        );
        parents
    }

    /// Re-derive the parents of an already persisted combination.
    ///
    /// The parents recorded on the combination are resolved from the repository and
    /// passed as additional candidates, so same-mod parents found at creation time are
    /// kept and cross-mod parents registered since then are added.
    pub fn find_parents_of_persisted(&self, combination: &Combination) -> Vec<&Combination> {
        let recorded: Vec<&Combination> = combination
            .parent_combinations
            .iter()
            .filter_map(|name| self.combinations.get(name))
            .collect();
        self.find_parent_combinations(combination, recorded)
    }

    /// Return a copy of a persisted combination with its parent list re-ranked.
    pub fn rerank(&self, combination: &Combination) -> Combination {
        let parent_combinations = self
            .find_parents_of_persisted(combination)
            .into_iter()
            .map(|parent| parent.name.clone())
            .collect();
        Combination {
            parent_combinations,
            ..combination.clone()
        }
    }

    fn rank_key(&self, combination: &Combination) -> (u32, usize, Vec<u32>, String) {
        let mut orders: Vec<u32> = combination
            .loaded_mod_names
            .iter()
            .map(|name| self.order_of(name))
            .collect();
        orders.sort_unstable();

        (
            self.order_of(&combination.main_mod_name),
            combination.loaded_mod_names.len(),
            orders,
            combination.name.clone(),
        )
    }

    fn order_of(&self, mod_name: &str) -> u32 {
        self.mods.order_of(mod_name).unwrap_or(UNKNOWN_ORDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{register_combinations, CombinationRegistry};
    use mmx_mod::{Mod, ModRegistry};

    fn names<'c>(combinations: &[&'c Combination]) -> Vec<&'c str> {
        combinations.iter().map(|c| c.name.as_str()).collect()
    }

    fn mods() -> ModRegistry {
        [
            Mod::new("base", 0),
            Mod::new("A", 1),
            Mod::new("B", 2),
            Mod::new("C", 3),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_ranking_with_additional() {
        let mods = mods();
        let repository = CombinationRegistry::new();
        let finder = ParentCombinationFinder::new(&mods, &repository);

        let base = Combination::new("base", ["base"]);
        let base_a = base.with_optional_mod("A");
        let base_b = base.with_optional_mod("B");
        let base_a_b = base_a.with_optional_mod("B");
        let batch = vec![base_b.clone(), base_a_b.clone(), base.clone(), base_a.clone()];

        let parents = finder.find_parent_combinations(&base_a_b, &batch);
        assert_eq!(names(&parents), vec!["base", "base-A", "base-B"]);
    }

    #[test]
    fn test_never_returns_self_or_equal_sets() {
        let mods = mods();
        let repository = CombinationRegistry::new();
        let finder = ParentCombinationFinder::new(&mods, &repository);

        let base_a = Combination::new("base", ["base"]).with_optional_mod("A");
        let a = Combination::new("A", ["base", "A"]);
        let batch = vec![base_a.clone(), a.clone()];

        assert!(finder.find_parent_combinations(&base_a, &batch).is_empty());
        assert!(finder.find_parent_combinations(&a, &batch).is_empty());
    }

    #[test]
    fn test_registered_candidates_skip_main_mod() {
        let mut mods = mods();
        let mut repository = CombinationRegistry::new();
        let base = Combination::new("base", ["base"]);
        let a = Combination::new("A", ["base", "A"]);
        let a_b = Combination::new("A", ["base", "A"]).with_optional_mod("B");
        let b = Combination::new("B", ["base", "B"]);
        register_combinations(
            &mut mods,
            &mut repository,
            vec![base, a, a_b.clone(), b],
        );

        let finder = ParentCombinationFinder::new(&mods, &repository);
        // "A" is registered against the main mod, so it is only found when passed in.
        let parents = finder.find_parent_combinations(&a_b, []);
        assert_eq!(names(&parents), vec!["base", "B"]);

        let reranked = finder.rerank(&Combination {
            parent_combinations: vec!["A".to_string()],
            ..a_b
        });
        assert_eq!(reranked.parent_combinations, vec!["base", "A", "B"]);
    }

    #[test]
    fn test_unknown_mods_rank_last() {
        let mods = mods();
        let repository = CombinationRegistry::new();
        let finder = ParentCombinationFinder::new(&mods, &repository);

        let target = Combination::new("zzz", ["base", "zzz", "ghost"]).with_optional_mod("A");
        let ghost = Combination::new("ghost", ["base", "ghost"]);
        let base = Combination::new("base", ["base"]);
        let batch = vec![ghost, base];

        let parents = finder.find_parent_combinations(&target, &batch);
        assert_eq!(names(&parents), vec!["base", "ghost"]);
    }

    #[test]
    fn test_tie_break_on_mod_orders() {
        let mods = mods();
        let repository = CombinationRegistry::new();
        let finder = ParentCombinationFinder::new(&mods, &repository);

        let base = Combination::new("base", ["base"]);
        let target = base.with_optional_mod("A").with_optional_mod("B").with_optional_mod("C");
        let batch = vec![
            base.with_optional_mod("B").with_optional_mod("C"),
            base.with_optional_mod("A").with_optional_mod("C"),
            base.with_optional_mod("A").with_optional_mod("B"),
        ];

        let parents = finder.find_parent_combinations(&target, &batch);
        assert_eq!(names(&parents), vec!["base-A-B", "base-A-C", "base-B-C"]);
    }
}
