//! Transitive dependency resolution.
//!
//! Both closures are computed with a post-order depth-first traversal, so every mod
//! appears after the mods it depends on. Seeds and dependency edges are sorted with
//! [`natural_cmp`] before they are visited, which makes the result independent of the
//! repository's iteration order.
//!
//! Mods that are not in the repository are skipped: they contribute no dependencies and
//! do not appear in the result.

use crate::natural::{natural_cmp, sort_natural};
use crate::repository::ModRepository;
use std::collections::{BTreeSet, HashSet};

/// Resolves mandatory and optional dependency closures over a [`ModRepository`].
///
/// The resolver holds no traversal state of its own; every call starts fresh.
pub struct DependencyResolver<'a, R: ModRepository + ?Sized> {
    mods: &'a R,
}

impl<'a, R: ModRepository + ?Sized> DependencyResolver<'a, R> {
    pub fn new(mods: &'a R) -> Self {
        Self { mods }
    }

    /// Resolve the mandatory closure of `mod_names`.
    ///
    /// Only mandatory edges are followed. The result lists each mod once, in post-order,
    /// which is a valid topological order of the mandatory dependency graph.
    pub fn resolve_mandatory_dependencies<I, S>(&self, mod_names: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let seeds = sorted_seeds(mod_names);
        let mut traversal = Traversal::new(self.mods, EdgeKind::Mandatory);
        for seed in &seeds {
            traversal.visit(seed);
        }
        traversal.order
    }

    /// Resolve the mods that become reachable through at least one optional edge.
    ///
    /// The mandatory closure of `mod_names` is computed first; optional edges are then
    /// followed from it, and the mandatory closure is removed from the result.
    pub fn resolve_optional_mods<I, S>(&self, mod_names: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mandatory = self.resolve_mandatory_dependencies(mod_names);

        let seeds = sorted_seeds(&mandatory);
        let mut traversal = Traversal::new(self.mods, EdgeKind::Optional);
        for seed in &seeds {
            traversal.visit(seed);
        }

        let mandatory: HashSet<&str> = mandatory.iter().map(String::as_str).collect();
        let optional: BTreeSet<String> = traversal
            .order
            .into_iter()
            .filter(|name| !mandatory.contains(name.as_str()))
            .collect();

        tracing::debug!(
            "Resolved {} mandatory and {} optional mods",
            mandatory.len(),
            optional.len()
        );
        optional
    }
}

fn sorted_seeds<I, S>(mod_names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seeds: Vec<String> = mod_names
        .into_iter()
        .map(|name| name.as_ref().to_string())
        .collect();
    sort_natural(&mut seeds);
    seeds.dedup();
    seeds
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeKind {
    Mandatory,
    Optional,
}

/// Working state of a single resolver call.
struct Traversal<'r, R: ModRepository + ?Sized> {
    mods: &'r R,
    edges: EdgeKind,
    visited: HashSet<String>,
    order: Vec<String>,
}

impl<'r, R: ModRepository + ?Sized> Traversal<'r, R> {
    fn new(mods: &'r R, edges: EdgeKind) -> Self {
        Self {
            mods,
            edges,
            visited: HashSet::new(),
            order: Vec::new(),
        }
    }

    fn visit(&mut self, name: &str) {
        if !self.visited.insert(name.to_string()) {
            return;
        }

        let mods = self.mods;
        let Some(m) = mods.get(name) else {
            tracing::trace!("Mod '{}' is not known, skipping", name);
            return;
        };

        let follow_mandatory = self.edges == EdgeKind::Mandatory;
        let mut targets: Vec<&str> = m
            .dependencies
            .iter()
            .filter(|dependency| dependency.is_mandatory == follow_mandatory)
            .map(|dependency| dependency.required_mod_name.as_str())
            .collect();
        targets.sort_by(|a, b| natural_cmp(a, b));
        targets.dedup();

        for target in targets {
            self.visit(target);
        }
        self.order.push(m.name.clone());
    }
}
