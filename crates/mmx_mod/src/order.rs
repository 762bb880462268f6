//! Load order calculation.
//!
//! The engine only ever reads [`Mod::order`](crate::Mod::order). This module is the
//! collaborator that assigns it when mods are imported: `base` always loads first,
//! then mods are placed one at a time, picking the naturally smallest name among the
//! mods whose known dependencies (mandatory and optional) are all placed already.
//! Dependencies declared with `~` do not constrain the order.

use crate::error::{Error, Result};
use crate::natural::sort_natural;
use crate::repository::{ModRegistry, ModRepository};
use std::collections::HashSet;

/// Name of the mod that always loads first.
pub const BASE_MOD_NAME: &str = "base";

/// Compute the load order of all mods in the repository.
///
/// Dependencies on unknown mods are ignored. Returns
/// [`Error::CyclicDependencies`] with the unplaceable mods if no order exists.
pub fn calculate_load_order<R: ModRepository + ?Sized>(mods: &R) -> Result<Vec<String>> {
    let mut remaining: Vec<String> = mods.names().into_iter().collect();
    sort_natural(&mut remaining);

    let mut placed: HashSet<String> = HashSet::new();
    let mut order = Vec::with_capacity(remaining.len());

    if let Some(idx) = remaining.iter().position(|name| name == BASE_MOD_NAME) {
        let base = remaining.remove(idx);
        placed.insert(base.clone());
        order.push(base);
    }

    while !remaining.is_empty() {
        let ready = remaining.iter().position(|name| {
            mods.get(name).map_or(true, |m| {
                m.dependencies
                    .iter()
                    .filter(|dependency| dependency.affects_load_order)
                    .all(|dependency| {
                        let target = dependency.required_mod_name.as_str();
                        target == name
                            || placed.contains(target)
                            || mods.get(target).is_none()
                    })
            })
        });

        let Some(idx) = ready else {
            return Err(Error::CyclicDependencies(remaining));
        };

        let name = remaining.remove(idx);
        placed.insert(name.clone());
        order.push(name);
    }

    Ok(order)
}

/// Assign [`Mod::order`](crate::Mod::order) for every mod in the registry.
pub fn assign_load_order(registry: &mut ModRegistry) -> Result<()> {
    let order = calculate_load_order(registry)?;
    for (position, name) in order.iter().enumerate() {
        if let Some(m) = registry.get_mut(name) {
            m.order = position as u32;
        }
    }
    tracing::debug!("Assigned load order to {} mods", order.len());
    Ok(())
}
