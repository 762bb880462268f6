//! Combination lattice for Mod Matrix.
//!
//! A [`Combination`] is one exportable variant of a mod: the mod, its mandatory
//! dependency closure and a canonically ordered subset of its optional mods.
//!
//! - [`CombinationCreator`] enumerates the lattice of combinations for a mod
//! - [`ParentCombinationFinder`] finds and ranks the parents of a combination
//! - [`CombinationRepository`] abstracts combination storage, with the in-memory
//!   [`CombinationRegistry`]
//! - [`ContentHash`] is the xxHash3 key used by every content-addressed registry

pub mod combination;
pub mod creator;
pub mod finder;
pub mod hash;
pub mod repository;

pub use combination::{Combination, EntityKind};
pub use creator::{CombinationCreator, CombinationFilter, CreatorOptions};
pub use finder::ParentCombinationFinder;
pub use hash::{ContentHash, ParseContentHashError};
pub use repository::{register_combinations, CombinationRegistry, CombinationRepository};
