//! Parent-based reduction of combination data.
//!
//! Exporters fill raw [`EntityRegistries`] and attach entity hashes to combinations.
//! The [`ReducerManager`] then rewrites each combination so it only references what
//! differs from its parent:
//!
//! - icons already present in the parent are dropped
//! - items, machines and recipes keep their identity, with every field equal to the
//!   parent's cleared
//!
//! Reduced entities live in separate registries; raw data is never modified.

pub mod entity;
pub mod error;
pub mod manager;
pub mod reducer;
pub mod registry;

pub use entity::{
    Color, Entity, Icon, IconLayer, IdentifiedEntity, Item, ItemType, Machine, MachineData,
    Recipe, RecipeData, RecipeEntry, RecipeMode, Translations,
};
pub use error::{Error, Result};
pub use manager::{ReducerManager, ReducerOptions, ReductionProgress, ReductionStage};
pub use reducer::{Baseline, IconReducer, IdentifiedReducer, Reducer, ReductionContext};
pub use registry::{content_hash, EntityRegistries, EntityRegistry, EntityRepository};
