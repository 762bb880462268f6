//! Mod definitions and dependency resolution for Mod Matrix.
//!
//! This crate provides the leaf layer of the combination engine:
//!
//! - [`Mod`] and [`Dependency`], the read-only mod model
//! - [`Dependency::parse`], the parser for `info.json` dependency declarations
//! - [`ModRepository`], the lookup abstraction, with the in-memory [`ModRegistry`]
//! - [`DependencyResolver`], which computes mandatory and optional closures
//! - [`calculate_load_order`], which assigns load order positions on import

pub mod dependency;
pub mod error;
pub mod info;
pub mod natural;
pub mod order;
pub mod repository;
pub mod resolver;

pub use dependency::{normalize_version, parse_dependencies, Dependency};
pub use error::{Error, Result};
pub use info::ModInfo;
pub use natural::{natural_cmp, sort_natural};
pub use order::{assign_load_order, calculate_load_order, BASE_MOD_NAME};
pub use repository::{ModRegistry, ModRepository};
pub use resolver::DependencyResolver;

use serde::{Deserialize, Serialize};

/// An installed mod.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Mod {
    /// Unique internal name of the mod.
    pub name: String,

    #[serde(default)]
    pub version: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Position of the mod in the global load order. Assigned externally.
    pub order: u32,

    /// Dependencies as declared by the mod. Never changed after reading.
    #[serde(default)]
    pub dependencies: Vec<Dependency>,

    /// Names of the combinations already known for this mod.
    #[serde(default)]
    pub combinations: Vec<String>,
}

impl Mod {
    /// Create a mod without metadata or dependencies.
    pub fn new(name: impl Into<String>, order: u32) -> Self {
        Self {
            name: name.into(),
            version: String::new(),
            title: String::new(),
            author: String::new(),
            description: String::new(),
            order,
            dependencies: Vec::new(),
            combinations: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn with_combination(mut self, combination_name: impl Into<String>) -> Self {
        self.combinations.push(combination_name.into());
        self
    }

    pub fn mandatory_dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.dependencies.iter().filter(|d| d.is_mandatory)
    }

    pub fn optional_dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.dependencies.iter().filter(|d| !d.is_mandatory)
    }
}
