//! Dependency declarations and their parser.
//!
//! Mods declare dependencies as strings in their `info.json`:
//!
//! | Declaration            | Meaning                                         |
//! |------------------------|-------------------------------------------------|
//! | `base >= 1.1`          | mandatory, at least version 1.1.0               |
//! | `? bobplates`          | optional                                        |
//! | `(?) angelsrefining`   | optional, hidden in the game UI                 |
//! | `~ core-lib`           | mandatory without load-order effect             |
//! | `! badmod`             | incompatible, contributes no dependency         |
//! | `foo < 1.0`            | upper bound, unsupported, contributes nothing   |

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dependency of a mod on another mod.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    /// Name of the required mod.
    pub required_mod_name: String,

    /// Normalized `major.minor.patch` lower bound. Empty when unconstrained.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub required_version: String,

    /// Whether the required mod must be loaded for the dependent mod to load at all.
    pub is_mandatory: bool,

    /// Whether the required mod has to load before the dependent mod. `false` for `~`.
    #[serde(default = "default_affects_load_order", skip_serializing_if = "is_true")]
    pub affects_load_order: bool,
}

fn default_affects_load_order() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

impl Dependency {
    pub fn mandatory(name: impl Into<String>) -> Self {
        Self {
            required_mod_name: name.into(),
            required_version: String::new(),
            is_mandatory: true,
            affects_load_order: true,
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            required_mod_name: name.into(),
            required_version: String::new(),
            is_mandatory: false,
            affects_load_order: true,
        }
    }

    /// Mark the dependency as not constraining the load order (`~` prefix).
    pub fn without_load_order(mut self) -> Self {
        self.affects_load_order = false;
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.required_version = version.into();
        self
    }

    /// Parse one dependency declaration.
    ///
    /// Returns `Ok(None)` for declarations that are valid but do not describe a
    /// dependency (incompatibilities and upper-bound constraints).
    pub fn parse(declaration: &str) -> Result<Option<Self>> {
        let malformed = |reason: &str| Error::MalformedDependency {
            declaration: declaration.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = declaration.trim();
        if trimmed.is_empty() {
            return Err(malformed("empty declaration"));
        }

        let (prefix, rest) = split_prefix(trimmed);
        let rest = rest.trim_start();

        let (name, constraint) = match rest.find(['<', '>', '=']) {
            Some(idx) => (rest[..idx].trim(), Some(rest[idx..].trim())),
            None => (rest.trim(), None),
        };
        if name.is_empty() {
            return Err(malformed("missing mod name"));
        }

        let required_version = match constraint {
            None => String::new(),
            Some(constraint) => {
                let op_len = constraint
                    .find(|c: char| !matches!(c, '<' | '>' | '='))
                    .unwrap_or(constraint.len());
                let (op, version) = constraint.split_at(op_len);
                let version = version.trim();
                if version.is_empty() {
                    return Err(malformed("missing version after operator"));
                }

                match op {
                    ">=" | ">" | "=" => normalize_version(version)?,
                    "<" | "<=" => {
                        tracing::debug!(
                            "Ignoring dependency '{}': upper-bound operator '{}' is not supported",
                            declaration,
                            op
                        );
                        return Ok(None);
                    }
                    _ => return Err(malformed(&format!("unknown operator '{op}'"))),
                }
            }
        };

        let is_mandatory = match prefix {
            Prefix::Incompatible => return Ok(None),
            Prefix::Optional | Prefix::HiddenOptional => false,
            Prefix::None | Prefix::NoLoadOrder => true,
        };

        Ok(Some(Self {
            required_mod_name: name.to_string(),
            required_version,
            is_mandatory,
            affects_load_order: prefix != Prefix::NoLoadOrder,
        }))
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_mandatory {
            f.write_str("? ")?;
        } else if !self.affects_load_order {
            f.write_str("~ ")?;
        }
        f.write_str(&self.required_mod_name)?;
        if !self.required_version.is_empty() {
            write!(f, " >= {}", self.required_version)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prefix {
    None,
    Incompatible,
    Optional,
    HiddenOptional,
    NoLoadOrder,
}

fn split_prefix(declaration: &str) -> (Prefix, &str) {
    if let Some(rest) = declaration.strip_prefix("(?)") {
        (Prefix::HiddenOptional, rest)
    } else if let Some(rest) = declaration.strip_prefix('?') {
        (Prefix::Optional, rest)
    } else if let Some(rest) = declaration.strip_prefix('!') {
        (Prefix::Incompatible, rest)
    } else if let Some(rest) = declaration.strip_prefix('~') {
        (Prefix::NoLoadOrder, rest)
    } else {
        (Prefix::None, declaration)
    }
}

/// Normalize a version of one to three numeric parts to `major.minor.patch`.
///
/// `"1.2"` becomes `"1.2.0"`, `"0.18.01"` becomes `"0.18.1"`.
pub fn normalize_version(version: &str) -> Result<String> {
    let invalid = || Error::InvalidVersion(version.to_string());

    let parts = version
        .trim()
        .split('.')
        .map(|part| part.parse::<u64>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>>>()?;
    if parts.is_empty() || parts.len() > 3 {
        return Err(invalid());
    }

    let part = |idx: usize| parts.get(idx).copied().unwrap_or(0);
    let normalized = semver::Version::new(part(0), part(1), part(2));
    Ok(normalized.to_string())
}

/// Parse a full list of declarations.
///
/// The first malformed declaration aborts the whole list; no partial result is returned.
pub fn parse_dependencies<S: AsRef<str>>(declarations: &[S]) -> Result<Vec<Dependency>> {
    let mut dependencies = Vec::with_capacity(declarations.len());
    for declaration in declarations {
        if let Some(dependency) = Dependency::parse(declaration.as_ref())? {
            dependencies.push(dependency);
        }
    }
    Ok(dependencies)
}
