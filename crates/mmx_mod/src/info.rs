//! `info.json` mod descriptors.

use crate::dependency::parse_dependencies;
use crate::error::{Error, Result};
use crate::Mod;
use serde::{Deserialize, Serialize};

/// The contents of a mod's `info.json` file.
///
/// Only the fields relevant to export are modelled; unknown fields are ignored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ModInfo {
    /// Internal name of the mod, unique across all mods.
    ///
    /// Example: `angelsrefining`
    pub name: String,

    /// Version of the mod.
    ///
    /// Example: `0.12.4`
    pub version: String,

    /// Display title of the mod.
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub author: String,

    #[serde(default)]
    pub description: String,

    /// Dependency declarations, e.g. `["base >= 1.1", "? bobplates"]`.
    /// Defaults to `["base"]` when absent.
    #[serde(default = "default_dependencies")]
    pub dependencies: Vec<String>,
}

fn default_dependencies() -> Vec<String> {
    vec!["base".to_string()]
}

impl ModInfo {
    /// Parse an `info.json` document.
    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Convert into a [`Mod`] at the given load order position.
    ///
    /// Fails if any dependency declaration is malformed; the error names the mod.
    pub fn into_mod(self, order: u32) -> Result<Mod> {
        let dependencies =
            parse_dependencies(&self.dependencies).map_err(|source| Error::ModDependencies {
                mod_name: self.name.clone(),
                source: Box::new(source),
            })?;

        Ok(Mod {
            name: self.name,
            version: self.version,
            title: self.title,
            author: self.author,
            description: self.description,
            order,
            dependencies,
            combinations: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dependency;

    #[test]
    fn test_json_parsing() {
        let info = ModInfo::from_json(include_str!("../test-data/info.json")).unwrap();
        assert_eq!(info.name, "angelsrefining");
        assert_eq!(info.version, "0.12.4");
        assert_eq!(info.dependencies.len(), 4);
    }

    #[test]
    fn test_default_dependencies() {
        let info = ModInfo::from_json(r#"{ "name": "tiny", "version": "1.0.0" }"#).unwrap();
        assert_eq!(info.dependencies, vec!["base".to_string()]);
        assert!(info.title.is_empty());
    }

    #[test]
    fn test_into_mod() {
        let info = ModInfo::from_json(include_str!("../test-data/info.json")).unwrap();
        let m = info.into_mod(3).unwrap();

        assert_eq!(m.order, 3);
        assert_eq!(
            m.dependencies,
            vec![
                Dependency::mandatory("base").with_version("1.1.0"),
                Dependency::optional("bobplates").with_version("1.1.0"),
                Dependency::optional("angelspetrochem"),
            ]
        );
    }

    #[test]
    fn test_into_mod_malformed() {
        let info = ModInfo {
            name: "broken".to_string(),
            version: "1.0.0".to_string(),
            title: String::new(),
            author: String::new(),
            description: String::new(),
            dependencies: vec!["base".to_string(), "? >= 1.0".to_string()],
        };

        let err = info.into_mod(0).unwrap_err();
        assert!(matches!(err, Error::ModDependencies { ref mod_name, .. } if mod_name == "broken"));
    }

    #[test]
    fn test_toml_equivalent() {
        let info: ModInfo = toml::from_str(
            r#"
            name = "tiny"
            version = "1.0.0"
            dependencies = ["base >= 1.0", "? other"]
            "#,
        )
        .unwrap();
        assert_eq!(info.dependencies.len(), 2);
    }
}
