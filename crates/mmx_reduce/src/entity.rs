//! Exported entities.
//!
//! Icons are identified by their content only. Items, machines and recipes carry an
//! identity (see [`IdentifiedEntity::identifier`]) that stays the same across
//! combinations while their content may differ, which is what reduction diffs on.

use crate::registry::{EntityRegistries, EntityRegistry};
use mmx_combination::{ContentHash, EntityKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Translations keyed by locale, e.g. `"en" -> "Iron plate"`.
pub type Translations = BTreeMap<String, String>;

/// An entity stored in one of the [`EntityRegistries`].
pub trait Entity: Serialize + DeserializeOwned + Clone + fmt::Debug + 'static {
    const KIND: EntityKind;

    fn registry(registries: &EntityRegistries) -> &EntityRegistry<Self>;

    fn registry_mut(registries: &mut EntityRegistries) -> &mut EntityRegistry<Self>;
}

/// An entity with an identity that can be diffed against a parent's version of itself.
pub trait IdentifiedEntity: Entity {
    /// Identity of the entity, unique per kind within one combination.
    fn identifier(&self) -> String;

    /// A copy of `self` with every field equal to `parent`'s cleared.
    ///
    /// Cleared fields mean "inherit from parent". Identity fields are always kept.
    ///
    /// Removals are not representable: a field or locale the parent has but `self`
    /// lacks is also absent from the result, so it reads as inherited again.
    fn reduce_from(&self, parent: &Self) -> Self;
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ItemType {
    Item,
    Fluid,
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemType::Item => f.write_str("item"),
            ItemType::Fluid => f.write_str("fluid"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum RecipeMode {
    Normal,
    Expensive,
}

impl fmt::Display for RecipeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeMode::Normal => f.write_str("normal"),
            RecipeMode::Expensive => f.write_str("expensive"),
        }
    }
}

/// RGBA tint, each channel in `0.0..=1.0`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IconLayer {
    pub file_name: String,
    #[serde(default)]
    pub offset_x: i32,
    #[serde(default)]
    pub offset_y: i32,
    pub scale: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tint: Option<Color>,
}

/// A rendered icon, described by its layers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Icon {
    pub size: u32,
    pub layers: Vec<IconLayer>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub name: String,
    #[serde(default)]
    pub labels: Translations,
    #[serde(default)]
    pub descriptions: Translations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_hash: Option<ContentHash>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MachineData {
    pub crafting_categories: Vec<String>,
    pub crafting_speed: f64,
    #[serde(default)]
    pub item_slots: u32,
    #[serde(default)]
    pub fluid_input_slots: u32,
    #[serde(default)]
    pub fluid_output_slots: u32,
    #[serde(default)]
    pub module_slots: u32,
    pub energy_usage: f64,
    pub energy_usage_unit: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub name: String,
    #[serde(default)]
    pub labels: Translations,
    #[serde(default)]
    pub descriptions: Translations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_hash: Option<ContentHash>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<MachineData>,
}

/// One ingredient or product of a recipe.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeEntry {
    #[serde(rename = "type")]
    pub entry_type: ItemType,
    pub name: String,
    pub amount: f64,
    #[serde(default = "default_probability")]
    pub probability: f64,
}

fn default_probability() -> f64 {
    1.0
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeData {
    pub crafting_time: f64,
    pub crafting_category: String,
    pub ingredients: Vec<RecipeEntry>,
    pub products: Vec<RecipeEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    pub mode: RecipeMode,
    #[serde(default)]
    pub labels: Translations,
    #[serde(default)]
    pub descriptions: Translations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_hash: Option<ContentHash>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RecipeData>,
}

/// Keep only the locales whose text differs from the parent's.
fn reduce_translations(translations: &Translations, parent: &Translations) -> Translations {
    translations
        .iter()
        .filter(|(locale, text)| parent.get(*locale) != Some(*text))
        .map(|(locale, text)| (locale.clone(), text.clone()))
        .collect()
}

fn reduce_value<T: Clone + PartialEq>(value: &Option<T>, parent: &Option<T>) -> Option<T> {
    if value == parent {
        None
    } else {
        value.clone()
    }
}

impl Entity for Icon {
    const KIND: EntityKind = EntityKind::Icon;

    fn registry(registries: &EntityRegistries) -> &EntityRegistry<Self> {
        &registries.icons
    }

    fn registry_mut(registries: &mut EntityRegistries) -> &mut EntityRegistry<Self> {
        &mut registries.icons
    }
}

impl Entity for Item {
    const KIND: EntityKind = EntityKind::Item;

    fn registry(registries: &EntityRegistries) -> &EntityRegistry<Self> {
        &registries.items
    }

    fn registry_mut(registries: &mut EntityRegistries) -> &mut EntityRegistry<Self> {
        &mut registries.items
    }
}

impl IdentifiedEntity for Item {
    fn identifier(&self) -> String {
        format!("{}.{}", self.item_type, self.name)
    }

    fn reduce_from(&self, parent: &Self) -> Self {
        Self {
            item_type: self.item_type,
            name: self.name.clone(),
            labels: reduce_translations(&self.labels, &parent.labels),
            descriptions: reduce_translations(&self.descriptions, &parent.descriptions),
            icon_hash: reduce_value(&self.icon_hash, &parent.icon_hash),
        }
    }
}

impl Entity for Machine {
    const KIND: EntityKind = EntityKind::Machine;

    fn registry(registries: &EntityRegistries) -> &EntityRegistry<Self> {
        &registries.machines
    }

    fn registry_mut(registries: &mut EntityRegistries) -> &mut EntityRegistry<Self> {
        &mut registries.machines
    }
}

impl IdentifiedEntity for Machine {
    fn identifier(&self) -> String {
        self.name.clone()
    }

    fn reduce_from(&self, parent: &Self) -> Self {
        Self {
            name: self.name.clone(),
            labels: reduce_translations(&self.labels, &parent.labels),
            descriptions: reduce_translations(&self.descriptions, &parent.descriptions),
            icon_hash: reduce_value(&self.icon_hash, &parent.icon_hash),
            data: reduce_value(&self.data, &parent.data),
        }
    }
}

impl Entity for Recipe {
    const KIND: EntityKind = EntityKind::Recipe;

    fn registry(registries: &EntityRegistries) -> &EntityRegistry<Self> {
        &registries.recipes
    }

    fn registry_mut(registries: &mut EntityRegistries) -> &mut EntityRegistry<Self> {
        &mut registries.recipes
    }
}

impl IdentifiedEntity for Recipe {
    fn identifier(&self) -> String {
        format!("{}.{}", self.mode, self.name)
    }

    fn reduce_from(&self, parent: &Self) -> Self {
        Self {
            name: self.name.clone(),
            mode: self.mode,
            labels: reduce_translations(&self.labels, &parent.labels),
            descriptions: reduce_translations(&self.descriptions, &parent.descriptions),
            icon_hash: reduce_value(&self.icon_hash, &parent.icon_hash),
            data: reduce_value(&self.data, &parent.data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn translations(entries: &[(&str, &str)]) -> Translations {
        entries
            .iter()
            .map(|(locale, text)| (locale.to_string(), text.to_string()))
            .collect()
    }

    fn iron_plate() -> Item {
        Item {
            item_type: ItemType::Item,
            name: "iron-plate".to_string(),
            labels: translations(&[("en", "Iron plate"), ("de", "Eisenplatte")]),
            descriptions: translations(&[("en", "Smelted iron")]),
            icon_hash: Some(ContentHash::new(7)),
        }
    }

    #[test]
    fn test_item_identifier() {
        assert_eq!(iron_plate().identifier(), "item.iron-plate");
    }

    #[test]
    fn test_identical_item_reduces_to_identity() {
        let item = iron_plate();
        let reduced = item.reduce_from(&item);

        assert_eq!(reduced.name, "iron-plate");
        assert_eq!(reduced.item_type, ItemType::Item);
        assert!(reduced.labels.is_empty());
        assert!(reduced.descriptions.is_empty());
        assert_eq!(reduced.icon_hash, None);
    }

    #[test]
    fn test_item_keeps_differences() {
        let parent = iron_plate();
        let mut item = iron_plate();
        item.labels.insert("en".to_string(), "Refined iron plate".to_string());
        item.labels.insert("fr".to_string(), "Plaque de fer".to_string());
        item.icon_hash = Some(ContentHash::new(8));

        let reduced = item.reduce_from(&parent);
        assert_eq!(
            reduced.labels,
            translations(&[("en", "Refined iron plate"), ("fr", "Plaque de fer")])
        );
        assert!(reduced.descriptions.is_empty());
        assert_eq!(reduced.icon_hash, Some(ContentHash::new(8)));
    }

    #[test]
    fn test_removed_fields_read_as_inherited() {
        let parent = iron_plate();
        let mut item = iron_plate();
        item.labels.remove("de");
        item.icon_hash = None;

        let reduced = item.reduce_from(&parent);
        assert!(reduced.labels.is_empty());
        assert_eq!(reduced.icon_hash, None);
        assert_eq!(reduced, iron_plate().reduce_from(&parent));
    }

    #[test]
    fn test_recipe_data_cleared_only_when_equal() {
        let data = RecipeData {
            crafting_time: 3.2,
            crafting_category: "smelting".to_string(),
            ingredients: vec![RecipeEntry {
                entry_type: ItemType::Item,
                name: "iron-ore".to_string(),
                amount: 1.0,
                probability: 1.0,
            }],
            products: vec![RecipeEntry {
                entry_type: ItemType::Item,
                name: "iron-plate".to_string(),
                amount: 1.0,
                probability: 1.0,
            }],
        };
        let parent = Recipe {
            name: "iron-plate".to_string(),
            mode: RecipeMode::Normal,
            labels: Translations::new(),
            descriptions: Translations::new(),
            icon_hash: None,
            data: Some(data.clone()),
        };
        assert_eq!(parent.identifier(), "normal.iron-plate");
        assert_eq!(parent.reduce_from(&parent).data, None);

        let mut changed = parent.clone();
        if let Some(data) = changed.data.as_mut() {
            data.crafting_time = 6.4;
        }
        let reduced = changed.reduce_from(&parent);
        assert_eq!(reduced.data.map(|d| d.crafting_time), Some(6.4));
    }

    #[test]
    fn test_recipe_entry_default_probability() {
        let entry: RecipeEntry =
            serde_json::from_str(r#"{"type":"fluid","name":"water","amount":10.0}"#).unwrap();
        assert_eq!(entry.entry_type, ItemType::Fluid);
        assert_eq!(entry.probability, 1.0);
    }

    fn arb_translations() -> impl Strategy<Value = Translations> {
        proptest::collection::btree_map("(en|de|fr|ja)", "[a-c]{0,2}", 0..4)
    }

    proptest! {
        #[test]
        fn prop_reduced_labels_are_the_differences(
            labels in arb_translations(),
            parent_labels in arb_translations(),
        ) {
            let mut item = iron_plate();
            item.labels = labels.clone();
            let mut parent = iron_plate();
            parent.labels = parent_labels.clone();

            let reduced = item.reduce_from(&parent);
            for (locale, text) in &labels {
                let kept = reduced.labels.get(locale);
                if parent_labels.get(locale) == Some(text) {
                    prop_assert_eq!(kept, None);
                } else {
                    prop_assert_eq!(kept, Some(text));
                }
            }
            prop_assert!(reduced.labels.keys().all(|locale| labels.contains_key(locale)));
        }
    }
}
