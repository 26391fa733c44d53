//! Data models and structures for craftplan.
//!
//! This module contains the core data structures used throughout the crate:
//! recipes and their variants, ingredient requirements, and the expansion tree
//! produced by [`crate::engine::expand`].

use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Label given to the implicit variant of a single-variant recipe.
pub const DEFAULT_VARIANT_NAME: &str = "Default";

/// Ingredient requirements of one craft: item name to amount consumed.
///
/// Iteration order is insertion order, which is the order ingredients were
/// authored or appeared in the source document.
pub type Ingredients = IndexMap<String, u32>;

fn default_variant_name() -> String {
    DEFAULT_VARIANT_NAME.to_string()
}

/// Free-form metadata attached to a variant by imported catalogs.
///
/// Only `craftingTime` is interpreted; every other key is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeMetadata {
    /// Hours per craft, as older catalog documents record it.
    #[serde(
        rename = "craftingTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub crafting_time: Option<f64>,
    /// Uninterpreted keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One way of producing an item.
///
/// # Example
///
/// ```
/// use craftplan::models::RecipeVariant;
///
/// let planks = RecipeVariant::new(4, [("Log", 1)]).with_crafting_time(0.25);
///
/// assert_eq!(planks.name, "Default");
/// assert_eq!(planks.produces, 4);
/// assert_eq!(planks.ingredients["Log"], 1);
/// assert_eq!(planks.crafting_time(), 0.25);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeVariant {
    /// Display label (e.g. "Default", "Sawmill")
    #[serde(default = "default_variant_name")]
    pub name: String,
    /// Units output per craft
    pub produces: u32,
    /// Amounts consumed per craft
    #[serde(default)]
    pub ingredients: Ingredients,
    /// Hours consumed per craft, independent of how much is crafted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crafting_time: Option<f64>,
    /// Extra data carried by imported catalogs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RecipeMetadata>,
}

impl RecipeVariant {
    /// Creates a variant labeled [`DEFAULT_VARIANT_NAME`] with no crafting time.
    pub fn new<I, S>(produces: u32, ingredients: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        Self {
            name: default_variant_name(),
            produces,
            ingredients: ingredients
                .into_iter()
                .map(|(name, amount)| (name.into(), amount))
                .collect(),
            crafting_time: None,
            metadata: None,
        }
    }

    /// Replaces the display label.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the hours consumed per craft.
    pub fn with_crafting_time(mut self, hours: f64) -> Self {
        self.crafting_time = Some(hours);
        self
    }

    /// Hours per craft: the explicit field, else `metadata.craftingTime`, else 0.
    pub fn crafting_time(&self) -> f64 {
        self.crafting_time
            .or_else(|| self.metadata.as_ref().and_then(|m| m.crafting_time))
            .unwrap_or(0.0)
    }
}

/// A recipe for one item: either a single implicit variant or several named ones.
///
/// In JSON, an object with a `variants` array is multi-variant; any other
/// object is read as a single variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Recipe {
    /// Several interchangeable production methods, in preference-index order.
    MultiVariant {
        /// The variants; at least one in a valid recipe.
        variants: Vec<RecipeVariant>,
    },
    /// The common case of exactly one way to craft.
    SingleVariant(RecipeVariant),
}

impl Recipe {
    /// Shorthand for a single-variant recipe.
    pub fn single<I, S>(produces: u32, ingredients: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        Recipe::SingleVariant(RecipeVariant::new(produces, ingredients))
    }

    /// Iterates over every ingredient name of every variant, duplicates included.
    pub fn ingredient_names(&self) -> impl Iterator<Item = &str> {
        crate::variants::normalize(self)
            .iter()
            .flat_map(|variant| variant.ingredients.keys().map(String::as_str))
    }
}

/// Every key either recipe shape may carry. `variants` decides the shape.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecipeFields {
    variants: Option<Vec<RecipeVariant>>,
    name: Option<String>,
    produces: Option<u32>,
    ingredients: Option<Ingredients>,
    crafting_time: Option<f64>,
    metadata: Option<RecipeMetadata>,
}

impl<'de> Deserialize<'de> for Recipe {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = RecipeFields::deserialize(deserializer)?;
        if let Some(variants) = fields.variants {
            return Ok(Recipe::MultiVariant { variants });
        }

        let produces = fields
            .produces
            .ok_or_else(|| <D::Error as de::Error>::missing_field("produces"))?;
        Ok(Recipe::SingleVariant(RecipeVariant {
            name: fields.name.unwrap_or_else(default_variant_name),
            produces,
            ingredients: fields.ingredients.unwrap_or_default(),
            crafting_time: fields.crafting_time,
            metadata: fields.metadata,
        }))
    }
}

impl From<RecipeVariant> for Recipe {
    fn from(variant: RecipeVariant) -> Self {
        Recipe::SingleVariant(variant)
    }
}

/// Which collection a merged-view entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeOrigin {
    /// Loaded from an imported source catalog; read-only.
    Imported,
    /// Authored by the user.
    Custom,
}

impl RecipeOrigin {
    /// True for recipes that came from an imported source.
    pub fn is_source_recipe(self) -> bool {
        self == RecipeOrigin::Imported
    }
}

/// Result of expanding one item for one requested quantity.
///
/// Built fresh by every [`crate::engine::expand`] call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionNode {
    /// Item name
    pub name: String,
    /// Quantity demanded by the parent (or the caller, at the root)
    pub requested_qty: u64,
    /// Number of crafts run; 0 for base materials
    pub crafts_performed: u64,
    /// Units per craft of the selected variant; 1 for base materials
    pub produces_per_craft: u32,
    /// Quantity actually obtained after rounding up to whole crafts
    pub actual_qty: u64,
    /// Hours spent on this node's own crafts
    pub crafting_time_total: f64,
    /// Label of the variant used; `None` for base materials
    pub selected_variant_name: Option<String>,
    /// One node per ingredient of the selected variant
    pub children: Vec<ExpansionNode>,
}

impl ExpansionNode {
    /// A base-material leaf: no recipe, taken exactly as requested.
    pub fn base(name: impl Into<String>, requested_qty: u64) -> Self {
        Self {
            name: name.into(),
            requested_qty,
            crafts_performed: 0,
            produces_per_craft: 1,
            actual_qty: requested_qty,
            crafting_time_total: 0.0,
            selected_variant_name: None,
            children: Vec::new(),
        }
    }

    /// True when the item has no recipe in the catalog.
    pub fn is_base(&self) -> bool {
        self.selected_variant_name.is_none()
    }

    /// Surplus produced by rounding up to whole crafts.
    pub fn excess(&self) -> u64 {
        self.actual_qty.saturating_sub(self.requested_qty)
    }
}
