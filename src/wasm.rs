//! WebAssembly bindings for craftplan.
//!
//! This module provides JavaScript-accessible functions for the calculator.
//! The host page owns fetching and storage: it passes the current recipe
//! collections and preferences in as JSON and persists whatever comes back.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::aggregate::Calculation;
use crate::catalog::RecipeCatalog;
use crate::data::parse_catalog_document;
use crate::display::format_duration;
use crate::engine::expand;
use crate::models::{ExpansionNode, Recipe};
use crate::validator::{find_cycles, validate_recipe as validate};
use crate::variants::VariantPreferences;

/// JavaScript-friendly catalog state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsCatalogInput {
    #[serde(default)]
    pub custom_recipes: IndexMap<String, Recipe>,
    #[serde(default)]
    pub imported_recipes: IndexMap<String, Recipe>,
    #[serde(default)]
    pub preferences: VariantPreferences,
}

impl JsCatalogInput {
    fn catalog(&self) -> RecipeCatalog {
        let mut catalog = RecipeCatalog::with_custom(self.custom_recipes.clone());
        catalog.replace_imported_catalog(self.imported_recipes.clone());
        catalog
    }
}

/// JavaScript-friendly input for a calculation.
#[derive(Debug, Clone, Deserialize)]
pub struct JsCalculateInput {
    #[serde(flatten)]
    pub catalog: JsCatalogInput,
    pub item: String,
    pub quantity: u64,
}

/// One base-material total.
#[derive(Debug, Clone, Serialize)]
pub struct JsTotal {
    pub item: String,
    pub quantity: u64,
}

/// JavaScript-friendly calculation result.
#[derive(Debug, Clone, Serialize, Default)]
pub struct JsCalculateResult {
    pub success: bool,
    pub error: Option<String>,
    pub tree: Option<ExpansionNode>,
    pub totals: Vec<JsTotal>,
    pub total_crafting_time_hours: f64,
    pub total_crafting_time_formatted: String,
}

/// JavaScript-friendly input for recipe validation.
#[derive(Debug, Clone, Deserialize)]
pub struct JsValidateInput {
    #[serde(flatten)]
    pub catalog: JsCatalogInput,
    pub name: String,
    pub recipe: Recipe,
}

/// JavaScript-friendly validation result.
///
/// On success `custom_recipes` is the updated custom mapping to persist.
#[derive(Debug, Clone, Serialize, Default)]
pub struct JsValidateResult {
    pub success: bool,
    pub error: Option<String>,
    pub key: Option<String>,
    pub custom_recipes: Option<IndexMap<String, Recipe>>,
}

/// JavaScript-friendly result of parsing a fetched catalog document.
#[derive(Debug, Clone, Serialize, Default)]
pub struct JsImportResult {
    pub success: bool,
    pub error: Option<String>,
    pub source_name: Option<String>,
    pub recipe_count: usize,
    pub recipes: IndexMap<String, Recipe>,
    pub cyclic_items: Vec<String>,
}

/// Mirrors an error returned to JavaScript onto the browser console.
fn report(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    tracing::warn!("{message}");
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Expand an item and return its breakdown tree, totals and crafting time.
///
/// Takes a JSON string input and returns a JSON string result.
#[wasm_bindgen]
pub fn calculate(input_json: &str) -> String {
    let input: JsCalculateInput = match serde_json::from_str(input_json) {
        Ok(i) => i,
        Err(e) => {
            let message = format!("Invalid input: {}", e);
            report(&message);
            return to_json(&JsCalculateResult {
                error: Some(message),
                total_crafting_time_formatted: format_duration(0.0),
                ..Default::default()
            });
        }
    };

    let catalog = input.catalog.catalog();
    let view = catalog.merged_view();
    match expand(&input.item, input.quantity, &view, &input.catalog.preferences) {
        Ok(tree) => {
            let calculation = Calculation::from_tree(tree);
            to_json(&JsCalculateResult {
                success: true,
                error: None,
                totals: calculation
                    .totals
                    .iter()
                    .map(|(item, quantity)| JsTotal {
                        item: item.clone(),
                        quantity: *quantity,
                    })
                    .collect(),
                total_crafting_time_hours: calculation.total_crafting_time,
                total_crafting_time_formatted: format_duration(calculation.total_crafting_time),
                tree: Some(calculation.tree),
            })
        }
        Err(e) => {
            let message = e.to_string();
            report(&message);
            to_json(&JsCalculateResult {
                error: Some(message),
                total_crafting_time_formatted: format_duration(0.0),
                ..Default::default()
            })
        }
    }
}

/// Check a candidate custom recipe against the current catalog.
///
/// On success the result carries the custom recipe mapping with the recipe
/// added, ready to be stored by the page.
#[wasm_bindgen]
pub fn validate_recipe(input_json: &str) -> String {
    let input: JsValidateInput = match serde_json::from_str(input_json) {
        Ok(i) => i,
        Err(e) => {
            let message = format!("Invalid input: {}", e);
            report(&message);
            return to_json(&JsValidateResult {
                error: Some(message),
                ..Default::default()
            });
        }
    };

    let name = input.name.trim();
    let catalog = input.catalog.catalog();
    match validate(name, &input.recipe, &catalog) {
        Ok(()) => {
            let key = catalog.merged_key(name);
            let mut custom_recipes = input.catalog.custom_recipes;
            custom_recipes.insert(name.to_string(), input.recipe);
            to_json(&JsValidateResult {
                success: true,
                error: None,
                key: Some(key),
                custom_recipes: Some(custom_recipes),
            })
        }
        Err(e) => {
            let message = e.to_string();
            report(&message);
            to_json(&JsValidateResult {
                error: Some(message),
                ..Default::default()
            })
        }
    }
}

/// Get every selectable item name as a JSON array.
#[wasm_bindgen]
pub fn list_items(input_json: &str) -> String {
    let input: JsCatalogInput = match serde_json::from_str(input_json) {
        Ok(i) => i,
        Err(e) => {
            report(&format!("Invalid input: {}", e));
            return "[]".to_string();
        }
    };
    let catalog = input.catalog();
    to_json(&catalog.merged_view().item_names())
}

/// Get every ingredient name across all recipes as a JSON array.
#[wasm_bindgen]
pub fn list_ingredients(input_json: &str) -> String {
    let input: JsCatalogInput = match serde_json::from_str(input_json) {
        Ok(i) => i,
        Err(e) => {
            report(&format!("Invalid input: {}", e));
            return "[]".to_string();
        }
    };
    let catalog = input.catalog();
    to_json(&catalog.merged_view().ingredient_names())
}

/// Parse a fetched `<sourceId>.json` document into an imported recipe map.
///
/// A failed parse reports an error and returns no recipes, so the page keeps
/// whatever catalog it had.
#[wasm_bindgen]
pub fn parse_catalog(document_json: &str) -> String {
    match parse_catalog_document(document_json) {
        Ok(document) => {
            let mut catalog = RecipeCatalog::default();
            catalog.replace_imported_catalog(document.recipes);
            let cyclic_items = find_cycles(&catalog.merged_view());
            to_json(&JsImportResult {
                success: true,
                error: None,
                source_name: Some(document.game_info.name),
                recipe_count: catalog.imported().len(),
                recipes: catalog.imported().clone(),
                cyclic_items,
            })
        }
        Err(e) => {
            let message = e.to_string();
            report(&message);
            to_json(&JsImportResult {
                error: Some(message),
                ..Default::default()
            })
        }
    }
}

/// Get the version of the calculator.
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
