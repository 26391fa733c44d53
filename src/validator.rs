//! Recipe validation and dependency-cycle detection.
//!
//! Custom recipes are checked against a hypothetical merged catalog that
//! already contains the candidate, so a recipe that closes a loop is caught
//! before it is committed.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::catalog::{CatalogView, RecipeCatalog};
use crate::error::ValidationError;
use crate::models::Recipe;
use crate::variants::normalize;

/// Returns true if a dependency path starting at `start_name` loops back onto itself.
///
/// Only back-edges into the current path count. An item reached again through
/// a different branch (a diamond) is fine. Items without a recipe end the
/// path, and every variant of a recipe is followed.
///
/// # Example
///
/// ```
/// use craftplan::catalog::CatalogView;
/// use craftplan::models::Recipe;
/// use craftplan::validator::has_cycle;
/// use indexmap::IndexMap;
///
/// let mut recipes = IndexMap::new();
/// recipes.insert("A".to_string(), Recipe::single(1, [("B", 1)]));
/// recipes.insert("B".to_string(), Recipe::single(1, [("A", 1)]));
///
/// assert!(has_cycle("A", &CatalogView::from_recipes(&recipes)));
/// ```
pub fn has_cycle(start_name: &str, catalog: &CatalogView<'_>) -> bool {
    let mut path = HashSet::new();
    visit(start_name, catalog, &mut path)
}

fn visit<'a>(name: &'a str, catalog: &CatalogView<'a>, path: &mut HashSet<&'a str>) -> bool {
    if path.contains(name) {
        debug!(item = name, "cycle closes here");
        return true;
    }

    let Some(recipe) = catalog.get(name) else {
        return false;
    };

    path.insert(name);
    let found = normalize(recipe).iter().any(|variant| {
        variant
            .ingredients
            .keys()
            .any(|ingredient| visit(ingredient, catalog, path))
    });
    path.remove(name);
    found
}

/// Every item of the view whose expansion runs into a cycle, in merge order.
pub fn find_cycles(catalog: &CatalogView<'_>) -> Vec<String> {
    catalog
        .item_names()
        .into_iter()
        .filter(|name| has_cycle(name, catalog))
        .map(str::to_string)
        .collect()
}

/// Checks a candidate custom recipe before it is written.
///
/// Rejects an empty name, an empty variant list, a variant without
/// ingredients, zero yields or amounts, negative or non-finite crafting times,
/// and any recipe that would introduce
/// a cycle into the merged catalog. `name` should already be trimmed.
pub fn validate_recipe(
    name: &str,
    recipe: &Recipe,
    catalog: &RecipeCatalog,
) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }

    let variants = normalize(recipe);
    if variants.is_empty() {
        return Err(ValidationError::NoVariants(name.to_string()));
    }

    for variant in variants {
        if variant.ingredients.is_empty() {
            return Err(ValidationError::NoIngredients {
                item: name.to_string(),
                variant: variant.name.clone(),
            });
        }
        if variant.produces == 0 {
            return Err(ValidationError::ZeroYield {
                item: name.to_string(),
                variant: variant.name.clone(),
            });
        }
        if let Some((ingredient, _)) = variant.ingredients.iter().find(|(_, amount)| **amount == 0)
        {
            return Err(ValidationError::ZeroAmount {
                item: name.to_string(),
                ingredient: ingredient.clone(),
            });
        }
        let hours = variant.crafting_time();
        if !(hours >= 0.0 && hours.is_finite()) {
            return Err(ValidationError::InvalidCraftingTime {
                item: name.to_string(),
                variant: variant.name.clone(),
            });
        }
    }

    let hypothetical = catalog.with_custom_recipe(name, recipe.clone());
    let key = hypothetical.merged_key(name);
    if has_cycle(&key, &hypothetical.merged_view()) {
        warn!(item = name, "rejecting recipe that would create a cycle");
        return Err(ValidationError::Cycle(name.to_string()));
    }

    Ok(())
}
