//! Recipe expansion: turns a target item and quantity into a tree of crafts.
//!
//! Every craft is whole, so a partial batch rounds up and may leave an excess.
//! Repeated ingredients in sibling branches are expanded independently; the
//! aggregator consolidates them afterwards.

use tracing::debug;

use crate::catalog::CatalogView;
use crate::error::ExpansionError;
use crate::models::ExpansionNode;
use crate::variants::{resolve, VariantPreferences};

/// Deepest recipe chain [`expand`] will follow.
///
/// Validated catalogs are acyclic, so hitting this means a cycle slipped in
/// through an unvalidated import or direct catalog edits.
pub const MAX_EXPANSION_DEPTH: usize = 64;

/// Expands `item_name` for `requested_qty` units.
///
/// Items without a recipe become base-material leaves. Otherwise the preferred
/// variant is resolved, `ceil(requested / produces)` crafts are performed, and
/// each ingredient is expanded for `amount * crafts` units, in ingredient order.
/// Ingredient names are looked up as written, so an ingredient that collides
/// with a custom recipe always resolves to the imported version.
///
/// # Example
///
/// ```
/// use craftplan::catalog::CatalogView;
/// use craftplan::engine::expand;
/// use craftplan::models::Recipe;
/// use craftplan::variants::VariantPreferences;
/// use indexmap::IndexMap;
///
/// let mut recipes = IndexMap::new();
/// recipes.insert("Plank".to_string(), Recipe::single(5, [("Log", 1)]));
///
/// let view = CatalogView::from_recipes(&recipes);
/// let tree = expand("Plank", 12, &view, &VariantPreferences::default()).unwrap();
///
/// assert_eq!(tree.crafts_performed, 3);
/// assert_eq!(tree.actual_qty, 15);
/// assert_eq!(tree.excess(), 3);
/// assert_eq!(tree.children[0].actual_qty, 3);
/// ```
pub fn expand(
    item_name: &str,
    requested_qty: u64,
    catalog: &CatalogView<'_>,
    preferences: &VariantPreferences,
) -> Result<ExpansionNode, ExpansionError> {
    expand_at(item_name, requested_qty, catalog, preferences, 0)
}

fn expand_at(
    item_name: &str,
    requested_qty: u64,
    catalog: &CatalogView<'_>,
    preferences: &VariantPreferences,
    depth: usize,
) -> Result<ExpansionNode, ExpansionError> {
    if depth > MAX_EXPANSION_DEPTH {
        return Err(ExpansionError::DepthExceeded {
            item: item_name.to_string(),
            depth: MAX_EXPANSION_DEPTH,
        });
    }

    let Some(recipe) = catalog.get(item_name) else {
        return Ok(ExpansionNode::base(item_name, requested_qty));
    };

    let variant = resolve(item_name, recipe, preferences)
        .ok_or_else(|| ExpansionError::NoVariants(item_name.to_string()))?;

    // Unvalidated imports may carry a zero yield; treat it as one per craft.
    let produces_per_craft = variant.produces.max(1);
    // Likewise a negative or non-finite crafting time counts as none.
    let hours_per_craft = Some(variant.crafting_time())
        .filter(|hours| hours.is_finite() && *hours > 0.0)
        .unwrap_or(0.0);
    let produces = u64::from(produces_per_craft);
    let crafts_performed = requested_qty.div_ceil(produces);
    let actual_qty = crafts_performed
        .checked_mul(produces)
        .ok_or_else(|| ExpansionError::QuantityOverflow(item_name.to_string()))?;

    debug!(
        item = item_name,
        variant = %variant.name,
        requested_qty,
        crafts_performed,
        "expanding"
    );

    let mut children = Vec::with_capacity(variant.ingredients.len());
    for (ingredient, per_craft) in &variant.ingredients {
        let need = u64::from(*per_craft)
            .checked_mul(crafts_performed)
            .ok_or_else(|| ExpansionError::QuantityOverflow(ingredient.clone()))?;
        children.push(expand_at(ingredient, need, catalog, preferences, depth + 1)?);
    }

    Ok(ExpansionNode {
        name: item_name.to_string(),
        requested_qty,
        crafts_performed,
        produces_per_craft,
        actual_qty,
        crafting_time_total: hours_per_craft * crafts_performed as f64,
        selected_variant_name: Some(variant.name.clone()),
        children,
    })
}
