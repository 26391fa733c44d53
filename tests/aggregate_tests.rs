//! Tests for totals and crafting-time reduction.

use craftplan::aggregate::{flatten_to_totals, total_crafting_time, Calculation};
use craftplan::catalog::CatalogView;
use craftplan::engine::expand;
use craftplan::models::{ExpansionNode, Recipe, RecipeVariant};
use craftplan::variants::VariantPreferences;
use indexmap::IndexMap;

fn expand_in(recipes: &IndexMap<String, Recipe>, item: &str, qty: u64) -> ExpansionNode {
    expand(item, qty, &CatalogView::from_recipes(recipes), &VariantPreferences::default())
        .expect("expand")
}

#[test]
fn test_base_material_is_its_own_total() {
    let totals = flatten_to_totals(&ExpansionNode::base("Stone", 9));
    assert_eq!(totals.len(), 1);
    assert_eq!(totals["Stone"], 9);
}

#[test]
fn test_diamond_sums_shared_material() {
    let mut recipes = IndexMap::new();
    recipes.insert("Lamp".to_string(), Recipe::single(1, [("Frame", 1), ("Wick", 2)]));
    recipes.insert("Frame".to_string(), Recipe::single(1, [("Iron", 3)]));
    recipes.insert("Wick".to_string(), Recipe::single(1, [("Iron", 1), ("Fiber", 2)]));

    let totals = flatten_to_totals(&expand_in(&recipes, "Lamp", 2));

    let order: Vec<&str> = totals.keys().map(String::as_str).collect();
    assert_eq!(order, vec!["Iron", "Fiber"]);
    assert_eq!(totals["Iron"], 6 + 4);
    assert_eq!(totals["Fiber"], 8);
}

#[test]
fn test_totals_use_actual_quantities() {
    let mut recipes = IndexMap::new();
    recipes.insert("Rope".to_string(), Recipe::single(1, [("Thread", 3)]));
    recipes.insert("Thread".to_string(), Recipe::single(4, [("Fiber", 1)]));

    // 3 thread needs one craft of 4, which uses one fiber.
    let totals = flatten_to_totals(&expand_in(&recipes, "Rope", 1));
    assert_eq!(totals["Fiber"], 1);
    assert!(!totals.contains_key("Thread"));
}

#[test]
fn test_crafting_time_sums_every_node() {
    let mut recipes = IndexMap::new();
    recipes.insert(
        "Sword".to_string(),
        Recipe::from(RecipeVariant::new(1, [("Blade", 1), ("Hilt", 1)]).with_crafting_time(0.5)),
    );
    recipes.insert(
        "Blade".to_string(),
        Recipe::from(RecipeVariant::new(1, [("Steel", 2)]).with_crafting_time(1.0)),
    );
    recipes.insert("Hilt".to_string(), Recipe::single(1, [("Wood", 1)]));

    let tree = expand_in(&recipes, "Sword", 2);
    assert_eq!(total_crafting_time(&tree), 2.0 * 0.5 + 2.0 * 1.0);
}

#[test]
fn test_calculation_from_tree() {
    let mut recipes = IndexMap::new();
    recipes.insert(
        "Plank".to_string(),
        Recipe::from(RecipeVariant::new(4, [("Log", 1)]).with_crafting_time(0.25)),
    );

    let calc = Calculation::from_tree(expand_in(&recipes, "Plank", 10));
    assert_eq!(calc.tree.actual_qty, 12);
    assert_eq!(calc.totals["Log"], 3);
    assert_eq!(calc.total_crafting_time, 0.75);
}

#[test]
fn test_crafted_item_without_ingredients_is_not_a_base_material() {
    // Imported catalogs are not validated, so a recipe may consume nothing.
    let mut recipes = IndexMap::new();
    recipes.insert("Bucket of Water".to_string(), Recipe::single(1, [("Water", 1)]));
    recipes.insert("Water".to_string(), Recipe::single(4, [] as [(&str, u32); 0]));

    let tree = expand_in(&recipes, "Bucket of Water", 2);
    let water = &tree.children[0];
    assert!(water.children.is_empty());
    assert!(!water.is_base());

    let totals = flatten_to_totals(&tree);
    assert!(totals.is_empty());
}
