//! The recipe catalog: user-authored recipes plus an imported source catalog.
//!
//! The two collections are kept apart and combined on demand into a
//! [`CatalogView`]. A custom recipe whose name collides with an imported one is
//! exposed under `"<name> (Custom)"` so neither entry is lost.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::models::{Recipe, RecipeOrigin};

/// Suffix appended to a custom recipe's key when an imported recipe has the same name.
pub const CUSTOM_SUFFIX: &str = " (Custom)";

/// Both recipe collections. Owned by the caller; validation and expansion only
/// ever see an immutable [`CatalogView`] derived from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeCatalog {
    custom: IndexMap<String, Recipe>,
    imported: IndexMap<String, Recipe>,
}

impl RecipeCatalog {
    /// Creates a catalog holding only user-authored recipes.
    pub fn with_custom(custom: IndexMap<String, Recipe>) -> Self {
        Self {
            custom,
            imported: IndexMap::new(),
        }
    }

    /// User-authored recipes, in insertion order.
    pub fn custom(&self) -> &IndexMap<String, Recipe> {
        &self.custom
    }

    /// Recipes from the active imported source, in document order.
    pub fn imported(&self) -> &IndexMap<String, Recipe> {
        &self.imported
    }

    /// Inserts or replaces a custom recipe. Callers validate first.
    pub fn upsert_custom_recipe(&mut self, name: impl Into<String>, recipe: Recipe) {
        let name = name.into();
        debug!(item = %name, "upserting custom recipe");
        self.custom.insert(name, recipe);
    }

    /// Removes a custom recipe. Imported recipes cannot be removed this way.
    pub fn remove_custom_recipe(&mut self, name: &str) -> Option<Recipe> {
        self.custom.shift_remove(name)
    }

    /// Swaps in a new imported catalog, leaving custom recipes untouched.
    pub fn replace_imported_catalog(&mut self, recipes: IndexMap<String, Recipe>) {
        info!(
            previous = self.imported.len(),
            current = recipes.len(),
            "replacing imported catalog"
        );
        self.imported = recipes;
    }

    /// Drops the imported catalog.
    pub fn clear_imported(&mut self) {
        self.imported.clear();
    }

    /// A copy of this catalog with one more custom recipe, for validating a
    /// candidate before it is committed.
    pub fn with_custom_recipe(&self, name: impl Into<String>, recipe: Recipe) -> Self {
        let mut hypothetical = self.clone();
        hypothetical.custom.insert(name.into(), recipe);
        hypothetical
    }

    /// Key under which the custom recipe `name` appears in the merged view.
    ///
    /// A name that collides with an imported recipe gets [`CUSTOM_SUFFIX`]. If
    /// that key is itself taken by another recipe, imported or custom, a
    /// counter is added (`"Wood (Custom 2)"`, `"Wood (Custom 3)"`, ...).
    pub fn merged_key(&self, name: &str) -> String {
        if !self.imported.contains_key(name) {
            return name.to_string();
        }

        let taken = |key: &str| self.imported.contains_key(key) || self.custom.contains_key(key);
        let mut key = format!("{name}{CUSTOM_SUFFIX}");
        let mut counter = 2;
        while taken(&key) {
            key = format!("{name} (Custom {counter})");
            counter += 1;
        }
        key
    }

    /// Combines both collections: imported entries first, then custom ones,
    /// renamed by [`Self::merged_key`] on collision. Every recipe of both
    /// collections gets its own key. Recomputed on every call.
    pub fn merged_view(&self) -> CatalogView<'_> {
        let mut entries = IndexMap::with_capacity(self.imported.len() + self.custom.len());
        for (name, recipe) in &self.imported {
            entries.insert(
                name.clone(),
                CatalogEntry {
                    recipe,
                    origin: RecipeOrigin::Imported,
                },
            );
        }
        for (name, recipe) in &self.custom {
            entries.insert(
                self.merged_key(name),
                CatalogEntry {
                    recipe,
                    origin: RecipeOrigin::Custom,
                },
            );
        }
        CatalogView { entries }
    }
}

/// A recipe as seen through the merged view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogEntry<'a> {
    /// The recipe itself.
    pub recipe: &'a Recipe,
    /// Collection it came from.
    pub origin: RecipeOrigin,
}

/// Read-only lookup table built by [`RecipeCatalog::merged_view`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogView<'a> {
    entries: IndexMap<String, CatalogEntry<'a>>,
}

impl<'a> CatalogView<'a> {
    /// Builds a view directly over a single mapping, treating every entry as custom.
    pub fn from_recipes(recipes: &'a IndexMap<String, Recipe>) -> Self {
        Self {
            entries: recipes
                .iter()
                .map(|(name, recipe)| {
                    (
                        name.clone(),
                        CatalogEntry {
                            recipe,
                            origin: RecipeOrigin::Custom,
                        },
                    )
                })
                .collect(),
        }
    }

    /// Recipe for `name`, if the item is craftable.
    pub fn get(&self, name: &str) -> Option<&'a Recipe> {
        self.entries.get(name).map(|entry| entry.recipe)
    }

    /// Full entry for `name`, including its origin.
    pub fn entry(&self, name: &str) -> Option<CatalogEntry<'a>> {
        self.entries.get(name).copied()
    }

    /// True if `name` has a recipe.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of resolvable items.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no item has a recipe.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every key of the view, in merge order. These are the selectable targets.
    pub fn item_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Every ingredient name across all variants of all recipes, deduplicated,
    /// in first-seen order. Used for autocompletion.
    pub fn ingredient_names(&self) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for entry in self.entries.values() {
            for ingredient in entry.recipe.ingredient_names() {
                if seen.insert(ingredient) {
                    names.push(ingredient);
                }
            }
        }
        names
    }

    /// Iterates over `(key, entry)` pairs in merge order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, CatalogEntry<'a>)> + '_ {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), *entry))
    }
}
