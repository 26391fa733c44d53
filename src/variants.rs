//! Variant normalization and preference-based resolution.
//!
//! A recipe may offer several interchangeable ways to craft an item. This
//! module turns every recipe into a uniform variant list and picks the one
//! the user prefers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::{Recipe, RecipeVariant};

/// Returns the recipe's variants in order.
///
/// A single-variant recipe yields a one-element slice containing its implicit
/// variant (labeled "Default" unless the author named it).
pub fn normalize(recipe: &Recipe) -> &[RecipeVariant] {
    match recipe {
        Recipe::MultiVariant { variants } => variants,
        Recipe::SingleVariant(variant) => std::slice::from_ref(variant),
    }
}

/// Picks the active variant for `item_name`.
///
/// The stored index is clamped into range, so a stale preference pointing past
/// the end selects the last variant. Returns `None` only for a recipe with an
/// empty variant list.
///
/// # Example
///
/// ```
/// use craftplan::models::{Recipe, RecipeVariant};
/// use craftplan::variants::{resolve, VariantPreferences};
///
/// let recipe = Recipe::MultiVariant {
///     variants: vec![
///         RecipeVariant::new(1, [("Ore", 2)]),
///         RecipeVariant::new(1, [("Scrap", 3)]).named("Alt"),
///     ],
/// };
/// let mut prefs = VariantPreferences::default();
/// prefs.set("Ingot", 5);
///
/// assert_eq!(resolve("Ingot", &recipe, &prefs).unwrap().name, "Alt");
/// ```
pub fn resolve<'a>(
    item_name: &str,
    recipe: &'a Recipe,
    preferences: &VariantPreferences,
) -> Option<&'a RecipeVariant> {
    let variants = normalize(recipe);
    let last = variants.len().checked_sub(1)?;
    let idx = preferences.get(item_name).unwrap_or(0).min(last);
    variants.get(idx)
}

/// Selected variant index per item name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantPreferences(IndexMap<String, usize>);

impl VariantPreferences {
    /// Stored index for `item_name`, unclamped.
    pub fn get(&self, item_name: &str) -> Option<usize> {
        self.0.get(item_name).copied()
    }

    /// Stores an index for future resolutions.
    pub fn set(&mut self, item_name: impl Into<String>, idx: usize) {
        self.0.insert(item_name.into(), idx);
    }

    /// Forgets the preference for `item_name`.
    pub fn remove(&mut self, item_name: &str) -> Option<usize> {
        self.0.shift_remove(item_name)
    }

    /// Number of items with a stored preference.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(item, index)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(name, idx)| (name.as_str(), *idx))
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for VariantPreferences {
    fn from_iter<T: IntoIterator<Item = (S, usize)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
