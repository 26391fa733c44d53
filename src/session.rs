//! A crafting session: the catalog, preferences and source selection, kept in
//! sync with a [`KeyValueStore`].
//!
//! Every write goes to the store first and is applied in memory only once it
//! has been persisted, so a failed operation leaves both sides as they were.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::aggregate::Calculation;
use crate::catalog::RecipeCatalog;
use crate::data::{CatalogDocument, CatalogSource};
use crate::engine::expand;
use crate::error::{Error, StoreError};
use crate::models::{Recipe, RecipeVariant};
use crate::store::{KeyValueStore, PREFERENCES_KEY, RECIPES_KEY, SELECTED_SOURCE_KEY};
use crate::validator::{find_cycles, validate_recipe};
use crate::variants::{normalize, VariantPreferences};

/// Reads and decodes a JSON entry. A corrupt entry is logged and treated as absent.
fn load_entry<S: KeyValueStore, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!(key, "ignoring unreadable stored entry: {err}");
            Ok(None)
        }
    }
}

/// The state behind every UI-facing operation.
pub struct CraftingSession<S: KeyValueStore> {
    store: S,
    catalog: RecipeCatalog,
    preferences: VariantPreferences,
    selected_source: Option<String>,
    source_name: Option<String>,
}

impl<S: KeyValueStore> CraftingSession<S> {
    /// Loads custom recipes, preferences and the source selection from `store`.
    ///
    /// The imported catalog starts empty; call [`Self::restore_source`] to
    /// reload the selected source.
    pub fn open(store: S) -> Result<Self, StoreError> {
        let custom: IndexMap<String, Recipe> = load_entry(&store, RECIPES_KEY)?.unwrap_or_default();
        let preferences: VariantPreferences =
            load_entry(&store, PREFERENCES_KEY)?.unwrap_or_default();
        let selected_source = store.get(SELECTED_SOURCE_KEY)?;

        info!(
            custom = custom.len(),
            preferences = preferences.len(),
            source = selected_source.as_deref().unwrap_or("none"),
            "opened crafting session"
        );

        Ok(Self {
            store,
            catalog: RecipeCatalog::with_custom(custom),
            preferences,
            selected_source,
            source_name: None,
        })
    }

    /// Both recipe collections.
    pub fn catalog(&self) -> &RecipeCatalog {
        &self.catalog
    }

    /// Stored variant preferences.
    pub fn preferences(&self) -> &VariantPreferences {
        &self.preferences
    }

    /// Id of the selected imported source, if any.
    pub fn selected_source(&self) -> Option<&str> {
        self.selected_source.as_deref()
    }

    /// Game name reported by the loaded source document.
    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates and saves a custom recipe under `name` (trimmed).
    ///
    /// A rejected recipe is never written.
    pub fn add_recipe(&mut self, name: &str, recipe: Recipe) -> Result<(), Error> {
        let name = name.trim();
        validate_recipe(name, &recipe, &self.catalog)?;

        let mut updated = self.catalog.custom().clone();
        updated.insert(name.to_string(), recipe.clone());
        self.persist_recipes(&updated)?;

        self.catalog.upsert_custom_recipe(name, recipe);
        info!(item = name, "saved custom recipe");
        Ok(())
    }

    /// Adds a variant to the custom recipe `name`, or replaces the variant with
    /// the same label. Creates the recipe if it does not exist yet.
    pub fn upsert_variant(&mut self, name: &str, variant: RecipeVariant) -> Result<(), Error> {
        let mut variants = self
            .catalog
            .custom()
            .get(name.trim())
            .map(|recipe| normalize(recipe).to_vec())
            .unwrap_or_default();

        match variants.iter_mut().find(|existing| existing.name == variant.name) {
            Some(existing) => *existing = variant,
            None => variants.push(variant),
        }

        let recipe = if variants.len() == 1 {
            Recipe::SingleVariant(variants.remove(0))
        } else {
            Recipe::MultiVariant { variants }
        };
        self.add_recipe(name, recipe)
    }

    /// Deletes a custom recipe. Returns false if there was none by that name.
    pub fn remove_recipe(&mut self, name: &str) -> Result<bool, Error> {
        if !self.catalog.custom().contains_key(name) {
            return Ok(false);
        }

        let mut updated = self.catalog.custom().clone();
        updated.shift_remove(name);
        self.persist_recipes(&updated)?;

        self.catalog.remove_custom_recipe(name);
        info!(item = name, "deleted custom recipe");
        Ok(true)
    }

    /// Stores the preferred variant index for `item_name`.
    pub fn set_preference(&mut self, item_name: &str, idx: usize) -> Result<(), Error> {
        let mut updated = self.preferences.clone();
        updated.set(item_name, idx);
        let serialised = serde_json::to_string(&updated).map_err(StoreError::from)?;
        self.store.set(PREFERENCES_KEY, &serialised)?;
        self.preferences = updated;
        Ok(())
    }

    /// Switches the imported catalog to `source_id`, or drops it for `None`.
    ///
    /// Returns the number of imported recipes now installed. If the document
    /// cannot be loaded the previous catalog and selection are kept.
    pub fn select_source<C: CatalogSource + ?Sized>(
        &mut self,
        source_id: Option<&str>,
        source: &C,
    ) -> Result<usize, Error> {
        let Some(source_id) = source_id else {
            self.store.remove(SELECTED_SOURCE_KEY)?;
            self.catalog.clear_imported();
            self.selected_source = None;
            self.source_name = None;
            info!("using custom recipes only");
            return Ok(0);
        };

        let document = source.fetch(source_id)?;
        self.store.set(SELECTED_SOURCE_KEY, source_id)?;
        self.selected_source = Some(source_id.to_string());
        Ok(self.install(document))
    }

    /// Reloads the persisted source selection, if there is one.
    pub fn restore_source<C: CatalogSource + ?Sized>(&mut self, source: &C) -> Result<usize, Error> {
        let Some(source_id) = self.selected_source.clone() else {
            return Ok(0);
        };
        let document = source.fetch(&source_id)?;
        Ok(self.install(document))
    }

    fn install(&mut self, document: CatalogDocument) -> usize {
        let count = document.recipes.len();
        self.catalog.replace_imported_catalog(document.recipes);
        info!(
            source = %document.game_info.name,
            recipes = count,
            "loaded recipes"
        );
        self.source_name = Some(document.game_info.name);

        let cyclic = find_cycles(&self.catalog.merged_view());
        if !cyclic.is_empty() {
            warn!(items = ?cyclic, "imported catalog contains dependency cycles");
        }
        count
    }

    /// Every selectable item: the keys of the merged view.
    pub fn item_names(&self) -> Vec<String> {
        self.catalog
            .merged_view()
            .item_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Every ingredient name across all recipes, for autocompletion.
    pub fn ingredient_names(&self) -> Vec<String> {
        self.catalog
            .merged_view()
            .ingredient_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Expands `item_name` for `quantity` units and reduces the tree.
    pub fn calculate(&self, item_name: &str, quantity: u64) -> Result<Calculation, Error> {
        let view = self.catalog.merged_view();
        let tree = expand(item_name, quantity, &view, &self.preferences)?;
        Ok(Calculation::from_tree(tree))
    }

    fn persist_recipes(&mut self, recipes: &IndexMap<String, Recipe>) -> Result<(), StoreError> {
        let serialised = serde_json::to_string(recipes)?;
        self.store.set(RECIPES_KEY, &serialised)
    }
}
