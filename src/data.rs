//! Imported recipe catalog loading.
//!
//! A recipe source is a JSON document named after its source id
//! (`<sourceId>.json`) holding some information about the game and a recipe
//! map. Loading either yields the whole document or an error; nothing is ever
//! partially applied.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::ImportFetchError;
use crate::models::Recipe;

/// Information about the game a catalog describes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Display name, e.g. "Minecraft"
    pub name: String,
    /// Any further fields (version, url, ...), kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A complete imported catalog document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    /// Game description
    pub game_info: SourceInfo,
    /// Recipes keyed by item name, in document order
    #[serde(deserialize_with = "deserialize_recipes")]
    pub recipes: IndexMap<String, Recipe>,
}

/// Reads the recipe map, naming the item whose entry fails to parse.
fn deserialize_recipes<'de, D>(deserializer: D) -> Result<IndexMap<String, Recipe>, D::Error>
where
    D: Deserializer<'de>,
{
    struct RecipesVisitor;

    impl<'de> Visitor<'de> for RecipesVisitor {
        type Value = IndexMap<String, Recipe>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map of item names to recipes")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut recipes = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(name) = map.next_key::<String>()? {
                let recipe = map.next_value::<Recipe>().map_err(|err| {
                    <A::Error as de::Error>::custom(format_args!(
                        "invalid recipe for \"{name}\": {err}"
                    ))
                })?;
                recipes.insert(name, recipe);
            }
            Ok(recipes)
        }
    }

    deserializer.deserialize_map(RecipesVisitor)
}

/// Something that can produce a catalog document for a source id.
///
/// The call blocks until the document is fully available or has failed.
pub trait CatalogSource {
    /// Loads the document for `source_id`.
    fn fetch(&self, source_id: &str) -> Result<CatalogDocument, ImportFetchError>;
}

/// Parses a catalog document from JSON text.
///
/// # Example
///
/// ```
/// use craftplan::data::parse_catalog_document;
///
/// let doc = parse_catalog_document(r#"{
///     "gameInfo": { "name": "Valheim" },
///     "recipes": {
///         "Wood Plank": { "produces": 2, "ingredients": { "Wood": 1 } }
///     }
/// }"#).unwrap();
///
/// assert_eq!(doc.game_info.name, "Valheim");
/// assert!(doc.recipes.contains_key("Wood Plank"));
/// ```
pub fn parse_catalog_document(json: &str) -> Result<CatalogDocument, ImportFetchError> {
    Ok(serde_json::from_str(json)?)
}

/// Rejects ids that could name a file outside the source directory.
fn check_source_id(source_id: &str) -> Result<(), ImportFetchError> {
    let invalid = source_id.is_empty()
        || source_id.contains(['/', '\\'])
        || source_id.contains("..")
        || source_id.trim() != source_id;
    if invalid {
        return Err(ImportFetchError::InvalidSourceId(source_id.to_string()));
    }
    Ok(())
}

/// Loads `<root>/<sourceId>.json` from a local directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Creates a source reading from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory documents are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document for `source_id`.
    pub fn document_path(&self, source_id: &str) -> Result<PathBuf, ImportFetchError> {
        check_source_id(source_id)?;
        Ok(self.root.join(format!("{source_id}.json")))
    }
}

impl CatalogSource for DirectorySource {
    fn fetch(&self, source_id: &str) -> Result<CatalogDocument, ImportFetchError> {
        let path = self.document_path(source_id)?;
        debug!(path = %path.display(), "reading recipe source");

        let content = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ImportFetchError::NotFound {
                    source_id: source_id.to_string(),
                    path: path.clone(),
                }
            } else {
                ImportFetchError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        parse_catalog_document(&content)
    }
}

/// Lists the source ids available in `dir`, sorted.
///
/// A missing directory has no sources. Entries that are not `.json` files are
/// skipped.
pub fn list_sources(dir: &Path) -> Result<Vec<String>, ImportFetchError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|source| ImportFetchError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut ids = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry in {}: {err}", dir.display());
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            ids.push(stem.to_string());
        }
    }

    ids.sort();
    Ok(ids)
}
