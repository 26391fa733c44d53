//! Error types for craftplan.
//!
//! Each failure domain has its own enum so callers can match on exactly the
//! cases they care about. [`Error`] wraps all of them for the session and CLI.

use std::path::PathBuf;

use thiserror::Error;

/// A recipe was rejected before it reached the catalog.
///
/// The catalog is always left unchanged when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The item name was empty or whitespace.
    #[error("item name required")]
    MissingName,

    /// A variant lists no ingredients.
    #[error("recipe for \"{item}\" needs at least one ingredient (variant \"{variant}\")")]
    NoIngredients {
        /// Item the recipe produces.
        item: String,
        /// Offending variant label.
        variant: String,
    },

    /// A multi-variant recipe with an empty variant list.
    #[error("recipe for \"{0}\" defines no variants")]
    NoVariants(String),

    /// A variant produces zero units per craft.
    #[error("variant \"{variant}\" of \"{item}\" must produce at least 1 unit per craft")]
    ZeroYield {
        /// Item the recipe produces.
        item: String,
        /// Offending variant label.
        variant: String,
    },

    /// An ingredient amount of zero.
    #[error("ingredient \"{ingredient}\" of \"{item}\" must have an amount of at least 1")]
    ZeroAmount {
        /// Item the recipe produces.
        item: String,
        /// Ingredient with the zero amount.
        ingredient: String,
    },

    /// A crafting time that is negative, infinite or NaN.
    #[error("variant \"{variant}\" of \"{item}\" has an invalid crafting time")]
    InvalidCraftingTime {
        /// Item the recipe produces.
        item: String,
        /// Label of the offending variant.
        variant: String,
    },

    /// Accepting the recipe would create a dependency cycle.
    #[error("cannot save recipe: \"{0}\" would create a circular dependency")]
    Cycle(String),
}

/// Loading an imported recipe catalog failed.
///
/// The previously imported catalog stays installed.
#[derive(Debug, Error)]
pub enum ImportFetchError {
    /// The source id could escape the source directory.
    #[error("invalid recipe source id \"{0}\"")]
    InvalidSourceId(String),

    /// No document exists for the source id.
    #[error("recipe source \"{source_id}\" not found at {}", path.display())]
    NotFound {
        /// Requested source id.
        source_id: String,
        /// Where the document was looked for.
        path: PathBuf,
    },

    /// The document could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Document path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The document is not a valid catalog.
    #[error("failed to parse recipe catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Expansion could not build a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpansionError {
    /// Recursion went deeper than [`crate::engine::MAX_EXPANSION_DEPTH`].
    ///
    /// Only reachable when a cycle entered the catalog without passing validation.
    #[error("expansion of \"{item}\" exceeded depth {depth}; the catalog likely contains a cycle")]
    DepthExceeded {
        /// Item being expanded when the limit was hit.
        item: String,
        /// The depth limit.
        depth: usize,
    },

    /// A recipe whose variant list is empty.
    #[error("recipe for \"{0}\" defines no variants")]
    NoVariants(String),

    /// Quantities grew past `u64::MAX`.
    #[error("quantity overflow while expanding \"{0}\"")]
    QuantityOverflow(String),
}

/// Reading or writing the persisted key-value store failed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File system failure.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        /// Store file path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A value could not be encoded.
    #[error("failed to serialize store entry: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The store file itself is unreadable JSON.
    #[error("store file {} is corrupt: {reason}", path.display())]
    Corrupt {
        /// Store file path.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },
}

/// Any failure surfaced by a [`crate::session::CraftingSession`].
#[derive(Debug, Error)]
pub enum Error {
    /// See [`ValidationError`].
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// See [`ImportFetchError`].
    #[error("error loading recipes: {0}")]
    Import(#[from] ImportFetchError),

    /// See [`ExpansionError`].
    #[error(transparent)]
    Expansion(#[from] ExpansionError),

    /// See [`StoreError`].
    #[error(transparent)]
    Store(#[from] StoreError),
}
