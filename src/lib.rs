//! # Craftplan
//!
//! A command-line tool and library for working out what it takes to craft an item.
//!
//! Given a catalog of recipes, each turning a set of ingredients into some
//! quantity of an output item, and a desired quantity of a target item, this
//! crate computes:
//!
//! - The base materials required, summed across the whole recipe tree
//! - A hierarchical breakdown of every intermediate craft
//! - Whole-craft batching, with any excess production surfaced
//! - The total crafting time, when recipes record one
//!
//! ## Modules
//!
//! - [`models`] - Recipes, variants and the expansion tree
//! - [`catalog`] - Custom and imported recipe collections and their merged view
//! - [`variants`] - Variant normalization and preference resolution
//! - [`validator`] - Recipe validation and dependency-cycle detection
//! - [`engine`] - Recursive recipe expansion
//! - [`aggregate`] - Base-material totals and crafting-time sums
//! - [`display`] - Output formatting and display utilities
//! - [`data`] - Imported catalog documents and where to load them from
//! - [`store`] - Key-value persistence
//! - [`session`] - The stateful operations a front end calls
//! - [`error`] - Error types
//! - [`wasm`] - JSON-in/JSON-out WebAssembly bindings
//!
//! ## Example Usage
//!
//! ```
//! use craftplan::{
//!     models::Recipe,
//!     session::CraftingSession,
//!     store::MemoryStore,
//! };
//!
//! let mut session = CraftingSession::open(MemoryStore::new()).unwrap();
//! session.add_recipe("Plank", Recipe::single(4, [("Log", 1)])).unwrap();
//! session.add_recipe("Chest", Recipe::single(1, [("Plank", 8)])).unwrap();
//!
//! let calc = session.calculate("Chest", 3).unwrap();
//! assert_eq!(calc.totals["Log"], 6);
//! ```
//!
//! ## Catalog Merging
//!
//! Recipes come from two places:
//!
//! 1. **Imported**: a per-game catalog document, replaced wholesale when the
//!    selected source changes.
//!
//! 2. **Custom**: recipes the user writes. A custom recipe named like an
//!    imported one is listed as `"<name> (Custom)"`; both stay selectable.

pub mod aggregate;
pub mod catalog;
pub mod data;
pub mod display;
pub mod engine;
pub mod error;
pub mod models;
pub mod session;
pub mod store;
pub mod validator;
pub mod variants;
pub mod wasm;

pub use error::Error;
