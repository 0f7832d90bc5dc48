//! Data-driven content definitions and loaders.
//!
//! This crate houses the bundled hexball content and the loaders that read it:
//! - Card catalog (RON)
//! - Initial court layouts with rosters and decks (RON)
//! - Game configuration (TOML)
//!
//! Content is consumed through the core's `CardCatalog` oracle and never
//! appears in game state beyond card slugs.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{CatalogLoader, ConfigLoader, ContentFactory, LayoutLoader, LoadResult};

/// Directory holding the bundled data files.
pub const DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data");
