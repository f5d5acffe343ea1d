/*!
 * Storage module for persistent catalog data.
 *
 * This module provides SQLite-based persistence for:
 * - The title index fetched from the script source
 * - Raw script texts, so repeat annotations skip the network
 */

// Allow dead code - storage types are for library consumers
#![allow(dead_code)]

pub mod schema;
pub mod store;

// Re-export main types
pub use store::{Catalog, CatalogConnection, CatalogStats, ScriptRecord, TitleRecord};
