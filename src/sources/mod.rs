/*!
 * Script source implementations.
 *
 * A source is a site that hosts screenplay texts. The trait keeps the
 * controller independent of any one site's page layout; the IMSDb
 * implementation is the only production source right now, and tests
 * substitute an in-memory one.
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::SourceError;

/// One title as listed on a source's index pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleListing {
    /// Display title, as the site spells it
    pub title: String,
    /// Site-relative path of the title's detail page
    pub detail_path: String,
}

impl TitleListing {
    pub fn new(title: impl Into<String>, detail_path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail_path: detail_path.into(),
        }
    }
}

/// Detail-page information for one title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleDetail {
    /// Display title
    pub title: String,
    /// Site-relative path of the script page itself
    pub script_path: String,
}

/// Common trait for all screenplay sources
///
/// This trait defines the interface that all source implementations must
/// follow, allowing the controller and tests to swap them freely.
#[async_trait]
pub trait ScriptSource: Send + Sync + Debug {
    /// Human-readable source name for logs and errors
    fn name(&self) -> &str;

    /// Fetch the complete title listing from the source's index pages
    ///
    /// # Returns
    /// * `Result<Vec<TitleListing>, SourceError>` - All listed titles, or an error
    async fn fetch_listing(&self) -> Result<Vec<TitleListing>, SourceError>;

    /// Resolve a listing to its script page
    ///
    /// # Arguments
    /// * `listing` - The title to resolve
    ///
    /// # Returns
    /// * `Result<TitleDetail, SourceError>` - The script location, or an error.
    ///   A title listed without an actual script yields `ScriptUnavailable`.
    async fn fetch_detail(&self, listing: &TitleListing) -> Result<TitleDetail, SourceError>;

    /// Fetch the raw script markup for a resolved title
    ///
    /// The returned text is the extracted script block, markup included;
    /// annotation relies on the bold tags and line structure being intact.
    async fn fetch_script(&self, detail: &TitleDetail) -> Result<String, SourceError>;
}

pub mod imsdb;
pub mod page_cache;

pub use self::imsdb::ImsdbSource;
pub use self::page_cache::PageCache;
