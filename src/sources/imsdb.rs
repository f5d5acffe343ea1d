/*!
 * IMSDb source implementation.
 *
 * Scrapes the Internet Movie Script Database: alphabetical index pages
 * for the title listing, a detail page per title to find the script
 * link, and the script page itself. Extraction is regex-based on the few
 * stable anchors the site has kept for years; the script block is
 * returned markup-intact because annotation depends on the bold tags.
 */

use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, error, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use url::Url;

use super::page_cache::PageCache;
use super::{ScriptSource, TitleDetail, TitleListing};
use crate::app_config::SourceConfig;
use crate::errors::SourceError;

/// Index sections as the site groups them; "0" holds digit-led titles
const INDEX_SECTIONS: [&str; 27] = [
    "0", "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R",
    "S", "T", "U", "V", "W", "X", "Y", "Z",
];

static LISTING_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"href="(/Movie Scripts/[^"]+)"[^>]*>([^<]+)</a>"#)
        .expect("Invalid listing link regex")
});

static SCRIPT_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="(/scripts/[^"]+)""#).expect("Invalid script link regex"));

static SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<pre[^>]*>(.*)</pre>").expect("Invalid script block regex"));

/// Client for the IMSDb site
pub struct ImsdbSource {
    /// HTTP client for page requests
    client: Client,
    /// Site root, normally https://imsdb.com
    base_url: Url,
    /// Retries on server or network errors
    max_retries: u32,
    /// Base backoff in milliseconds, doubled per retry
    backoff_base_ms: u64,
    /// Concurrent index page fetches
    concurrent_requests: usize,
    /// Per-run page body cache
    cache: PageCache,
}

impl fmt::Debug for ImsdbSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImsdbSource")
            .field("base_url", &self.base_url.as_str())
            .field("max_retries", &self.max_retries)
            .field("concurrent_requests", &self.concurrent_requests)
            .finish()
    }
}

impl ImsdbSource {
    /// Create a source from configuration
    pub fn with_config(config: &SourceConfig) -> Result<Self, SourceError> {
        let base_url = Url::parse(&config.endpoint)
            .map_err(|e| SourceError::ParseError(format!("Invalid endpoint URL: {}", e)))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_default();

        Ok(Self {
            client,
            base_url,
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_ms,
            concurrent_requests: config.concurrent_requests.max(1),
            cache: PageCache::new(config.page_cache),
        })
    }

    /// Cache statistics for end-of-run reporting
    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    fn absolute(&self, path: &str) -> Result<Url, SourceError> {
        self.base_url
            .join(path)
            .map_err(|e| SourceError::ParseError(format!("Invalid path '{}': {}", path, e)))
    }

    /// Fetch one page body, with cache lookup and retry on server or
    /// network errors. Client errors are final.
    async fn fetch_page(&self, path: &str) -> Result<String, SourceError> {
        if let Some(cached) = self.cache.get(path) {
            return Ok(cached);
        }
        let url = self.absolute(path)?;

        let mut attempt = 0u32;
        let mut last_error: Option<SourceError> = None;
        while attempt <= self.max_retries {
            match self.client.get(url.clone()).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response.text().await.map_err(|e| {
                            SourceError::ParseError(format!("Failed to read response body: {}", e))
                        })?;
                        self.cache.store(path, &body);
                        return Ok(body);
                    } else if status.is_server_error() {
                        let message = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        warn!(
                            "Server error ({}) for '{}' - attempt {}/{}",
                            status,
                            path,
                            attempt + 1,
                            self.max_retries + 1
                        );
                        last_error = Some(SourceError::HttpStatus {
                            status_code: status.as_u16(),
                            message,
                        });
                    } else {
                        let message = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        error!("Request for '{}' rejected ({})", path, status);
                        return Err(SourceError::HttpStatus {
                            status_code: status.as_u16(),
                            message,
                        });
                    }
                }
                Err(e) => {
                    warn!(
                        "Network error for '{}': {} - attempt {}/{}",
                        path,
                        e,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    last_error = Some(SourceError::ConnectionError(e.to_string()));
                }
            }

            attempt += 1;
            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            SourceError::RequestFailed(format!(
                "Request for '{}' failed after {} attempts",
                path,
                self.max_retries + 1
            ))
        }))
    }
}

#[async_trait]
impl ScriptSource for ImsdbSource {
    fn name(&self) -> &str {
        "IMSDb"
    }

    async fn fetch_listing(&self) -> Result<Vec<TitleListing>, SourceError> {
        let semaphore = Arc::new(Semaphore::new(self.concurrent_requests));

        // Futures are built in a plain loop; a stream combinator closure
        // returning a block that borrows `self` does not pass the
        // compiler's higher-ranked lifetime checks here.
        let mut fetches = FuturesUnordered::new();
        for (index, section) in INDEX_SECTIONS.iter().enumerate() {
            let semaphore = semaphore.clone();
            let path = format!("/alphabetical/{}", section);
            fetches.push(async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .expect("Semaphore should not be closed");
                (index, self.fetch_page(&path).await)
            });
        }

        let mut pages = Vec::with_capacity(INDEX_SECTIONS.len());
        while let Some(fetched) = fetches.next().await {
            pages.push(fetched);
        }

        let listings = merge_listing_pages(pages)?;
        debug!("Fetched listing with {} titles", listings.len());
        Ok(listings)
    }

    async fn fetch_detail(&self, listing: &TitleListing) -> Result<TitleDetail, SourceError> {
        let page = self.fetch_page(&listing.detail_path).await?;
        let Some(caps) = SCRIPT_LINK.captures(&page) else {
            return Err(SourceError::ScriptUnavailable(listing.title.clone()));
        };
        Ok(TitleDetail {
            title: listing.title.clone(),
            script_path: caps[1].to_string(),
        })
    }

    async fn fetch_script(&self, detail: &TitleDetail) -> Result<String, SourceError> {
        let page = self.fetch_page(&detail.script_path).await?;
        let Some(caps) = SCRIPT_BLOCK.captures(&page) else {
            return Err(SourceError::ParseError(format!(
                "No script block found for '{}'",
                detail.title
            )));
        };
        let block = caps[1].to_string();
        if block.trim().is_empty() {
            return Err(SourceError::ScriptUnavailable(detail.title.clone()));
        }
        Ok(block)
    }
}

/// Merge fetched index pages into one deduplicated listing, restoring
/// section order so the result is stable across runs
fn merge_listing_pages(
    mut pages: Vec<(usize, Result<String, SourceError>)>,
) -> Result<Vec<TitleListing>, SourceError> {
    pages.sort_by_key(|(index, _)| *index);

    let mut seen: HashSet<String> = HashSet::new();
    let mut listings: Vec<TitleListing> = Vec::new();
    for (_, result) in pages {
        let page = result?;
        for caps in LISTING_LINK.captures_iter(&page) {
            let title = decode_entities(caps[2].trim());
            if title.is_empty() || !seen.insert(title.clone()) {
                continue;
            }
            listings.push(TitleListing::new(title, caps[1].to_string()));
        }
    }

    if listings.is_empty() {
        return Err(SourceError::ParseError(
            "No titles found in listing pages".to_string(),
        ));
    }
    Ok(listings)
}

/// Decode the handful of HTML entities the site actually emits in titles
fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&nbsp;", " ")
}
