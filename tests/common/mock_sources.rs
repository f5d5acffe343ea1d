/*!
 * Mock source implementation for testing
 *
 * This module provides an in-memory implementation of the ScriptSource
 * trait so controller and workflow tests never make actual network
 * requests. Calls are tracked so tests can assert cache behavior.
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use screenmark::errors::SourceError;
use screenmark::sources::{ScriptSource, TitleDetail, TitleListing};

/// Tracks source calls to ensure no actual external requests are made
#[derive(Debug, Default)]
pub struct SourceCallTracker {
    /// Count of index-page fetches
    pub listing_calls: usize,
    /// Count of detail-page fetches
    pub detail_calls: usize,
    /// Count of script-page fetches
    pub script_calls: usize,
    /// Should the next call fail
    pub should_fail: bool,
}

/// Mock implementation of a screenplay source
#[derive(Debug)]
pub struct MockScriptSource {
    listings: Vec<TitleListing>,
    scripts: HashMap<String, String>,
    tracker: Arc<Mutex<SourceCallTracker>>,
}

impl MockScriptSource {
    /// Create an empty mock source
    pub fn new() -> Self {
        MockScriptSource {
            listings: Vec::new(),
            scripts: HashMap::new(),
            tracker: Arc::new(Mutex::new(SourceCallTracker::default())),
        }
    }

    /// Create a mock source listing one title backed by the sample script
    pub fn with_sample(title: &str) -> Self {
        let mut source = MockScriptSource::new();
        source.add_script(title, super::sample_script_markup());
        source
    }

    /// Register a title together with its script markup
    pub fn add_script(&mut self, title: &str, markup: &str) {
        self.listings.push(TitleListing::new(
            title,
            format!("/Movie Scripts/{} Script.html", title),
        ));
        self.scripts.insert(title.to_string(), markup.to_string());
    }

    /// Register a title that is listed but has no script page
    pub fn add_unavailable(&mut self, title: &str) {
        self.listings.push(TitleListing::new(
            title,
            format!("/Movie Scripts/{} Script.html", title),
        ));
    }

    /// Get the call tracker
    pub fn tracker(&self) -> Arc<Mutex<SourceCallTracker>> {
        self.tracker.clone()
    }

    /// Configure the mock to fail on the next call
    pub fn fail_next_call(&self) {
        let mut tracker = self.tracker.lock().unwrap();
        tracker.should_fail = true;
    }
}

#[async_trait]
impl ScriptSource for MockScriptSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_listing(&self) -> Result<Vec<TitleListing>, SourceError> {
        let mut tracker = self.tracker.lock().unwrap();
        tracker.listing_calls += 1;

        if tracker.should_fail {
            tracker.should_fail = false; // Reset for next call
            return Err(SourceError::ConnectionError("Connection failed".into()));
        }

        Ok(self.listings.clone())
    }

    async fn fetch_detail(&self, listing: &TitleListing) -> Result<TitleDetail, SourceError> {
        let mut tracker = self.tracker.lock().unwrap();
        tracker.detail_calls += 1;

        if tracker.should_fail {
            tracker.should_fail = false; // Reset for next call
            return Err(SourceError::ConnectionError("Connection failed".into()));
        }

        if self.scripts.contains_key(&listing.title) {
            Ok(TitleDetail {
                title: listing.title.clone(),
                script_path: format!("/scripts/{}.html", listing.title.replace(' ', "-")),
            })
        } else {
            Err(SourceError::ScriptUnavailable(listing.title.clone()))
        }
    }

    async fn fetch_script(&self, detail: &TitleDetail) -> Result<String, SourceError> {
        let mut tracker = self.tracker.lock().unwrap();
        tracker.script_calls += 1;

        if tracker.should_fail {
            tracker.should_fail = false; // Reset for next call
            return Err(SourceError::ConnectionError("Connection failed".into()));
        }

        self.scripts
            .get(&detail.title)
            .cloned()
            .ok_or_else(|| SourceError::ScriptUnavailable(detail.title.clone()))
    }
}
