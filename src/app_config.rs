use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;
use url::Url;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Script source config
    #[serde(default)]
    pub source: SourceConfig,

    /// Catalog (local storage) config
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Title search config
    #[serde(default)]
    pub search: SearchConfig,

    /// Output rendering config
    #[serde(default)]
    pub render: RenderConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Output rendering format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    // @format: Annotated plain text with a kind gutter
    #[default]
    Text,
    // @format: Entry list as JSON
    Json,
}

impl RenderFormat {
    // @returns: Capitalized format name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Text => "Text",
            Self::Json => "JSON",
        }
    }

    // @returns: Lowercase format identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Text => "text".to_string(),
            Self::Json => "json".to_string(),
        }
    }

    // @returns: Output file extension for the format
    pub fn extension(&self) -> &str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}

// Implement Display trait for RenderFormat
impl std::fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for RenderFormat
impl std::str::FromStr for RenderFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(anyhow!("Invalid render format: {}", s)),
        }
    }
}

/// Script source configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SourceConfig {
    /// Source site base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for failed requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Maximum number of concurrent requests
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Whether to cache fetched pages in memory for the session
    #[serde(default = "default_true")]
    pub page_cache: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            concurrent_requests: default_concurrent_requests(),
            page_cache: true,
        }
    }
}

/// Catalog storage configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// Database file location; the platform data directory is used when unset
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

/// Title search configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SearchConfig {
    /// Minimum similarity score for a fuzzy match (0.0 to 1.0)
    #[serde(default = "default_match_threshold")]
    pub threshold: f32,

    /// Number of nearest titles reported when no match is found
    #[serde(default = "default_suggestion_count")]
    pub suggestions: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: default_match_threshold(),
            suggestions: default_suggestion_count(),
        }
    }
}

/// Output rendering configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RenderConfig {
    /// Output format
    #[serde(default)]
    pub format: RenderFormat,

    /// Whether to colorize text output with ANSI escapes
    #[serde(default)]
    pub color: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: RenderFormat::default(),
            color: false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_endpoint() -> String {
    "https://imsdb.com".to_string()
}

fn default_user_agent() -> String {
    format!("screenmark/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3 // Default to 3 retries
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_match_threshold() -> f32 {
    0.6
}

fn default_suggestion_count() -> usize {
    3
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate the source endpoint
        let endpoint = Url::parse(&self.source.endpoint)
            .map_err(|e| anyhow!("Invalid source endpoint '{}': {}", self.source.endpoint, e))?;
        match endpoint.scheme() {
            "http" | "https" => {}
            other => {
                return Err(anyhow!(
                    "Source endpoint must use http or https, got '{}'",
                    other
                ));
            }
        }

        if self.source.timeout_secs == 0 {
            return Err(anyhow!("Request timeout must be at least 1 second"));
        }

        if self.source.concurrent_requests == 0 {
            return Err(anyhow!("Concurrent requests must be at least 1"));
        }

        // Validate search settings
        if !(0.0..=1.0).contains(&self.search.threshold) {
            return Err(anyhow!(
                "Search threshold must be between 0.0 and 1.0, got {}",
                self.search.threshold
            ));
        }

        if self.search.suggestions == 0 {
            return Err(anyhow!("Suggestion count must be at least 1"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source: SourceConfig::default(),
            catalog: CatalogConfig::default(),
            search: SearchConfig::default(),
            render: RenderConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
