/*!
 * Error types for the screenmark application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to a script source site
#[derive(Error, Debug)]
pub enum SourceError {
    /// Error when making an HTTP request fails
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Error when the fetched page does not parse as expected
    #[error("Failed to parse page: {0}")]
    ParseError(String),

    /// Non-success HTTP status from the site
    #[error("Site responded with error: {status_code} - {message}")]
    HttpStatus {
        /// HTTP status code
        status_code: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The site has no script for the requested title
    #[error("No script available for '{0}'")]
    ScriptUnavailable(String),
}

/// Errors that can occur while annotating a script
#[derive(Error, Debug)]
pub enum ScriptError {
    /// The document held no annotatable entries after normalization
    #[error("Document contains no entries after normalization")]
    EmptyDocument,
}

/// Errors that can occur during title search
#[derive(Error, Debug)]
pub enum SearchError {
    /// No cached title was close enough to the query
    #[error("No title matching '{query}' (nearest: {})", .nearest.join(", "))]
    NoMatch {
        /// What the user asked for
        query: String,
        /// Closest titles found, best first
        nearest: Vec<String>,
    },

    /// The title index is empty and could not be refreshed
    #[error("Title index is empty")]
    EmptyIndex,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a script source
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Error from script annotation
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    /// Error from title search
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
