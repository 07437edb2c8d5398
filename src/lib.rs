//! Bindery: a resumable book harvester
//!
//! This crate walks a paginated book catalogue, records the discovered
//! chapters in a durable SQLite work store, and incrementally fetches each
//! chapter's body text into plain-text artifacts. Every stage is idempotent
//! against the store, so an interrupted run can simply be restarted.

pub mod config;
pub mod harvest;
pub mod page;
pub mod store;

use thiserror::Error;

/// Main error type for Bindery operations
#[derive(Debug, Error)]
pub enum BinderyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected status {status} for {url}")]
    BadStatus { url: String, status: u16 },

    #[error("Parse error for {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: page::PageError,
    },

    #[error("Page limit of {limit} reached while paginating from {url}")]
    PageLimit { url: String, limit: u32 },

    #[error("Cannot derive a book id from {url}")]
    BookId { url: String },

    #[error("Book not found in store: {0}")]
    BookNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid CSS selector for {0}: {1}")]
    InvalidSelector(String, String),
}

/// Result type alias for Bindery operations
pub type Result<T> = std::result::Result<T, BinderyError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use store::{CrawlStatus, SqliteStore, Store};
