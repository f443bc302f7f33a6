//! xkcd-ripple: an async client for xkcd comics and what-if articles
//!
//! This crate fetches comic metadata and what-if articles, maps them into
//! typed value objects, and offers range streaming, substring search and
//! date lookup built on a bounded concurrent scanner.

pub mod client;
pub mod comic;
pub mod config;
pub mod download;
pub mod image;
pub mod scan;
pub mod source;
pub mod whatif;

use thiserror::Error;

/// Main error type for xkcd-ripple operations
#[derive(Debug, Error)]
pub enum XkcdError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Parse error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Missing field '{field}' in {url}")]
    MissingField { url: String, field: &'static str },

    #[error("Number {number} is after the latest published one ({latest})")]
    NotFound { number: u32, latest: u32 },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl XkcdError {
    /// Returns true for failures raised while fetching or decoding a remote document
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Self::Http { .. }
                | Self::Timeout { .. }
                | Self::Status { .. }
                | Self::Parse { .. }
                | Self::MissingField { .. }
        )
    }
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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for xkcd-ripple operations
pub type Result<T> = std::result::Result<T, XkcdError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use client::XkcdClient;
pub use comic::{Comic, ComicSource};
pub use config::ClientConfig;
pub use image::Image;
pub use scan::{PruneHint, ScanOptions, ScanStream};
pub use source::{EntitySource, Selection};
pub use whatif::{Article, EntryItem, Hyperlink, RefSegment, Reference, WhatIfSource};
