//! Scanning, streaming and lookups over numbered entities
//!
//! This module contains:
//! - The bounded concurrent scanner
//! - The shared prune hint used by date lookups
//! - The sequential range streamer
//! - Search and date lookups built on the scanner

mod lookup;
mod prune;
mod scanner;
mod streamer;

pub use lookup::{find_by_date, search};
pub use prune::PruneHint;
pub use scanner::{scan, ScanStream};
pub use streamer::{stream_range, RangeStream};

use crate::config::DEFAULT_CONCURRENCY;
use crate::{Result, XkcdError};
use tokio_util::sync::CancellationToken;

/// Options for a single scan
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Maximum number of operations in flight
    pub concurrency: usize,

    /// Cancelling this token stops the scan
    pub cancel: CancellationToken,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            cancel: CancellationToken::new(),
        }
    }
}

impl ScanOptions {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Rejects a zero concurrency limit
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(XkcdError::Validation(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Entities that can be matched by a text query
pub trait Searchable {
    /// All textual fields, concatenated
    fn searchable_text(&self) -> String;

    /// Case-insensitive substring match against `searchable_text`
    fn matches_query(&self, query: &str) -> bool {
        self.matches_lowercase(&query.to_lowercase())
    }

    /// Like `matches_query`, for a needle that is already lowercase
    fn matches_lowercase(&self, needle: &str) -> bool {
        self.searchable_text().to_lowercase().contains(needle)
    }
}
