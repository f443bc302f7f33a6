//! Configuration module for xkcd-ripple
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional: `ClientConfig::default()` targets the
//! public sites.
//!
//! # Example
//!
//! ```no_run
//! use xkcd_ripple::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("xkcd.toml")).unwrap();
//! println!("Scans will use {} concurrent requests", config.scan.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ClientConfig, DownloadConfig, EndpointConfig, ScanConfig, UserAgentConfig,
    DEFAULT_CONCURRENCY, DEFAULT_REQUEST_TIMEOUT_SECS,
};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
