//! Configuration module for Bindery
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use bindery::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("bindery.toml")).unwrap();
//! println!("Library directory: {}", config.output.library_dir);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FieldSelector, LimitsConfig, LinkSelector, OutputConfig, RetryConfig, SelectorConfig,
    SourceConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
