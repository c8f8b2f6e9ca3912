//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files for the crawler, plus the built-in defaults used when no file is
//! given.
//!
//! # Example
//!
//! ```no_run
//! use vibecheck::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("vibecheck.toml")).unwrap();
//! println!("Crawl ceiling: {} pages", config.max_pages);
//! ```

mod parser;
mod types;

pub use parser::{load_config, validate_config};
pub use types::{CrawlConfig, Viewport};
