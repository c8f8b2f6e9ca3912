//! Vibecheck: a browser-driven site-defect crawler
//!
//! This crate crawls a website breadth-first starting from a seed URL, opens
//! every discovered same-origin page in a real browser, and runs a set of
//! independent detectors against each rendered page to surface defects:
//! broken links, console errors, layout overflow, accessibility gaps, SEO
//! omissions, fake-interactive elements and mobile breakage. Findings are
//! aggregated into a single structured report.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod detectors;
pub mod report;
pub mod url;

use thiserror::Error;

/// Main error type for vibecheck operations
///
/// Only failures that make further progress impossible surface through this
/// type. Per-page navigation failures and per-detector failures are handled
/// locally inside the crawl loop and converted to report data.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser backend error: {0}")]
    Browser(#[from] BrowserError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),
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
}

/// Fatal browser-backend errors
///
/// These indicate the browser process itself is unavailable or has crashed.
/// They abort the crawl; everything page-scoped is a [`NavigationError`]
/// instead.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Browser connection lost: {0}")]
    Connection(String),
}

/// Per-page navigation failures
///
/// These are data, not propagated errors: the orchestrator records one
/// synthetic broken-link Bug for the page and moves on.
#[derive(Debug, Clone, Error)]
pub enum NavigationError {
    #[error("navigation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("navigation failed: {message}")]
    Failed { message: String },
}

/// Errors from interacting with an open page
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Script evaluation failed: {0}")]
    Evaluate(String),

    #[error("Unexpected evaluation result: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors raised inside a detector's `detect`
///
/// Swallowed at the pipeline boundary: a failing detector degrades coverage
/// on one page, never correctness of the crawl.
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("Page error: {0}")]
    Page(#[from] PageError),

    #[error("{0}")]
    Other(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Report-writing errors
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for vibecheck operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for page interactions
pub type PageResult<T> = std::result::Result<T, PageError>;

/// Result type alias for detector invocations
pub type DetectorResult<T> = std::result::Result<T, DetectorError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{CrawlConfig, Viewport};
pub use crawler::Crawler;
pub use detectors::{default_detectors, Bug, Category, Detector, PageContext, Severity};
pub use report::CrawlReport;
pub use url::{normalize_url, same_origin};
