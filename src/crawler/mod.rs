//! Crawl orchestration
//!
//! This module contains the core crawl machinery:
//! - The breadth-first orchestrator loop with its frontier and visited set
//! - Per-page visiting with guaranteed page cleanup
//! - The detector pipeline with per-detector failure isolation
//! - In-page link extraction and scope filtering

mod links;
mod orchestrator;
mod pipeline;
mod visitor;

pub use links::extract_links;
pub use orchestrator::Crawler;
pub use pipeline::run_detectors;
pub use visitor::{PageVisitResult, PageVisitor};

use crate::browser::ChromeBrowser;
use crate::config::CrawlConfig;
use crate::detectors::default_detectors;
use crate::report::CrawlReport;
use crate::Result;

/// Runs a complete crawl with the default detector set and a freshly
/// launched Chromium backend
///
/// This is the main library entry point. It launches the browser, crawls
/// from `start_url` up to the configured page ceiling, closes the browser,
/// and returns the aggregated report.
///
/// # Example
///
/// ```no_run
/// use vibecheck::config::CrawlConfig;
/// use vibecheck::crawler::crawl;
///
/// # async fn example() -> vibecheck::Result<()> {
/// let report = crawl("https://my-site.example", CrawlConfig::default()).await?;
/// println!("{} bugs on {} pages", report.bugs.len(), report.pages_visited);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(start_url: &str, config: CrawlConfig) -> Result<CrawlReport> {
    let browser = ChromeBrowser::launch(&config).await?;
    let detectors = default_detectors(&config);
    let mut crawler = Crawler::new(start_url, config, Box::new(browser), detectors)?;
    crawler.run().await
}
