//! Crawl orchestrator
//!
//! Owns the frontier and the visited set and drives the breadth-first loop:
//! pop, visit, run detectors, extract links, enqueue new in-scope targets,
//! accumulate findings. Stops at the page ceiling, frontier exhaustion, or
//! a cancellation request.

use crate::browser::Browser;
use crate::config::CrawlConfig;
use crate::crawler::visitor::PageVisitor;
use crate::detectors::{Bug, Category, Detector, Severity};
use crate::report::{build_report, CrawlReport};
use crate::url::normalize_url;
use crate::{NavigationError, Result};
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

/// Main crawler structure
///
/// The frontier, visited set and bug accumulator live exclusively inside
/// `run`; detectors can observe only the page they are handed, never
/// orchestrator state.
pub struct Crawler {
    start_url: Url,
    config: CrawlConfig,
    browser: Box<dyn Browser>,
    detectors: Vec<Box<dyn Detector>>,
    stop: Arc<AtomicBool>,
}

impl Crawler {
    /// Creates a crawler for `start_url`
    ///
    /// The seed is normalized here; a malformed seed is the caller's error.
    /// The seed is always in scope even if later scope rules would exclude
    /// it: scope filtering applies to discovered links only.
    ///
    /// # Arguments
    ///
    /// * `start_url` - Seed URL the crawl begins from
    /// * `config` - Crawl behavior configuration
    /// * `browser` - The browser backend
    /// * `detectors` - Ordered detector list; order is reflected in the
    ///   report's bug order
    pub fn new(
        start_url: &str,
        config: CrawlConfig,
        browser: Box<dyn Browser>,
        detectors: Vec<Box<dyn Detector>>,
    ) -> Result<Self> {
        let start_url = normalize_url(start_url)?;
        Ok(Self {
            start_url,
            config,
            browser,
            detectors,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Handle for requesting cancellation
    ///
    /// Setting the flag stops the crawl at the next loop boundary between
    /// page visits; the report then covers the pages visited so far.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Runs the crawl and returns the aggregated report
    ///
    /// Per-page navigation failures and per-detector failures are converted
    /// to report data; only browser-backend unavailability propagates as an
    /// error.
    pub async fn run(&mut self) -> Result<CrawlReport> {
        let started_at = chrono::Utc::now();
        tracing::info!(
            "Starting crawl: {} (max {} pages)",
            self.start_url,
            self.config.max_pages
        );

        let visitor = PageVisitor::new(self.browser.as_ref(), &self.config);

        let mut frontier: VecDeque<Url> = VecDeque::new();
        let mut queued: HashSet<String> = HashSet::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut bugs: Vec<Bug> = Vec::new();
        let mut diagnostics: Vec<String> = Vec::new();

        frontier.push_back(self.start_url.clone());
        queued.insert(self.start_url.to_string());

        while let Some(target) = frontier.pop_front() {
            if visited.len() >= self.config.max_pages {
                tracing::info!("Page ceiling reached ({})", self.config.max_pages);
                break;
            }
            if self.stop.load(Ordering::Relaxed) {
                tracing::info!("Cancellation requested, stopping crawl");
                break;
            }

            // Re-checked at dequeue as well as at enqueue: guards against
            // duplicate frontier entries if a concurrent variant is ever
            // introduced.
            let key = target.to_string();
            if visited.contains(&key) {
                continue;
            }
            visited.insert(key);

            // The browser gets its explicit close even when the backend
            // dies mid-crawl; Drop alone only kills the process.
            let result = match visitor.visit(&target, &self.detectors).await {
                Ok(result) => result,
                Err(e) => {
                    if let Err(close_err) = self.browser.close().await {
                        tracing::warn!("Failed to close browser: {}", close_err);
                    }
                    return Err(e);
                }
            };

            if let Some(failure) = &result.failure {
                // The DOM is unavailable or unreliable: one synthetic bug,
                // no detector findings, no links followed.
                bugs.push(unreachable_page_bug(&target, failure));
                continue;
            }

            bugs.extend(result.bugs);
            diagnostics.extend(result.detector_diagnostics);

            for link in result.links {
                let link_key = link.to_string();
                if visited.contains(&link_key) || queued.contains(&link_key) {
                    continue;
                }
                queued.insert(link_key);
                frontier.push_back(link);
            }

            tracing::debug!(
                "Progress: {} visited, {} in frontier, {} bugs",
                visited.len(),
                frontier.len(),
                bugs.len()
            );
        }

        if let Err(e) = self.browser.close().await {
            tracing::warn!("Failed to close browser: {}", e);
        }

        let report = build_report(
            self.start_url.as_str(),
            visited.len(),
            bugs,
            diagnostics,
            started_at,
            chrono::Utc::now(),
        );

        tracing::info!(
            "Crawl complete: {} pages visited, {} bugs found",
            report.pages_visited,
            report.bugs.len()
        );

        Ok(report)
    }
}

/// Builds the synthetic finding for a page that never loaded usably
fn unreachable_page_bug(url: &Url, failure: &NavigationError) -> Bug {
    match failure {
        NavigationError::HttpStatus { status } => Bug::new(
            url,
            Category::BrokenLink,
            Severity::High,
            format!("HTTP {}", status),
            format!("Page returned status {}", status),
        )
        .with_evidence(serde_json::json!({ "status": status })),
        other => Bug::new(
            url,
            Category::BrokenLink,
            Severity::High,
            "Page failed to load",
            other.to_string(),
        ),
    }
}
