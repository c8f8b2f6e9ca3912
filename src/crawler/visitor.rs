//! Page visitor
//!
//! Opens one URL in the browser backend and runs everything that needs the
//! live page inside that scope: ambient signal capture, the detector
//! pipeline, and link extraction. The page handle never escapes a visit and
//! is closed on every exit path.

use crate::browser::{Browser, OpenError, PageHandle};
use crate::config::CrawlConfig;
use crate::crawler::{links, pipeline};
use crate::detectors::{Bug, Detector, PageContext};
use crate::{NavigationError, Result};
use std::time::Duration;
use url::Url;

/// Outcome of visiting one page
///
/// `failure` is the visit-level indicator, distinct from detector findings:
/// when set, the page never loaded usably, no detectors ran, and `links` is
/// empty.
#[derive(Debug)]
pub struct PageVisitResult {
    pub url: Url,
    pub failure: Option<NavigationError>,
    pub bugs: Vec<Bug>,
    pub detector_diagnostics: Vec<String>,
    pub links: Vec<Url>,
}

impl PageVisitResult {
    fn failed(url: Url, error: NavigationError) -> Self {
        Self {
            url,
            failure: Some(error),
            bugs: Vec::new(),
            detector_diagnostics: Vec::new(),
            links: Vec::new(),
        }
    }
}

/// Visits pages one at a time through the browser backend
pub struct PageVisitor<'a> {
    browser: &'a dyn Browser,
    page_timeout: Duration,
}

impl<'a> PageVisitor<'a> {
    pub fn new(browser: &'a dyn Browser, config: &CrawlConfig) -> Self {
        Self {
            browser,
            page_timeout: Duration::from_millis(config.page_timeout_ms),
        }
    }

    /// Visits `url`: navigate, capture signals, run detectors, extract links
    ///
    /// Navigation failures come back as data inside the result; the only
    /// `Err` this returns is backend unavailability, which aborts the crawl.
    ///
    /// After a successful open there are no early returns until the page is
    /// closed: every fallible step below is handled in place so the close
    /// runs on all paths.
    pub async fn visit(
        &self,
        url: &Url,
        detectors: &[Box<dyn Detector>],
    ) -> Result<PageVisitResult> {
        tracing::info!("Visiting: {}", url);

        let mut page: Box<dyn PageHandle> = match self.browser.open(url, self.page_timeout).await {
            Ok(page) => page,
            Err(OpenError::Navigation(e)) => {
                tracing::warn!("Navigation failed for {}: {}", url, e);
                return Ok(PageVisitResult::failed(url.clone(), e));
            }
            Err(OpenError::Backend(e)) => return Err(e.into()),
        };

        let console = page.console_events().await;
        let failed_requests = page.failed_requests().await;
        if !failed_requests.is_empty() {
            tracing::debug!(
                "{} failed network request(s) during load of {}",
                failed_requests.len(),
                url
            );
        }

        let ctx = PageContext {
            page: page.as_ref(),
            url,
            console: &console,
            failed_requests: &failed_requests,
        };
        let (bugs, detector_diagnostics) = pipeline::run_detectors(detectors, &ctx).await;

        let extracted = match links::extract_links(page.as_ref(), url).await {
            Ok(links) => links,
            Err(e) => {
                // Link loss degrades coverage, not correctness.
                tracing::warn!("Link extraction failed on {}: {}", url, e);
                Vec::new()
            }
        };

        if let Err(e) = page.close().await {
            tracing::warn!("Failed to close page for {}: {}", url, e);
        }

        Ok(PageVisitResult {
            url: url.clone(),
            failure: None,
            bugs,
            detector_diagnostics,
            links: extracted,
        })
    }
}
