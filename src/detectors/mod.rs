//! Bug detectors
//!
//! A detector is an independent rule that inspects one visited page and may
//! emit findings. Every detector implements the single [`Detector`]
//! capability; there is no shared base logic. The crawler runs them in
//! registration order and isolates each one's failures, so a broken DOM
//! query in one detector never affects the others or the crawl itself.
//!
//! Detectors are pure with respect to crawler state: their only output is
//! the returned Bug list. They must not retain the page handle past their
//! `detect` call.

mod accessibility;
mod broken_links;
mod console;
mod dead_clicks;
mod meta_seo;
mod mobile;
mod overflow;

pub use accessibility::AccessibilityDetector;
pub use broken_links::BrokenLinkDetector;
pub use console::ConsoleErrorDetector;
pub use dead_clicks::DeadClickDetector;
pub use meta_seo::MetaSeoDetector;
pub use mobile::MobileDetector;
pub use overflow::OverflowDetector;

use crate::browser::{ConsoleEvent, FailedRequest, PageHandle};
use crate::config::CrawlConfig;
use crate::DetectorResult;
use async_trait::async_trait;
use serde::{Serialize, Serializer};
use url::Url;

/// How severe a finding is, assigned by the detector that raised it and
/// never recomputed downstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of defect a finding describes
///
/// The fixed variants cover the built-in detectors; `Custom` lets external
/// detectors introduce their own categories without touching this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Console,
    BrokenLink,
    Overflow,
    Accessibility,
    Seo,
    DeadClick,
    Mobile,
    Custom(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Console => "console",
            Category::BrokenLink => "broken-link",
            Category::Overflow => "overflow",
            Category::Accessibility => "accessibility",
            Category::Seo => "seo",
            Category::DeadClick => "dead-click",
            Category::Mobile => "mobile",
            Category::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One reported defect
///
/// Immutable once created; the aggregator only reads it.
#[derive(Debug, Clone, Serialize)]
pub struct Bug {
    /// Page the defect was observed on
    pub url: String,
    pub category: Category,
    pub severity: Severity,
    /// Short human-readable summary
    pub title: String,
    pub description: String,
    /// CSS-ish selector pointing at the offending element, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// Structured evidence (status codes, measured sizes, markup snippets)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<serde_json::Value>,
}

impl Bug {
    /// Creates a finding with no selector or evidence attached
    pub fn new(
        url: &Url,
        category: Category,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            url: url.to_string(),
            category,
            severity,
            title: title.into(),
            description: description.into(),
            selector: None,
            evidence: None,
        }
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub fn with_evidence(mut self, evidence: serde_json::Value) -> Self {
        self.evidence = Some(evidence);
        self
    }
}

/// Everything a detector may look at for one visited page
///
/// Borrowed for the duration of one `detect` call; the ambient signal
/// slices were captured by the page visitor from navigation start.
pub struct PageContext<'a> {
    pub page: &'a dyn PageHandle,
    pub url: &'a Url,
    pub console: &'a [ConsoleEvent],
    pub failed_requests: &'a [FailedRequest],
}

/// The detector capability: inspect one page, return zero or more findings
#[async_trait]
pub trait Detector: Send + Sync {
    /// Static identifying name, used for registration and diagnostics
    fn name(&self) -> &'static str;

    /// Inspects the page and returns findings
    ///
    /// An `Err` marks this detector as malfunctioning on this page; the
    /// pipeline records a diagnostic and moves on to the next detector.
    async fn detect(&self, ctx: &PageContext<'_>) -> DetectorResult<Vec<Bug>>;
}

/// The default detector set, in registration order
///
/// This is an explicit constructor rather than ambient global state: callers
/// pass the returned list (or their own) into the crawler, and ordering is
/// part of the report's determinism guarantee.
pub fn default_detectors(config: &CrawlConfig) -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(ConsoleErrorDetector::new()),
        Box::new(BrokenLinkDetector::new(config.link_probe_timeout_ms)),
        Box::new(OverflowDetector::new()),
        Box::new(AccessibilityDetector::new()),
        Box::new(MetaSeoDetector::new()),
        Box::new(DeadClickDetector::new()),
        Box::new(MobileDetector::new()),
    ]
}
