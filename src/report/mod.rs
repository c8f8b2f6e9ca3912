//! Report aggregation and rendering
//!
//! The aggregator folds every finding from a crawl into one read-only
//! [`CrawlReport`] with summary counts; the submodules render it to the
//! terminal, JSON, or a self-contained HTML page.

mod html;
mod json;
mod terminal;

pub use html::{format_html_report, write_html_report};
pub use json::write_json_report;
pub use terminal::{format_report, print_report};

use crate::detectors::{Bug, Severity};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Aggregated result of one crawl run
///
/// Built once when the crawl terminates; read-only afterward. Bug order is
/// deterministic for a deterministic crawl: pages in visit (BFS) order,
/// detectors in registration order within a page.
#[derive(Debug, Serialize)]
pub struct CrawlReport {
    pub start_url: String,
    pub pages_visited: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub summary: ReportSummary,
    pub bugs: Vec<Bug>,
    /// Crawler-side diagnostics (detector malfunctions); not site defects
    pub errors: Vec<String>,
}

/// Summary counts over the report's findings
#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub total_bugs: usize,
    pub by_severity: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
}

impl CrawlReport {
    /// Findings of one severity, in report order
    pub fn bugs_with_severity(&self, severity: Severity) -> impl Iterator<Item = &Bug> {
        self.bugs.iter().filter(move |b| b.severity == severity)
    }
}

/// Builds the final report from the crawl's accumulated findings
///
/// Exact duplicate findings (same url, category, title and description) are
/// collapsed to their first occurrence; everything else keeps its order.
pub fn build_report(
    start_url: &str,
    pages_visited: usize,
    bugs: Vec<Bug>,
    errors: Vec<String>,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
) -> CrawlReport {
    let mut seen: HashSet<(String, String, String, String)> = HashSet::new();
    let mut deduped = Vec::with_capacity(bugs.len());
    for bug in bugs {
        let key = (
            bug.url.clone(),
            bug.category.as_str().to_string(),
            bug.title.clone(),
            bug.description.clone(),
        );
        if seen.insert(key) {
            deduped.push(bug);
        }
    }

    let mut by_severity: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
    for bug in &deduped {
        *by_severity
            .entry(bug.severity.as_str().to_string())
            .or_insert(0) += 1;
        *by_category
            .entry(bug.category.as_str().to_string())
            .or_insert(0) += 1;
    }

    CrawlReport {
        start_url: start_url.to_string(),
        pages_visited,
        started_at,
        finished_at,
        summary: ReportSummary {
            total_bugs: deduped.len(),
            by_severity,
            by_category,
        },
        bugs: deduped,
        errors,
    }
}
