//! Detector pipeline
//!
//! Runs the registered detectors against one visited page, in registration
//! order, isolating each detector's failure. A failing detector costs its
//! own findings on that page, nothing else: other detectors still run and
//! the crawl continues. Detector failures are surfaced as diagnostics, not
//! as user-facing Bugs, since they describe a detector malfunction rather
//! than a site defect.

use crate::detectors::{Bug, Detector, PageContext};

/// Runs every detector against the page, in order
///
/// # Returns
///
/// The concatenated findings in registration order, plus one diagnostic
/// string per detector that failed.
pub async fn run_detectors(
    detectors: &[Box<dyn Detector>],
    ctx: &PageContext<'_>,
) -> (Vec<Bug>, Vec<String>) {
    let mut bugs = Vec::new();
    let mut diagnostics = Vec::new();

    for detector in detectors {
        match detector.detect(ctx).await {
            Ok(found) => {
                if !found.is_empty() {
                    tracing::debug!(
                        "Detector {} found {} issue(s) on {}",
                        detector.name(),
                        found.len(),
                        ctx.url
                    );
                }
                bugs.extend(found);
            }
            Err(e) => {
                tracing::warn!("Detector {} failed on {}: {}", detector.name(), ctx.url, e);
                diagnostics.push(format!(
                    "Detector {} failed on {}: {}",
                    detector.name(),
                    ctx.url,
                    e
                ));
            }
        }
    }

    (bugs, diagnostics)
}
