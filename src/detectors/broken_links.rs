//! Broken link detector
//!
//! Reports two kinds of failing targets: sub-resource requests that came
//! back with an error status while the page loaded (captured by the page
//! visitor), and `a[href]` targets probed with HTTP HEAD. Cross-origin
//! links are probed too: they are excluded from traversal, not from
//! checking. Probe timeouts and transport errors on external hosts are
//! skipped rather than reported, they are too noisy to be useful findings.

use crate::detectors::{Bug, Category, Detector, PageContext, Severity};
use crate::{DetectorError, DetectorResult, PageError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Only this many links are probed per page, keeping per-page cost bounded
/// on link-heavy pages.
const MAX_LINKS_PER_PAGE: usize = 50;

const COLLECT_LINKS_SCRIPT: &str = r#"(() => {
    return Array.from(document.querySelectorAll('a[href]')).map(a => ({
        href: a.href,
        text: (a.innerText || '').trim().slice(0, 80),
    }));
})()"#;

#[derive(Debug, Deserialize)]
struct PageLink {
    href: String,
    #[serde(default)]
    text: String,
}

/// Reports links whose targets answer with an error status
pub struct BrokenLinkDetector {
    client: reqwest::Client,
}

impl BrokenLinkDetector {
    pub fn new(probe_timeout_ms: u64) -> Self {
        // Client construction only fails on TLS backend misconfiguration;
        // fall back to the default client rather than making construction
        // fallible for every caller.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(probe_timeout_ms))
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

#[async_trait]
impl Detector for BrokenLinkDetector {
    fn name(&self) -> &'static str {
        "broken-links"
    }

    async fn detect(&self, ctx: &PageContext<'_>) -> DetectorResult<Vec<Bug>> {
        let value = ctx.page.evaluate(COLLECT_LINKS_SCRIPT).await?;
        let links: Vec<PageLink> =
            serde_json::from_value(value).map_err(|e| DetectorError::Page(PageError::Decode(e)))?;

        let mut bugs = Vec::new();

        // Sub-resources that failed during load. No probing needed, the
        // browser already saw the status.
        for request in ctx.failed_requests {
            let severity = if request.status >= 500 {
                Severity::High
            } else {
                Severity::Medium
            };
            bugs.push(
                Bug::new(
                    ctx.url,
                    Category::BrokenLink,
                    severity,
                    format!("Failed resource request ({})", request.status),
                    format!("{} returned {} while the page loaded", request.url, request.status),
                )
                .with_evidence(serde_json::json!({
                    "target": request.url,
                    "status": request.status,
                })),
            );
        }

        for link in links.into_iter().take(MAX_LINKS_PER_PAGE) {
            if !link.href.starts_with("http://") && !link.href.starts_with("https://") {
                continue;
            }

            let response = match self.client.head(&link.href).send().await {
                Ok(resp) => resp,
                Err(e) => {
                    tracing::debug!("Link probe failed for {}: {}", link.href, e);
                    continue;
                }
            };

            let status = response.status().as_u16();
            if status >= 400 {
                let severity = if status >= 500 {
                    Severity::High
                } else {
                    Severity::Medium
                };
                bugs.push(
                    Bug::new(
                        ctx.url,
                        Category::BrokenLink,
                        severity,
                        format!("Broken link ({})", status),
                        format!(
                            "Link \"{}\" -> {} returned {}",
                            link.text, link.href, status
                        ),
                    )
                    .with_evidence(serde_json::json!({
                        "target": link.href,
                        "status": status,
                    })),
                );
            }
        }

        Ok(bugs)
    }
}
