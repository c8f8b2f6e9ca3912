//! Horizontal overflow detector
//!
//! Finds elements whose content is wider than their box. Extremely common
//! on generated layouts that never accounted for real content width.

use crate::detectors::{Bug, Category, Detector, PageContext, Severity};
use crate::{DetectorError, DetectorResult, PageError};
use async_trait::async_trait;
use serde::Deserialize;

const SCAN_SCRIPT: &str = r#"(() => {
    const results = [];
    for (const el of document.querySelectorAll('*')) {
        if (el.scrollWidth > el.clientWidth + 2 && el.clientWidth > 0) {
            const tag = el.tagName.toLowerCase();
            if (tag === 'html' || tag === 'body') continue;
            const id = el.id ? '#' + el.id : '';
            const cls = el.className && typeof el.className === 'string'
                ? '.' + el.className.trim().split(/\s+/).join('.') : '';
            results.push({
                selector: tag + id + cls,
                scrollWidth: el.scrollWidth,
                clientWidth: el.clientWidth,
            });
        }
        if (results.length >= 20) break;
    }
    return results;
})()"#;

#[derive(Debug, Deserialize)]
struct OverflowHit {
    selector: String,
    #[serde(rename = "scrollWidth")]
    scroll_width: i64,
    #[serde(rename = "clientWidth")]
    client_width: i64,
}

/// Reports elements with horizontal overflow
pub struct OverflowDetector;

impl OverflowDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OverflowDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Detector for OverflowDetector {
    fn name(&self) -> &'static str {
        "overflow"
    }

    async fn detect(&self, ctx: &PageContext<'_>) -> DetectorResult<Vec<Bug>> {
        let value = ctx.page.evaluate(SCAN_SCRIPT).await?;
        let hits: Vec<OverflowHit> =
            serde_json::from_value(value).map_err(|e| DetectorError::Page(PageError::Decode(e)))?;

        let bugs = hits
            .into_iter()
            .map(|hit| {
                Bug::new(
                    ctx.url,
                    Category::Overflow,
                    Severity::Medium,
                    "Horizontal overflow detected",
                    format!(
                        "Element `{}` overflows: scrollWidth={}px vs clientWidth={}px",
                        hit.selector, hit.scroll_width, hit.client_width
                    ),
                )
                .with_selector(hit.selector)
            })
            .collect();

        Ok(bugs)
    }
}
