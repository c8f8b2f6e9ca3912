//! Dead click detector
//!
//! Finds elements that look clickable but are not interactive: button-like
//! class names (btn, button, cta, click) on elements that are not real
//! buttons or links and carry no click handler, pointer cursor, role or
//! tabindex.

use crate::detectors::{Bug, Category, Detector, PageContext, Severity};
use crate::{DetectorError, DetectorResult, PageError};
use async_trait::async_trait;
use serde::Deserialize;

const SCAN_SCRIPT: &str = r#"(() => {
    const results = [];
    const els = document.querySelectorAll(
        '[class*="btn"], [class*="button"], [class*="cta"], [class*="click"]'
    );
    for (const el of els) {
        const tag = el.tagName.toLowerCase();
        if (['button', 'a', 'input', 'select', 'textarea'].includes(tag))
            continue;
        const style = getComputedStyle(el);
        if (
            style.cursor === 'pointer' ||
            el.getAttribute('role') === 'button' ||
            el.getAttribute('tabindex')
        )
            continue;
        if (!el.onclick) {
            results.push({
                tag,
                text: (el.innerText || '').trim().slice(0, 60),
                html: el.outerHTML.slice(0, 150),
            });
        }
        if (results.length >= 10) break;
    }
    return results;
})()"#;

#[derive(Debug, Deserialize)]
struct DeadClickSuspect {
    tag: String,
    text: String,
    html: String,
}

/// Reports button-like elements that are probably not clickable
pub struct DeadClickDetector;

impl DeadClickDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DeadClickDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Detector for DeadClickDetector {
    fn name(&self) -> &'static str {
        "dead-clicks"
    }

    async fn detect(&self, ctx: &PageContext<'_>) -> DetectorResult<Vec<Bug>> {
        let value = ctx.page.evaluate(SCAN_SCRIPT).await?;
        let suspects: Vec<DeadClickSuspect> =
            serde_json::from_value(value).map_err(|e| DetectorError::Page(PageError::Decode(e)))?;

        let bugs = suspects
            .into_iter()
            .map(|s| {
                Bug::new(
                    ctx.url,
                    Category::DeadClick,
                    Severity::Low,
                    "Possibly non-interactive button-like element",
                    format!(
                        "`{}` with text \"{}\" has a button-like class name but may not be clickable.",
                        s.tag, s.text
                    ),
                )
                .with_evidence(serde_json::json!({ "html": s.html }))
            })
            .collect();

        Ok(bugs)
    }
}
