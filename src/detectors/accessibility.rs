//! Accessibility detector
//!
//! Covers the common machine-checkable gaps: images without alt text,
//! interactive elements without an accessible name, a missing lang
//! attribute on `<html>`, and form inputs with no associated label.

use crate::detectors::{Bug, Category, Detector, PageContext, Severity};
use crate::{DetectorError, DetectorResult, PageError};
use async_trait::async_trait;
use serde::Deserialize;

const SCAN_SCRIPT: &str = r#"(() => {
    const problems = [];

    document.querySelectorAll('img:not([alt])').forEach(img => {
        problems.push({
            kind: 'img_no_alt',
            detail: (img.src || '(no src)').slice(0, 120),
        });
    });

    document.querySelectorAll('button, a[href]').forEach(el => {
        const text = (el.innerText || '').trim();
        const ariaLabel = el.getAttribute('aria-label') || '';
        const title = el.getAttribute('title') || '';
        if (!text && !ariaLabel && !title) {
            problems.push({
                kind: 'empty_interactive',
                detail: el.outerHTML.slice(0, 150),
            });
        }
    });

    if (!document.documentElement.getAttribute('lang')) {
        problems.push({
            kind: 'no_lang',
            detail: '<html> missing lang attribute',
        });
    }

    document.querySelectorAll('input:not([type=hidden]), textarea, select').forEach(el => {
        const id = el.id;
        const ariaLabel = el.getAttribute('aria-label');
        const ariaLabelledBy = el.getAttribute('aria-labelledby');
        const hasLabel = id && document.querySelector('label[for="' + id + '"]');
        if (!hasLabel && !ariaLabel && !ariaLabelledBy) {
            problems.push({
                kind: 'input_no_label',
                detail: el.outerHTML.slice(0, 150),
            });
        }
    });

    return problems.slice(0, 30);
})()"#;

#[derive(Debug, Deserialize)]
struct A11yIssue {
    kind: String,
    detail: String,
}

/// Reports common accessibility gaps
pub struct AccessibilityDetector;

impl AccessibilityDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AccessibilityDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn classify(kind: &str) -> (&'static str, Severity) {
    match kind {
        "img_no_alt" => ("Image missing alt text", Severity::Medium),
        "empty_interactive" => (
            "Interactive element has no accessible name",
            Severity::Medium,
        ),
        "no_lang" => ("Missing lang attribute on <html>", Severity::Low),
        "input_no_label" => ("Form input missing associated label", Severity::Medium),
        _ => ("Accessibility issue", Severity::Low),
    }
}

#[async_trait]
impl Detector for AccessibilityDetector {
    fn name(&self) -> &'static str {
        "accessibility"
    }

    async fn detect(&self, ctx: &PageContext<'_>) -> DetectorResult<Vec<Bug>> {
        let value = ctx.page.evaluate(SCAN_SCRIPT).await?;
        let issues: Vec<A11yIssue> =
            serde_json::from_value(value).map_err(|e| DetectorError::Page(PageError::Decode(e)))?;

        let bugs = issues
            .into_iter()
            .map(|issue| {
                let (title, severity) = classify(&issue.kind);
                Bug::new(
                    ctx.url,
                    Category::Accessibility,
                    severity,
                    title,
                    issue.detail,
                )
            })
            .collect();

        Ok(bugs)
    }
}
