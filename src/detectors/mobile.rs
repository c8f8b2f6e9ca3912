//! Mobile responsiveness detector
//!
//! Evaluates the page at its current viewport and flags common breakage
//! patterns: elements wider than the viewport, inline fixed pixel widths
//! that cannot adapt, tap targets under 44x44 CSS pixels, and body text
//! below 12px. For a full mobile audit, run the crawl with a phone-sized
//! viewport in the config.

use crate::detectors::{Bug, Category, Detector, PageContext, Severity};
use crate::{DetectorError, DetectorResult, PageError};
use async_trait::async_trait;
use serde::Deserialize;

const SCAN_SCRIPT: &str = r#"(() => {
    const problems = [];
    const vw = window.innerWidth;

    for (const el of document.querySelectorAll('*')) {
        const rect = el.getBoundingClientRect();
        if (rect.width > vw + 5 && rect.width > 0) {
            const tag = el.tagName.toLowerCase();
            if (tag === 'html' || tag === 'body') continue;
            const id = el.id ? '#' + el.id : '';
            const cls = el.className && typeof el.className === 'string'
                ? '.' + el.className.trim().split(/\s+/).slice(0, 2).join('.')
                : '';
            problems.push({
                kind: 'wider_than_viewport',
                selector: tag + id + cls,
                elementWidth: Math.round(rect.width),
                viewportWidth: vw,
            });
            if (problems.length >= 15) break;
        }
    }

    document.querySelectorAll('[style*="width"]').forEach(el => {
        const style = el.getAttribute('style') || '';
        const match = style.match(/width:\s*(\d+)px/);
        if (match && parseInt(match[1]) > vw) {
            problems.push({
                kind: 'fixed_width_overflow',
                selector: el.tagName.toLowerCase(),
                detail: style.slice(0, 100),
            });
        }
    });

    document.querySelectorAll('a, button, input, select, textarea').forEach(el => {
        const rect = el.getBoundingClientRect();
        if (
            rect.width > 0 && rect.height > 0 &&
            (rect.width < 44 || rect.height < 44) &&
            rect.width < 200
        ) {
            const text = (el.innerText || el.getAttribute('aria-label') || '')
                .trim().slice(0, 40);
            problems.push({
                kind: 'small_tap_target',
                selector: el.tagName.toLowerCase(),
                detail: text,
                width: Math.round(rect.width),
                height: Math.round(rect.height),
            });
        }
    });

    const textEls = document.querySelectorAll('p, span, li, td, th, label');
    for (const el of textEls) {
        const fontSize = parseFloat(getComputedStyle(el).fontSize);
        if (fontSize > 0 && fontSize < 12 && (el.innerText || '').trim().length > 5) {
            problems.push({
                kind: 'small_text',
                detail: el.innerText.trim().slice(0, 60),
                fontSize: fontSize,
            });
            break;
        }
    }

    return problems.slice(0, 25);
})()"#;

#[derive(Debug, Deserialize)]
struct MobileIssue {
    kind: String,
    #[serde(default)]
    selector: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(rename = "elementWidth", default)]
    element_width: Option<i64>,
    #[serde(rename = "viewportWidth", default)]
    viewport_width: Option<i64>,
    #[serde(default)]
    width: Option<i64>,
    #[serde(default)]
    height: Option<i64>,
    #[serde(rename = "fontSize", default)]
    font_size: Option<f64>,
}

/// Reports mobile-responsiveness breakage at the current viewport
pub struct MobileDetector;

impl MobileDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MobileDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn issue_to_bug(url: &url::Url, issue: MobileIssue) -> Option<Bug> {
    let selector = issue.selector.clone().unwrap_or_default();
    let detail = issue.detail.clone().unwrap_or_default();

    match issue.kind.as_str() {
        "wider_than_viewport" => Some(
            Bug::new(
                url,
                Category::Mobile,
                Severity::Medium,
                "Element wider than viewport",
                format!(
                    "Element `{}` is {}px wide but viewport is {}px.",
                    selector,
                    issue.element_width.unwrap_or(0),
                    issue.viewport_width.unwrap_or(0)
                ),
            )
            .with_selector(selector),
        ),
        "fixed_width_overflow" => Some(Bug::new(
            url,
            Category::Mobile,
            Severity::Medium,
            "Fixed-width element overflows viewport",
            format!("Inline style sets a fixed pixel width: {}", detail),
        )),
        "small_tap_target" => Some(Bug::new(
            url,
            Category::Mobile,
            Severity::Low,
            "Tap target too small",
            format!(
                "`{}` \"{}\" is only {}x{}px (minimum recommended: 44x44px).",
                selector,
                detail,
                issue.width.unwrap_or(0),
                issue.height.unwrap_or(0)
            ),
        )),
        "small_text" => Some(Bug::new(
            url,
            Category::Mobile,
            Severity::Low,
            "Text may be too small on mobile",
            format!(
                "Text \"{}\" is {}px (minimum recommended: 12px).",
                detail,
                issue.font_size.unwrap_or(0.0)
            ),
        )),
        _ => None,
    }
}

#[async_trait]
impl Detector for MobileDetector {
    fn name(&self) -> &'static str {
        "mobile"
    }

    async fn detect(&self, ctx: &PageContext<'_>) -> DetectorResult<Vec<Bug>> {
        let value = ctx.page.evaluate(SCAN_SCRIPT).await?;
        let issues: Vec<MobileIssue> =
            serde_json::from_value(value).map_err(|e| DetectorError::Page(PageError::Decode(e)))?;

        Ok(issues
            .into_iter()
            .filter_map(|issue| issue_to_bug(ctx.url, issue))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn url() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    fn issue(kind: &str) -> MobileIssue {
        MobileIssue {
            kind: kind.to_string(),
            selector: Some("div.hero".to_string()),
            detail: Some("Sign up".to_string()),
            element_width: Some(1500),
            viewport_width: Some(375),
            width: Some(30),
            height: Some(20),
            font_size: Some(10.0),
        }
    }

    #[test]
    fn test_wider_than_viewport_is_medium() {
        let bug = issue_to_bug(&url(), issue("wider_than_viewport")).unwrap();
        assert_eq!(bug.severity, Severity::Medium);
        assert_eq!(bug.selector.as_deref(), Some("div.hero"));
        assert!(bug.description.contains("1500px"));
    }

    #[test]
    fn test_small_tap_target_is_low() {
        let bug = issue_to_bug(&url(), issue("small_tap_target")).unwrap();
        assert_eq!(bug.severity, Severity::Low);
        assert!(bug.description.contains("30x20px"));
    }

    #[test]
    fn test_unknown_kind_is_dropped() {
        assert!(issue_to_bug(&url(), issue("zoom_level")).is_none());
    }
}
