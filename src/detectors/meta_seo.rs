//! Meta/SEO detector
//!
//! Checks the document head for the basics a published site should have:
//! title, viewport meta tag, meta description, favicon, and a sane heading
//! structure. A missing viewport tag usually means the page is broken on
//! mobile devices.

use crate::detectors::{Bug, Category, Detector, PageContext, Severity};
use crate::{DetectorError, DetectorResult, PageError};
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

const SCAN_SCRIPT: &str = r#"(() => ({
    title: document.title,
    metaDescription:
        (document.querySelector('meta[name="description"]') || {}).content || '',
    viewport:
        (document.querySelector('meta[name="viewport"]') || {}).content || '',
    h1Count: document.querySelectorAll('h1').length,
    favicon: !!document.querySelector('link[rel*="icon"]'),
}))()"#;

#[derive(Debug, Deserialize)]
struct HeadInfo {
    title: String,
    #[serde(rename = "metaDescription")]
    meta_description: String,
    viewport: String,
    #[serde(rename = "h1Count")]
    h1_count: u32,
    favicon: bool,
}

/// Reports missing meta tags, title, viewport and heading problems
pub struct MetaSeoDetector;

impl MetaSeoDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MetaSeoDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn check_head(url: &Url, info: &HeadInfo) -> Vec<Bug> {
    let mut bugs = Vec::new();

    if info.title.is_empty() {
        bugs.push(Bug::new(
            url,
            Category::Seo,
            Severity::Medium,
            "Missing page <title>",
            "The page has no <title> tag.",
        ));
    }

    if info.viewport.is_empty() {
        bugs.push(Bug::new(
            url,
            Category::Seo,
            Severity::Medium,
            "Missing viewport meta tag",
            "No <meta name='viewport'> found - this page is likely broken on mobile devices.",
        ));
    }

    if info.meta_description.is_empty() {
        bugs.push(Bug::new(
            url,
            Category::Seo,
            Severity::Low,
            "Missing meta description",
            "No <meta name='description'> tag found.",
        ));
    }

    if !info.favicon {
        bugs.push(Bug::new(
            url,
            Category::Seo,
            Severity::Low,
            "Missing favicon",
            "No <link rel='icon'> found.",
        ));
    }

    if info.h1_count == 0 {
        bugs.push(Bug::new(
            url,
            Category::Seo,
            Severity::Low,
            "No <h1> heading found",
            "Page has no <h1> element.",
        ));
    } else if info.h1_count > 1 {
        bugs.push(Bug::new(
            url,
            Category::Seo,
            Severity::Low,
            format!("Multiple <h1> tags ({})", info.h1_count),
            "Best practice is a single <h1> per page.",
        ));
    }

    bugs
}

#[async_trait]
impl Detector for MetaSeoDetector {
    fn name(&self) -> &'static str {
        "meta-seo"
    }

    async fn detect(&self, ctx: &PageContext<'_>) -> DetectorResult<Vec<Bug>> {
        let value = ctx.page.evaluate(SCAN_SCRIPT).await?;
        let info: HeadInfo =
            serde_json::from_value(value).map_err(|e| DetectorError::Page(PageError::Decode(e)))?;

        Ok(check_head(ctx.url, &info))
    }
}
