//! Link extraction and scope filtering
//!
//! Pulls every `a[href]` target out of the visited page's DOM, resolves
//! relative references against the page URL, normalizes, and keeps only
//! same-origin non-asset targets. Cross-origin links are excluded from
//! traversal here; detectors may still probe them.

use crate::browser::PageHandle;
use crate::url::{resolve_against, same_origin};
use crate::PageResult;
use std::collections::BTreeSet;
use url::Url;

const HREFS_SCRIPT: &str = r#"(() =>
    Array.from(document.querySelectorAll('a[href]')).map(a => a.href)
)()"#;

/// File extensions that are downloads/assets rather than pages; following
/// them would open binary responses in the browser for nothing.
const ASSET_EXTENSIONS: &[&str] = &[
    ".css", ".js", ".mjs", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".ico", ".pdf",
    ".zip", ".gz", ".tar", ".mp3", ".mp4", ".webm", ".woff", ".woff2", ".ttf", ".xml", ".rss",
];

/// Extracts the in-scope outbound links of a visited page
///
/// # Arguments
///
/// * `page` - The live page handle
/// * `base` - The page's own normalized URL, used to resolve relative hrefs
///   and as the origin that defines crawl scope
///
/// # Returns
///
/// Normalized, deduplicated, sorted same-origin URLs. Sorting makes frontier
/// growth deterministic for a deterministic site.
pub async fn extract_links(page: &dyn PageHandle, base: &Url) -> PageResult<Vec<Url>> {
    let value = page.evaluate(HREFS_SCRIPT).await?;
    let hrefs: Vec<String> = serde_json::from_value(value)?;

    let mut links = BTreeSet::new();
    for href in &hrefs {
        let url = match resolve_against(base, href) {
            Ok(u) => u,
            Err(e) => {
                tracing::debug!("Skipping unparseable href {:?}: {}", href, e);
                continue;
            }
        };

        if !same_origin(&url, base) {
            continue;
        }

        if is_asset(&url) {
            continue;
        }

        links.insert(url);
    }

    Ok(links.into_iter().collect())
}

fn is_asset(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    ASSET_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
