use serde::Deserialize;

/// Crawler behavior configuration
///
/// All fields have defaults, so a config file only needs to name the values
/// it changes. The defaults match a typical single-site check: twenty pages,
/// a desktop viewport, headless browser.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Maximum number of pages to visit; 0 yields an empty report
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Run the browser without a visible window
    pub headless: bool,

    /// Browser viewport size
    pub viewport: Viewport,

    /// Per-page navigation timeout (milliseconds)
    #[serde(rename = "page-timeout-ms")]
    pub page_timeout_ms: u64,

    /// Time to wait after load for client-side JS to hydrate (milliseconds)
    #[serde(rename = "settle-delay-ms")]
    pub settle_delay_ms: u64,

    /// Timeout for each outbound link probe (milliseconds)
    #[serde(rename = "link-probe-timeout-ms")]
    pub link_probe_timeout_ms: u64,
}

/// Browser viewport dimensions in CSS pixels
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: 20,
            headless: true,
            viewport: Viewport::default(),
            page_timeout_ms: 20_000,
            settle_delay_ms: 1_500,
            link_probe_timeout_ms: 8_000,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
        }
    }
}
