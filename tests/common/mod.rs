//! Shared test helpers: a scripted browser backend and canned detectors.
//!
//! `MockBrowser` maps URLs to scripted pages and records every `open` call,
//! so tests can assert both what the crawl reported and which pages it
//! actually navigated to.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;
use vibecheck::browser::{Browser, ConsoleEvent, FailedRequest, OpenError, PageHandle};
use vibecheck::detectors::{Bug, Category, Detector, PageContext, Severity};
use vibecheck::{BrowserError, DetectorError, DetectorResult, NavigationError, PageResult};

/// Scripted behavior for one URL
#[derive(Clone, Default)]
pub struct PageScript {
    /// Absolute hrefs the page's anchors point at
    pub links: Vec<String>,
    pub console: Vec<ConsoleEvent>,
    pub failed_requests: Vec<FailedRequest>,
    /// When set, `open` fails with this instead of yielding a page
    pub failure: Option<NavigationError>,
}

impl PageScript {
    pub fn with_links(links: &[&str]) -> Self {
        Self {
            links: links.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn failing(failure: NavigationError) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }
}

/// Browser backend driven entirely by a URL-to-script map
pub struct MockBrowser {
    pages: HashMap<String, PageScript>,
    opened: Arc<Mutex<Vec<String>>>,
}

impl MockBrowser {
    pub fn new(pages: Vec<(&str, PageScript)>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|(url, script)| (url.to_string(), script))
                .collect(),
            opened: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared record of every URL passed to `open`, in call order
    pub fn opened_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.opened)
    }
}

#[async_trait]
impl Browser for MockBrowser {
    async fn open(&self, url: &Url, _timeout: Duration) -> Result<Box<dyn PageHandle>, OpenError> {
        self.opened.lock().unwrap().push(url.to_string());

        let script = self.pages.get(url.as_str()).cloned().unwrap_or_default();
        if let Some(failure) = script.failure {
            return Err(OpenError::Navigation(failure));
        }
        Ok(Box::new(MockPage { script }))
    }

    async fn close(&self) -> Result<(), BrowserError> {
        Ok(())
    }
}

struct MockPage {
    script: PageScript,
}

#[async_trait]
impl PageHandle for MockPage {
    // Every evaluation answers with the scripted hrefs. That satisfies the
    // crawler's anchor-href collector; detectors expecting another shape
    // get a decode failure, which exercises the isolation path.
    async fn evaluate(&self, _script: &str) -> PageResult<serde_json::Value> {
        Ok(serde_json::json!(self.script.links))
    }

    async fn console_events(&self) -> Vec<ConsoleEvent> {
        self.script.console.clone()
    }

    async fn failed_requests(&self) -> Vec<FailedRequest> {
        self.script.failed_requests.clone()
    }

    async fn close(&mut self) -> PageResult<()> {
        Ok(())
    }
}

/// Backend whose browser process is gone: every `open` fails fatally.
/// Records whether `close` was still called.
pub struct DisconnectedBrowser {
    closed: Arc<AtomicBool>,
}

impl DisconnectedBrowser {
    pub fn new() -> Self {
        Self {
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn close_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }
}

#[async_trait]
impl Browser for DisconnectedBrowser {
    async fn open(&self, _url: &Url, _timeout: Duration) -> Result<Box<dyn PageHandle>, OpenError> {
        Err(OpenError::Backend(BrowserError::Connection(
            "websocket closed".to_string(),
        )))
    }

    async fn close(&self) -> Result<(), BrowserError> {
        self.closed.store(true, Ordering::Relaxed);
        Ok(())
    }
}

/// Detector that reports one canned finding on every page it inspects
pub struct StaticDetector {
    pub name: &'static str,
    pub category: Category,
    pub severity: Severity,
    pub title: &'static str,
}

#[async_trait]
impl Detector for StaticDetector {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn detect(&self, ctx: &PageContext<'_>) -> DetectorResult<Vec<Bug>> {
        Ok(vec![Bug::new(
            ctx.url,
            self.category.clone(),
            self.severity,
            self.title,
            format!("{} on {}", self.title, ctx.url),
        )])
    }
}

/// Detector that fails on every page
pub struct FailingDetector {
    pub name: &'static str,
}

#[async_trait]
impl Detector for FailingDetector {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn detect(&self, _ctx: &PageContext<'_>) -> DetectorResult<Vec<Bug>> {
        Err(DetectorError::Other("synthetic malfunction".to_string()))
    }
}
