//! Chromium backend over the DevTools protocol
//!
//! This module implements the [`Browser`] capability with `chromiumoxide`.
//! Each `open` call creates a fresh CDP page, subscribes to console,
//! exception and network events before navigating, enforces the navigation
//! timeout, and waits a settle delay so client-side frameworks finish
//! hydrating before detectors look at the DOM.
//!
//! chromiumoxide pages have no Drop cleanup; they must be closed explicitly
//! or they leak CDP connections in the browser process. Every exit path out
//! of `open` that does not hand the page to the caller closes it first.

use crate::browser::{
    Browser, ConsoleEvent, ConsoleEventKind, FailedRequest, OpenError, PageHandle,
};
use crate::config::CrawlConfig;
use crate::{BrowserError, NavigationError, PageError, PageResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    self, EventResponseReceived, ResourceType,
};
use chromiumoxide::cdp::js_protocol::runtime::{
    ConsoleApiCalledType, EventConsoleApiCalled, EventExceptionThrown, RemoteObject,
};
use futures::StreamExt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use url::Url;

/// Chromium-backed implementation of the [`Browser`] capability
pub struct ChromeBrowser {
    browser: tokio::sync::Mutex<CdpBrowser>,
    handler_task: JoinHandle<()>,
    settle_delay: Duration,
}

impl ChromeBrowser {
    /// Launches a Chromium process configured from `config`
    ///
    /// # Returns
    ///
    /// * `Ok(ChromeBrowser)` - Browser process is up and connected
    /// * `Err(BrowserError)` - Chromium missing or failed to start; this is
    ///   the fatal class, nothing can be crawled without it
    pub async fn launch(config: &CrawlConfig) -> Result<Self, BrowserError> {
        let mut builder = BrowserConfig::builder()
            .window_size(config.viewport.width, config.viewport.height);
        if !config.headless {
            builder = builder.with_head();
        }
        let browser_config = builder
            .build()
            .map_err(BrowserError::Launch)?;

        let (browser, mut handler) = CdpBrowser::launch(browser_config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        // The handler drives the CDP websocket; it must be polled for the
        // lifetime of the browser.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error: {}", e);
                }
            }
        });

        tracing::info!(
            "Launched Chromium ({}x{}, headless: {})",
            config.viewport.width,
            config.viewport.height,
            config.headless
        );

        Ok(Self {
            browser: tokio::sync::Mutex::new(browser),
            handler_task,
            settle_delay: Duration::from_millis(config.settle_delay_ms),
        })
    }
}

#[async_trait]
impl Browser for ChromeBrowser {
    async fn open(&self, url: &Url, timeout: Duration) -> Result<Box<dyn PageHandle>, OpenError> {
        // A failure to create a page means the browser process is gone,
        // not that this particular URL is bad.
        let page = {
            let browser = self.browser.lock().await;
            browser
                .new_page("about:blank")
                .await
                .map_err(|e| OpenError::Backend(BrowserError::Connection(e.to_string())))?
        };

        let console: Arc<Mutex<Vec<ConsoleEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let failed: Arc<Mutex<Vec<FailedRequest>>> = Arc::new(Mutex::new(Vec::new()));
        let document_status: Arc<Mutex<Option<u16>>> = Arc::new(Mutex::new(None));
        let mut tasks = Vec::new();

        // Subscribe before navigating so the page observes only its own
        // signals, not leaked state from a prior page.
        if let Err(e) = page.execute(network::EnableParams::default()).await {
            close_page_quietly(&page).await;
            return Err(OpenError::Backend(BrowserError::Connection(e.to_string())));
        }

        match page.event_listener::<EventConsoleApiCalled>().await {
            Ok(mut stream) => {
                let sink = Arc::clone(&console);
                tasks.push(tokio::spawn(async move {
                    while let Some(event) = stream.next().await {
                        if event.r#type == ConsoleApiCalledType::Error {
                            let text = console_args_text(&event.args);
                            sink.lock().unwrap().push(ConsoleEvent {
                                kind: ConsoleEventKind::ConsoleError,
                                text,
                            });
                        }
                    }
                }));
            }
            Err(e) => {
                close_page_quietly(&page).await;
                return Err(OpenError::Backend(BrowserError::Connection(e.to_string())));
            }
        }

        match page.event_listener::<EventExceptionThrown>().await {
            Ok(mut stream) => {
                let sink = Arc::clone(&console);
                tasks.push(tokio::spawn(async move {
                    while let Some(event) = stream.next().await {
                        let details = &event.exception_details;
                        let text = details
                            .exception
                            .as_ref()
                            .and_then(|e| e.description.clone())
                            .unwrap_or_else(|| details.text.clone());
                        sink.lock().unwrap().push(ConsoleEvent {
                            kind: ConsoleEventKind::UnhandledException,
                            text,
                        });
                    }
                }));
            }
            Err(e) => {
                abort_all(&tasks);
                close_page_quietly(&page).await;
                return Err(OpenError::Backend(BrowserError::Connection(e.to_string())));
            }
        }

        match page.event_listener::<EventResponseReceived>().await {
            Ok(mut stream) => {
                let failed_sink = Arc::clone(&failed);
                let status_sink = Arc::clone(&document_status);
                tasks.push(tokio::spawn(async move {
                    while let Some(event) = stream.next().await {
                        let status = event.response.status as u16;
                        if event.r#type == ResourceType::Document {
                            let mut slot = status_sink.lock().unwrap();
                            // First document response is the main navigation.
                            if slot.is_none() {
                                *slot = Some(status);
                            }
                        }
                        if status >= 400 {
                            failed_sink.lock().unwrap().push(FailedRequest {
                                url: event.response.url.clone(),
                                status,
                            });
                        }
                    }
                }));
            }
            Err(e) => {
                abort_all(&tasks);
                close_page_quietly(&page).await;
                return Err(OpenError::Backend(BrowserError::Connection(e.to_string())));
            }
        }

        // Navigate with a hard timeout covering the full load wait.
        let navigation = async {
            page.goto(url.as_str()).await?;
            page.wait_for_navigation().await?;
            Ok::<(), chromiumoxide::error::CdpError>(())
        };

        match tokio::time::timeout(timeout, navigation).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                abort_all(&tasks);
                close_page_quietly(&page).await;
                return Err(OpenError::Navigation(NavigationError::Failed {
                    message: e.to_string(),
                }));
            }
            Err(_) => {
                abort_all(&tasks);
                close_page_quietly(&page).await;
                return Err(OpenError::Navigation(NavigationError::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                }));
            }
        }

        // Let client-side JS hydrate and settle before anything inspects
        // the DOM.
        tokio::time::sleep(self.settle_delay).await;

        let status = *document_status.lock().unwrap();
        if let Some(status) = status {
            if status >= 400 {
                abort_all(&tasks);
                close_page_quietly(&page).await;
                return Err(OpenError::Navigation(NavigationError::HttpStatus { status }));
            }
        }

        Ok(Box::new(ChromePage {
            page: Some(page),
            console,
            failed,
            tasks,
        }))
    }

    async fn close(&self) -> Result<(), BrowserError> {
        let mut browser = self.browser.lock().await;
        browser
            .close()
            .await
            .map_err(|e| BrowserError::Connection(e.to_string()))?;
        self.handler_task.abort();
        Ok(())
    }
}

/// One open Chromium page with its captured signals
struct ChromePage {
    page: Option<chromiumoxide::Page>,
    console: Arc<Mutex<Vec<ConsoleEvent>>>,
    failed: Arc<Mutex<Vec<FailedRequest>>>,
    tasks: Vec<JoinHandle<()>>,
}

#[async_trait]
impl PageHandle for ChromePage {
    async fn evaluate(&self, script: &str) -> PageResult<serde_json::Value> {
        let page = self
            .page
            .as_ref()
            .ok_or_else(|| PageError::Evaluate("page already closed".to_string()))?;

        let result = page
            .evaluate(script)
            .await
            .map_err(|e| PageError::Evaluate(e.to_string()))?;

        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn console_events(&self) -> Vec<ConsoleEvent> {
        self.console.lock().unwrap().clone()
    }

    async fn failed_requests(&self) -> Vec<FailedRequest> {
        self.failed.lock().unwrap().clone()
    }

    async fn close(&mut self) -> PageResult<()> {
        abort_all(&self.tasks);
        if let Some(page) = self.page.take() {
            page.close()
                .await
                .map_err(|e| PageError::Evaluate(format!("failed to close page: {}", e)))?;
        }
        Ok(())
    }
}

/// Builds a readable message out of console.error arguments
fn console_args_text(args: &[RemoteObject]) -> String {
    let parts: Vec<String> = args
        .iter()
        .filter_map(|arg| {
            if let Some(value) = &arg.value {
                Some(match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
            } else {
                arg.description.clone()
            }
        })
        .collect();

    if parts.is_empty() {
        "(no message)".to_string()
    } else {
        parts.join(" ")
    }
}

fn abort_all(tasks: &[JoinHandle<()>]) {
    for task in tasks {
        task.abort();
    }
}

async fn close_page_quietly(page: &chromiumoxide::Page) {
    if let Err(e) = page.clone().close().await {
        tracing::debug!("Failed to close page after error: {}", e);
    }
}
