//! Browser backend capability
//!
//! The crawler never talks to a browser directly; it goes through the
//! [`Browser`] and [`PageHandle`] traits defined here. One real
//! implementation ships with the crate ([`chrome::ChromeBrowser`], driving
//! Chromium over the DevTools protocol); tests supply scripted backends.
//!
//! A [`PageHandle`] is valid only for the duration of one page visit and
//! must be closed by whoever opened it. Ambient signals (console errors,
//! failed network responses) are captured from navigation start, so each
//! page observes only its own signals.

pub mod chrome;

use crate::{BrowserError, NavigationError, PageResult};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use url::Url;

pub use chrome::ChromeBrowser;

/// Why an `open` call did not yield a usable page
#[derive(Debug)]
pub enum OpenError {
    /// Page-scoped failure (timeout, DNS, HTTP error status); the crawl
    /// records it and continues
    Navigation(NavigationError),

    /// The browser backend itself is gone; the crawl aborts
    Backend(BrowserError),
}

/// A console-level signal captured while a page was loading
#[derive(Debug, Clone, Serialize)]
pub struct ConsoleEvent {
    pub kind: ConsoleEventKind,
    pub text: String,
}

/// Kind of captured console signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleEventKind {
    /// `console.error(...)` call
    ConsoleError,
    /// Uncaught JavaScript exception
    UnhandledException,
}

/// A network response with an error status, captured during one page load
#[derive(Debug, Clone, Serialize)]
pub struct FailedRequest {
    pub url: String,
    pub status: u16,
}

/// The browser-automation backend
#[async_trait]
pub trait Browser: Send + Sync {
    /// Opens `url` in a fresh page and waits for a load/stability signal
    ///
    /// Signal capture starts before navigation, so the returned handle's
    /// console and network lists cover this page only. A navigation that
    /// completes with an HTTP status of 400 or higher is an
    /// [`OpenError::Navigation`], not a success.
    async fn open(&self, url: &Url, timeout: Duration) -> Result<Box<dyn PageHandle>, OpenError>;

    /// Shuts the backend down, releasing the browser process
    async fn close(&self) -> Result<(), BrowserError>;
}

/// An open browser page
///
/// Valid only within the page visit that opened it; detectors must not
/// retain it past their `detect` call.
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Evaluates a JavaScript expression in the page and returns its value
    async fn evaluate(&self, script: &str) -> PageResult<serde_json::Value>;

    /// Console errors and unhandled exceptions captured since navigation start
    async fn console_events(&self) -> Vec<ConsoleEvent>;

    /// Network responses with status >= 400 captured since navigation start
    async fn failed_requests(&self) -> Vec<FailedRequest>;

    /// Releases the page resource
    async fn close(&mut self) -> PageResult<()>;
}
