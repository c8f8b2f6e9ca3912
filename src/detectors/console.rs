//! Console error detector
//!
//! Turns the console signals captured during page load (console.error calls
//! and unhandled exceptions) into findings. The capture itself happens in
//! the page visitor, scoped to one navigation, so this detector only reads
//! the context.

use crate::browser::ConsoleEventKind;
use crate::detectors::{Bug, Category, Detector, PageContext, Severity};
use crate::DetectorResult;
use async_trait::async_trait;

const MAX_DESCRIPTION_LEN: usize = 500;

/// Reports JavaScript console errors and unhandled exceptions
pub struct ConsoleErrorDetector;

impl ConsoleErrorDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleErrorDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Detector for ConsoleErrorDetector {
    fn name(&self) -> &'static str {
        "console-errors"
    }

    async fn detect(&self, ctx: &PageContext<'_>) -> DetectorResult<Vec<Bug>> {
        let bugs = ctx
            .console
            .iter()
            .map(|event| {
                let (severity, title) = match event.kind {
                    ConsoleEventKind::UnhandledException => {
                        (Severity::High, "Unhandled JS exception")
                    }
                    ConsoleEventKind::ConsoleError => (Severity::Medium, "JS console error"),
                };
                let description = truncate(&event.text, MAX_DESCRIPTION_LEN);
                Bug::new(ctx.url, Category::Console, severity, title, description)
            })
            .collect();

        Ok(bugs)
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{ConsoleEvent, PageHandle};
    use crate::PageResult;
    use url::Url;

    struct NoopPage;

    #[async_trait]
    impl PageHandle for NoopPage {
        async fn evaluate(&self, _script: &str) -> PageResult<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }
        async fn console_events(&self) -> Vec<ConsoleEvent> {
            Vec::new()
        }
        async fn failed_requests(&self) -> Vec<crate::browser::FailedRequest> {
            Vec::new()
        }
        async fn close(&mut self) -> PageResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_maps_event_kinds_to_severity() {
        let url = Url::parse("https://example.com/").unwrap();
        let console = vec![
            ConsoleEvent {
                kind: ConsoleEventKind::ConsoleError,
                text: "failed to fetch /api".to_string(),
            },
            ConsoleEvent {
                kind: ConsoleEventKind::UnhandledException,
                text: "TypeError: x is undefined".to_string(),
            },
        ];
        let page = NoopPage;
        let ctx = PageContext {
            page: &page,
            url: &url,
            console: &console,
            failed_requests: &[],
        };

        let bugs = ConsoleErrorDetector::new().detect(&ctx).await.unwrap();
        assert_eq!(bugs.len(), 2);
        assert_eq!(bugs[0].severity, Severity::Medium);
        assert_eq!(bugs[1].severity, Severity::High);
        assert!(bugs.iter().all(|b| b.category == Category::Console));
    }

    #[tokio::test]
    async fn test_no_events_no_bugs() {
        let url = Url::parse("https://example.com/").unwrap();
        let page = NoopPage;
        let ctx = PageContext {
            page: &page,
            url: &url,
            console: &[],
            failed_requests: &[],
        };

        let bugs = ConsoleErrorDetector::new().detect(&ctx).await.unwrap();
        assert!(bugs.is_empty());
    }

    #[test]
    fn test_truncate_long_message() {
        let long = "x".repeat(600);
        assert_eq!(truncate(&long, 500).len(), 500);
        assert_eq!(truncate("short", 500), "short");
    }
}
