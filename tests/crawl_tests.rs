//! End-to-end crawl behavior against a scripted browser backend.

mod common;

use async_trait::async_trait;
use common::{DisconnectedBrowser, FailingDetector, MockBrowser, PageScript, StaticDetector};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use vibecheck::browser::{ConsoleEvent, ConsoleEventKind};
use vibecheck::config::CrawlConfig;
use vibecheck::crawler::Crawler;
use vibecheck::detectors::{Bug, Category, Detector, PageContext, Severity};
use vibecheck::{DetectorResult, NavigationError};

fn config_with_max_pages(max_pages: usize) -> CrawlConfig {
    CrawlConfig {
        max_pages,
        ..CrawlConfig::default()
    }
}

fn seo_detector() -> Box<dyn Detector> {
    Box::new(StaticDetector {
        name: "meta-seo",
        category: Category::Seo,
        severity: Severity::Low,
        title: "Missing favicon",
    })
}

#[tokio::test]
async fn test_crawl_stays_on_origin() {
    let browser = MockBrowser::new(vec![
        (
            "https://a.test/",
            PageScript::with_links(&[
                "https://a.test/about",
                "https://other.test/elsewhere",
                "mailto:team@a.test",
            ]),
        ),
        ("https://a.test/about", PageScript::default()),
    ]);
    let opened = browser.opened_log();

    let mut crawler = Crawler::new(
        "https://a.test/",
        config_with_max_pages(20),
        Box::new(browser),
        vec![],
    )
    .unwrap();
    let report = crawler.run().await.unwrap();

    assert_eq!(report.pages_visited, 2);
    let opened = opened.lock().unwrap();
    assert_eq!(
        opened.as_slice(),
        ["https://a.test/", "https://a.test/about"]
    );
}

#[tokio::test]
async fn test_unreachable_seed_yields_single_broken_link_bug() {
    let browser = MockBrowser::new(vec![(
        "https://a.test/",
        PageScript::failing(NavigationError::HttpStatus { status: 500 }),
    )]);

    let mut crawler = Crawler::new(
        "https://a.test/",
        config_with_max_pages(20),
        Box::new(browser),
        vec![seo_detector()],
    )
    .unwrap();
    let report = crawler.run().await.unwrap();

    // The failed page still counts as visited; detectors never ran on it.
    assert_eq!(report.pages_visited, 1);
    assert_eq!(report.bugs.len(), 1);
    assert_eq!(report.bugs[0].category, Category::BrokenLink);
    assert_eq!(report.bugs[0].severity, Severity::High);
    assert_eq!(report.bugs[0].title, "HTTP 500");
}

#[tokio::test]
async fn test_zero_page_ceiling_skips_navigation() {
    let browser = MockBrowser::new(vec![("https://a.test/", PageScript::default())]);
    let opened = browser.opened_log();

    let mut crawler = Crawler::new(
        "https://a.test/",
        config_with_max_pages(0),
        Box::new(browser),
        vec![seo_detector()],
    )
    .unwrap();
    let report = crawler.run().await.unwrap();

    assert_eq!(report.pages_visited, 0);
    assert!(report.bugs.is_empty());
    assert!(opened.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_cyclic_links_are_visited_once() {
    let browser = MockBrowser::new(vec![
        (
            "https://a.test/",
            PageScript::with_links(&["https://a.test/b"]),
        ),
        (
            "https://a.test/b",
            PageScript::with_links(&["https://a.test/", "https://a.test/b"]),
        ),
    ]);
    let opened = browser.opened_log();

    let mut crawler = Crawler::new(
        "https://a.test/",
        config_with_max_pages(20),
        Box::new(browser),
        vec![],
    )
    .unwrap();
    let report = crawler.run().await.unwrap();

    assert_eq!(report.pages_visited, 2);
    assert_eq!(opened.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_fragment_variants_collapse_to_one_page() {
    let browser = MockBrowser::new(vec![
        (
            "https://a.test/",
            PageScript::with_links(&["https://a.test/page#intro", "https://a.test/page#faq"]),
        ),
        ("https://a.test/page", PageScript::default()),
    ]);
    let opened = browser.opened_log();

    let mut crawler = Crawler::new(
        "https://a.test/",
        config_with_max_pages(20),
        Box::new(browser),
        vec![],
    )
    .unwrap();
    let report = crawler.run().await.unwrap();

    assert_eq!(report.pages_visited, 2);
    assert_eq!(
        opened.lock().unwrap().as_slice(),
        ["https://a.test/", "https://a.test/page"]
    );
}

#[tokio::test]
async fn test_page_ceiling_stops_the_crawl() {
    let browser = MockBrowser::new(vec![
        (
            "https://a.test/",
            PageScript::with_links(&["https://a.test/p1"]),
        ),
        (
            "https://a.test/p1",
            PageScript::with_links(&["https://a.test/p2"]),
        ),
        (
            "https://a.test/p2",
            PageScript::with_links(&["https://a.test/p3"]),
        ),
        (
            "https://a.test/p3",
            PageScript::with_links(&["https://a.test/p4"]),
        ),
    ]);
    let opened = browser.opened_log();

    let mut crawler = Crawler::new(
        "https://a.test/",
        config_with_max_pages(3),
        Box::new(browser),
        vec![],
    )
    .unwrap();
    let report = crawler.run().await.unwrap();

    assert_eq!(report.pages_visited, 3);
    assert_eq!(opened.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_links_on_failed_pages_are_not_followed() {
    // /broken links to /hidden in its markup, but since navigation fails the
    // DOM is never read, so /hidden must stay unvisited.
    let browser = MockBrowser::new(vec![
        (
            "https://a.test/",
            PageScript::with_links(&["https://a.test/broken"]),
        ),
        (
            "https://a.test/broken",
            PageScript {
                links: vec!["https://a.test/hidden".to_string()],
                failure: Some(NavigationError::Failed {
                    message: "net::ERR_CONNECTION_RESET".to_string(),
                }),
                ..PageScript::default()
            },
        ),
    ]);
    let opened = browser.opened_log();

    let mut crawler = Crawler::new(
        "https://a.test/",
        config_with_max_pages(20),
        Box::new(browser),
        vec![],
    )
    .unwrap();
    let report = crawler.run().await.unwrap();

    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.bugs.len(), 1);
    assert_eq!(report.bugs[0].title, "Page failed to load");
    assert!(!opened
        .lock()
        .unwrap()
        .iter()
        .any(|u| u.contains("hidden")));
}

#[tokio::test]
async fn test_failing_detector_does_not_poison_the_rest() {
    let browser = MockBrowser::new(vec![("https://a.test/", PageScript::default())]);

    let mut crawler = Crawler::new(
        "https://a.test/",
        config_with_max_pages(20),
        Box::new(browser),
        vec![
            Box::new(FailingDetector { name: "overflow" }),
            seo_detector(),
        ],
    )
    .unwrap();
    let report = crawler.run().await.unwrap();

    // The malfunction surfaces as a diagnostic, never as a site finding.
    assert_eq!(report.bugs.len(), 1);
    assert_eq!(report.bugs[0].title, "Missing favicon");
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("overflow"));
    assert!(report.errors[0].contains("https://a.test/"));
}

#[tokio::test]
async fn test_bug_order_follows_visit_then_registration_order() {
    let browser = MockBrowser::new(vec![
        (
            "https://a.test/",
            PageScript::with_links(&["https://a.test/next"]),
        ),
        ("https://a.test/next", PageScript::default()),
    ]);

    let mut crawler = Crawler::new(
        "https://a.test/",
        config_with_max_pages(20),
        Box::new(browser),
        vec![
            Box::new(StaticDetector {
                name: "console-errors",
                category: Category::Console,
                severity: Severity::Medium,
                title: "JS console error",
            }),
            seo_detector(),
        ],
    )
    .unwrap();
    let report = crawler.run().await.unwrap();

    let titles: Vec<&str> = report.bugs.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(
        titles,
        [
            "JS console error",
            "Missing favicon",
            "JS console error",
            "Missing favicon",
        ]
    );
    assert!(report.bugs[0].url.starts_with("https://a.test/"));
    assert_eq!(report.bugs[2].url, "https://a.test/next");
}

#[tokio::test]
async fn test_console_signals_become_findings_through_real_detector() {
    let browser = MockBrowser::new(vec![(
        "https://a.test/",
        PageScript {
            console: vec![
                ConsoleEvent {
                    kind: ConsoleEventKind::UnhandledException,
                    text: "TypeError: x is undefined".to_string(),
                },
                ConsoleEvent {
                    kind: ConsoleEventKind::ConsoleError,
                    text: "failed to fetch config".to_string(),
                },
            ],
            ..PageScript::default()
        },
    )]);

    let config = config_with_max_pages(20);
    let detectors = vibecheck::detectors::default_detectors(&config);
    let mut crawler =
        Crawler::new("https://a.test/", config, Box::new(browser), detectors).unwrap();
    let report = crawler.run().await.unwrap();

    let console_bugs: Vec<_> = report
        .bugs
        .iter()
        .filter(|b| b.category == Category::Console)
        .collect();
    assert_eq!(console_bugs.len(), 2);
    assert_eq!(console_bugs[0].severity, Severity::High);
    assert_eq!(console_bugs[1].severity, Severity::Medium);
}

/// Requests cancellation from inside a page visit, so the crawl stops at
/// the next loop boundary with the first page already processed.
struct StopRequestingDetector {
    handle: Arc<Mutex<Option<Arc<AtomicBool>>>>,
}

#[async_trait]
impl Detector for StopRequestingDetector {
    fn name(&self) -> &'static str {
        "stop-requester"
    }

    async fn detect(&self, _ctx: &PageContext<'_>) -> DetectorResult<Vec<Bug>> {
        if let Some(flag) = self.handle.lock().unwrap().as_ref() {
            flag.store(true, Ordering::Relaxed);
        }
        Ok(Vec::new())
    }
}

fn cyclic_site() -> Vec<(&'static str, PageScript)> {
    vec![
        (
            "https://a.test/",
            PageScript::with_links(&["https://a.test/b", "https://a.test/c"]),
        ),
        (
            "https://a.test/b",
            PageScript::with_links(&["https://a.test/c", "https://a.test/"]),
        ),
        (
            "https://a.test/c",
            PageScript::with_links(&["https://a.test/"]),
        ),
    ]
}

#[tokio::test]
async fn test_repeat_runs_produce_identical_reports() {
    let mut reports = Vec::new();
    for _ in 0..2 {
        let browser = MockBrowser::new(cyclic_site());
        let mut crawler = Crawler::new(
            "https://a.test/",
            config_with_max_pages(20),
            Box::new(browser),
            vec![
                Box::new(StaticDetector {
                    name: "console-errors",
                    category: Category::Console,
                    severity: Severity::Medium,
                    title: "JS console error",
                }),
                seo_detector(),
            ],
        )
        .unwrap();
        reports.push(crawler.run().await.unwrap());
    }

    let first: Vec<(&str, &str)> = reports[0]
        .bugs
        .iter()
        .map(|b| (b.url.as_str(), b.title.as_str()))
        .collect();
    let second: Vec<(&str, &str)> = reports[1]
        .bugs
        .iter()
        .map(|b| (b.url.as_str(), b.title.as_str()))
        .collect();

    assert_eq!(reports[0].pages_visited, reports[1].pages_visited);
    assert_eq!(reports[0].pages_visited, 3);
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[tokio::test]
async fn test_cancellation_after_first_page_keeps_its_findings() {
    let browser = MockBrowser::new(cyclic_site());
    let opened = browser.opened_log();

    let handle: Arc<Mutex<Option<Arc<AtomicBool>>>> = Arc::new(Mutex::new(None));
    let mut crawler = Crawler::new(
        "https://a.test/",
        config_with_max_pages(20),
        Box::new(browser),
        vec![
            Box::new(StopRequestingDetector {
                handle: Arc::clone(&handle),
            }),
            seo_detector(),
        ],
    )
    .unwrap();
    *handle.lock().unwrap() = Some(crawler.stop_handle());

    let report = crawler.run().await.unwrap();

    assert_eq!(report.pages_visited, 1);
    assert_eq!(opened.lock().unwrap().len(), 1);
    assert_eq!(report.bugs.len(), 1);
    assert_eq!(report.bugs[0].title, "Missing favicon");
    assert_eq!(report.bugs[0].url, "https://a.test/");
}

#[tokio::test]
async fn test_backend_loss_closes_browser_before_aborting() {
    let browser = DisconnectedBrowser::new();
    let closed = browser.close_flag();

    let mut crawler = Crawler::new(
        "https://a.test/",
        config_with_max_pages(20),
        Box::new(browser),
        vec![],
    )
    .unwrap();

    let result = crawler.run().await;
    assert!(result.is_err());
    assert!(closed.load(Ordering::Relaxed));
}

#[tokio::test]
async fn test_cancellation_stops_between_pages() {
    let browser = MockBrowser::new(vec![
        (
            "https://a.test/",
            PageScript::with_links(&["https://a.test/later"]),
        ),
        ("https://a.test/later", PageScript::default()),
    ]);
    let opened = browser.opened_log();

    let mut crawler = Crawler::new(
        "https://a.test/",
        config_with_max_pages(20),
        Box::new(browser),
        vec![],
    )
    .unwrap();

    // Flag raised before the run starts: not a single page gets opened.
    crawler
        .stop_handle()
        .store(true, std::sync::atomic::Ordering::Relaxed);
    let report = crawler.run().await.unwrap();

    assert_eq!(report.pages_visited, 0);
    assert!(opened.lock().unwrap().is_empty());
}
