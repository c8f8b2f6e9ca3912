//! Vibecheck main entry point
//!
//! Command-line interface: crawl a site, print the findings, and write
//! JSON/HTML reports.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing_subscriber::EnvFilter;
use vibecheck::browser::ChromeBrowser;
use vibecheck::config::{load_config, validate_config, CrawlConfig};
use vibecheck::crawler::Crawler;
use vibecheck::detectors::default_detectors;
use vibecheck::report::{print_report, write_html_report, write_json_report};

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Json,
    Html,
    Both,
}

/// Vibecheck: find bugs in websites with a real browser
///
/// Crawls a site breadth-first from a seed URL, opens every same-origin
/// page in Chromium, and runs a set of defect detectors against each one.
#[derive(Parser, Debug)]
#[command(name = "vibecheck")]
#[command(version)]
#[command(about = "Crawl a website and report defects", long_about = None)]
struct Cli {
    /// Starting URL to crawl
    #[arg(value_name = "URL")]
    url: String,

    /// Maximum number of pages to visit
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Output report path (the .html variant derives from this)
    #[arg(long, default_value = "report.json")]
    output: PathBuf,

    /// Report format to write
    #[arg(long, value_enum, default_value_t = ReportFormat::Both)]
    format: ReportFormat,

    /// Run the browser with a visible window
    #[arg(long)]
    headed: bool,

    /// Path to a TOML configuration file; CLI flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => CrawlConfig::default(),
    };
    if let Some(max_pages) = cli.max_pages {
        config.max_pages = max_pages;
    }
    if cli.headed {
        config.headless = false;
    }
    validate_config(&config)?;

    tracing::info!(
        "Crawling {} (max {} pages, headless: {})",
        cli.url,
        config.max_pages,
        config.headless
    );

    let browser = ChromeBrowser::launch(&config)
        .await
        .context("failed to launch browser; is Chromium installed?")?;
    let detectors = default_detectors(&config);
    let mut crawler = Crawler::new(&cli.url, config, Box::new(browser), detectors)?;

    // Ctrl-C stops the crawl at the next page boundary; the report covers
    // what was visited so far.
    let stop = crawler.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received; finishing current page");
            stop.store(true, Ordering::Relaxed);
        }
    });

    let report = crawler.run().await?;

    if !cli.quiet {
        print_report(&report);
    }

    if matches!(cli.format, ReportFormat::Json | ReportFormat::Both) {
        write_json_report(&report, &cli.output)?;
    }
    if matches!(cli.format, ReportFormat::Html | ReportFormat::Both) {
        let html_path = cli.output.with_extension("html");
        write_html_report(&report, &html_path)?;
    }

    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("vibecheck=info,warn"),
            1 => EnvFilter::new("vibecheck=debug,info"),
            2 => EnvFilter::new("vibecheck=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
