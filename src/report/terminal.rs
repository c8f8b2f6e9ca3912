//! Terminal report rendering
//!
//! Plain-text summary grouped by severity, worst first.

use crate::detectors::Severity;
use crate::report::CrawlReport;

const SEVERITIES_DESC: &[Severity] = &[Severity::High, Severity::Medium, Severity::Low];

/// Prints the report to stdout
pub fn print_report(report: &CrawlReport) {
    print!("{}", format_report(report));
}

/// Formats the report as plain text
pub fn format_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", "=".repeat(60)));
    out.push_str(&format!("  VIBECHECK REPORT - {}\n", report.start_url));
    out.push_str(&format!("  Pages visited: {}\n", report.pages_visited));
    out.push_str(&format!("  Bugs found:    {}\n", report.summary.total_bugs));
    out.push_str(&format!("{}\n", "=".repeat(60)));

    for &severity in SEVERITIES_DESC {
        let bugs: Vec<_> = report.bugs_with_severity(severity).collect();
        if bugs.is_empty() {
            continue;
        }
        out.push_str(&format!(
            "\n{} ({})\n",
            severity.as_str().to_uppercase(),
            bugs.len()
        ));
        for bug in bugs {
            out.push_str(&format!("  [{}] {}\n", bug.category, bug.title));
            out.push_str(&format!("    URL: {}\n", bug.url));
            let desc: String = bug.description.chars().take(120).collect();
            out.push_str(&format!("    {}\n", desc));
        }
    }

    if !report.errors.is_empty() {
        out.push_str(&format!("\nCRAWLER ERRORS ({})\n", report.errors.len()));
        for error in &report.errors {
            let line: String = error.chars().take(120).collect();
            out.push_str(&format!("  {}\n", line));
        }
    }

    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::{Bug, Category};
    use crate::report::build_report;
    use chrono::Utc;
    use url::Url;

    #[test]
    fn test_format_groups_by_severity_worst_first() {
        let url = Url::parse("https://a.test/").unwrap();
        let now = Utc::now();
        let report = build_report(
            "https://a.test/",
            1,
            vec![
                Bug::new(&url, Category::Seo, Severity::Low, "Missing favicon", "x"),
                Bug::new(&url, Category::Console, Severity::High, "Unhandled JS exception", "y"),
            ],
            vec![],
            now,
            now,
        );

        let text = format_report(&report);
        let high_pos = text.find("HIGH (1)").unwrap();
        let low_pos = text.find("LOW (1)").unwrap();
        assert!(high_pos < low_pos);
        assert!(text.contains("Pages visited: 1"));
        assert!(!text.contains("CRAWLER ERRORS"));
    }

    #[test]
    fn test_format_includes_crawler_errors() {
        let now = Utc::now();
        let report = build_report(
            "https://a.test/",
            1,
            vec![],
            vec!["Detector mobile failed on https://a.test/: boom".to_string()],
            now,
            now,
        );

        let text = format_report(&report);
        assert!(text.contains("CRAWLER ERRORS (1)"));
        assert!(text.contains("boom"));
    }
}
