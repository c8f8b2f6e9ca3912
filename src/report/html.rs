//! HTML report rendering
//!
//! Produces a single self-contained HTML file: summary badges up top, one
//! table row per finding. No external assets, so the file can be attached
//! to an issue or mailed around as-is.

use crate::detectors::Severity;
use crate::report::CrawlReport;
use crate::ReportError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const SEVERITIES_DESC: &[Severity] = &[Severity::High, Severity::Medium, Severity::Low];

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "#ea580c",
        Severity::Medium => "#ca8a04",
        Severity::Low => "#2563eb",
    }
}

/// Writes the report as a self-contained HTML page
pub fn write_html_report(report: &CrawlReport, output_path: &Path) -> Result<(), ReportError> {
    let html = format_html_report(report);

    let mut file = File::create(output_path)?;
    file.write_all(html.as_bytes())?;

    tracing::info!("HTML report saved to {}", output_path.display());
    Ok(())
}

/// Formats the report as an HTML document
pub fn format_html_report(report: &CrawlReport) -> String {
    let mut badges = String::new();
    for &severity in SEVERITIES_DESC {
        let count = report
            .summary
            .by_severity
            .get(severity.as_str())
            .copied()
            .unwrap_or(0);
        if count > 0 {
            badges.push_str(&format!(
                "<span class=\"badge\" style=\"background:{}\">{}: {}</span> ",
                severity_color(severity),
                severity.as_str().to_uppercase(),
                count
            ));
        }
    }

    let mut rows = String::new();
    for bug in &report.bugs {
        rows.push_str(&format!(
            r#"<tr>
  <td><span class="badge" style="background:{color}">{severity}</span></td>
  <td>{category}</td>
  <td>{title}</td>
  <td class="desc">{description}</td>
  <td class="url"><a href="{url}">{url}</a></td>
</tr>
"#,
            color = severity_color(bug.severity),
            severity = bug.severity.as_str().to_uppercase(),
            category = escape(bug.category.as_str()),
            title = escape(&bug.title),
            description = escape(&bug.description),
            url = escape(&bug.url),
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>vibecheck report - {start_url}</title>
<style>
  body {{ font-family: system-ui, sans-serif; margin: 2rem; color: #1f2937; }}
  h1 {{ font-size: 1.4rem; }}
  .meta {{ color: #6b7280; margin-bottom: 1rem; }}
  .badge {{ color: #fff; border-radius: 4px; padding: 2px 8px; font-size: 0.8rem; }}
  table {{ border-collapse: collapse; width: 100%; margin-top: 1rem; }}
  th, td {{ text-align: left; padding: 6px 10px; border-bottom: 1px solid #e5e7eb;
            vertical-align: top; }}
  td.desc {{ max-width: 32rem; }}
  td.url {{ font-size: 0.85rem; word-break: break-all; }}
</style>
</head>
<body>
<h1>vibecheck report</h1>
<p class="meta">{start_url} &mdash; {pages} pages visited, {total} bugs</p>
<p>{badges}</p>
<table>
<thead>
<tr><th>Severity</th><th>Category</th><th>Title</th><th>Description</th><th>URL</th></tr>
</thead>
<tbody>
{rows}</tbody>
</table>
</body>
</html>
"#,
        start_url = escape(&report.start_url),
        pages = report.pages_visited,
        total = report.summary.total_bugs,
        badges = badges,
        rows = rows,
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::{Bug, Category};
    use crate::report::build_report;
    use chrono::Utc;
    use url::Url;

    #[test]
    fn test_html_escapes_markup_in_descriptions() {
        let url = Url::parse("https://a.test/").unwrap();
        let now = Utc::now();
        let report = build_report(
            "https://a.test/",
            1,
            vec![Bug::new(
                &url,
                Category::Accessibility,
                Severity::Medium,
                "Image missing alt text",
                "<img src=\"hero.png\">",
            )],
            vec![],
            now,
            now,
        );

        let html = format_html_report(&report);
        assert!(html.contains("&lt;img src=&quot;hero.png&quot;&gt;"));
        assert!(!html.contains("<img src=\"hero.png\">"));
    }

    #[test]
    fn test_html_contains_summary_badges() {
        let url = Url::parse("https://a.test/").unwrap();
        let now = Utc::now();
        let report = build_report(
            "https://a.test/",
            1,
            vec![
                Bug::new(&url, Category::Console, Severity::High, "JS error", "x"),
                Bug::new(&url, Category::Seo, Severity::Low, "Missing favicon", "y"),
            ],
            vec![],
            now,
            now,
        );

        let html = format_html_report(&report);
        assert!(html.contains("HIGH: 1"));
        assert!(html.contains("LOW: 1"));
        assert!(html.contains("1 pages visited, 2 bugs"));
    }
}
