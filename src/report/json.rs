//! JSON report rendering

use crate::report::CrawlReport;
use crate::ReportError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the report as a pretty-printed JSON document
///
/// # Arguments
///
/// * `report` - The aggregated crawl report
/// * `output_path` - Destination file path
pub fn write_json_report(report: &CrawlReport, output_path: &Path) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(report)?;

    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;

    tracing::info!("JSON report saved to {}", output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::{Bug, Category, Severity};
    use crate::report::build_report;
    use chrono::Utc;
    use url::Url;

    #[test]
    fn test_written_json_parses_back() {
        let url = Url::parse("https://a.test/").unwrap();
        let now = Utc::now();
        let report = build_report(
            "https://a.test/",
            3,
            vec![Bug::new(
                &url,
                Category::BrokenLink,
                Severity::High,
                "HTTP 500",
                "Page returned status 500",
            )
            .with_evidence(serde_json::json!({"status": 500}))],
            vec![],
            now,
            now,
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_json_report(&report, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["start_url"], "https://a.test/");
        assert_eq!(value["pages_visited"], 3);
        assert_eq!(value["bugs"][0]["category"], "broken-link");
        assert_eq!(value["bugs"][0]["evidence"]["status"], 500);
        assert_eq!(value["summary"]["total_bugs"], 1);
    }

    #[test]
    fn test_write_to_bad_path_fails() {
        let now = Utc::now();
        let report = build_report("https://a.test/", 0, vec![], vec![], now, now);
        let result = write_json_report(&report, Path::new("/nonexistent/dir/report.json"));
        assert!(matches!(result, Err(ReportError::Io(_))));
    }
}
