//! Report generation for suite results
//!
//! Supports JUnit XML for CI systems, plus JSON and TAP.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use junit_report::{Duration, Report, TestCase, TestSuite};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::errors::DriverError;
use crate::runner::{CaseResult, Outcome, RunSummary};

/// Report format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// JUnit XML format (for CI/CD systems)
    JUnit,
    /// JSON format
    Json,
    /// TAP (Test Anything Protocol) format
    Tap,
}

impl ReportFormat {
    /// Guess the format from the output file extension, defaulting to JUnit
    pub fn from_extension(path: &str) -> Self {
        match Path::new(path).extension().and_then(|e| e.to_str()) {
            Some("json") => ReportFormat::Json,
            Some("tap") => ReportFormat::Tap,
            _ => ReportFormat::JUnit,
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "junit" | "xml" => Ok(ReportFormat::JUnit),
            "json" => Ok(ReportFormat::Json),
            "tap" => Ok(ReportFormat::Tap),
            other => Err(DriverError::Config(format!("Invalid report format '{}'", other))),
        }
    }
}

/// Configuration for report generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Output file path
    pub output_path: String,
    /// Report format
    pub format: ReportFormat,
    /// Name of the whole run in JSON and TAP output
    pub suite_name: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: "report.xml".to_string(),
            format: ReportFormat::JUnit,
            suite_name: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

/// Generate a report from case results
pub fn generate_report(results: &[CaseResult], config: &ReportConfig) -> Result<(), DriverError> {
    let content = match config.format {
        ReportFormat::JUnit => render_junit(results)?,
        ReportFormat::Json => render_json(results, config)?,
        ReportFormat::Tap => render_tap(results),
    };

    let path = Path::new(&config.output_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

/// Render JUnit XML, one `<testsuite>` per test suite name
pub fn render_junit(results: &[CaseResult]) -> Result<String, DriverError> {
    let timestamp = OffsetDateTime::now_utc();
    let mut names: Vec<&str> = Vec::new();
    let mut suites: Vec<TestSuite> = Vec::new();

    for result in results {
        let index = match names.iter().position(|n| *n == result.suite) {
            Some(i) => i,
            None => {
                let mut suite = TestSuite::new(&result.suite);
                suite.set_timestamp(timestamp);
                names.push(&result.suite);
                suites.push(suite);
                suites.len() - 1
            }
        };
        suites[index].add_testcase(build_test_case(result));
    }

    let mut report = Report::new();
    for suite in suites {
        report.add_testsuite(suite);
    }

    let mut buf = Vec::new();
    report
        .write_xml(&mut buf)
        .map_err(|e| DriverError::Report(format!("Failed to write JUnit XML: {}", e)))?;

    String::from_utf8(buf).map_err(|e| DriverError::Report(format!("JUnit XML is not UTF-8: {}", e)))
}

/// Build a JUnit test case from a case result
fn build_test_case(result: &CaseResult) -> TestCase {
    let duration = Duration::new(
        result.duration.as_secs() as i64,
        result.duration.subsec_nanos() as i32,
    );
    let classname = sanitize_classname(&result.suite);

    let mut tc = match &result.outcome {
        Outcome::Passed => TestCase::success(&result.name, duration),
        Outcome::Skipped => TestCase::skipped(&result.name),
        Outcome::Failed(message) => TestCase::failure(&result.name, duration, "TestFailure", message),
    };
    tc.set_classname(&classname);
    tc
}

/// Sanitize a string for use as a JUnit classname
fn sanitize_classname(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c == '.' { c } else { '_' })
        .collect()
}

/// Render a JSON report
pub fn render_json(results: &[CaseResult], config: &ReportConfig) -> Result<String, DriverError> {
    use serde_json::json;

    let summary = RunSummary::from_results(results);
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| DriverError::Report(format!("Failed to format timestamp: {}", e)))?;

    let report = json!({
        "name": config.suite_name,
        "timestamp": timestamp,
        "summary": {
            "total": summary.total,
            "passed": summary.passed,
            "failed": summary.failed,
            "skipped": summary.skipped,
            "total_time_ms": summary.elapsed.as_millis(),
        },
        "cases": results.iter().map(|r| {
            json!({
                "suite": r.suite,
                "name": r.name,
                "passed": r.passed(),
                "skipped": r.skipped(),
                "time_ms": r.duration.as_millis(),
                "failure": r.failure_message(),
            })
        }).collect::<Vec<_>>(),
    });

    Ok(serde_json::to_string_pretty(&report)?)
}

/// Render a TAP (Test Anything Protocol) report
pub fn render_tap(results: &[CaseResult]) -> String {
    let mut output = String::new();

    output.push_str("TAP version 14\n");
    output.push_str(&format!("1..{}\n", results.len()));

    for (i, result) in results.iter().enumerate() {
        let test_num = i + 1;

        match &result.outcome {
            Outcome::Skipped => {
                output.push_str(&format!("ok {} - {} # SKIP filtered\n", test_num, result.full_name()));
            }
            Outcome::Passed => {
                output.push_str(&format!(
                    "ok {} - {} # time={}ms\n",
                    test_num,
                    result.full_name(),
                    result.duration.as_millis()
                ));
            }
            Outcome::Failed(message) => {
                output.push_str(&format!("not ok {} - {}\n", test_num, result.full_name()));
                output.push_str("  ---\n");
                output.push_str("  message: |\n");
                for line in message.lines() {
                    output.push_str(&format!("    {}\n", line));
                }
                output.push_str("  ...\n");
            }
        }
    }

    output
}
