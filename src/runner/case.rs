//! Test cases, suites and their results

use std::fmt;
use std::time::Duration;

use crate::logging::LogContext;

/// Body of a test case or devel routine
pub type TestFn = Box<dyn Fn(&LogContext) -> anyhow::Result<()>>;

/// A single registered test
pub struct TestCase {
    pub suite: String,
    pub name: String,
    pub(crate) body: TestFn,
}

impl TestCase {
    pub fn new<F>(suite: &str, name: &str, body: F) -> Self
    where
        F: Fn(&LogContext) -> anyhow::Result<()> + 'static,
    {
        Self {
            suite: suite.to_string(),
            name: name.to_string(),
            body: Box::new(body),
        }
    }

    /// `Suite.name`, the form filters match against
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.suite, self.name)
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("suite", &self.suite)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of registered test cases
#[derive(Debug, Default)]
pub struct TestSuite {
    cases: Vec<TestCase>,
}

impl TestSuite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a test case; cases run in registration order
    pub fn add<F>(&mut self, suite: &str, name: &str, body: F) -> &mut Self
    where
        F: Fn(&LogContext) -> anyhow::Result<()> + 'static,
    {
        self.cases.push(TestCase::new(suite, name, body));
        self
    }

    pub fn push(&mut self, case: TestCase) -> &mut Self {
        self.cases.push(case);
        self
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

/// How a case ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    /// Returned an error or panicked; holds the message
    Failed(String),
    /// Excluded by the filter
    Skipped,
}

/// Result of running one test case
#[derive(Debug, Clone)]
pub struct CaseResult {
    pub suite: String,
    pub name: String,
    pub outcome: Outcome,
    pub duration: Duration,
}

impl CaseResult {
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.suite, self.name)
    }

    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }

    pub fn failed(&self) -> bool {
        matches!(self.outcome, Outcome::Failed(_))
    }

    pub fn skipped(&self) -> bool {
        self.outcome == Outcome::Skipped
    }

    pub fn failure_message(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Summary of a run for quick display
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn from_results(results: &[CaseResult]) -> Self {
        Self {
            total: results.len(),
            passed: results.iter().filter(|r| r.passed()).count(),
            failed: results.iter().filter(|r| r.failed()).count(),
            skipped: results.iter().filter(|r| r.skipped()).count(),
            elapsed: results.iter().map(|r| r.duration).sum(),
        }
    }

    /// Number of cases that actually ran
    pub fn executed(&self) -> usize {
        self.total - self.skipped
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Suite count among executed cases
    pub fn suite_count(results: &[CaseResult]) -> usize {
        let mut suites: Vec<&str> = results
            .iter()
            .filter(|r| !r.skipped())
            .map(|r| r.suite.as_str())
            .collect();
        suites.sort_unstable();
        suites.dedup();
        suites.len()
    }
}
