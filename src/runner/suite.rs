//! Suite runner: executes every registered case and aggregates the results

use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use tracing::{debug, warn};

use super::case::{CaseResult, Outcome, RunSummary, TestCase, TestSuite};
use super::filter::CaseFilter;
use super::listener::{ConsoleListener, TestListener};
use super::TestRunner;
use crate::errors::Result;
use crate::logging::{LogContext, DRIVER_TARGET};
use crate::report::{generate_report, ReportConfig};
use crate::status::ExitStatus;

/// Runs a [`TestSuite`] case by case, in registration order
pub struct SuiteRunner<'a> {
    suite: &'a TestSuite,
    filter: Option<CaseFilter>,
    report: Option<ReportConfig>,
    console: ConsoleListener,
    listeners: &'a [Box<dyn TestListener>],
}

impl<'a> SuiteRunner<'a> {
    pub fn new(suite: &'a TestSuite, colors: bool) -> Self {
        Self {
            suite,
            filter: None,
            report: None,
            console: ConsoleListener::new(colors),
            listeners: &[],
        }
    }

    pub fn with_filter(mut self, filter: Option<CaseFilter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_report(mut self, report: Option<ReportConfig>) -> Self {
        self.report = report;
        self
    }

    /// Listeners notified after the console listener
    pub fn with_listeners(mut self, listeners: &'a [Box<dyn TestListener>]) -> Self {
        self.listeners = listeners;
        self
    }

    fn selected(&self, case: &TestCase) -> bool {
        self.filter
            .as_ref()
            .map(|f| f.matches(&case.full_name()))
            .unwrap_or(true)
    }

    /// Console listener first, then the user's in registration order
    fn each_listener(&self) -> Vec<&dyn TestListener> {
        let mut all: Vec<&dyn TestListener> = Vec::with_capacity(1 + self.listeners.len());
        all.push(&self.console);
        for listener in self.listeners.iter() {
            all.push(listener.as_ref());
        }
        all
    }

    /// Run the suite and collect one result per registered case
    pub fn run_cases(&self, ctx: &LogContext, out: &mut dyn Write) -> Result<Vec<CaseResult>> {
        let to_run: Vec<&TestCase> = self.suite.cases().iter().filter(|c| self.selected(c)).collect();
        let suites = {
            let mut names: Vec<&str> = to_run.iter().map(|c| c.suite.as_str()).collect();
            names.sort_unstable();
            names.dedup();
            names.len()
        };

        for listener in self.each_listener() {
            listener.on_run_start(out, to_run.len(), suites)?;
        }

        let mut results = Vec::with_capacity(self.suite.len());
        for case in self.suite.cases() {
            if !self.selected(case) {
                debug!(target: DRIVER_TARGET, case = %case.full_name(), "Filtered out");
                results.push(CaseResult {
                    suite: case.suite.clone(),
                    name: case.name.clone(),
                    outcome: Outcome::Skipped,
                    duration: Default::default(),
                });
                continue;
            }

            for listener in self.each_listener() {
                listener.on_case_start(out, case)?;
            }

            let result = run_case(case, ctx);

            for listener in self.each_listener() {
                listener.on_case_end(out, &result)?;
            }
            results.push(result);
        }

        let summary = RunSummary::from_results(&results);
        for listener in self.each_listener() {
            listener.on_run_end(out, &results, &summary)?;
        }
        out.flush()?;

        Ok(results)
    }
}

impl TestRunner for SuiteRunner<'_> {
    fn run(&self, ctx: &LogContext, out: &mut dyn Write) -> Result<i32> {
        let results = self.run_cases(ctx, out)?;
        let summary = RunSummary::from_results(&results);

        if let Some(ref report) = self.report {
            generate_report(&results, report)?;
            debug!(target: DRIVER_TARGET, path = %report.output_path, "Report written");
        }

        if !summary.all_passed() {
            warn!(target: DRIVER_TARGET, failed = summary.failed, total = summary.total, "Test failures");
        }

        Ok(ExitStatus::from_failures(summary.failed).into())
    }
}

/// Execute one case, turning errors and panics into a failed outcome
pub(crate) fn run_case(case: &TestCase, ctx: &LogContext) -> CaseResult {
    let start = Instant::now();
    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| (case.body)(ctx))) {
        Ok(Ok(())) => Outcome::Passed,
        Ok(Err(e)) => Outcome::Failed(format!("{:#}", e)),
        Err(payload) => Outcome::Failed(format!("panicked: {}", panic_message(payload.as_ref()))),
    };

    CaseResult {
        suite: case.suite.clone(),
        name: case.name.clone(),
        outcome,
        duration: start.elapsed(),
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
