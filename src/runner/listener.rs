//! Progress listeners for the suite runner
//!
//! The console listener prints the familiar bracketed progress lines:
//!
//! ```text
//! [==========] Running 2 tests from 1 test suite.
//! [ RUN      ] Tags.parse
//! [       OK ] Tags.parse (0 ms)
//! ```

use std::io::{self, Write};

use console::Style;

use super::case::{CaseResult, Outcome, RunSummary, TestCase};

/// Observer of a suite run. Every hook defaults to doing nothing.
pub trait TestListener {
    fn on_run_start(&self, _out: &mut dyn Write, _to_run: usize, _suites: usize) -> io::Result<()> {
        Ok(())
    }

    fn on_case_start(&self, _out: &mut dyn Write, _case: &TestCase) -> io::Result<()> {
        Ok(())
    }

    fn on_case_end(&self, _out: &mut dyn Write, _result: &CaseResult) -> io::Result<()> {
        Ok(())
    }

    fn on_run_end(&self, _out: &mut dyn Write, _results: &[CaseResult], _summary: &RunSummary) -> io::Result<()> {
        Ok(())
    }
}

/// Default listener writing colored progress to the driver output
#[derive(Debug, Clone)]
pub struct ConsoleListener {
    green: Style,
    red: Style,
    yellow: Style,
}

impl ConsoleListener {
    pub fn new(colors: bool) -> Self {
        let base = Style::new().force_styling(colors);
        Self {
            green: base.clone().green(),
            red: base.clone().red(),
            yellow: base.yellow(),
        }
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

impl TestListener for ConsoleListener {
    fn on_run_start(&self, out: &mut dyn Write, to_run: usize, suites: usize) -> io::Result<()> {
        writeln!(
            out,
            "{} Running {} from {}.",
            self.green.apply_to("[==========]"),
            plural(to_run, "test"),
            plural(suites, "test suite")
        )
    }

    fn on_case_start(&self, out: &mut dyn Write, case: &TestCase) -> io::Result<()> {
        writeln!(out, "{} {}", self.green.apply_to("[ RUN      ]"), case.full_name())
    }

    fn on_case_end(&self, out: &mut dyn Write, result: &CaseResult) -> io::Result<()> {
        let ms = result.duration.as_millis();
        match &result.outcome {
            Outcome::Passed => writeln!(
                out,
                "{} {} ({} ms)",
                self.green.apply_to("[       OK ]"),
                result.full_name(),
                ms
            ),
            Outcome::Failed(message) => {
                for line in message.lines() {
                    writeln!(out, "{}", line)?;
                }
                writeln!(
                    out,
                    "{} {} ({} ms)",
                    self.red.apply_to("[  FAILED  ]"),
                    result.full_name(),
                    ms
                )
            }
            Outcome::Skipped => Ok(()),
        }
    }

    fn on_run_end(&self, out: &mut dyn Write, results: &[CaseResult], summary: &RunSummary) -> io::Result<()> {
        writeln!(
            out,
            "{} {} from {} ran. ({} ms total)",
            self.green.apply_to("[==========]"),
            plural(summary.executed(), "test"),
            plural(RunSummary::suite_count(results), "test suite"),
            summary.elapsed.as_millis()
        )?;
        writeln!(
            out,
            "{} {}.",
            self.green.apply_to("[  PASSED  ]"),
            plural(summary.passed, "test")
        )?;

        if summary.skipped > 0 {
            writeln!(
                out,
                "{} {}, listed below:",
                self.yellow.apply_to("[  SKIPPED ]"),
                plural(summary.skipped, "test")
            )?;
            for r in results.iter().filter(|r| r.skipped()) {
                writeln!(out, "{} {}", self.yellow.apply_to("[  SKIPPED ]"), r.full_name())?;
            }
        }

        if summary.failed > 0 {
            writeln!(
                out,
                "{} {}, listed below:",
                self.red.apply_to("[  FAILED  ]"),
                plural(summary.failed, "test")
            )?;
            for r in results.iter().filter(|r| r.failed()) {
                writeln!(out, "{} {}", self.red.apply_to("[  FAILED  ]"), r.full_name())?;
            }
            writeln!(out)?;
            writeln!(
                out,
                " {}",
                if summary.failed == 1 { "1 FAILED TEST".to_string() } else { format!("{} FAILED TESTS", summary.failed) }
            )?;
        }

        Ok(())
    }
}
