//! Test execution strategies
//!
//! The driver picks exactly one [`TestRunner`] per invocation: the
//! [`SuiteRunner`] over every registered case, the [`DevelRunner`] for a
//! single development routine, or a runner supplied by the test program.

pub mod case;
pub mod devel;
pub mod filter;
pub mod listener;
pub mod suite;

use std::io::Write;

use crate::errors::Result;
use crate::logging::LogContext;

pub use case::{CaseResult, Outcome, RunSummary, TestCase, TestFn, TestSuite};
pub use devel::{DevelRunner, DevelTest};
pub use filter::CaseFilter;
pub use listener::{ConsoleListener, TestListener};
pub use suite::SuiteRunner;

/// A test execution strategy.
///
/// Returns the aggregate result: 0 when everything passed, nonzero otherwise.
pub trait TestRunner {
    fn run(&self, ctx: &LogContext, out: &mut dyn Write) -> Result<i32>;
}

impl<T: TestRunner + ?Sized> TestRunner for &T {
    fn run(&self, ctx: &LogContext, out: &mut dyn Write) -> Result<i32> {
        (**self).run(ctx, out)
    }
}
