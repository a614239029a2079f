//! Devel runner: a single user routine, no result aggregation

use std::io::Write;
use std::panic::{self, AssertUnwindSafe};

use console::style;
use tracing::{error, info};

use super::case::TestFn;
use super::suite::panic_message;
use super::TestRunner;
use crate::errors::Result;
use crate::logging::{LogContext, DRIVER_TARGET};
use crate::status::ExitStatus;

/// A named development routine
pub struct DevelTest {
    pub name: String,
    pub(crate) body: TestFn,
}

impl DevelTest {
    pub fn new<F>(name: &str, body: F) -> Self
    where
        F: Fn(&LogContext) -> anyhow::Result<()> + 'static,
    {
        Self {
            name: name.to_string(),
            body: Box::new(body),
        }
    }
}

impl std::fmt::Debug for DevelTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevelTest").field("name", &self.name).finish_non_exhaustive()
    }
}

pub struct DevelRunner<'a> {
    test: &'a DevelTest,
    colors: bool,
}

impl<'a> DevelRunner<'a> {
    /// `colors` styles the label, which is logged rather than written to `out`
    pub fn new(test: &'a DevelTest, colors: bool) -> Self {
        Self { test, colors }
    }

    fn label(&self) -> String {
        let text = format!("Executing development test {}", self.test.name);
        style(text).green().bright().force_styling(self.colors).to_string()
    }
}

impl TestRunner for DevelRunner<'_> {
    fn run(&self, ctx: &LogContext, out: &mut dyn Write) -> Result<i32> {
        info!(target: DRIVER_TARGET, "{}", self.label());

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (self.test.body)(ctx)));
        out.flush()?;

        let status = match outcome {
            Ok(Ok(())) => ExitStatus::Success,
            Ok(Err(e)) => {
                error!(target: DRIVER_TARGET, test = %self.test.name, "Devel test failed: {:#}", e);
                ExitStatus::Error
            }
            Err(payload) => {
                error!(
                    target: DRIVER_TARGET,
                    test = %self.test.name,
                    "Devel test panicked: {}",
                    panic_message(payload.as_ref())
                );
                ExitStatus::Error
            }
        };

        Ok(status.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogSettings;
    use crate::tags::TagRegistry;
    use std::cell::Cell;
    use std::rc::Rc;

    fn ctx() -> LogContext {
        LogContext::new("all", &TagRegistry::new(), &LogSettings::default()).unwrap()
    }

    #[test]
    fn test_runs_exactly_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let test = DevelTest::new("mesh_dump", move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });

        let code = DevelRunner::new(&test, false).run(&ctx(), &mut Vec::new()).unwrap();
        assert_eq!(code, 0);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_error_and_panic_fail() {
        let failing = DevelTest::new("broken", |_| anyhow::bail!("no mesh"));
        assert_eq!(DevelRunner::new(&failing, false).run(&ctx(), &mut Vec::new()).unwrap(), 1);

        let panicking = DevelTest::new("worse", |_| panic!("boom"));
        assert_eq!(DevelRunner::new(&panicking, false).run(&ctx(), &mut Vec::new()).unwrap(), 1);
    }

    #[test]
    fn test_label_is_plain_without_colors() {
        let test = DevelTest::new("mesh_dump", |_| Ok(()));
        assert_eq!(DevelRunner::new(&test, false).label(), "Executing development test mesh_dump");
        assert!(DevelRunner::new(&test, true).label().contains('\x1b'));
    }
}
