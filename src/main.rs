//! Demonstration driver
//!
//! Registers a handful of tags and self-checks against the library so the
//! binary exercises every driver mode: `--help`, `--tags`, the suite runner
//! and, with `TAGTEST_MODE=devel`, the devel routine.

use std::process::ExitCode;

use anyhow::{ensure, Context};
use tracing::{debug, info};

use tagtest::report::{render_tap, ReportFormat};
use tagtest::runner::{CaseFilter, CaseResult, Outcome};
use tagtest::{DevelTest, Driver, DriverError, LogContext, TagRegistry, TagSelection, TestSuite};

fn tags() -> Result<TagRegistry, DriverError> {
    TagRegistry::new()
        .with_tag("cli", "command-line handling")?
        .with_tag("filter", "test name filters")?
        .with_tag("report", "report rendering")?
        .with_tag("tags", "tag selection")
}

fn suite() -> TestSuite {
    let mut suite = TestSuite::new();

    suite
        .add("Tags", "parse_list", |_| {
            let selection = TagSelection::parse("cli,report")?;
            debug!(target: "tags", ?selection, "Parsed");
            ensure!(selection.enables("cli"), "cli should be enabled");
            ensure!(!selection.enables("filter"), "filter should be disabled");
            Ok(())
        })
        .add("Tags", "context_sees_selection", |ctx: &LogContext| {
            info!(target: "tags", tags = ctx.tags(), "Active selection");
            ensure!(!ctx.tags().is_empty(), "tag string must not be empty");
            Ok(())
        })
        .add("Filter", "wildcards", |_| {
            let filter = CaseFilter::parse("Tags.*-*.slow")?;
            debug!(target: "filter", ?filter, "Parsed");
            ensure!(filter.matches("Tags.parse_list"), "positive pattern");
            ensure!(!filter.matches("Tags.slow"), "negative pattern");
            Ok(())
        })
        .add("Report", "tap_plan", |_| {
            let results = vec![CaseResult {
                suite: "Report".to_string(),
                name: "sample".to_string(),
                outcome: Outcome::Passed,
                duration: Default::default(),
            }];
            let tap = render_tap(&results);
            info!(target: "report", lines = tap.lines().count(), "Rendered TAP");
            ensure!(tap.contains("1..1"), "missing TAP plan in {:?}", tap);
            ensure!(
                "out.json".parse::<ReportFormat>().is_err(),
                "file names are not formats"
            );
            Ok(())
        });

    suite
}

fn devel() -> DevelTest {
    DevelTest::new("tag_dump", |ctx| {
        for tag in ctx.registry().iter() {
            info!(
                target: "cli",
                tag = %tag.name,
                enabled = ctx.is_enabled(&tag.name),
                "{}",
                tag.description
            );
        }
        Ok(())
    })
}

fn main() -> ExitCode {
    let tags = match tags().context("registering demo tags") {
        Ok(tags) => tags,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    Driver::new(tags)
        .with_suite(suite())
        .with_devel(devel())
        .with_init_hook(|args, ctx| {
            debug!(target: "cli", argc = args.len(), tags = ctx.tags(), "Driver initialization");
            0
        })
        .with_config_from_env()
        .run_main()
}
