//! Driver behavior through the library interface

use std::cell::{Cell, RefCell};
use std::io::Write;
use std::rc::Rc;

use tagtest::config::{Config, RunMode};
use tagtest::context::Environment;
use tagtest::report::{ReportConfig, ReportFormat};
use tagtest::runner::{CaseResult, RunSummary, TestRunner};
use tagtest::LogContext;
use tagtest::{DevelTest, Driver, TagRegistry, TestListener, TestSuite};

fn registry() -> TagRegistry {
    TagRegistry::new()
        .with_tag("io", "file and stream I/O")
        .unwrap()
        .with_tag("mesh", "mesh topology")
        .unwrap()
        .with_tag("solver", "linear solvers")
        .unwrap()
}

fn driver() -> Driver {
    Driver::new(registry()).with_environment(Environment::plain("unit_tests"))
}

fn run(driver: &Driver, args: &[&str]) -> (i32, String) {
    let mut argv = vec!["./build/unit_tests"];
    argv.extend_from_slice(args);
    let mut out = Vec::new();
    let code = driver.run(&argv, &mut out);
    (code, String::from_utf8(out).unwrap())
}

fn counting_suite(counter: &Rc<Cell<usize>>) -> TestSuite {
    let mut suite = TestSuite::new();
    for name in ["a", "b"] {
        let counter = Rc::clone(counter);
        suite.add("Counted", name, move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });
    }
    suite
}

// ============================================================================
// Command Line
// ============================================================================

#[test]
fn test_unrecognized_output_format() {
    let (code, out) = run(&driver(), &["--foo", "bar"]);

    assert_eq!(code, 1);
    assert!(out.starts_with("\nUnrecognized options: --foo bar \n\n"));
    assert!(out.contains("unit_tests"));
}

#[test]
fn test_help_never_runs_tests() {
    let calls = Rc::new(Cell::new(0));
    let driver = driver().with_suite(counting_suite(&calls));

    let (code, out) = run(&driver, &["--tags=io", "--help"]);
    assert_eq!(code, 0);
    assert!(out.starts_with('\n'));
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_listing_prints_registry_in_order() {
    let calls = Rc::new(Cell::new(0));
    let hook_calls = Rc::new(Cell::new(0));
    let hook_counter = Rc::clone(&hook_calls);
    let driver = driver()
        .with_suite(counting_suite(&calls))
        .with_init_hook(move |_, _| {
            hook_counter.set(hook_counter.get() + 1);
            0
        });

    let (code, out) = run(&driver, &["--tags"]);
    assert_eq!(code, 0);
    assert_eq!(out, "Available tags:\n  io\n  mesh\n  solver\n");
    assert_eq!(calls.get(), 0);
    assert_eq!(hook_calls.get(), 0);
}

// ============================================================================
// Logging Context
// ============================================================================

#[test]
fn test_logging_receives_exact_tag_string() {
    let seen = Rc::new(RefCell::new(String::new()));
    let sink = Rc::clone(&seen);

    let mut suite = TestSuite::new();
    suite.add("Ctx", "tags", move |ctx| {
        *sink.borrow_mut() = ctx.tags().to_string();
        Ok(())
    });

    let (code, _) = run(&driver().with_suite(suite), &["--tags=io,mesh"]);
    assert_eq!(code, 0);
    assert_eq!(*seen.borrow(), "io,mesh");
}

#[test]
fn test_default_selection_is_all() {
    let seen = Rc::new(RefCell::new(String::new()));
    let sink = Rc::clone(&seen);
    let driver = driver().with_init_hook(move |_, ctx| {
        *sink.borrow_mut() = ctx.tags().to_string();
        0
    });

    let (code, out) = run(&driver, &[]);
    assert_eq!(code, 0);
    assert_eq!(*seen.borrow(), "all");
    assert!(out.contains("[==========] Running 0 tests"));
}

#[test]
fn test_unknown_tag_is_a_usage_error() {
    let calls = Rc::new(Cell::new(0));
    let driver = driver().with_suite(counting_suite(&calls));

    let (code, _) = run(&driver, &["--tags=io,plasma"]);
    assert_eq!(code, 1);
    assert_eq!(calls.get(), 0);
}

// ============================================================================
// Run Strategies
// ============================================================================

#[test]
fn test_exit_code_is_runner_aggregate() {
    let mut suite = TestSuite::new();
    suite
        .add("Mixed", "passes", |_| Ok(()))
        .add("Mixed", "fails", |_| anyhow::bail!("residual too large"));

    let (code, out) = run(&driver().with_suite(suite), &["--tags=solver"]);
    assert_eq!(code, 1);
    assert!(out.contains("residual too large"));
    assert!(out.contains("[  FAILED  ] Mixed.fails"));
}

#[test]
fn test_hook_runs_before_tests() {
    let order = Rc::new(RefCell::new(Vec::<&'static str>::new()));
    let hook_order = Rc::clone(&order);
    let case_order = Rc::clone(&order);

    let mut suite = TestSuite::new();
    suite.add("Order", "case", move |_| {
        case_order.borrow_mut().push("case");
        Ok(())
    });

    let driver = driver().with_suite(suite).with_init_hook(move |args, _| {
        assert_eq!(args[0], "./build/unit_tests");
        hook_order.borrow_mut().push("hook");
        1
    });

    let (code, _) = run(&driver, &[]);
    assert_eq!(code, 0);
    assert_eq!(*order.borrow(), vec!["hook", "case"]);
}

#[test]
fn test_devel_routine_replaces_suite() {
    let suite_calls = Rc::new(Cell::new(0));
    let devel_calls = Rc::new(Cell::new(0));
    let devel_counter = Rc::clone(&devel_calls);

    let config = Config {
        mode: RunMode::Devel,
        ..Config::default()
    };
    let driver = driver()
        .with_suite(counting_suite(&suite_calls))
        .with_devel(DevelTest::new("mesh_dump", move |_| {
            devel_counter.set(devel_counter.get() + 1);
            Ok(())
        }))
        .with_config(config);

    let (code, out) = run(&driver, &["--tags=mesh"]);
    assert_eq!(code, 0);
    assert_eq!(devel_calls.get(), 1);
    assert_eq!(suite_calls.get(), 0);
    assert!(!out.contains("[ RUN      ]"));
}

#[test]
fn test_auto_mode_prefers_registered_suite() {
    let suite_calls = Rc::new(Cell::new(0));
    let driver = driver()
        .with_suite(counting_suite(&suite_calls))
        .with_devel(DevelTest::new("unused", |_| anyhow::bail!("should not run")));

    let (code, _) = run(&driver, &[]);
    assert_eq!(code, 0);
    assert_eq!(suite_calls.get(), 2);
}

#[test]
fn test_auto_mode_runs_lone_devel_routine() {
    let driver = driver().with_devel(DevelTest::new("broken", |_| anyhow::bail!("no input deck")));

    let (code, _) = run(&driver, &[]);
    assert_eq!(code, 1);
}

#[test]
fn test_custom_runner_code_passes_through() {
    struct FixedCode;

    impl TestRunner for FixedCode {
        fn run(&self, ctx: &LogContext, out: &mut dyn Write) -> tagtest::Result<i32> {
            writeln!(out, "custom runner with {}", ctx.tags())?;
            Ok(3)
        }
    }

    let suite_calls = Rc::new(Cell::new(0));
    let driver = driver()
        .with_suite(counting_suite(&suite_calls))
        .with_runner(FixedCode);

    let (code, out) = run(&driver, &["--tags=io"]);
    assert_eq!(code, 3);
    assert!(out.contains("custom runner with io"));
    assert_eq!(suite_calls.get(), 0);

    // help and listing are still handled by the driver
    assert_eq!(run(&driver, &["--tags"]).0, 0);
}

#[test]
fn test_filter_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("junit.xml");

    let mut suite = TestSuite::new();
    suite
        .add("Io", "read", |_| Ok(()))
        .add("Mesh", "refine", |_| anyhow::bail!("not reached"));

    let config = Config {
        filter: Some("Io.*".to_string()),
        report: Some(ReportConfig {
            output_path: report_path.to_string_lossy().to_string(),
            format: ReportFormat::JUnit,
            ..ReportConfig::default()
        }),
        ..Config::default()
    };

    let (code, out) = run(&driver().with_suite(suite).with_config(config), &[]);
    assert_eq!(code, 0);
    assert!(out.contains("[  SKIPPED ] Mesh.refine"));

    let xml = std::fs::read_to_string(&report_path).unwrap();
    assert!(xml.contains("read"));
    assert!(xml.contains("refine"));
}

#[test]
fn test_custom_listener_sees_summary() {
    struct Totals(Rc<RefCell<Option<RunSummary>>>);

    impl TestListener for Totals {
        fn on_run_end(
            &self,
            out: &mut dyn Write,
            _results: &[CaseResult],
            summary: &RunSummary,
        ) -> std::io::Result<()> {
            writeln!(out, "custom: {} of {}", summary.passed, summary.total)?;
            *self.0.borrow_mut() = Some(summary.clone());
            Ok(())
        }
    }

    let captured = Rc::new(RefCell::new(None));
    let calls = Rc::new(Cell::new(0));
    let driver = driver()
        .with_suite(counting_suite(&calls))
        .with_listener(Totals(Rc::clone(&captured)));

    let (code, out) = run(&driver, &[]);
    assert_eq!(code, 0);
    assert!(out.contains("custom: 2 of 2"));
    assert_eq!(captured.borrow().as_ref().map(|s| s.passed), Some(2));
}
