//! tagtest library interface
//!
//! A command-line test driver with tag-filtered logging. A test program
//! registers its log tags, its test cases (or one devel routine) and an
//! optional init hook, then hands the command line to [`Driver::run`].
//!
//! ```no_run
//! use tagtest::{Driver, TagRegistry, TestSuite};
//!
//! fn main() -> std::process::ExitCode {
//!     let mut tags = TagRegistry::new();
//!     tags.register("io", "file and stream I/O").expect("valid tag");
//!
//!     let mut suite = TestSuite::new();
//!     suite.add("Io", "roundtrip", |_ctx| {
//!         tracing::info!(target: "io", "writing");
//!         Ok(())
//!     });
//!
//!     Driver::new(tags).with_suite(suite).with_config_from_env().run_main()
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`driver`] - The driver (`run(args) -> exit code`)
//! - [`cli`] - Option definitions and argv partitioning
//! - [`tags`] - Tag registry and tag selection
//! - [`logging`] - `LogContext` and the tag-filtered subscriber
//! - [`runner`] - Suite and devel run strategies
//! - [`report`] - JUnit, JSON and TAP reports
//! - [`config`] - TOML and environment configuration
//! - [`errors`] - Error types (DriverError, Result)
//! - [`status`] - Exit status codes (ExitStatus)

pub mod cli;
pub mod config;
pub mod context;
pub mod driver;
pub mod errors;
pub mod logging;
pub mod report;
pub mod runner;
pub mod status;
pub mod tags;

pub use config::Config;
pub use driver::{Driver, InitHook};
pub use errors::{DriverError, Result};
pub use logging::LogContext;
pub use runner::{DevelTest, TestCase, TestListener, TestRunner, TestSuite};
pub use status::ExitStatus;
pub use tags::{TagRegistry, TagSelection};
