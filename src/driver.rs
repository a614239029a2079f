//! The test driver
//!
//! [`Driver::run`] parses the command line, decides between printing help,
//! listing tags and running tests, and returns the process exit code.

use std::io::{self, Write};
use std::process::ExitCode;

use tracing::{debug, warn};

use crate::cli::{help_text, parse_recognized, partition_args};
use crate::config::{Config, LogFormat, LogSettings, RunMode};
use crate::context::Environment;
use crate::errors::{DriverError, Result};
use crate::logging::{LogContext, DRIVER_TARGET};
use crate::runner::{CaseFilter, DevelRunner, DevelTest, SuiteRunner, TestListener, TestRunner, TestSuite};
use crate::status::{to_exit_code, ExitStatus};
use crate::tags::TagRegistry;

/// User initialization hook, called after logging is up and before any test.
///
/// Receives the full command line (program name included). A nonzero return
/// is logged and otherwise ignored.
pub type InitHook = Box<dyn Fn(&[String], &LogContext) -> i32>;

/// Command-line test driver
pub struct Driver {
    registry: TagRegistry,
    suite: TestSuite,
    devel: Option<DevelTest>,
    runner: Option<Box<dyn TestRunner>>,
    init_hook: InitHook,
    listeners: Vec<Box<dyn TestListener>>,
    config: Config,
    env: Environment,
}

impl Driver {
    pub fn new(registry: TagRegistry) -> Self {
        Self {
            registry,
            suite: TestSuite::new(),
            devel: None,
            runner: None,
            init_hook: Box::new(|_, _| 0),
            listeners: Vec::new(),
            config: Config::default(),
            env: Environment::init(),
        }
    }

    pub fn with_suite(mut self, suite: TestSuite) -> Self {
        self.suite = suite;
        self
    }

    pub fn with_devel(mut self, devel: DevelTest) -> Self {
        self.devel = Some(devel);
        self
    }

    /// Replace the built-in strategies with a custom runner.
    ///
    /// Its return value becomes the exit code unchanged.
    pub fn with_runner<R: TestRunner + 'static>(mut self, runner: R) -> Self {
        self.runner = Some(Box::new(runner));
        self
    }

    pub fn with_init_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&[String], &LogContext) -> i32 + 'static,
    {
        self.init_hook = Box::new(hook);
        self
    }

    /// Append a listener notified after the console output
    pub fn with_listener<L: TestListener + 'static>(mut self, listener: L) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Load the configuration from files and `TAGTEST_*` variables,
    /// warning about every part that cannot be used
    pub fn with_config_from_env(self) -> Self {
        let (config, problems) = Config::load();
        for problem in &problems {
            eprintln!("Warning: Failed to load config: {}", problem);
        }
        self.with_config(config)
    }

    pub fn with_environment(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run with the process arguments, writing to stdout
    pub fn run_main(self) -> ExitCode {
        let args: Vec<String> = std::env::args_os()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        let stdout = io::stdout();
        let mut out = stdout.lock();
        to_exit_code(self.run(&args, &mut out))
    }

    /// Run the driver. `args` is the full command line including the program name.
    pub fn run<S: AsRef<str>>(&self, args: &[S], out: &mut dyn Write) -> i32 {
        let args: Vec<String> = args.iter().map(|a| a.as_ref().to_string()).collect();

        match self.try_run(&args, out) {
            Ok(code) => code,
            Err(e) => handle_error(e),
        }
    }

    fn try_run(&self, args: &[String], out: &mut dyn Write) -> Result<i32> {
        let mut env = self.env.clone();
        if let Some(argv0) = args.first() {
            env.set_program_name_from(argv0);
        }
        let help = help_text(&env.program_name);

        let parts = partition_args(args.get(1..).unwrap_or_default());

        if !parts.unrecognized.is_empty() {
            write!(out, "\nUnrecognized options: ")?;
            for option in &parts.unrecognized {
                write!(out, "{} ", option)?;
            }
            write!(out, "\n\n{}\n", help)?;
            out.flush()?;
            return Ok(ExitStatus::Error.into());
        }

        let parsed = match parse_recognized(&env.program_name, &parts.recognized) {
            Ok(parsed) => parsed,
            Err(e) => {
                write!(out, "\n{}\n\n{}\n", e, help)?;
                out.flush()?;
                return Ok(ExitStatus::Error.into());
            }
        };

        if parsed.help {
            write!(out, "\n{}\n", help)?;
            out.flush()?;
            return Ok(ExitStatus::Success.into());
        }

        if parsed.wants_tag_listing() {
            self.list_tags(out)?;
            return Ok(ExitStatus::Success.into());
        }

        let ctx = LogContext::init(&parsed.tags, &self.registry, &self.config.logging)?;
        debug!(
            target: DRIVER_TARGET,
            source = %self
                .config
                .source
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "defaults".to_string()),
            "Configuration"
        );

        let rc = (self.init_hook)(args, &ctx);
        if rc != 0 {
            warn!(target: DRIVER_TARGET, code = rc, "Initialization hook returned nonzero");
        }

        let runner = self.select_runner(&env)?;
        let result = runner.run(&ctx, out)?;
        debug!(target: DRIVER_TARGET, result, "Run finished");

        Ok(result)
    }

    /// Print every registered tag, one per line
    pub fn list_tags(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Available tags:")?;
        for tag in self.registry.iter() {
            writeln!(out, "  {}", tag.name)?;
        }
        out.flush()
    }

    /// Pick the run strategy once: the custom runner if set, else from the configured mode
    fn select_runner(&self, env: &Environment) -> Result<Box<dyn TestRunner + '_>> {
        if let Some(runner) = self.runner.as_deref() {
            debug!(target: DRIVER_TARGET, "Using custom runner");
            return Ok(Box::new(runner));
        }

        let colors = env.use_colors();
        let mode = match self.config.mode {
            RunMode::Auto if self.devel.is_some() && self.suite.is_empty() => RunMode::Devel,
            RunMode::Auto => RunMode::Suite,
            mode => mode,
        };
        debug!(target: DRIVER_TARGET, ?mode, "Selected run mode");

        match mode {
            RunMode::Devel => {
                let devel = self.devel.as_ref().ok_or(DriverError::MissingDevelTest)?;
                let label_colors = devel_label_colors(env, &self.config.logging);
                Ok(Box::new(DevelRunner::new(devel, label_colors)))
            }
            _ => Ok(Box::new(
                SuiteRunner::new(&self.suite, colors)
                    .with_filter(self.config.filter.as_deref().map(CaseFilter::parse).transpose()?)
                    .with_report(self.config.report.clone())
                    .with_listeners(&self.listeners),
            )),
        }
    }
}

/// The devel label is logged, so it is styled only for a text log on a color terminal
fn devel_label_colors(env: &Environment, logging: &LogSettings) -> bool {
    logging.format == LogFormat::Text && env.use_stderr_colors()
}

fn handle_error(error: DriverError) -> i32 {
    if error.is_usage_error() {
        eprintln!("Invalid --tags value: {}", error);
    } else {
        eprintln!("Error: {}", error);
    }

    ExitStatus::Error.into()
}
