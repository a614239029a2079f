//! Argument partitioning
//!
//! Splits the raw command line into the options the driver understands and
//! everything else. Recognized options are rewritten to their long form so
//! clap only ever sees `--help`, `--tags` and `--tags=<value>`.
//!
//! `--tags` takes an implicit value: a value must be attached (`--tags=a,b`,
//! `-ta,b` or `-t=a,b`). A following separate token is never consumed and
//! therefore ends up unrecognized.

use clap::Parser;

use crate::cli::args::Args;
use crate::errors::DriverError;

/// Command line split into recognized and unrecognized tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partitioned {
    /// Recognized options, normalized to long form
    pub recognized: Vec<String>,
    /// Unrecognized options and positionals, in command-line order
    pub unrecognized: Vec<String>,
}

/// Partition arguments (without the program name)
pub fn partition_args<S: AsRef<str>>(args: &[S]) -> Partitioned {
    let mut parts = Partitioned::default();

    for arg in args {
        let arg = arg.as_ref();
        match normalize(arg) {
            Some(long) => parts.recognized.push(long),
            None => parts.unrecognized.push(arg.to_string()),
        }
    }

    parts
}

fn normalize(arg: &str) -> Option<String> {
    match arg {
        "-h" | "--help" => return Some("--help".to_string()),
        "-t" | "--tags" => return Some("--tags".to_string()),
        _ => {}
    }

    if arg.starts_with("--tags=") {
        return Some(arg.to_string());
    }

    if let Some(value) = arg.strip_prefix("-t") {
        let value = value.strip_prefix('=').unwrap_or(value);
        return Some(format!("--tags={}", value));
    }

    None
}

/// Parse recognized options into [`Args`]
pub fn parse_recognized(program_name: &str, recognized: &[String]) -> Result<Args, DriverError> {
    let argv = std::iter::once(program_name.to_string()).chain(recognized.iter().cloned());
    Args::try_parse_from(argv).map_err(|e| DriverError::Config(e.to_string()))
}
