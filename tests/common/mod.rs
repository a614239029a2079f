//! Common test utilities for tagtest integration tests
//!
//! This module provides shared test infrastructure including:
//! - CLI invocation helpers for the demo binary
//! - An isolated working directory per invocation
//! - Output assertion helpers

#![allow(dead_code)]

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Exit status codes matching the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success = 0,
    Error = 1,
}

impl From<i32> for ExitStatus {
    fn from(code: i32) -> Self {
        match code {
            0 => ExitStatus::Success,
            _ => ExitStatus::Error,
        }
    }
}

/// Result of running the driver binary
#[derive(Debug)]
pub struct CliResponse {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Exit status code
    pub exit_status: ExitStatus,
    /// Raw exit code
    pub exit_code: i32,
}

impl CliResponse {
    /// Check if stdout contains a substring
    pub fn contains(&self, needle: &str) -> bool {
        self.stdout.contains(needle)
    }

    /// Count occurrences of a substring in stdout
    pub fn count(&self, needle: &str) -> usize {
        self.stdout.matches(needle).count()
    }
}

impl std::fmt::Display for CliResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.stdout)
    }
}

/// Isolated environment for one invocation
pub struct MockEnvironment {
    /// Working directory (config files, reports)
    pub work_dir: TempDir,
    /// Environment variables to set
    pub env_vars: HashMap<String, String>,
}

impl Default for MockEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEnvironment {
    pub fn new() -> Self {
        let work_dir = TempDir::new().expect("Failed to create temp work dir");
        Self {
            work_dir,
            env_vars: HashMap::new(),
        }
    }

    /// Set an environment variable
    pub fn set_env(&mut self, key: &str, value: &str) -> &mut Self {
        self.env_vars.insert(key.to_string(), value.to_string());
        self
    }

    /// Write `tagtest.toml` into the working directory
    pub fn write_config(&mut self, content: &str) -> &mut Self {
        std::fs::write(self.work_path().join("tagtest.toml"), content)
            .expect("Failed to write config");
        self
    }

    pub fn work_path(&self) -> PathBuf {
        self.work_dir.path().to_path_buf()
    }
}

/// Run the demo driver with the given arguments
pub fn tagtest(args: &[&str]) -> CliResponse {
    tagtest_with_env(args, &MockEnvironment::new())
}

/// Run the demo driver with the given arguments and environment
pub fn tagtest_with_env(args: &[&str], env: &MockEnvironment) -> CliResponse {
    let args: Vec<OsString> = args.iter().map(OsString::from).collect();
    tagtest_os(&args, env)
}

/// Run the demo driver with raw OS arguments, which need not be UTF-8
pub fn tagtest_os(args: &[OsString], env: &MockEnvironment) -> CliResponse {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tagtest"));
    cmd.args(args);
    cmd.current_dir(env.work_path());

    // Keep the caller's settings out of the run
    for key in ["TAGTEST_CONFIG", "TAGTEST_MODE", "TAGTEST_FILTER", "TAGTEST_LOG_LEVEL", "TAGTEST_LOG_FORMAT"] {
        cmd.env_remove(key);
    }
    cmd.env("NO_COLOR", "1");
    cmd.env("XDG_CONFIG_HOME", env.work_path());
    for (key, value) in &env.env_vars {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let output = cmd.output().expect("Failed to run tagtest");
    parse_output(output)
}

fn parse_output(output: Output) -> CliResponse {
    let exit_code = output.status.code().unwrap_or(-1);
    CliResponse {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_status: ExitStatus::from(exit_code),
        exit_code,
    }
}
