//! Exit status codes for the driver
//!
//! The driver itself only ever produces two codes:
//! - 0: Success (help printed, tags listed, every test passed)
//! - 1: Any error (unrecognized option, bad tag selection, config error, failed tests)
//!
//! A runner installed with [`Driver::with_runner`](crate::driver::Driver::with_runner)
//! may return any other integer; the driver passes it through untouched, so
//! [`Driver::run`](crate::driver::Driver::run) deals in `i32` and this enum
//! only names the fixed codes.

use std::process::{ExitCode, Termination};

/// Exit status codes following standard Unix conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    /// Successful execution
    Success = 0,
    /// Command-line error, configuration error or failing tests
    Error = 1,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}

impl From<ExitStatus> for i32 {
    fn from(status: ExitStatus) -> Self {
        status as i32
    }
}

impl Termination for ExitStatus {
    fn report(self) -> ExitCode {
        ExitCode::from(self as u8)
    }
}

impl ExitStatus {
    /// Create an exit status from the number of failed tests
    pub fn from_failures(failed: usize) -> Self {
        if failed == 0 {
            ExitStatus::Success
        } else {
            ExitStatus::Error
        }
    }
}

/// Convert a raw driver result into a process exit code.
///
/// Codes outside `0..=255` cannot be represented by the OS and collapse to 1.
pub fn to_exit_code(code: i32) -> ExitCode {
    match u8::try_from(code) {
        Ok(byte) => ExitCode::from(byte),
        Err(_) => ExitCode::from(ExitStatus::Error),
    }
}
