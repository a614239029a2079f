//! CLI argument parsing and processing

pub mod args;
pub mod process;

// Re-exports
pub use args::{help_text, Args};
pub use process::{parse_recognized, partition_args, Partitioned};
