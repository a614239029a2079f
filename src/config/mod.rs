//! Driver configuration

pub mod config;

pub use config::{Config, LogFormat, LogLevel, LogSettings, RunMode};
