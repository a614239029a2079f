//! Execution context for the driver

pub mod environment;

pub use environment::Environment;
