//! Test name filters
//!
//! Syntax: `POSITIVE[-NEGATIVE]`, where each side is a `:`-separated list of
//! wildcard patterns (`*` matches any run of characters, `?` exactly one).
//! A case runs when its `Suite.name` matches some positive pattern and no
//! negative pattern. An empty positive side means `*`.

use regex::Regex;

use crate::errors::{DriverError, Result};

/// Parsed test name filter
#[derive(Debug, Clone)]
pub struct CaseFilter {
    source: String,
    positive: Vec<Regex>,
    negative: Vec<Regex>,
}

impl CaseFilter {
    pub fn parse(spec: &str) -> Result<Self> {
        let (pos, neg) = match spec.split_once('-') {
            Some((pos, neg)) => (pos, neg),
            None => (spec, ""),
        };

        let mut positive = compile_side(pos)?;
        if positive.is_empty() {
            positive.push(compile_wildcard("*")?);
        }

        Ok(Self {
            source: spec.to_string(),
            positive,
            negative: compile_side(neg)?,
        })
    }

    /// The filter text as given
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, full_name: &str) -> bool {
        self.positive.iter().any(|p| p.is_match(full_name))
            && !self.negative.iter().any(|p| p.is_match(full_name))
    }
}

fn compile_side(side: &str) -> Result<Vec<Regex>> {
    side.split(':')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(compile_wildcard)
        .collect()
}

/// Compile a `*`/`?` wildcard pattern into an anchored regex
pub fn compile_wildcard(pattern: &str) -> Result<Regex> {
    let escaped = regex::escape(pattern)
        .replace(r"\*", ".*")
        .replace(r"\?", ".");

    Regex::new(&format!("^{}$", escaped))
        .map_err(|e| DriverError::Config(format!("Invalid filter pattern '{}': {}", pattern, e)))
}
