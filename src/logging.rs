//! Tag-filtered logging
//!
//! [`LogContext::init`] turns a `--tags` value into `EnvFilter` directives,
//! one per selected tag, and installs the global `tracing` subscriber. The
//! resulting context is passed explicitly to the init hook and to whichever
//! runner executes, instead of being looked up from ambient state.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LogSettings};
use crate::errors::{DriverError, Result};
use crate::tags::{TagRegistry, TagSelection};

/// Target used for the driver's own messages; always enabled
pub const DRIVER_TARGET: &str = "tagtest";

/// Initialized logging state for one driver invocation
#[derive(Debug, Clone)]
pub struct LogContext {
    raw: String,
    selection: TagSelection,
    directives: String,
    registry: TagRegistry,
    settings: LogSettings,
    installed: bool,
}

impl LogContext {
    /// Parse the tag selection, build the filter and install the subscriber.
    ///
    /// Only one subscriber can exist per process. When one is already
    /// installed the existing subscriber is kept and the returned context
    /// reports `installed() == false`.
    pub fn init(raw_tags: &str, registry: &TagRegistry, settings: &LogSettings) -> Result<Self> {
        let mut ctx = Self::new(raw_tags, registry, settings)?;

        let filter = EnvFilter::try_new(&ctx.directives)
            .map_err(|e| DriverError::Logging(format!("Invalid filter '{}': {}", ctx.directives, e)))?;

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true);

        let installed = match settings.format {
            LogFormat::Text => builder.try_init(),
            LogFormat::Json => builder.json().try_init(),
        };
        ctx.installed = installed.is_ok();

        tracing::debug!(
            target: DRIVER_TARGET,
            tags = %ctx.raw,
            directives = %ctx.directives,
            installed = ctx.installed,
            "Logging initialized"
        );

        Ok(ctx)
    }

    /// Build a context without touching the global subscriber
    pub fn new(raw_tags: &str, registry: &TagRegistry, settings: &LogSettings) -> Result<Self> {
        let selection = TagSelection::parse(raw_tags)?;
        selection.validate(registry)?;

        let directives = build_directives(&selection, settings);

        Ok(Self {
            raw: raw_tags.to_string(),
            selection,
            directives,
            registry: registry.clone(),
            settings: *settings,
            installed: false,
        })
    }

    /// The tag string exactly as it was given on the command line
    pub fn tags(&self) -> &str {
        &self.raw
    }

    pub fn selection(&self) -> &TagSelection {
        &self.selection
    }

    pub fn is_enabled(&self, tag: &str) -> bool {
        self.registry.contains(tag) && self.selection.enables(tag)
    }

    /// The `EnvFilter` directives derived from the selection
    pub fn directives(&self) -> &str {
        &self.directives
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &LogSettings {
        &self.settings
    }

    /// Whether this context installed the process-wide subscriber
    pub fn installed(&self) -> bool {
        self.installed
    }
}

fn build_directives(selection: &TagSelection, settings: &LogSettings) -> String {
    let level = settings.level.as_str();
    match selection {
        TagSelection::All => level.to_string(),
        TagSelection::Only(names) => {
            let mut directives = vec!["off".to_string(), format!("{}={}", DRIVER_TARGET, level)];
            directives.extend(names.iter().map(|n| format!("{}={}", n, level)));
            directives.join(",")
        }
    }
}
