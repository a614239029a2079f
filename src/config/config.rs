//! Config file handling
//!
//! Sources are layered, later wins: built-in defaults, the TOML file, then
//! `TAGTEST_*` environment variables.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::errors::DriverError;
use crate::report::{ReportConfig, ReportFormat};

/// Environment variable pointing at an explicit config file
pub const CONFIG_ENV: &str = "TAGTEST_CONFIG";

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "tagtest.toml";

/// How the driver chooses between the suite runner and the devel routine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Devel routine when it is the only thing registered, otherwise the suite
    #[default]
    Auto,
    Suite,
    Devel,
}

impl std::str::FromStr for RunMode {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(RunMode::Auto),
            "suite" | "unit" => Ok(RunMode::Suite),
            "devel" => Ok(RunMode::Devel),
            other => Err(DriverError::Config(format!(
                "Invalid mode '{}' (expected auto, suite or devel)",
                other
            ))),
        }
    }
}

/// Verbosity applied to every enabled tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(DriverError::Config(format!("Invalid log level '{}'", other))),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Plain text output (default)
    #[default]
    Text,
    /// JSON Lines format for parsing
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(DriverError::Config(format!("Invalid log format '{}'", other))),
        }
    }
}

/// Settings handed to the logging subsystem
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LogLevel,
    pub format: LogFormat,
}

/// Driver configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub mode: RunMode,
    pub filter: Option<String>,
    pub logging: LogSettings,
    pub report: Option<ReportConfig>,
    /// File the configuration was read from, if any
    pub source: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the process environment and config files.
    ///
    /// Never fails: an unreadable file leaves the defaults in place and an
    /// invalid override leaves its field untouched. Each problem is returned
    /// alongside the configuration so the caller can warn about it.
    pub fn load() -> (Self, Vec<DriverError>) {
        let vars: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with("TAGTEST_"))
            .collect();

        let path = match vars.get(CONFIG_ENV) {
            Some(explicit) => Some(PathBuf::from(explicit)),
            None => Self::discover_file(Path::new(".")),
        };

        let mut problems = Vec::new();
        let mut config = match path.map(|p| Self::from_file(&p)) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                problems.push(e);
                Self::default()
            }
            None => Self::default(),
        };
        problems.extend(config.apply_env(&vars));
        (config, problems)
    }

    /// Find the config file: working directory first, then the user config dir
    fn discover_file(cwd: &Path) -> Option<PathBuf> {
        let local = cwd.join(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }

        let user = Self::default_config_dir().join("config.toml");
        if user.is_file() {
            return Some(user);
        }

        None
    }

    /// Read and parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self, DriverError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DriverError::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        let mut config = Self::from_toml_str(&content)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse TOML config text
    pub fn from_toml_str(content: &str) -> Result<Self, DriverError> {
        let toml_value: toml::Value = toml::from_str(content)
            .map_err(|e| DriverError::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = Self::default();

        if let Some(driver) = toml_value.get("driver") {
            if let Some(mode) = get_str(driver, "driver.mode")? {
                config.mode = mode.parse()?;
            }
            config.filter = get_str(driver, "driver.filter")?.map(String::from);
        }

        if let Some(logging) = toml_value.get("logging") {
            if let Some(level) = get_str(logging, "logging.level")? {
                config.logging.level = level.parse()?;
            }
            if let Some(format) = get_str(logging, "logging.format")? {
                config.logging.format = format.parse()?;
            }
        }

        config.report = Self::parse_report(&toml_value)?;

        Ok(config)
    }

    fn parse_report(toml: &toml::Value) -> Result<Option<ReportConfig>, DriverError> {
        let section = match toml.get("report") {
            Some(r) => r,
            None => return Ok(None),
        };

        let path = match get_str(section, "report.path")? {
            Some(p) => p.to_string(),
            None => return Err(DriverError::Config("report.path is required".to_string())),
        };

        let format = match get_str(section, "report.format")? {
            Some(f) => f.parse()?,
            None => ReportFormat::from_extension(&path),
        };

        let mut report = ReportConfig {
            output_path: path,
            format,
            ..ReportConfig::default()
        };
        if let Some(name) = get_str(section, "report.suite_name")? {
            report.suite_name = name.to_string();
        }

        Ok(Some(report))
    }

    /// Apply `TAGTEST_*` overrides field by field.
    ///
    /// A variable with an invalid value is skipped and reported; the other
    /// overrides still apply.
    pub fn apply_env(&mut self, vars: &HashMap<String, String>) -> Vec<DriverError> {
        let mut problems = Vec::new();

        if let Some(mode) = vars.get("TAGTEST_MODE") {
            match mode.parse() {
                Ok(mode) => self.mode = mode,
                Err(e) => problems.push(env_error("TAGTEST_MODE", e)),
            }
        }
        if let Some(filter) = vars.get("TAGTEST_FILTER") {
            self.filter = if filter.is_empty() { None } else { Some(filter.clone()) };
        }
        if let Some(level) = vars.get("TAGTEST_LOG_LEVEL") {
            match level.parse() {
                Ok(level) => self.logging.level = level,
                Err(e) => problems.push(env_error("TAGTEST_LOG_LEVEL", e)),
            }
        }
        if let Some(format) = vars.get("TAGTEST_LOG_FORMAT") {
            match format.parse() {
                Ok(format) => self.logging.format = format,
                Err(e) => problems.push(env_error("TAGTEST_LOG_FORMAT", e)),
            }
        }

        problems
    }

    /// Get the default config directory
    fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("tagtest"))
            .unwrap_or_else(|| PathBuf::from(".tagtest"))
    }
}

fn env_error(var: &str, error: DriverError) -> DriverError {
    match error {
        DriverError::Config(msg) => DriverError::Config(format!("{}: {}", var, msg)),
        other => other,
    }
}

/// Read an optional string key, rejecting values of any other type
fn get_str<'a>(table: &'a toml::Value, key: &str) -> Result<Option<&'a str>, DriverError> {
    let field = key.rsplit('.').next().unwrap_or(key);
    match table.get(field) {
        None => Ok(None),
        Some(v) => v
            .as_str()
            .map(Some)
            .ok_or_else(|| DriverError::Config(format!("{} must be a string", key))),
    }
}
