//! Environment struct (terminal facts for the driver)

/// Execution environment
#[derive(Debug, Clone)]
pub struct Environment {
    pub stdout_isatty: bool,
    pub stderr_isatty: bool,
    pub colors: u32,
    pub program_name: String,
}

impl Environment {
    /// Detect the environment of the current process
    pub fn init() -> Self {
        Self::default()
    }

    /// An environment with no terminal attached, used for captured output
    pub fn plain(program_name: &str) -> Self {
        Self {
            stdout_isatty: false,
            stderr_isatty: false,
            colors: 0,
            program_name: program_name.to_string(),
        }
    }

    /// Whether output written to stdout should be colored
    pub fn use_colors(&self) -> bool {
        self.stdout_isatty && self.colors > 0
    }

    /// Whether output written to stderr, where logs go, should be colored
    pub fn use_stderr_colors(&self) -> bool {
        self.stderr_isatty && self.colors > 0
    }

    /// Take the program name from argv[0], keeping only the file stem
    pub fn set_program_name_from(&mut self, argv0: &str) {
        if let Some(basename) = std::path::Path::new(argv0).file_stem() {
            self.program_name = basename.to_string_lossy().to_string();
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            stdout_isatty: atty::is(atty::Stream::Stdout),
            stderr_isatty: atty::is(atty::Stream::Stderr),
            colors: detect_color_support(),
            program_name: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

/// Detect the terminal's color support level, independent of which stream is a tty
fn detect_color_support() -> u32 {
    if std::env::var("NO_COLOR").is_ok() {
        return 0;
    }

    if let Ok(colorterm) = std::env::var("COLORTERM") {
        if colorterm == "truecolor" || colorterm == "24bit" {
            return 16777216;
        }
    }

    if let Ok(term) = std::env::var("TERM") {
        if term.contains("256color") || term.contains("256") {
            return 256;
        }
        if term == "dumb" {
            return 0;
        }
    }

    256
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_name_from_path() {
        let mut env = Environment::plain("x");
        env.set_program_name_from("/usr/local/bin/unit_tests");
        assert_eq!(env.program_name, "unit_tests");
        assert!(!env.use_colors());
    }

    #[test]
    fn test_colors_follow_each_stream() {
        let env = Environment {
            stdout_isatty: false,
            stderr_isatty: true,
            colors: 256,
            program_name: "unit_tests".to_string(),
        };
        assert!(!env.use_colors());
        assert!(env.use_stderr_colors());

        let env = Environment { colors: 0, ..env };
        assert!(!env.use_stderr_colors());
    }
}
