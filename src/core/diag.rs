//! Diagnostics on stderr
//!
//! Results go to stdout; progress and warnings go here, gated by
//! `--verbose` / `--quiet` and styled unless `--no-color` is set.

use colored::Colorize;

/// How chatty diagnostics are
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        }
    }
}

/// Writes diagnostics to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    verbosity: Verbosity,
    color: bool,
}

impl Reporter {
    pub fn new(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    /// Reporter that prints nothing
    #[allow(dead_code)]
    pub fn silent() -> Self {
        Self::new(Verbosity::Quiet, false)
    }

    #[allow(dead_code)]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Detail only shown with `--verbose`
    pub fn debug(&self, message: impl AsRef<str>) {
        if self.verbosity == Verbosity::Verbose {
            eprintln!("{} {}", self.paint("debug:", Level::Debug), message.as_ref());
        }
    }

    /// Non-fatal problem, hidden by `--quiet`
    pub fn warn(&self, message: impl AsRef<str>) {
        if self.verbosity != Verbosity::Quiet {
            eprintln!("{} {}", self.paint("warning:", Level::Warn), message.as_ref());
        }
    }

    fn paint(&self, label: &str, level: Level) -> String {
        if !self.color {
            return label.to_string();
        }
        match level {
            Level::Debug => label.dimmed().to_string(),
            Level::Warn => label.yellow().bold().to_string(),
        }
    }
}

#[derive(Clone, Copy)]
enum Level {
    Debug,
    Warn,
}
