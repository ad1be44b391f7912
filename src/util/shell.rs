//! Console output for a link run.
//!
//! Progress lines are written to stderr as `{status:>12} {message}`, so
//! stdout only ever carries the JSON report when `--message-format json`
//! is selected.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

/// When to color status prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Color when stderr is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Steps of a link run, as shown in the status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Found,
    Reverted,
    Linked,
    Updated,
    /// Dry run that would have changed the manifest
    Skipped,
    /// Dry run with nothing to change
    Fresh,
}

impl Status {
    fn label(self) -> &'static str {
        match self {
            Status::Found => "Found",
            Status::Reverted => "Reverted",
            Status::Linked => "Linked",
            Status::Updated => "Updated",
            Status::Skipped => "Skipped",
            Status::Fresh => "Fresh",
        }
    }

    fn ansi(self) -> &'static str {
        match self {
            Status::Found | Status::Reverted => "\x1b[1;36m",
            Status::Linked | Status::Updated | Status::Fresh => "\x1b[1;32m",
            Status::Skipped => "\x1b[1;33m",
        }
    }
}

/// Width of the right-aligned status column.
const STATUS_WIDTH: usize = 12;

/// Where the run's progress and report go.
#[derive(Debug)]
pub struct Shell {
    quiet: bool,
    json: bool,
    use_color: bool,
}

impl Shell {
    /// Build the shell from command-line flags.
    ///
    /// JSON output suppresses status lines regardless of `quiet`.
    pub fn from_flags(quiet: bool, color: ColorChoice, json: bool) -> Self {
        let use_color = !json
            && match color {
                ColorChoice::Auto => io::stderr().is_terminal(),
                ColorChoice::Always => true,
                ColorChoice::Never => false,
            };

        Shell {
            quiet,
            json,
            use_color,
        }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Print a status line, unless quiet or in JSON mode.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.json || self.quiet {
            return;
        }
        eprintln!("{} {}", self.status_prefix(status), msg);
    }

    /// Print one JSON document on stdout. No-op outside JSON mode.
    pub fn json_event(&self, event: &serde_json::Value) {
        if !self.json {
            return;
        }
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", event);
        let _ = stdout.flush();
    }

    fn status_prefix(&self, status: Status) -> String {
        if self.use_color {
            format!(
                "{}{:>width$}\x1b[0m",
                status.ansi(),
                status.label(),
                width = STATUS_WIDTH
            )
        } else {
            format!("{:>width$}", status.label(), width = STATUS_WIDTH)
        }
    }
}
