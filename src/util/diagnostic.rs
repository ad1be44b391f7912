//! Rendering of fatal errors.
//!
//! A failed run prints the cause, the file it concerns, any detail lines,
//! and a hint on how to fix the input.

use std::path::PathBuf;

/// Hints attached to errors.
pub mod suggestions {
    /// An input path does not exist.
    pub const CHECK_PATHS: &str =
        "Run from the repository root, or pass `--root`, `--manifest` or `--packages-dir`";

    /// A manifest does not have the expected shape.
    pub const SCHEMA: &str =
        "Fix the manifest by hand; stagelink never creates or repairs missing structure";
}

/// An error report for the terminal.
#[derive(Debug, Clone, Default)]
pub struct Diagnostic {
    pub message: String,
    /// File the error is about
    pub location: Option<PathBuf>,
    /// Detail lines
    pub context: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            ..Diagnostic::default()
        }
    }

    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    pub fn with_context(mut self, line: impl Into<String>) -> Self {
        self.context.push(line.into());
        self
    }

    pub fn with_suggestion(mut self, hint: impl Into<String>) -> Self {
        self.suggestions.push(hint.into());
        self
    }

    /// Render as terminal text, one item per line.
    pub fn format(&self, color: bool) -> String {
        let (error, help) = if color {
            ("\x1b[1;31merror\x1b[0m", "\x1b[1;32mhelp\x1b[0m")
        } else {
            ("error", "help")
        };

        let mut lines = vec![format!("{}: {}", error, self.message)];
        if let Some(path) = &self.location {
            lines.push(format!("  --> {}", path.display()));
        }
        lines.extend(self.context.iter().map(|c| format!("  → {}", c)));
        lines.extend(self.suggestions.iter().map(|s| format!("{}: {}", help, s)));

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
