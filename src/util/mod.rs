//! Shared utilities

pub mod config;
pub mod diagnostic;
pub mod fs;
pub mod shell;

pub use config::{Config, LinkSettings};
pub use diagnostic::Diagnostic;
pub use shell::{ColorChoice, Shell, Status};
