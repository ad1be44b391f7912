//! Stagelink CLI - link local packages into the staging package.json

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stagelink::util::{diagnostic, Shell};
use stagelink::LinkError;

mod cli;
mod commands;

use cli::{Cli, MessageFormat};

fn main() {
    let cli = Cli::parse();
    let shell = Shell::from_flags(
        cli.quiet,
        cli.color,
        cli.message_format == MessageFormat::Json,
    );

    if let Err(e) = run(&cli, &shell) {
        report_error(&e, &shell);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, shell: &Shell) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("stagelink=debug")
    } else if cli.quiet {
        EnvFilter::new("stagelink=error")
    } else {
        EnvFilter::new("stagelink=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(shell.use_color())
        .with_target(false)
        .without_time()
        .init();

    commands::link::execute(cli, shell)
}

fn report_error(e: &anyhow::Error, shell: &Shell) {
    let link_error = e.downcast_ref::<LinkError>();

    if shell.is_json() {
        let event = serde_json::json!({
            "reason": "error",
            "kind": link_error.map(LinkError::kind),
            "message": format!("{:#}", e),
        });
        shell.json_event(&event);
        return;
    }

    match link_error {
        Some(err) => diagnostic::emit(&err.to_diagnostic(), shell.use_color()),
        None => eprintln!("error: {:#}", e),
    }
}
