//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Uses `std::process::exit`
//! - Installs the tracing subscriber
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: shell arguments become typed commands via clap
//! 2. **Context Setup**: config, data directory and API via `initialize`
//! 3. **Dispatch**: route commands to handlers
//! 4. **Exit Codes**: a command that ends with an error notice (a blocked
//!    promotion, a rejected log edit) exits with status 1 after printing

use super::handlers;
use super::session;
use super::setup::{Cli, Commands};
use anyhow::Result;
use clap::Parser;
use servlogapp::init::initialize;
use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `SERVLOG_LOG=servlogapp=debug`.
const LOG_ENV: &str = "SERVLOG_LOG";

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let mut ctx = initialize(cli.data.clone())?;
    let format = cli.output;

    let result = match cli.command {
        None => handlers::list_drafts(&ctx.api, format),
        Some(Commands::Draft(cmd)) => handlers::draft(&mut ctx.api, cmd, format)?,
        Some(Commands::Promote) => handlers::promote(&mut ctx.api, format),
        Some(Commands::Log(cmd)) => handlers::log(&mut ctx.api, cmd, format)?,
        Some(Commands::Session) => return session::run(&mut ctx.api),
        Some(Commands::Config) => return handlers::config(&ctx, format),
    };

    if result.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}

/// Logs go to stderr. `--verbose` wins over the environment.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .try_init();
}
