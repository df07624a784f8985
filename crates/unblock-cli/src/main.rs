//! unblock CLI - See why your pull requests cannot be merged.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;
mod services;

use commands::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    output::set_quiet(cli.quiet);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Analyze { username, json } => {
            commands::analyze::run(username.as_deref(), json, config)
        }
        Commands::Inspect { file, json } => commands::inspect::run(&file, json, config),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

/// Log to stderr. `-v` flags take precedence over `RUST_LOG`.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
