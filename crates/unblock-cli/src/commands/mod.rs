//! CLI command definitions and handlers.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

pub mod analyze;
pub mod completions;
pub mod inspect;
pub mod utils;

/// unblock - see why your pull requests cannot be merged.
#[derive(Debug, Parser)]
#[command(name = "unblock", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Only print results and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Path to the config file.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze every open pull request authored by a user.
    Analyze {
        /// GitHub login to analyze (defaults to the authenticated user).
        username: Option<String>,

        /// Print the analyses as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Analyze a saved pull request snapshot without contacting GitHub.
    Inspect {
        /// Snapshot JSON file with `details`, `reviews` and `check_runs`.
        file: PathBuf,

        /// Print the analysis as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
