//! `unblock inspect` command - Analyze a saved snapshot offline.

use std::path::Path;

use anyhow::{Context, Result};
use unblock_core::{Analyzer, Snapshot};

use super::utils;
use crate::output;

/// Run the inspect command.
pub fn run(file: &Path, json: bool, config_path: Option<&Path>) -> Result<()> {
    let config = utils::load_config(config_path)?;

    let snapshot = Snapshot::load(file)
        .with_context(|| format!("Failed to read snapshot {}", file.display()))?;

    let analysis = snapshot.analyze(&Analyzer::new(config.analysis_options()));

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        output::print_analysis(&analysis);
    }

    Ok(())
}
