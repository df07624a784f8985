//! `unblock analyze` command - Explain why a user's open PRs can't be merged.

use std::path::Path;

use anyhow::{Context, Result};
use unblock_core::PrAnalysis;
use unblock_github::{Auth, GitHubClient};

use super::utils;
use crate::output;
use crate::services::{AnalyzeConfig, AnalyzeService, PrOutcome};

/// Run the analyze command.
pub fn run(username: Option<&str>, json: bool, config_path: Option<&Path>) -> Result<()> {
    let config = utils::load_config(config_path)?;

    let auth = Auth::auto();
    let client = match utils::api_url(&config) {
        Some(url) => GitHubClient::with_base_url(&auth, url),
        None => GitHubClient::new(&auth),
    }
    .context("Failed to authenticate with GitHub")?;

    let service = AnalyzeService::new(&client, AnalyzeConfig::from(&config));
    let spinner = (!json && !output::is_quiet()).then(|| output::spinner("Finding pull requests..."));

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(async {
        let login = service.resolve_user(username).await?;
        let prs = service.find_open_prs(&login).await?;

        if let Some(spinner) = &spinner {
            spinner.set_message(format!("Analyzing {} pull request(s) by {login}...", prs.len()));
        }

        let outcomes = service.analyze_all(&prs).await;
        Ok::<_, anyhow::Error>((login, outcomes))
    });

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let (login, outcomes) = result?;

    let analyses = collect_analyses(outcomes);

    if json {
        println!("{}", serde_json::to_string_pretty(&analyses)?);
        return Ok(());
    }

    if analyses.is_empty() {
        output::info(&format!("No open pull requests by {login}"));
        return Ok(());
    }

    print_report(&analyses);
    Ok(())
}

/// Keep the successful analyses, warning about pull requests that failed.
fn collect_analyses(outcomes: Vec<PrOutcome>) -> Vec<PrAnalysis> {
    outcomes
        .into_iter()
        .filter_map(|outcome| match outcome.analysis {
            Ok(analysis) => Some(analysis),
            Err(e) => {
                output::warn(&format!("Skipping {}: {e:#}", outcome.pr.slug()));
                None
            }
        })
        .collect()
}

fn print_report(analyses: &[PrAnalysis]) {
    let blocked = analyses.iter().filter(|a| !a.is_mergeable()).count();

    for (i, analysis) in analyses.iter().enumerate() {
        if i > 0 {
            output::essential("");
        }
        output::print_analysis(analysis);
    }

    output::hr();
    output::info(&format!(
        "{} pull request(s), {} blocked",
        analyses.len(),
        blocked
    ));
}
