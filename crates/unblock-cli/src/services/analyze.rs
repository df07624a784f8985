//! Analyze service for fetching pull requests and finding their blockers.
//!
//! This service encapsulates the business logic for the analyze command,
//! accepting a trait-based GitHub client for testability.

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use tracing::{info, warn};
use unblock_core::{AnalysisOptions, Analyzer, Config, PrAnalysis, ReviewComment};
use unblock_github::{GitHubApi, PullRequestRef};

/// Configuration for an analyze run.
#[derive(Debug, Clone, Copy)]
pub struct AnalyzeConfig {
    /// Maximum number of pull requests fetched at once.
    pub max_concurrency: usize,
    /// Whether to fetch inline review comments.
    pub review_comments: bool,
    pub options: AnalysisOptions,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for AnalyzeConfig {
    fn from(config: &Config) -> Self {
        Self {
            max_concurrency: config.fetch.max_concurrency,
            review_comments: config.fetch.review_comments,
            options: config.analysis_options(),
        }
    }
}

/// Result of analyzing one pull request.
#[derive(Debug)]
pub struct PrOutcome {
    pub pr: PullRequestRef,
    pub analysis: Result<PrAnalysis>,
}

/// Service for analyze operations with trait-based dependencies.
pub struct AnalyzeService<'a, G: GitHubApi> {
    client: &'a G,
    config: AnalyzeConfig,
    analyzer: Analyzer,
}

impl<'a, G: GitHubApi> AnalyzeService<'a, G> {
    /// Create a new analyze service.
    #[must_use]
    pub const fn new(client: &'a G, config: AnalyzeConfig) -> Self {
        Self {
            client,
            config,
            analyzer: Analyzer::new(config.options),
        }
    }

    /// The given login, or the authenticated user's when none is given.
    pub async fn resolve_user(&self, username: Option<&str>) -> Result<String> {
        match username {
            Some(name) => Ok(name.to_string()),
            None => self
                .client
                .current_user()
                .await
                .context("Failed to look up the authenticated user"),
        }
    }

    /// Open pull requests authored by `author`.
    pub async fn find_open_prs(&self, author: &str) -> Result<Vec<PullRequestRef>> {
        self.client
            .search_open_prs(author)
            .await
            .with_context(|| format!("Failed to search pull requests by {author}"))
    }

    /// Fetch one pull request's inputs and analyze them.
    ///
    /// Details, reviews and review comments are fetched together, then check
    /// runs for the head commit. Failing to fetch anything but the details
    /// degrades to an empty list; failing to fetch details is an error.
    pub async fn analyze_pr(&self, pr: &PullRequestRef) -> Result<PrAnalysis> {
        let slug = pr.slug();

        let (details, reviews, comments) = tokio::join!(
            self.client.get_pr_details(&pr.owner, &pr.repo, pr.number),
            self.client.list_reviews(&pr.owner, &pr.repo, pr.number),
            self.fetch_review_comments(pr),
        );

        let details = details.with_context(|| format!("Failed to fetch {slug}"))?;

        let reviews = reviews.unwrap_or_else(|e| {
            warn!(pr = %slug, error = %e, "failed to fetch reviews, continuing without them");
            Vec::new()
        });

        let comments = comments.unwrap_or_else(|e| {
            warn!(pr = %slug, error = %e, "failed to fetch review comments, continuing without them");
            Vec::new()
        });

        let check_runs = self
            .client
            .get_check_runs(&pr.owner, &pr.repo, &details.head_sha)
            .await
            .unwrap_or_else(|e| {
                warn!(pr = %slug, error = %e, "failed to fetch check runs, continuing without them");
                Vec::new()
            });

        let analysis = self
            .analyzer
            .analyze_with_comments(&details, &reviews, &check_runs, &comments);
        info!(pr = %slug, blockers = analysis.blockers.len(), "analyzed");
        Ok(analysis)
    }

    async fn fetch_review_comments(
        &self,
        pr: &PullRequestRef,
    ) -> unblock_github::Result<Vec<ReviewComment>> {
        if !self.config.review_comments {
            return Ok(Vec::new());
        }
        self.client
            .list_review_comments(&pr.owner, &pr.repo, pr.number)
            .await
    }

    /// Analyze every pull request, at most `max_concurrency` at a time.
    ///
    /// Outcomes are returned in input order.
    pub async fn analyze_all(&self, prs: &[PullRequestRef]) -> Vec<PrOutcome> {
        stream::iter(prs)
            .map(|pr| async move {
                PrOutcome {
                    pr: pr.clone(),
                    analysis: self.analyze_pr(pr).await,
                }
            })
            .buffered(self.config.max_concurrency.max(1))
            .collect()
            .await
    }
}
