//! Trait abstractions for GitHub API operations.
//!
//! This module defines the `GitHubApi` trait which abstracts GitHub API operations,
//! enabling dependency injection and testability.

use unblock_core::{CheckRun, PullRequestDetails, Review, ReviewComment};

use crate::{PullRequestRef, Result};

/// Trait for GitHub API operations.
///
/// This trait abstracts GitHub API calls, allowing for:
/// - Dependency injection in commands/services
/// - Mock implementations for testing
/// - Alternative implementations (e.g., recorded fixtures)
pub trait GitHubApi: Send + Sync {
    // === User Operations ===

    /// Login of the authenticated user.
    fn current_user(&self) -> impl std::future::Future<Output = Result<String>> + Send;

    /// Open pull requests authored by `author`, across all repositories.
    fn search_open_prs(
        &self,
        author: &str,
    ) -> impl std::future::Future<Output = Result<Vec<PullRequestRef>>> + Send;

    // === PR Operations ===

    /// Get the details of a pull request.
    fn get_pr_details(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> impl std::future::Future<Output = Result<PullRequestDetails>> + Send;

    /// List reviews on a pull request, oldest first.
    fn list_reviews(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> impl std::future::Future<Output = Result<Vec<Review>>> + Send;

    /// List inline review comments on a pull request, oldest first.
    fn list_review_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> impl std::future::Future<Output = Result<Vec<ReviewComment>>> + Send;

    // === Check Runs ===

    /// Get check runs for a commit, in the order they were reported.
    fn get_check_runs(
        &self,
        owner: &str,
        repo: &str,
        commit_sha: &str,
    ) -> impl std::future::Future<Output = Result<Vec<CheckRun>>> + Send;
}
