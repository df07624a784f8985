//! Mock implementations for testing services.
//!
//! `MockGitHubApi` implements the `GitHubApi` trait from unblock-github so
//! service logic can be tested without network access.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use unblock_core::{
    CheckRun, Mergeable, MergeableState, PullRequestDetails, Review, ReviewComment,
};
use unblock_github::{Error as GitHubError, GitHubApi, PullRequestRef, Result as GitHubResult};

/// Reference to PR `number` in `owner/repo`, as search would return it.
pub fn pr_ref(number: u64) -> PullRequestRef {
    PullRequestRef {
        owner: "owner".to_string(),
        repo: "repo".to_string(),
        number,
        title: format!("PR #{number}"),
        html_url: format!("https://github.com/owner/repo/pull/{number}"),
    }
}

/// Mock implementation of `GitHubApi` for testing.
///
/// PRs live in `owner/repo`; PR `n` has head SHA `sha-n`.
pub struct MockGitHubApi {
    pub user: String,
    pub prs: Vec<PullRequestRef>,
    pub details: HashMap<u64, PullRequestDetails>,
    pub reviews: HashMap<u64, Vec<Review>>,
    pub check_runs: HashMap<String, Vec<CheckRun>>,
    pub review_comments: HashMap<u64, Vec<ReviewComment>>,
    pub reviews_should_fail: bool,
    pub check_runs_should_fail: bool,
    pub review_comments_should_fail: bool,
    review_comment_fetches: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl Default for MockGitHubApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGitHubApi {
    pub fn new() -> Self {
        Self {
            user: "octocat".to_string(),
            prs: Vec::new(),
            details: HashMap::new(),
            reviews: HashMap::new(),
            check_runs: HashMap::new(),
            review_comments: HashMap::new(),
            reviews_should_fail: false,
            check_runs_should_fail: false,
            review_comments_should_fail: false,
            review_comment_fetches: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_user(mut self, login: &str) -> Self {
        self.user = login.to_string();
        self
    }

    /// Add an open PR. `Dirty` PRs report `mergeable: false`, others `true`.
    pub fn with_pr(mut self, number: u64, mergeable_state: MergeableState) -> Self {
        let reference = pr_ref(number);
        let mergeable = if mergeable_state == MergeableState::Dirty {
            Mergeable::No
        } else {
            Mergeable::Yes
        };

        self.details.insert(
            number,
            PullRequestDetails {
                repo: "owner/repo".to_string(),
                number,
                title: reference.title.clone(),
                url: reference.html_url.clone(),
                head_sha: format!("sha-{number}"),
                mergeable,
                mergeable_state,
                state: "open".to_string(),
                draft: false,
                merged: false,
                labels: Vec::new(),
            },
        );
        self.prs.push(reference);
        self
    }

    pub fn with_reviews(mut self, number: u64, reviews: Vec<Review>) -> Self {
        self.reviews.insert(number, reviews);
        self
    }

    pub fn with_check_runs(mut self, number: u64, runs: Vec<CheckRun>) -> Self {
        self.check_runs.insert(format!("sha-{number}"), runs);
        self
    }

    pub fn with_review_comments(mut self, number: u64, comments: Vec<ReviewComment>) -> Self {
        self.review_comments.insert(number, comments);
        self
    }

    pub fn with_failing_reviews(mut self) -> Self {
        self.reviews_should_fail = true;
        self
    }

    pub fn with_failing_check_runs(mut self) -> Self {
        self.check_runs_should_fail = true;
        self
    }

    pub fn with_failing_review_comments(mut self) -> Self {
        self.review_comments_should_fail = true;
        self
    }

    /// Number of times review comments were requested.
    pub fn review_comment_fetches(&self) -> usize {
        self.review_comment_fetches.load(Ordering::SeqCst)
    }

    /// Most detail fetches observed running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

impl GitHubApi for MockGitHubApi {
    async fn current_user(&self) -> GitHubResult<String> {
        Ok(self.user.clone())
    }

    async fn search_open_prs(&self, _author: &str) -> GitHubResult<Vec<PullRequestRef>> {
        Ok(self.prs.clone())
    }

    async fn get_pr_details(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> GitHubResult<PullRequestDetails> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        // Let sibling fetches start so overlap is observable.
        tokio::task::yield_now().await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.details
            .get(&number)
            .cloned()
            .ok_or_else(|| GitHubError::NotFound(format!("/repos/{owner}/{repo}/pulls/{number}")))
    }

    async fn list_reviews(&self, _owner: &str, _repo: &str, number: u64) -> GitHubResult<Vec<Review>> {
        if self.reviews_should_fail {
            return Err(GitHubError::ApiError {
                status: 500,
                message: "mock reviews failure".to_string(),
            });
        }
        Ok(self.reviews.get(&number).cloned().unwrap_or_default())
    }

    async fn list_review_comments(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
    ) -> GitHubResult<Vec<ReviewComment>> {
        self.review_comment_fetches.fetch_add(1, Ordering::SeqCst);
        if self.review_comments_should_fail {
            return Err(GitHubError::RateLimited);
        }
        Ok(self.review_comments.get(&number).cloned().unwrap_or_default())
    }

    async fn get_check_runs(
        &self,
        _owner: &str,
        _repo: &str,
        commit_sha: &str,
    ) -> GitHubResult<Vec<CheckRun>> {
        if self.check_runs_should_fail {
            return Err(GitHubError::RateLimited);
        }
        Ok(self.check_runs.get(commit_sha).cloned().unwrap_or_default())
    }
}
