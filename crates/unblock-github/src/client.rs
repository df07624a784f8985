//! GitHub API client.

use chrono::{DateTime, Utc};
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use unblock_core::{
    CheckConclusion, CheckOutput, CheckRun, PullRequestDetails, Review, ReviewComment,
    ReviewState,
};

use crate::auth::Auth;
use crate::error::{Error, Result};
use crate::traits::GitHubApi;
use crate::types::{PullRequestRef, enterprise_host, parse_repository_url_on_host};

/// Page size requested from list endpoints.
const PER_PAGE: &str = "100";

/// Login GitHub shows for reviews whose author account was deleted.
const GHOST_LOGIN: &str = "ghost";

// === Internal API response types ===

/// Internal representation of a PR from the GitHub API.
#[derive(serde::Deserialize)]
struct ApiPullRequest {
    number: u64,
    title: String,
    state: String,
    /// Whether the PR was merged (GitHub returns state="closed" + merged=true for merged PRs).
    #[serde(default)]
    merged: bool,
    #[serde(default)]
    draft: bool,
    html_url: String,
    head: ApiHead,
    base: ApiBase,
    /// Whether the PR is mergeable (None if GitHub is still computing).
    mergeable: Option<bool>,
    /// The mergeable state (e.g., "clean", "dirty", "blocked", "behind").
    mergeable_state: Option<String>,
    #[serde(default)]
    labels: Vec<ApiLabel>,
}

#[derive(serde::Deserialize)]
struct ApiHead {
    sha: String,
}

#[derive(serde::Deserialize)]
struct ApiBase {
    repo: ApiRepository,
}

#[derive(serde::Deserialize)]
struct ApiRepository {
    full_name: String,
}

#[derive(serde::Deserialize)]
struct ApiLabel {
    name: String,
}

#[derive(serde::Deserialize)]
struct ApiUser {
    login: String,
}

impl ApiPullRequest {
    /// Convert API response to the analyzer's input document.
    fn into_details(self) -> PullRequestDetails {
        PullRequestDetails {
            repo: self.base.repo.full_name,
            number: self.number,
            title: self.title,
            url: self.html_url,
            head_sha: self.head.sha,
            mergeable: self.mergeable.into(),
            mergeable_state: self
                .mergeable_state
                .map(Into::into)
                .unwrap_or_default(),
            state: self.state,
            draft: self.draft,
            merged: self.merged,
            labels: self.labels.into_iter().map(|l| l.name).collect(),
        }
    }
}

#[derive(serde::Deserialize)]
struct ApiReview {
    user: Option<ApiUser>,
    state: String,
    submitted_at: Option<DateTime<Utc>>,
}

impl ApiReview {
    fn into_review(self) -> Review {
        Review {
            login: self
                .user
                .map_or_else(|| GHOST_LOGIN.to_string(), |u| u.login),
            state: ReviewState::from(self.state),
            submitted_at: self.submitted_at,
        }
    }
}

#[derive(serde::Deserialize)]
struct ApiReviewComment {
    id: u64,
    in_reply_to_id: Option<u64>,
    html_url: Option<String>,
}

impl From<ApiReviewComment> for ReviewComment {
    fn from(api: ApiReviewComment) -> Self {
        Self {
            id: api.id,
            in_reply_to_id: api.in_reply_to_id,
            url: api.html_url,
        }
    }
}

#[derive(serde::Deserialize)]
struct ApiCheckRun {
    id: u64,
    name: String,
    status: String,
    conclusion: Option<String>,
    #[serde(default)]
    output: Option<ApiCheckOutput>,
}

#[derive(serde::Deserialize)]
struct ApiCheckOutput {
    title: Option<String>,
    summary: Option<String>,
    text: Option<String>,
}

impl ApiCheckRun {
    fn into_check_run(self) -> CheckRun {
        let output = self.output.map_or_else(CheckOutput::default, |o| CheckOutput {
            title: o.title,
            summary: o.summary,
            text: o.text,
        });

        CheckRun::new(
            self.name,
            self.status,
            self.conclusion.map(CheckConclusion::from),
        )
        .with_output(output)
    }
}

#[derive(serde::Deserialize)]
struct ApiSearchIssue {
    number: u64,
    title: String,
    html_url: String,
    repository_url: String,
}

/// GitHub API client.
pub struct GitHubClient {
    client: Client,
    base_url: String,
    /// Host of a GitHub Enterprise base URL, accepted in repository URLs.
    enterprise_host: Option<String>,
    /// Token stored as `SecretString` for automatic zeroization on drop.
    token: SecretString,
}

impl GitHubClient {
    /// Default GitHub API URL.
    pub const DEFAULT_API_URL: &'static str = "https://api.github.com";

    /// Create a new GitHub client.
    ///
    /// # Errors
    /// Returns error if authentication fails.
    pub fn new(auth: &Auth) -> Result<Self> {
        Self::with_base_url(auth, Self::DEFAULT_API_URL)
    }

    /// Create a new GitHub client with a custom API URL (for GitHub Enterprise).
    ///
    /// # Errors
    /// Returns error if authentication fails.
    pub fn with_base_url(auth: &Auth, base_url: impl Into<String>) -> Result<Self> {
        let token = auth.resolve()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("unblock-cli"));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        let base_url: String = base_url.into();
        Ok(Self {
            client,
            enterprise_host: enterprise_host(&base_url),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Make a GET request.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_with_query(path, &[]).await
    }

    /// Make a GET request with query parameters.
    async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .query(query)
            .header(
                AUTHORIZATION,
                format!("Bearer {}", self.token.expose_secret()),
            )
            .send()
            .await?;

        Self::handle_response(path, response).await
    }

    /// Handle API response.
    async fn handle_response<T: DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        debug!(path, status = status.as_u16(), "response");

        if status.is_success() {
            let bytes = response.bytes().await?;
            return Ok(serde_json::from_slice(&bytes)?);
        }

        // Handle error responses
        let status_code = status.as_u16();

        match status_code {
            401 => Err(Error::AuthenticationFailed),
            403 if response
                .headers()
                .get("x-ratelimit-remaining")
                .is_some_and(|v| v == "0") =>
            {
                Err(Error::RateLimited)
            }
            404 => Err(Error::NotFound(path.to_string())),
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(Error::ApiError {
                    status: status_code,
                    message: text,
                })
            }
        }
    }

    // === User Operations ===

    /// Login of the authenticated user.
    ///
    /// # Errors
    /// Returns error if the API call fails.
    pub async fn current_user(&self) -> Result<String> {
        let user: ApiUser = self.get("/user").await?;
        Ok(user.login)
    }

    /// Open pull requests authored by `author`.
    ///
    /// Returns up to the first 100 results of the search API.
    ///
    /// # Errors
    /// Returns error if the API call fails or a result's repository URL can't
    /// be parsed.
    pub async fn search_open_prs(&self, author: &str) -> Result<Vec<PullRequestRef>> {
        #[derive(serde::Deserialize)]
        struct Response {
            items: Vec<ApiSearchIssue>,
        }

        let query = format!("is:pr is:open author:{author}");
        let response: Response = self
            .get_with_query("/search/issues", &[("q", &query), ("per_page", PER_PAGE)])
            .await?;

        response
            .items
            .into_iter()
            .map(|item| {
                let (owner, repo) = parse_repository_url_on_host(
                    &item.repository_url,
                    self.enterprise_host.as_deref(),
                )?;
                Ok(PullRequestRef {
                    owner,
                    repo,
                    number: item.number,
                    title: item.title,
                    html_url: item.html_url,
                })
            })
            .collect()
    }

    // === PR Operations ===

    /// Get the details of a pull request.
    ///
    /// # Errors
    /// Returns error if PR not found or API call fails.
    pub async fn get_pr_details(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestDetails> {
        let api_pr: ApiPullRequest = self
            .get(&format!("/repos/{owner}/{repo}/pulls/{number}"))
            .await?;

        Ok(api_pr.into_details())
    }

    /// List reviews on a pull request, ordered by submission time.
    ///
    /// Reviews without a submission time (pending drafts) sort first; ties keep
    /// the order GitHub returned.
    ///
    /// # Errors
    /// Returns error if the API call fails.
    pub async fn list_reviews(&self, owner: &str, repo: &str, number: u64) -> Result<Vec<Review>> {
        let api_reviews: Vec<ApiReview> = self
            .get_with_query(
                &format!("/repos/{owner}/{repo}/pulls/{number}/reviews"),
                &[("per_page", PER_PAGE)],
            )
            .await?;

        let mut reviews: Vec<Review> = api_reviews.into_iter().map(ApiReview::into_review).collect();
        reviews.sort_by_key(|r| r.submitted_at);
        Ok(reviews)
    }

    /// List inline review comments on a pull request, oldest first.
    ///
    /// # Errors
    /// Returns error if the API call fails.
    pub async fn list_review_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<ReviewComment>> {
        let comments: Vec<ApiReviewComment> = self
            .get_with_query(
                &format!("/repos/{owner}/{repo}/pulls/{number}/comments"),
                &[("per_page", PER_PAGE)],
            )
            .await?;

        Ok(comments.into_iter().map(ReviewComment::from).collect())
    }

    // === Check Runs ===

    /// Get check runs for a commit.
    ///
    /// Runs are ordered by id, which GitHub assigns increasingly, so a re-run
    /// always comes after the run it replaces.
    ///
    /// # Errors
    /// Returns error if the API call fails.
    pub async fn get_check_runs(
        &self,
        owner: &str,
        repo: &str,
        commit_sha: &str,
    ) -> Result<Vec<CheckRun>> {
        #[derive(serde::Deserialize)]
        struct Response {
            check_runs: Vec<ApiCheckRun>,
        }

        let mut response: Response = self
            .get_with_query(
                &format!("/repos/{owner}/{repo}/commits/{commit_sha}/check-runs"),
                &[("per_page", PER_PAGE)],
            )
            .await?;

        response.check_runs.sort_by_key(|cr| cr.id);

        Ok(response
            .check_runs
            .into_iter()
            .map(ApiCheckRun::into_check_run)
            .collect())
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url)
            .field("token", &"[redacted]")
            .finish_non_exhaustive()
    }
}

// === Trait Implementation ===

impl GitHubApi for GitHubClient {
    async fn current_user(&self) -> Result<String> {
        self.current_user().await
    }

    async fn search_open_prs(&self, author: &str) -> Result<Vec<PullRequestRef>> {
        self.search_open_prs(author).await
    }

    async fn get_pr_details(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestDetails> {
        self.get_pr_details(owner, repo, number).await
    }

    async fn list_reviews(&self, owner: &str, repo: &str, number: u64) -> Result<Vec<Review>> {
        self.list_reviews(owner, repo, number).await
    }

    async fn list_review_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<ReviewComment>> {
        self.list_review_comments(owner, repo, number).await
    }

    async fn get_check_runs(
        &self,
        owner: &str,
        repo: &str,
        commit_sha: &str,
    ) -> Result<Vec<CheckRun>> {
        self.get_check_runs(owner, repo, commit_sha).await
    }
}
