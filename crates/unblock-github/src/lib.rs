//! # unblock-github
//!
//! GitHub API integration for unblock: finds a user's open pull requests and
//! fetches the details, reviews, review comments and check runs the analyzer
//! consumes.
//!
//! # Security
//!
//! Authentication tokens are stored using `SecretString` which automatically
//! zeroizes memory when dropped, reducing credential exposure in memory dumps.

mod auth;
mod client;
mod error;
mod traits;
mod types;

pub use auth::Auth;
pub use client::GitHubClient;
pub use error::{Error, Result};
// Re-export SecretString for constructing Auth::Token
pub use secrecy::SecretString;
pub use traits::GitHubApi;
pub use types::{PullRequestRef, parse_repository_url, parse_repository_url_on_host};
