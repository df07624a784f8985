//! GitHub API types not covered by `unblock-core`.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Hosts accepted by [`parse_repository_url`].
const GITHUB_HOSTS: &[&str] = &["github.com", "www.github.com", "api.github.com"];

/// A pull request found by search, before its details are fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    /// Repository owner.
    pub owner: String,

    /// Repository name.
    pub repo: String,

    /// PR number.
    pub number: u64,

    /// PR title.
    pub title: String,

    /// PR URL.
    pub html_url: String,
}

impl PullRequestRef {
    /// `owner/repo#number`.
    #[must_use]
    pub fn slug(&self) -> String {
        format!("{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// Extract `(owner, repo)` from a GitHub repository URL.
///
/// Accepts web URLs (`https://github.com/owner/repo/...`) and API URLs
/// (`https://api.github.com/repos/owner/repo/...`).
///
/// # Errors
/// Returns [`Error::InvalidRepositoryUrl`] for other hosts or paths that don't
/// name a repository.
pub fn parse_repository_url(raw: &str) -> Result<(String, String)> {
    parse_repository_url_on_host(raw, None)
}

/// Like [`parse_repository_url`], but also accepts `extra_host`, the host of a
/// GitHub Enterprise server (`https://ghe.corp/api/v3/repos/owner/repo`).
///
/// # Errors
/// Returns [`Error::InvalidRepositoryUrl`] for other hosts or paths that don't
/// name a repository.
pub fn parse_repository_url_on_host(
    raw: &str,
    extra_host: Option<&str>,
) -> Result<(String, String)> {
    let invalid = || Error::InvalidRepositoryUrl(raw.to_string());

    let url = Url::parse(raw).map_err(|_| invalid())?;
    let host = url.host_str().ok_or_else(invalid)?;
    if !GITHUB_HOSTS.contains(&host) && extra_host != Some(host) {
        return Err(invalid());
    }

    let segments: Vec<&str> = url
        .path_segments()
        .ok_or_else(invalid)?
        .filter(|s| !s.is_empty())
        .collect();

    let rest = match segments.iter().position(|s| *s == "repos") {
        Some(idx) => &segments[idx + 1..],
        None => &segments[..],
    };

    match rest {
        [owner, repo, ..] => Ok(((*owner).to_string(), (*repo).to_string())),
        _ => Err(invalid()),
    }
}

/// Host of a custom API base URL, or `None` for github.com itself.
pub(crate) fn enterprise_host(base_url: &str) -> Option<String> {
    let url = Url::parse(base_url).ok()?;
    let host = url.host_str()?;
    (!GITHUB_HOSTS.contains(&host)).then(|| host.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_web_url() {
        assert_eq!(
            parse_repository_url("https://github.com/owner/repo").unwrap(),
            ("owner".into(), "repo".into())
        );
        assert_eq!(
            parse_repository_url("https://www.github.com/owner/repo/pull/5/").unwrap(),
            ("owner".into(), "repo".into())
        );
    }

    #[test]
    fn test_parse_api_url() {
        assert_eq!(
            parse_repository_url("https://api.github.com/repos/octo/hello-world").unwrap(),
            ("octo".into(), "hello-world".into())
        );
    }

    #[test]
    fn test_parse_rejects_other_hosts() {
        let result = parse_repository_url("https://gitlab.com/owner/repo");
        assert!(matches!(result, Err(Error::InvalidRepositoryUrl(_))));
    }

    #[test]
    fn test_parse_rejects_short_paths() {
        assert!(parse_repository_url("https://github.com/owner").is_err());
        assert!(parse_repository_url("https://api.github.com/repos/owner").is_err());
        assert!(parse_repository_url("not a url").is_err());
    }

    #[test]
    fn test_parse_enterprise_api_url() {
        assert_eq!(
            parse_repository_url_on_host("https://ghe.corp/api/v3/repos/o/r", Some("ghe.corp"))
                .unwrap(),
            ("o".into(), "r".into())
        );
        assert!(parse_repository_url("https://ghe.corp/api/v3/repos/o/r").is_err());
        assert!(
            parse_repository_url_on_host("https://other.corp/api/v3/repos/o/r", Some("ghe.corp"))
                .is_err()
        );
    }

    #[test]
    fn test_enterprise_host() {
        assert_eq!(
            enterprise_host("https://ghe.corp/api/v3").as_deref(),
            Some("ghe.corp")
        );
        assert_eq!(enterprise_host("https://api.github.com"), None);
        assert_eq!(enterprise_host("not a url"), None);
    }

    #[test]
    fn test_pull_request_ref_slug() {
        let pr = PullRequestRef {
            owner: "owner".into(),
            repo: "repo".into(),
            number: 9,
            title: "t".into(),
            html_url: "https://github.com/owner/repo/pull/9".into(),
        };
        assert_eq!(pr.slug(), "owner/repo#9");
    }
}
