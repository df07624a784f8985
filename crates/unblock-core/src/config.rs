//! Configuration management for unblock.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analyzer::{AnalysisOptions, DEFAULT_EXCERPT_LINES};
use crate::error::Result;

/// unblock configuration, usually loaded from `~/.config/unblock/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// GitHub-specific settings.
    #[serde(default)]
    pub github: GitHubConfig,

    /// Fetch settings.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Analysis settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl Config {
    /// Load config from a TOML file. A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns error if file can't be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to a TOML file.
    ///
    /// # Errors
    /// Returns error if serialization or write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Analyzer options derived from this config.
    #[must_use]
    pub const fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            excerpt_lines: self.analysis.excerpt_lines,
        }
    }
}

/// GitHub-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GitHubConfig {
    /// Custom API URL for GitHub Enterprise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

/// How pull request data is fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum number of pull requests fetched at once.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Fetch inline review comments to report unanswered ones.
    #[serde(default = "default_review_comments")]
    pub review_comments: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            review_comments: default_review_comments(),
        }
    }
}

const fn default_max_concurrency() -> usize {
    8
}

const fn default_review_comments() -> bool {
    true
}

/// Analyzer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Trailing lines of failing check output to show.
    #[serde(default = "default_excerpt_lines")]
    pub excerpt_lines: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            excerpt_lines: default_excerpt_lines(),
        }
    }
}

const fn default_excerpt_lines() -> usize {
    DEFAULT_EXCERPT_LINES
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.github.api_url, None);
        assert_eq!(config.fetch.max_concurrency, 8);
        assert!(config.fetch.review_comments);
        assert_eq!(config.analysis.excerpt_lines, 5);
        assert_eq!(config.analysis_options(), AnalysisOptions::default());
    }

    #[test]
    fn test_config_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        let config = Config {
            github: GitHubConfig {
                api_url: Some("https://github.example.com/api/v3".into()),
            },
            fetch: FetchConfig {
                max_concurrency: 2,
                review_comments: false,
            },
            analysis: AnalysisConfig { excerpt_lines: 10 },
        };

        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();

        assert_eq!(
            loaded.github.api_url,
            Some("https://github.example.com/api/v3".into())
        );
        assert_eq!(loaded.fetch.max_concurrency, 2);
        assert!(!loaded.fetch.review_comments);
        assert_eq!(loaded.analysis_options().excerpt_lines, 10);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[analysis]\nexcerpt_lines = 3\n").unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.analysis.excerpt_lines, 3);
        assert_eq!(loaded.fetch.max_concurrency, 8);
        assert!(loaded.fetch.review_comments);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[fetch]\nmax_concurrency = \"lots\"\n").unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_missing_config_returns_default() {
        let config = Config::load("/nonexistent/path/config.toml").unwrap();
        assert_eq!(config.fetch.max_concurrency, 8);
    }
}
