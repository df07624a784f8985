use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use unblock_core::Config;

/// Environment variable overriding `[github] api_url`.
pub const API_URL_ENV_VAR: &str = "GITHUB_API_URL";

/// `<config_dir>/unblock/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("unblock").join("config.toml"))
}

/// Load the config from an explicit path or the default location.
///
/// An explicit path must exist; a missing default file yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        if !path.exists() {
            bail!("Config file not found: {}", path.display());
        }
        return Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    match default_config_path() {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::default()),
    }
}

/// API URL to use: the environment override, else the configured one.
pub fn api_url(config: &Config) -> Option<String> {
    resolve_api_url(std::env::var(API_URL_ENV_VAR).ok(), config)
}

fn resolve_api_url(env: Option<String>, config: &Config) -> Option<String> {
    env.filter(|url| !url.is_empty())
        .or_else(|| config.github.api_url.clone())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_explicit_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[fetch]\nmax_concurrency = 2\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.fetch.max_concurrency, 2);
        assert_eq!(config.analysis.excerpt_lines, 5);
    }

    #[test]
    fn test_load_missing_explicit_config_fails() {
        let temp = TempDir::new().unwrap();
        let result = load_config(Some(&temp.path().join("nope.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_env_api_url_wins() {
        let mut config = Config::default();
        config.github.api_url = Some("https://ghe.example.com/api/v3".into());

        assert_eq!(
            resolve_api_url(Some("https://env.example.com".into()), &config).as_deref(),
            Some("https://env.example.com")
        );
        assert_eq!(
            resolve_api_url(Some(String::new()), &config).as_deref(),
            Some("https://ghe.example.com/api/v3")
        );
        assert_eq!(resolve_api_url(None, &Config::default()), None);
    }
}
