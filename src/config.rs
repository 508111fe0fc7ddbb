//! Configuration loader and validator for the content planner client.
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Fallback used when neither the file, the environment nor the CLI name a host.
pub const DEFAULT_BASE_URL: &str = "https://content-creator-backend-dowg.onrender.com";

/// Environment variable that overrides the configured base URL.
pub const BASE_URL_ENV: &str = "CONTENT_API_BASE_URL";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub api: Api,
}

/// REST API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Api {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Config {
    /// Parsed base URL. Validation guarantees this succeeds for loaded configs.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(self.api.base_url.trim())
            .map_err(|_| ConfigError::Invalid("api.base_url must be a valid URL"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Apply the environment override and then an explicit override, in that order.
    pub fn with_overrides(mut self, env_base_url: Option<String>, cli_base_url: Option<String>) -> Self {
        for value in [env_base_url, cli_base_url].into_iter().flatten() {
            if !value.trim().is_empty() {
                self.api.base_url = value.trim().to_string();
            }
        }
        self
    }
}

/// Load configuration from a YAML file and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Resolve the effective configuration: optional file, then `CONTENT_API_BASE_URL`,
/// then the CLI flag. A missing file is only an error when the path was given explicitly.
pub fn resolve(path: Option<&Path>, cli_base_url: Option<String>) -> Result<Config, ConfigError> {
    let cfg = match path {
        Some(p) => load(Some(p))?,
        None if Path::new("config.yaml").exists() => load(None)?,
        None => Config::default(),
    };
    let cfg = cfg.with_overrides(std::env::var(BASE_URL_ENV).ok(), cli_base_url);
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.api.base_url.trim().is_empty() {
        return Err(ConfigError::Invalid("api.base_url must be non-empty"));
    }
    let url = cfg.base_url()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Invalid("api.base_url must use http or https"));
    }
    if cfg.api.timeout_secs == 0 {
        return Err(ConfigError::Invalid("api.timeout_secs must be > 0"));
    }
    Ok(())
}

/// Returns the example YAML shipped with the README.
pub fn example() -> &'static str {
    r#"api:
  base_url: "https://content-creator-backend-dowg.onrender.com"
  timeout_secs: 30
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_example_ok() {
        let cfg: Config = serde_yaml::from_str(example()).unwrap();
        validate(&cfg).unwrap();
        assert_eq!(cfg.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn empty_document_falls_back_to_defaults() {
        let cfg: Config = serde_yaml::from_str("api: {}").unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn invalid_base_url() {
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.api.base_url = "  ".into();
        match validate(&cfg).unwrap_err() {
            ConfigError::Invalid(msg) => assert!(msg.contains("non-empty")),
            _ => panic!("wrong error"),
        }

        cfg.api.base_url = "not a url".into();
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));

        cfg.api.base_url = "ftp://example.com".into();
        match validate(&cfg).unwrap_err() {
            ConfigError::Invalid(msg) => assert!(msg.contains("http")),
            _ => panic!("wrong error"),
        }
    }

    #[test]
    fn invalid_timeout() {
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.api.timeout_secs = 0;
        match validate(&cfg).unwrap_err() {
            ConfigError::Invalid(msg) => assert!(msg.contains("timeout_secs")),
            _ => panic!("wrong error"),
        }
    }

    #[test]
    fn overrides_apply_in_order() {
        let cfg = Config::default().with_overrides(Some("http://env:1".into()), None);
        assert_eq!(cfg.api.base_url, "http://env:1");

        let cfg = Config::default()
            .with_overrides(Some("http://env:1".into()), Some("http://cli:2".into()));
        assert_eq!(cfg.api.base_url, "http://cli:2");

        let cfg = Config::default().with_overrides(Some("".into()), None);
        assert_eq!(cfg.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn load_from_file_ok() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.yaml");
        fs::write(&p, "api:\n  base_url: \"http://localhost:8080\"\n").unwrap();
        let cfg = load(Some(&p)).unwrap();
        assert_eq!(cfg.api.base_url, "http://localhost:8080");
        assert_eq!(cfg.api.timeout_secs, 30);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let td = tempdir().unwrap();
        let p = td.path().join("missing.yaml");
        assert!(matches!(load(Some(&p)), Err(ConfigError::Io(_))));
    }
}
