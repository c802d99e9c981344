// src/core/config_manager.rs
//! Configuration loading: compiled-in defaults, optional YAML file, then
//! environment overrides.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::market_analysis::discovery::DelayRange;

pub const DEFAULT_SOURCE_URL: &str = "https://realpython.github.io/fake-jobs/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_OUTPUT_PATH: &str = "market_summary.json";
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MIN_DELAY_MS: u64 = 100;
const DEFAULT_MAX_DELAY_MS: u64 = 400;
/// Upper bound for a single simulated delivery delay
pub const MAX_STREAM_DELAY_MS: u64 = 60_000;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub scraper: ScraperConfig,
    pub stream: StreamConfig,
    pub output_path: PathBuf,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    pub source_url: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

/// On-disk shape; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    source_url: Option<String>,
    user_agent: Option<String>,
    timeout_seconds: Option<u64>,
    min_delay_ms: Option<u64>,
    max_delay_ms: Option<u64>,
    output_path: Option<PathBuf>,
    log_file: Option<PathBuf>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self {
            scraper: ScraperConfig {
                source_url: DEFAULT_SOURCE_URL.to_string(),
                user_agent: DEFAULT_USER_AGENT.to_string(),
                timeout_seconds: DEFAULT_TIMEOUT_SECS,
            },
            stream: StreamConfig {
                min_delay_ms: DEFAULT_MIN_DELAY_MS,
                max_delay_ms: DEFAULT_MAX_DELAY_MS,
            },
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            log_file: None,
        }
    }
}

impl ConfigManager {
    /// Load configuration from `path`, or `config.yaml` in the working
    /// directory when none is given. A missing default file is not an error;
    /// a missing explicit file is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        match path {
            Some(explicit) => {
                if !explicit.exists() {
                    anyhow::bail!("Config file not found: {}", explicit.display());
                }
                config.merge_file(explicit)?;
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    config.merge_file(&default_path)?;
                }
            }
        }

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn merge_file(&mut self, path: &Path) -> Result<()> {
        info!("Loading configuration from {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: ConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        self.apply_file(file);
        Ok(())
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(url) = file.source_url {
            self.scraper.source_url = url;
        }
        if let Some(agent) = file.user_agent {
            self.scraper.user_agent = agent;
        }
        if let Some(timeout) = file.timeout_seconds {
            self.scraper.timeout_seconds = timeout;
        }
        if let Some(min) = file.min_delay_ms {
            self.stream.min_delay_ms = min;
        }
        if let Some(max) = file.max_delay_ms {
            self.stream.max_delay_ms = max;
        }
        if let Some(output) = file.output_path {
            self.output_path = output;
        }
        if file.log_file.is_some() {
            self.log_file = file.log_file;
        }
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("JOB_MARKET_SOURCE_URL") {
            self.scraper.source_url = url;
        }
        if let Ok(output) = std::env::var("JOB_MARKET_OUTPUT") {
            self.output_path = PathBuf::from(output);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.scraper.timeout_seconds == 0 {
            anyhow::bail!("timeout_seconds must be greater than zero");
        }
        if self.stream.min_delay_ms > self.stream.max_delay_ms {
            anyhow::bail!(
                "min_delay_ms ({}) must not exceed max_delay_ms ({})",
                self.stream.min_delay_ms,
                self.stream.max_delay_ms
            );
        }
        if self.stream.max_delay_ms > MAX_STREAM_DELAY_MS {
            anyhow::bail!(
                "max_delay_ms ({}) must not exceed {}",
                self.stream.max_delay_ms,
                MAX_STREAM_DELAY_MS
            );
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.scraper.timeout_seconds)
    }

    pub fn delay_range(&self) -> DelayRange {
        DelayRange::from_millis(self.stream.min_delay_ms, self.stream.max_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ConfigManager::default();
        assert_eq!(config.scraper.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.output_path, PathBuf::from("market_summary.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_overrides_only_given_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "source_url: http://localhost:9999/jobs\nmax_delay_ms: 50\nmin_delay_ms: 5").unwrap();

        let mut config = ConfigManager::default();
        config.merge_file(file.path()).unwrap();

        assert_eq!(config.scraper.source_url, "http://localhost:9999/jobs");
        assert_eq!(config.scraper.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.stream.min_delay_ms, 5);
        assert_eq!(config.stream.max_delay_ms, 50);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let result = ConfigManager::load(Some(Path::new("/definitely/not/here.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_inverted_delay_range_rejected() {
        let mut config = ConfigManager::default();
        config.stream.min_delay_ms = 500;
        config.stream.max_delay_ms = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_delay_rejected() {
        let mut config = ConfigManager::default();
        config.stream.max_delay_ms = u64::MAX;
        assert!(config.validate().is_err());

        config.stream.max_delay_ms = MAX_STREAM_DELAY_MS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("JOB_MARKET_SOURCE_URL", "http://127.0.0.1:8080/listings");
        std::env::set_var("JOB_MARKET_OUTPUT", "reports/today.json");

        let mut config = ConfigManager::default();
        config.apply_env();

        std::env::remove_var("JOB_MARKET_SOURCE_URL");
        std::env::remove_var("JOB_MARKET_OUTPUT");

        assert_eq!(config.scraper.source_url, "http://127.0.0.1:8080/listings");
        assert_eq!(config.output_path, PathBuf::from("reports/today.json"));
        assert_eq!(config.scraper.user_agent, DEFAULT_USER_AGENT);
    }
}
