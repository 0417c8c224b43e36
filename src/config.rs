use crate::constants::{DEFAULT_CITY, DEFAULT_USER_AGENT};
use crate::error::{Result, ScraperError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Runtime configuration. Every field has a default so an absent or partial
/// `config.toml` is fine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output_path: PathBuf,
    pub log_dir: PathBuf,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// Politeness pause between request starts against an origin.
    pub delay_ms: u64,
    pub detail_workers: usize,
    pub queue_capacity: usize,
    pub run_timeout_secs: Option<u64>,
    pub city: String,
    /// Exact-string venue corrections applied during aggregation. A deployment
    /// that sets this table replaces the built-in one wholesale.
    pub location_overrides: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("data/pittsburgh_events.csv"),
            log_dir: PathBuf::from("logs"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 15,
            delay_ms: 1500,
            detail_workers: 4,
            queue_capacity: 32,
            run_timeout_secs: None,
            city: DEFAULT_CITY.to_string(),
            location_overrides: default_location_overrides(),
        }
    }
}

/// Known-bad normalizations observed on the live sources.
pub fn default_location_overrides() -> BTreeMap<String, String> {
    [
        ("Eddy TheatreWoodland", "Eddy Theatre"),
        ("Wyndham Grand", "Wyndham Grand Pittsburgh Downtown"),
        ("The Circuit Center Hot Metal", "The Circuit Center"),
        ("1139 Penn", "1139 Penn Ave"),
        ("N/A", DEFAULT_CITY),
    ]
    .into_iter()
    .map(|(from, to)| (from.to_string(), to.to_string()))
    .collect()
}

impl Config {
    /// Load from an explicit path, or from `config.toml` in the working
    /// directory when present, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("BURGH_OUTPUT_PATH") {
            if !path.trim().is_empty() {
                self.output_path = PathBuf::from(path.trim());
            }
        }
        if let Ok(workers) = std::env::var("BURGH_DETAIL_WORKERS") {
            self.detail_workers = workers.trim().parse().map_err(|_| {
                ScraperError::Config(format!("BURGH_DETAIL_WORKERS is not a number: {workers}"))
            })?;
        }
        if let Ok(delay) = std::env::var("BURGH_DELAY_MS") {
            self.delay_ms = delay.trim().parse().map_err(|_| {
                ScraperError::Config(format!("BURGH_DELAY_MS is not a number: {delay}"))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.detail_workers == 0 {
            return Err(ScraperError::Config("detail_workers must be at least 1".into()));
        }
        if self.queue_capacity == 0 {
            return Err(ScraperError::Config("queue_capacity must be at least 1".into()));
        }
        if self.city.trim().is_empty() {
            return Err(ScraperError::Config("city must not be empty".into()));
        }
        Ok(())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn run_timeout(&self) -> Option<Duration> {
        self.run_timeout_secs.map(Duration::from_secs)
    }
}
