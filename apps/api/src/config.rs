use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::DEFAULT_API_URL;

/// Application configuration loaded from environment variables.
/// Every setting has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_file: PathBuf,
    /// Without a key, /analyze serves the unconfigured fallback.
    pub anthropic_api_key: Option<String>,
    pub llm_api_url: String,
    pub analysis_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let timeout_secs = non_empty("ANALYSIS_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse::<u64>()
            .context("ANALYSIS_TIMEOUT_SECS must be a whole number of seconds")?;
        if timeout_secs == 0 {
            bail!("ANALYSIS_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Config {
            data_file: non_empty("JOBS_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/jobs.json")),
            anthropic_api_key: non_empty("ANTHROPIC_API_KEY"),
            llm_api_url: non_empty("LLM_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            analysis_timeout: Duration::from_secs(timeout_secs),
            port: non_empty("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: non_empty("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
