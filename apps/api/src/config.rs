use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::DEFAULT_MODEL;
use crate::scoring::{AppliedJobPolicy, ScoringSettings};

/// Which `ScoringModel` backs the recommender and the ranker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringBackend {
    Llm,
    Heuristic,
}

impl FromStr for ScoringBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "llm" => Ok(ScoringBackend::Llm),
            "heuristic" => Ok(ScoringBackend::Heuristic),
            other => bail!("SCORING_BACKEND must be 'llm' or 'heuristic', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: Option<String>,
    pub scoring_backend: ScoringBackend,
    pub scoring_model: String,
    pub scoring: ScoringSettings,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let anthropic_api_key = get("ANTHROPIC_API_KEY");
        let scoring_backend = match get("SCORING_BACKEND") {
            Some(v) => v.parse()?,
            None if anthropic_api_key.is_some() => ScoringBackend::Llm,
            None => ScoringBackend::Heuristic,
        };
        if scoring_backend == ScoringBackend::Llm && anthropic_api_key.is_none() {
            bail!("SCORING_BACKEND=llm requires ANTHROPIC_API_KEY");
        }

        let concurrency = parse_optional::<usize>(get("SCORING_CONCURRENCY"), "SCORING_CONCURRENCY")?
            .filter(|n| *n > 0);
        let timeout = parse_optional::<u64>(get("SCORING_TIMEOUT_SECS"), "SCORING_TIMEOUT_SECS")?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        let include_applied =
            parse_optional::<bool>(get("RECOMMEND_INCLUDE_APPLIED"), "RECOMMEND_INCLUDE_APPLIED")?
                .unwrap_or(false);

        Ok(Config {
            database_url: get("DATABASE_URL")
                .context("Required environment variable 'DATABASE_URL' is not set")?,
            anthropic_api_key,
            scoring_backend,
            scoring_model: get("SCORING_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            scoring: ScoringSettings {
                concurrency,
                timeout,
                applied_jobs: if include_applied {
                    AppliedJobPolicy::Include
                } else {
                    AppliedJobPolicy::Exclude
                },
            },
            port: parse_optional::<u16>(get("PORT"), "PORT")?.unwrap_or(8080),
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_optional<T>(value: Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("{key} is invalid ('{v}'): {e}"))
        })
        .transpose()
}
