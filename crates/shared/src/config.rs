use std::path::PathBuf;

use thiserror::Error;

use crate::chat::RelevanceConfig;
use crate::config_env::{http_url_env, optional_trimmed_env, parse_u64_env, parse_usize_env};
use crate::lookup::HttpLookupConfig;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_PROFILE_STORE_PATH: &str = "users_data.json";
pub const DEFAULT_HISTORY_LIMIT: usize = 100;
pub const DEFAULT_SESSION_IDLE_TTL_SECONDS: u64 = 60 * 60;
pub const DEFAULT_SESSION_PRUNE_INTERVAL_SECONDS: u64 = 60;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub profile_store_path: PathBuf,
    pub history_limit: usize,
    pub session_idle_ttl_seconds: u64,
    pub session_prune_interval_seconds: u64,
    pub lookup: HttpLookupConfig,
    pub relevance: RelevanceConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid integer in env var {0}")]
    ParseInt(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failed to build lookup http client: {0}")]
    HttpClient(String),
}

impl ApiConfig {
    /// Reads the server configuration from the process environment, loading a
    /// `.env` file first when one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let history_limit = parse_usize_env("HISTORY_LIMIT", DEFAULT_HISTORY_LIMIT)?;
        if history_limit == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "HISTORY_LIMIT must be greater than zero".to_string(),
            ));
        }

        let session_idle_ttl_seconds =
            parse_u64_env("SESSION_IDLE_TTL_SECONDS", DEFAULT_SESSION_IDLE_TTL_SECONDS)?;
        let session_prune_interval_seconds = parse_u64_env(
            "SESSION_PRUNE_INTERVAL_SECONDS",
            DEFAULT_SESSION_PRUNE_INTERVAL_SECONDS,
        )?;
        if session_idle_ttl_seconds == 0 || session_prune_interval_seconds == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "session ttl and prune interval must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            bind_addr: optional_trimmed_env("API_BIND_ADDR")
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            profile_store_path: optional_trimmed_env("PROFILE_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROFILE_STORE_PATH)),
            history_limit,
            session_idle_ttl_seconds,
            session_prune_interval_seconds,
            lookup: lookup_config_from_env()?,
            relevance: relevance_config_from_env()?,
        })
    }
}

fn lookup_config_from_env() -> Result<HttpLookupConfig, ConfigError> {
    let defaults = HttpLookupConfig::default();
    let timeout_seconds = parse_u64_env("LOOKUP_TIMEOUT_SECONDS", defaults.timeout_seconds)?;
    if timeout_seconds == 0 {
        return Err(ConfigError::InvalidConfiguration(
            "LOOKUP_TIMEOUT_SECONDS must be greater than zero".to_string(),
        ));
    }

    Ok(HttpLookupConfig {
        wikipedia_base_url: http_url_env("WIKIPEDIA_BASE_URL", &defaults.wikipedia_base_url)?,
        web_search_base_url: http_url_env("WEB_SEARCH_BASE_URL", &defaults.web_search_base_url)?,
        timeout_seconds,
        user_agent: optional_trimmed_env("LOOKUP_USER_AGENT").unwrap_or(defaults.user_agent),
    })
}

fn relevance_config_from_env() -> Result<RelevanceConfig, ConfigError> {
    let defaults = RelevanceConfig::default();

    Ok(RelevanceConfig {
        max_sentences: parse_usize_env("RELEVANCE_MAX_SENTENCES", defaults.max_sentences)?,
        short_sentence_chars: parse_usize_env(
            "RELEVANCE_SHORT_SENTENCE_CHARS",
            defaults.short_sentence_chars,
        )?,
        max_answer_chars: parse_usize_env("RELEVANCE_MAX_ANSWER_CHARS", defaults.max_answer_chars)?,
        min_page_chars: parse_usize_env("RELEVANCE_MIN_PAGE_CHARS", defaults.min_page_chars)?,
        search_result_count: parse_usize_env(
            "WEB_SEARCH_RESULT_COUNT",
            defaults.search_result_count,
        )?,
        max_pages: parse_usize_env("WEB_SEARCH_MAX_PAGES", defaults.max_pages)?,
    })
}
