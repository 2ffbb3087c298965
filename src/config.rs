use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::prompt::DEFAULT_PERSONA;
use crate::search::SearchDepth;

pub const DEFAULT_TAVILY_URL: &str = "https://api.tavily.com/search";
pub const DEFAULT_GEMINI_BASE: &str = "https://generativelanguage.googleapis.com/v1";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
/// Largest `max_results` the search provider accepts.
pub const MAX_SEARCH_RESULTS: usize = 20;
pub const DEFAULT_INCLUDE_DOMAINS: &[&str] = &[
    "github.com",
    "news.ycombinator.com",
    "crunchbase.com",
    "techcrunch.com",
    "adzuna.com",
];

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub api_key: String,
    pub api_url: String,
    pub max_results: usize,
    pub depth: SearchDepth,
    pub include_domains: Vec<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub timeout: Duration,
}

/// Process-wide settings, loaded once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub search: SearchConfig,
    pub generation: GenerationConfig,
    pub persona: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| AppError::ConfigError(format!("{} is not set", key)))
        };

        // Load server configuration with defaults
        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = get("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let include_domains = match get("SEARCH_INCLUDE_DOMAINS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from)
                .collect::<Vec<_>>(),
            None => DEFAULT_INCLUDE_DOMAINS.iter().map(|d| d.to_string()).collect(),
        };
        if include_domains.is_empty() {
            return Err(AppError::ConfigError("SEARCH_INCLUDE_DOMAINS must list at least one domain".to_string()));
        }

        let max_results = parse_number(get("SEARCH_MAX_RESULTS"), "SEARCH_MAX_RESULTS", 5)?;
        let max_results = usize::try_from(max_results)
            .ok()
            .filter(|n| (1..=MAX_SEARCH_RESULTS).contains(n))
            .ok_or_else(|| {
                AppError::ConfigError(format!(
                    "SEARCH_MAX_RESULTS must be between 1 and {}",
                    MAX_SEARCH_RESULTS
                ))
            })?;

        let depth = match get("SEARCH_DEPTH") {
            Some(raw) => raw.parse::<SearchDepth>()?,
            None => SearchDepth::Advanced,
        };

        let search = SearchConfig {
            api_key: required("TAVILY_API_KEY")?,
            api_url: get("TAVILY_API_URL").unwrap_or_else(|| DEFAULT_TAVILY_URL.to_string()),
            max_results,
            depth,
            include_domains,
            timeout: parse_timeout(get("SEARCH_TIMEOUT_SECS"), "SEARCH_TIMEOUT_SECS", 10)?,
        };

        let generation = GenerationConfig {
            api_key: get("GEMINI_API_KEY")
                .or_else(|| get("VITE_GEMINI_API_KEY"))
                .ok_or_else(|| AppError::ConfigError("GEMINI_API_KEY is not set".to_string()))?,
            api_base: get("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_GEMINI_BASE.to_string()),
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            timeout: parse_timeout(get("GENERATION_TIMEOUT_SECS"), "GENERATION_TIMEOUT_SECS", 30)?,
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            search,
            generation,
            persona: get("CHAT_PERSONA").unwrap_or_else(|| DEFAULT_PERSONA.to_string()),
        })
    }
}

fn parse_number(raw: Option<String>, key: &str, default: u64) -> Result<u64> {
    match raw {
        Some(value) => value
            .parse::<u64>()
            .map_err(|e| AppError::ConfigError(format!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}

fn parse_timeout(raw: Option<String>, key: &str, default_secs: u64) -> Result<Duration> {
    let secs = parse_number(raw, key, default_secs)?;
    if secs == 0 {
        return Err(AppError::ConfigError(format!("{} must be greater than zero", key)));
    }
    Ok(Duration::from_secs(secs))
}
