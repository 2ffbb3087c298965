use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::SearchConfig;
use crate::error::{AppError, Result};

/// How hard the search provider should look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    Basic,
    Advanced,
}

impl fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchDepth::Basic => f.write_str("basic"),
            SearchDepth::Advanced => f.write_str("advanced"),
        }
    }
}

impl FromStr for SearchDepth {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(SearchDepth::Basic),
            "advanced" => Ok(SearchDepth::Advanced),
            other => Err(AppError::ConfigError(format!("Unknown search depth: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchResult {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
}

/// Tavily sends `null` for fields it could not extract.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone)]
pub struct SearchQuery<'a> {
    pub query: &'a str,
    pub include_domains: &'a [String],
    pub max_results: usize,
    pub depth: SearchDepth,
}

/// Document retrieval backend for the chat relay.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &SearchQuery<'_>) -> Result<Vec<SearchResult>>;
}

#[derive(Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: SearchDepth,
    include_domains: &'a [String],
    max_results: usize,
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Option<Vec<SearchResult>>,
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

pub struct TavilyClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl TavilyClient {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.timeout.min(std::time::Duration::from_secs(5)))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
        })
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(&self, query: &SearchQuery<'_>) -> Result<Vec<SearchResult>> {
        let body = TavilyRequest {
            api_key: &self.api_key,
            query: query.query,
            search_depth: query.depth,
            include_domains: query.include_domains,
            max_results: query.max_results,
        };

        let res = self.client.post(&self.api_url).json(&body).send().await?;
        let status = res.status();
        let text = res.text().await?;

        let parsed: TavilyResponse = serde_json::from_str(&text)
            .map_err(|e| AppError::Search(format!("HTTP {}: unreadable response: {}", status, e)))?;

        if let Some(detail) = parsed.error.or(parsed.detail) {
            return Err(AppError::Search(format!("HTTP {}: {}", status, provider_message(&detail))));
        }
        if !status.is_success() {
            return Err(AppError::Search(format!("HTTP {}", status)));
        }

        let mut results = parsed.results.unwrap_or_default();
        results.truncate(query.max_results);
        Ok(results)
    }
}

/// Tavily reports errors either as a bare string or nested as `{"error": "..."}`.
fn provider_message(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(map) => map
            .get("error")
            .or_else(|| map.get("message"))
            .and_then(|v| v.as_str())
            .map(String::from)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn depth_parses_case_insensitively() {
        assert_eq!("ADVANCED".parse::<SearchDepth>().unwrap(), SearchDepth::Advanced);
        assert_eq!("basic".parse::<SearchDepth>().unwrap(), SearchDepth::Basic);
        assert!("deep".parse::<SearchDepth>().is_err());
    }

    #[test]
    fn request_body_matches_provider_contract() {
        let domains = vec!["github.com".to_string()];
        let body = TavilyRequest {
            api_key: "tvly-key",
            query: "react jobs",
            search_depth: SearchDepth::Advanced,
            include_domains: &domains,
            max_results: 5,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "api_key": "tvly-key",
                "query": "react jobs",
                "search_depth": "advanced",
                "include_domains": ["github.com"],
                "max_results": 5
            })
        );
    }

    #[test]
    fn results_tolerate_missing_fields() {
        let parsed: TavilyResponse = serde_json::from_value(json!({
            "results": [{ "title": "Only a title", "score": 0.9 }]
        }))
        .unwrap();
        let results = parsed.results.unwrap();
        assert_eq!(results[0].title, "Only a title");
        assert_eq!(results[0].url, "");
        assert_eq!(results[0].content, "");
    }

    #[test]
    fn null_fields_do_not_discard_other_results() {
        let parsed: TavilyResponse = serde_json::from_value(json!({
            "results": [
                { "title": "A", "url": "http://a", "content": "alpha" },
                { "title": null, "url": "http://b", "content": null }
            ]
        }))
        .unwrap();
        let results = parsed.results.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "A");
        assert_eq!(results[1].title, "");
        assert_eq!(results[1].url, "http://b");
        assert_eq!(results[1].content, "");
    }

    #[test]
    fn nested_error_detail_is_extracted() {
        assert_eq!(provider_message(&json!({ "error": "Unauthorized: missing or invalid API key." })),
            "Unauthorized: missing or invalid API key.");
        assert_eq!(provider_message(&json!("quota exceeded")), "quota exceeded");
    }
}
