use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::generation::GenerationProvider;
use crate::prompt::{build_context, build_prompt};
use crate::search::{SearchDepth, SearchProvider, SearchQuery, SearchResult};

/// Static knobs for one relay, shared read-only across requests.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub persona: String,
    pub include_domains: Vec<String>,
    pub max_results: usize,
    pub depth: SearchDepth,
    pub search_timeout: Duration,
    pub generation_timeout: Duration,
}

impl From<&Config> for RelaySettings {
    fn from(config: &Config) -> Self {
        Self {
            persona: config.persona.clone(),
            include_domains: config.search.include_domains.clone(),
            max_results: config.search.max_results,
            depth: config.search.depth,
            search_timeout: config.search.timeout,
            generation_timeout: config.generation.timeout,
        }
    }
}

/// Retrieval-augmented answer pipeline: search, build a grounded prompt,
/// generate. Holds no per-request state.
pub struct ChatRelay {
    search: Arc<dyn SearchProvider>,
    generator: Arc<dyn GenerationProvider>,
    settings: RelaySettings,
}

impl ChatRelay {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        generator: Arc<dyn GenerationProvider>,
        settings: RelaySettings,
    ) -> Self {
        Self {
            search,
            generator,
            settings,
        }
    }

    pub async fn answer(&self, message: &str) -> Result<String> {
        let results = self.retrieve(message).await;
        info!(results = results.len(), "Retrieval finished");

        let context = build_context(&results);
        let prompt = build_prompt(&self.settings.persona, &context, message);
        info!(prompt_chars = prompt.len(), "Built grounded prompt");

        let llm_start = Instant::now();
        let outcome = tokio::time::timeout(
            self.settings.generation_timeout,
            self.generator.generate(&prompt),
        )
        .await;

        match outcome {
            Ok(Ok(answer)) => {
                info!(elapsed = ?llm_start.elapsed(), "Generation succeeded");
                Ok(answer)
            }
            Ok(Err(err)) => {
                match &err {
                    AppError::GenerationProvider(msg) => error!("Generation provider error: {}", msg),
                    AppError::GenerationEmpty => error!("Generation returned no usable candidate"),
                    other => error!("Generation call failed: {}", other),
                }
                Err(err)
            }
            Err(_) => {
                error!("Generation timed out after {:?}", self.settings.generation_timeout);
                Err(AppError::Transport(format!(
                    "generation timed out after {:?}",
                    self.settings.generation_timeout
                )))
            }
        }
    }

    /// Never fails: any retrieval problem degrades to an empty result set.
    async fn retrieve(&self, message: &str) -> Vec<SearchResult> {
        let query = SearchQuery {
            query: message,
            include_domains: &self.settings.include_domains,
            max_results: self.settings.max_results,
            depth: self.settings.depth,
        };

        let fetch_start = Instant::now();
        match tokio::time::timeout(self.settings.search_timeout, self.search.search(&query)).await {
            Ok(Ok(mut results)) => {
                results.truncate(self.settings.max_results);
                info!(elapsed = ?fetch_start.elapsed(), "Search succeeded");
                results
            }
            Ok(Err(err)) => {
                warn!("Search failed, continuing without context: {}", err);
                Vec::new()
            }
            Err(_) => {
                warn!(
                    "Search timed out after {:?}, continuing without context",
                    self.settings.search_timeout
                );
                Vec::new()
            }
        }
    }
}
