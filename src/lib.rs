pub mod api;
pub mod config;
pub mod error;
pub mod generation;
pub mod prompt;
pub mod relay;
pub mod search;

use std::sync::Arc;
use config::Config;
use error::Result;
use generation::GeminiClient;
use relay::{ChatRelay, RelaySettings};
use search::TavilyClient;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<ChatRelay>,
}

impl AppState {
    pub fn new(relay: ChatRelay) -> Self {
        Self {
            relay: Arc::new(relay),
        }
    }

    /// Wires the production Tavily and Gemini clients from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let search = Arc::new(TavilyClient::new(&config.search)?);
        let generator = Arc::new(GeminiClient::new(&config.generation)?);
        Ok(Self::new(ChatRelay::new(search, generator, RelaySettings::from(config))))
    }
}
