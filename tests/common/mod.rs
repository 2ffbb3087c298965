#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;

use devmatch_chat::error::{AppError, Result};
use devmatch_chat::generation::GenerationProvider;
use devmatch_chat::prompt::DEFAULT_PERSONA;
use devmatch_chat::relay::{ChatRelay, RelaySettings};
use devmatch_chat::search::{SearchDepth, SearchProvider, SearchQuery, SearchResult};
use devmatch_chat::AppState;

pub struct MockSearch {
    pub outcome: std::result::Result<Vec<SearchResult>, String>,
    pub calls: AtomicUsize,
    pub last_query: Mutex<Option<(String, Vec<String>, usize, SearchDepth)>>,
}

impl MockSearch {
    pub fn returning(results: Vec<SearchResult>) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(results),
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        })
    }

    pub fn failing(detail: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(detail.to_string()),
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for MockSearch {
    async fn search(&self, query: &SearchQuery<'_>) -> Result<Vec<SearchResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some((
            query.query.to_string(),
            query.include_domains.to_vec(),
            query.max_results,
            query.depth,
        ));
        self.outcome.clone().map_err(AppError::Search)
    }
}

#[derive(Clone)]
pub enum Reply {
    Text(String),
    ProviderError(String),
    Empty,
    Transport(String),
    Hang,
    Panic,
}

pub struct MockGenerator {
    pub reply: Reply,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn answering(text: &str) -> Arc<Self> {
        Self::new(Reply::Text(text.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl GenerationProvider for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::ProviderError(msg) => Err(AppError::GenerationProvider(msg.clone())),
            Reply::Empty => Err(AppError::GenerationEmpty),
            Reply::Transport(msg) => Err(AppError::Transport(msg.clone())),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok("too late".to_string())
            }
            Reply::Panic => panic!("generator blew up"),
        }
    }
}

pub fn settings() -> RelaySettings {
    RelaySettings {
        persona: DEFAULT_PERSONA.to_string(),
        include_domains: vec!["github.com".to_string(), "techcrunch.com".to_string()],
        max_results: 5,
        depth: SearchDepth::Advanced,
        search_timeout: Duration::from_secs(2),
        generation_timeout: Duration::from_secs(2),
    }
}

pub fn state(search: Arc<MockSearch>, generator: Arc<MockGenerator>) -> AppState {
    state_with(search, generator, settings())
}

pub fn state_with(search: Arc<MockSearch>, generator: Arc<MockGenerator>, settings: RelaySettings) -> AppState {
    AppState::new(ChatRelay::new(search, generator, settings))
}

pub fn result(title: &str, url: &str, content: &str) -> SearchResult {
    SearchResult {
        title: title.to_string(),
        url: url.to_string(),
        content: content.to_string(),
    }
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
