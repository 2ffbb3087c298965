use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use devmatch_chat::{
    config::Config,
    api::routes::create_router,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::load()?;
    let server_addr = config.server_addr;
    info!(
        model = %config.generation.model,
        max_results = config.search.max_results,
        domains = config.search.include_domains.len(),
        "Configuration loaded"
    );

    let app_state = AppState::from_config(&config)?;
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    info!("Listening on {}", server_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
