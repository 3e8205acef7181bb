use axum::routing::{get, post};
use axum::Router;
use tracing_subscriber::EnvFilter;

use repo_rag::api;
use repo_rag::config::Config;
use repo_rag::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Local overrides first; variables already set in the process win.
    dotenv::from_filename(".env.local").ok();
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Project registry: {}", config.registry_path.display());
    tracing::info!("Snapshots root: {}", config.snapshots_root.display());
    tracing::info!("Completion model: {} ({})", config.llm.model, config.llm.base_url);
    if config.llm.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; answers will fall back to a canned message");
    }

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config)?;

    let app = Router::new()
        .route("/api/rag/projects", get(api::rag::list_projects))
        .route("/api/rag/ask", post(api::rag::ask))
        .route("/api/rag/retrieve", post(api::rag::retrieve))
        .route("/api/code", get(api::code::get_code))
        .route("/api/snapshots/tree", get(api::code::get_tree))
        .route("/api/sync/metadata", get(api::code::get_metadata))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
