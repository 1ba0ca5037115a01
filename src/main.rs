use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use bookrag_backend::core::logging;
use bookrag_backend::server;
use bookrag_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let state = AppState::initialize().await?;
    logging::init(&state.paths.log_dir);

    if let Some(index) = &state.index {
        if let Err(err) = index.ensure_collection().await {
            tracing::warn!("Failed to initialize vector collection: {}", err);
        }
    }

    let bind_addr = format!("0.0.0.0:{}", state.settings.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;

    tracing::info!("Listening on {}", addr);

    let app: Router = server::router::router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
