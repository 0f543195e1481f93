//! HTTP server for the portfolio: blog posts and the project catalog as JSON.

mod handlers;
mod models;
mod routes;
mod state;

use std::env;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let content_dir =
        env::var("CONTENT_DIR").unwrap_or_else(|_| state::DEFAULT_CONTENT_DIR.to_string());

    tracing::info!("Starting folio backend server");
    tracing::info!("Content directory: {}", content_dir);

    let app_state = state::AppState::new(&content_dir);
    match app_state.post_count().await {
        Ok(count) => tracing::info!("Found {} posts", count),
        Err(err) => tracing::warn!("Content is not indexable yet: {}", err),
    }

    let app = routes::create_router(app_state);

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
    let addr = format!("{}:{}", bind_addr, port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
