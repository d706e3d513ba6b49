mod auth;
mod config;
mod content;
mod enhance;
mod error;
mod gemini;
mod location;
mod models;
mod normalize;
mod parse;
mod prompt;
mod routes;
mod store;
mod uploads;

#[cfg(test)]
mod mock;

use anyhow::Context;
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::content::ContentGenerator;
use crate::enhance::ImageEnhancer;
use crate::gemini::GeminiClient;
use crate::routes::{router, AppState};
use crate::store::Store;
use crate::uploads::Uploads;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    // Init tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    if config.is_demo() {
        tracing::warn!("GEMINI_API_KEY not set: running in demo mode, AI content falls back to artisan input");
    } else {
        let prefix: String = config.api_key.chars().take(6).collect();
        tracing::info!("Using API key: {}...", prefix);
    }

    let uploads = Uploads::open(&config.upload_dir)
        .await
        .with_context(|| format!("creating upload dir {}", config.upload_dir.display()))?;
    let gemini = Arc::new(GeminiClient::new(&config));

    let state = AppState {
        store: Arc::default(),
        content: ContentGenerator::new(gemini.clone()),
        enhancer: ImageEnhancer::new(gemini, uploads.clone()),
        uploads,
        public_base_url: config.public_base_url.clone(),
    };

    let app = router(state).layer(cors_layer(&config.cors_origins));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    }
    let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}
