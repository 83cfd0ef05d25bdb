use std::sync::Arc;

use anyhow::Context;
use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use questboard::{
    config::Config,
    db,
    geocode::{FixedGeocoder, Geocoder, GoogleGeocoder},
    AppState,
};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("questboard=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let db_pool = db::connect(&config.database_url, config.db_max_connections)
        .await
        .with_context(|| format!("opening {}", config.database_url))?;

    let geocoder: Arc<dyn Geocoder> = match &config.geocoding {
        Some(settings) => Arc::new(GoogleGeocoder::new(&settings.url, &settings.api_key)?),
        None => Arc::new(FixedGeocoder::sample()),
    };

    let mut app = questboard::app(AppState::sqlite(db_pool, geocoder), &config.sessions);
    if let Some(origin) = &config.cors_origin {
        let origin: HeaderValue = origin.parse().context("invalid CORS_ORIGIN")?;
        app = app.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_credentials(true)
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
                .allow_headers([CONTENT_TYPE]),
        );
    }

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
