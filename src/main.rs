//! Storefront - catalog, checkout and order management API

use anyhow::Result;
use axum::http::{header::{AUTHORIZATION, CONTENT_TYPE}, HeaderValue, Method};
use std::sync::Arc;
use storefront::{api::{self, AppState}, config::Config, services::EventPublisher, storage::FileStore};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();
    let config = Config::from_env()?;

    let store = FileStore::open(&config.data_dir).await?;
    tracing::info!(data_dir = %store.dir().display(), "using JSON file storage");

    let nats = match &config.nats_url {
        Some(url) => match async_nats::connect(url.as_str()).await {
            Ok(client) => Some(client),
            Err(e) => { tracing::warn!(error = %e, "NATS unavailable, domain events will not be published"); None }
        },
        None => None,
    };

    let state = AppState::new(Arc::new(store), EventPublisher::new(nats), config.jwt_secret.as_bytes());

    let cors = match &config.client_url {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
            .allow_credentials(true),
        None => CorsLayer::permissive(),
    };
    let app = api::router(state).layer(cors);

    tracing::info!("Storefront listening on 0.0.0.0:{}", config.port);
    axum::serve(tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?, app).await?;
    Ok(())
}
