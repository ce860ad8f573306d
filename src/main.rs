//! Service entrypoint: load config, wire adapters, serve the API.

use std::sync::Arc;
use std::time::Duration;

use http::HeaderValue;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tradematch::adapters::ai::{AnthropicConfig, AnthropicProvider};
use tradematch::adapters::booking::InMemoryBookingStore;
use tradematch::adapters::http::{routes, AppState};
use tradematch::adapters::roster::InMemoryRoster;
use tradematch::application::MatchingEngine;
use tradematch::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.server.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.validate()?;

    let api_key = config
        .ai
        .anthropic_api_key
        .clone()
        .unwrap_or_default();
    let provider = AnthropicProvider::new(
        AnthropicConfig::new(api_key)
            .with_model(config.ai.model.clone())
            .with_base_url(config.ai.base_url.clone())
            .with_timeout(config.ai.timeout())
            .with_max_retries(config.ai.max_retries),
    )?;

    let roster = Arc::new(InMemoryRoster::demo_roster());
    let bookings = Arc::new(InMemoryBookingStore::new());
    let engine = Arc::new(MatchingEngine::new(Arc::new(provider), roster.clone()));

    let state = AppState::new(engine, roster, bookings);

    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    let origins = config.server.cors_origins_list();
    let cors = if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed = origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;
        cors.allow_origin(AllowOrigin::list(parsed))
    };

    let app = routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.server.request_timeout_secs,
                )))
                .layer(cors),
        )
        .with_state(state);

    let addr = config.server.socket_addr()?;
    info!(%addr, model = %config.ai.model, "starting matching service");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
