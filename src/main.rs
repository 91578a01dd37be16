use std::sync::Arc;

use hotel_booking_api::{
    config::AppConfig,
    create_router, db,
    events::{spawn_dispatcher, EventPublisher, PgAuditSink, PgNotificationSink},
    store::PgStore,
    AppState,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Hotel Booking API - Starting...");

    let config = AppConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config).await?;
    db::run_migrations(&pool).await?;

    let (events, rx) = EventPublisher::channel();
    spawn_dispatcher(
        rx,
        Arc::new(PgAuditSink::new(pool.clone())),
        Arc::new(PgNotificationSink::new(pool.clone())),
    );

    let addr = config.bind_addr();
    let state = AppState::new(config, Arc::new(PgStore::new(pool)), events);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    );

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Hotel Booking API is running on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
