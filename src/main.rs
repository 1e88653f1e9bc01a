//! CommitteeHub backend service
//!
//! Main application entry point

use std::sync::Arc;

use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

use CommitteeHub::{
    api::{self, AppState},
    config::Settings,
    database::{connection::create_pool, DatabaseService},
    middleware::{RateLimitConfig, RateLimiter},
    services::ServiceFactory,
    state::FlowStorage,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    logging::init_logging(&settings.logging)?;

    info!("Starting CommitteeHub backend...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = CommitteeHub::database::connection::DatabaseConfig {
        url: settings.database.url.clone(),
        max_connections: settings.database.max_connections,
        min_connections: settings.database.min_connections,
        acquire_timeout: std::time::Duration::from_secs(30),
        idle_timeout: Some(std::time::Duration::from_secs(600)),
        max_lifetime: Some(std::time::Duration::from_secs(1800)),
    };
    let pool = create_pool(&db_config).await?;

    // Run database migrations
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Initialize flow state storage
    info!("Connecting to Redis...");
    let flow_storage = FlowStorage::new(settings.redis.clone()).await?;

    // Initialize database service
    let database = DatabaseService::new(pool.clone());

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(settings.clone(), database, flow_storage.clone())?;

    let state = AppState {
        settings: settings.clone(),
        services: Arc::new(services),
        pool,
        flow_storage,
        login_limiter: RateLimiter::new(RateLimitConfig::default()),
    };

    // Assemble the router: API routes, uploaded media, CORS and tracing
    let media_dir = settings.media.upload_dir.clone();
    let app = api::app(state)
        .nest_service("/media", ServeDir::new(media_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!("CommitteeHub listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    info!("CommitteeHub has been shut down.");

    Ok(())
}
