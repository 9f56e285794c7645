use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use friendship_api::{
    api::{create_router, AppState, RateLimiter},
    auth::SessionAuthenticator,
    config::Config,
    db::{migrate, SessionRepository},
    error::AppError,
    seed,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,friendship_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting friendship API v{}", env!("CARGO_PKG_VERSION"));

    let config = Arc::new(Config::from_env()?);
    tracing::info!("Configuration loaded");

    let db = SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.database_url)
        .await?;

    tracing::info!("Database connected: {}", config.database_url);

    migrate(&db).await?;
    tracing::info!("Database migrations completed");

    if config.seed_database {
        if let Some(report) = seed::seed(&db, config.session_expiry_hours).await? {
            tracing::info!(
                admin_id = report.admin.id,
                token = %report.admin_session.token,
                "Seeded admin session; use as Bearer token"
            );
        }
    }

    let rate_limiter = Arc::new(RateLimiter::new(
        config.rate_limit_max_requests,
        config.rate_limit_window_secs,
    ));
    tracing::info!(
        "Rate limiter configured ({} req / {}s per IP)",
        config.rate_limit_max_requests,
        config.rate_limit_window_secs
    );

    let state = AppState {
        db: db.clone(),
        authenticator: Arc::new(SessionAuthenticator::new(db.clone())),
        config: config.clone(),
    };

    // Spawn background task for session cleanup
    {
        let db_clone = db.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(3600)); // Every hour
            loop {
                interval.tick().await;
                match SessionRepository::cleanup_expired(&db_clone).await {
                    Ok(removed) => tracing::debug!(removed, "Expired sessions cleaned up"),
                    Err(e) => tracing::error!("Session cleanup failed: {}", e),
                }
            }
        });
    }

    // Spawn background task for rate limiter cleanup
    {
        let limiter = rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(300)); // Every 5 minutes
            loop {
                interval.tick().await;
                limiter.cleanup().await;
                tracing::debug!("Rate limiter cache cleaned up");
            }
        });
    }

    let app = create_router(state, rate_limiter);

    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("  POST /api/friendship/add/:user - Send friend request (requires auth)");
    tracing::info!("  GET  /api/friendship/list      - List friendships (requires auth)");
    tracing::info!("  GET  /api/friendship/mutual    - Friends of friends (requires auth)");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
