use diesel::{
    PgConnection,
    r2d2::{self, ConnectionManager as DbConnectionManager},
};
use research_hub::{AppState, build_app, config::Config, db::DbPool, init_tracing};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    init_tracing(&config);

    let db_config = config.database();
    let manager = DbConnectionManager::<PgConnection>::new(&db_config.url);
    let db: DbPool = r2d2::Pool::builder()
        .max_size(db_config.max_connections)
        .min_idle(Some(db_config.min_connections))
        .connection_timeout(Duration::from_secs(db_config.connection_timeout))
        .build(manager)?;

    let redis = redis::Client::open(config.redis_url.as_str())?;
    match research_hub::cache::redis_health_check(&redis).await {
        Ok(true) => tracing::info!("Redis connection established"),
        Ok(false) | Err(_) => tracing::warn!("Redis unavailable, user cache disabled until it recovers"),
    }

    let addr: SocketAddr = config.server_address().parse()?;
    let state = Arc::new(AppState::new(db, redis, config)?);
    let app = build_app(state);

    tracing::info!("Server running at http://{}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
