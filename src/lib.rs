pub mod cache;
pub mod clients;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod schema;
pub mod services;
pub mod utils;
pub mod validation;

use crate::cache::UserCache;
use crate::clients::{AiClient, FileStorage, Mailer, ScholarSearchClient, WebhookNotifier};
use crate::config::Config;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthService;
use crate::middleware::security::{HttpsPolicy, enforce_https, security_headers};
use crate::middleware::{SlowRequestThreshold, request_tracking_middleware};
use crate::utils::AssetUrlHelper;
use axum::{
    Router,
    http::HeaderValue,
    middleware::{from_fn, from_fn_with_state},
};
use diesel::PgConnection;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
};
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub redis: redis::Client,
    pub config: Arc<Config>,
    pub asset_helper: AssetUrlHelper,
    pub auth_service: AuthService,
    pub user_cache: UserCache,
    pub ai: AiClient,
    pub search: ScholarSearchClient,
    pub storage: Arc<dyn FileStorage>,
    pub mailer: Mailer,
    pub webhooks: WebhookNotifier,
}

impl AppState {
    pub fn new(db: DbPool, redis: redis::Client, config: Config) -> AppResult<Self> {
        let http = clients::http_client()?;
        let asset_helper = AssetUrlHelper::new(&config.assets());
        let storage = clients::build_storage(http.clone(), &config, asset_helper.clone());

        Ok(Self {
            auth_service: AuthService::new(&config.auth()),
            user_cache: UserCache::new(redis.clone()),
            ai: AiClient::new(http.clone(), config.ai()),
            search: ScholarSearchClient::new(http.clone(), config.search()),
            mailer: Mailer::new(http.clone(), config.mail()),
            webhooks: WebhookNotifier::new(http, config.webhooks()),
            storage,
            asset_helper,
            db,
            redis,
            config: Arc::new(config),
        })
    }

    /// Runs blocking diesel work on the blocking pool with a pooled connection.
    pub async fn db_call<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut PgConnection) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn)
        })
        .await
        .map_err(|e| AppError::internal(format!("Database task failed: {}", e)))?
    }
}

pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", config.log_level)));

    match config.log_format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

/// `*` or an empty list allows any origin; otherwise only the listed ones.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(allowed)
}

/// The full HTTP application: API routes, static uploads and the shared middleware stack.
pub fn build_app(state: Arc<AppState>) -> Router {
    let server = state.config.server();
    let uploads = ServeDir::new(state.asset_helper.upload_dir());

    routes::create_router(state)
        .nest_service("/uploads", uploads)
        .layer(from_fn(security_headers))
        .layer(from_fn_with_state(
            HttpsPolicy {
                enforce: server.enforce_https,
            },
            enforce_https,
        ))
        .layer(from_fn_with_state(
            SlowRequestThreshold::from_millis(server.slow_request_ms),
            request_tracking_middleware,
        ))
        .layer(cors_layer(&server.cors_origins))
        .layer(CompressionLayer::new())
}
