pub mod gemini;
pub mod mailer;
pub mod scholar;
pub mod storage;
pub mod webhooks;

pub use gemini::{AiClient, GenerateError};
pub use mailer::{Mailer, OutgoingEmail};
pub use scholar::ScholarSearchClient;
pub use storage::{DropboxStorage, FileStorage, LocalStorage};
pub use webhooks::WebhookNotifier;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::utils::AssetUrlHelper;
use std::sync::Arc;
use std::time::Duration;

/// Shared HTTP client for every outbound integration.
pub fn http_client() -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Cloud storage when credentials are present, local disk otherwise.
pub fn build_storage(
    http: reqwest::Client,
    config: &Config,
    assets: AssetUrlHelper,
) -> Arc<dyn FileStorage> {
    match DropboxStorage::from_config(http, config.storage()) {
        Some(dropbox) => Arc::new(dropbox),
        None => {
            tracing::info!("Cloud storage not configured, storing uploads locally");
            Arc::new(LocalStorage::new(assets))
        }
    }
}
