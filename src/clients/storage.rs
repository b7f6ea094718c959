use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::{Component, Path};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::StorageConfig;
use crate::error::{AppError, AppResult};
use crate::utils::AssetUrlHelper;

/// Access tokens are treated as expired this long before the provider says so.
pub const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);
const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

/// Where uploaded files end up. Returns a public URL for the stored object.
#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<String>;

    fn name(&self) -> &'static str;
}

/// Rewrites a share link so it serves the file itself instead of a preview page.
pub fn to_raw_link(url: &str) -> String {
    if url.contains("?dl=0") {
        url.replacen("?dl=0", "?raw=1", 1)
    } else if url.contains("&dl=0") {
        url.replacen("&dl=0", "&raw=1", 1)
    } else if url.contains("raw=1") {
        url.to_string()
    } else if url.contains('?') {
        format!("{}&raw=1", url)
    } else {
        format!("{}?raw=1", url)
    }
}

/// Keeps the relative path inside its root: no absolute paths, no `..`.
fn sanitize_relative(path: &str) -> AppResult<String> {
    let parts: Vec<&str> = Path::new(path.trim_start_matches('/'))
        .components()
        .map(|c| match c {
            Component::Normal(part) => part
                .to_str()
                .ok_or_else(|| AppError::validation("Invalid file name")),
            _ => Err(AppError::validation("Invalid file path")),
        })
        .collect::<AppResult<_>>()?;

    if parts.is_empty() {
        return Err(AppError::validation("Invalid file path"));
    }
    Ok(parts.join("/"))
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<u64>,
}

/// Dropbox storage authenticated with a long-lived refresh token.
pub struct DropboxStorage {
    http: Client,
    config: StorageConfig,
    token: Mutex<Option<CachedToken>>,
}

impl DropboxStorage {
    /// `None` unless refresh token, app key and app secret are all set.
    pub fn from_config(http: Client, config: StorageConfig) -> Option<Self> {
        let configured = [&config.refresh_token, &config.app_key, &config.app_secret]
            .iter()
            .all(|v| v.as_deref().is_some_and(|s| !s.is_empty()));

        configured.then(|| Self {
            http,
            config,
            token: Mutex::new(None),
        })
    }

    fn api(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    fn content(&self, path: &str) -> String {
        format!("{}/{}", self.config.content_url.trim_end_matches('/'), path)
    }

    /// Returns a valid access token, refreshing it when missing or near expiry.
    /// The lock is held across the refresh so concurrent callers share one exchange.
    pub async fn access_token(&self) -> AppResult<String> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if Instant::now() + TOKEN_EXPIRY_MARGIN < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        let fresh = self.refresh_access_token().await?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access_token)
    }

    async fn refresh_access_token(&self) -> AppResult<CachedToken> {
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", self.config.refresh_token.as_deref().unwrap_or_default()),
            ("client_id", self.config.app_key.as_deref().unwrap_or_default()),
            ("client_secret", self.config.app_secret.as_deref().unwrap_or_default()),
        ];

        let response = self.http.post(self.api("oauth2/token")).form(&form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Storage token refresh rejected: {}", body);
            return Err(AppError::upstream(format!(
                "Storage token refresh failed with {}",
                status
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::upstream(format!("Invalid token response: {}", e)))?;

        let ttl = token.expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECS);
        info!(expires_in = ttl, "Refreshed storage access token");

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(ttl),
        })
    }

    async fn post_json(&self, url: String, token: &str, body: &Value) -> AppResult<reqwest::Response> {
        Ok(self.http.post(url).bearer_auth(token).json(body).send().await?)
    }

    async fn shared_link(&self, token: &str, path: &str) -> AppResult<String> {
        let response = self
            .post_json(
                self.api("2/sharing/create_shared_link_with_settings"),
                token,
                &json!({ "path": path, "settings": { "requested_visibility": "public" } }),
            )
            .await?;

        let status = response.status();
        let data: Value = if status == StatusCode::CONFLICT {
            // A link already exists for this path.
            debug!(path = %path, "Shared link exists, listing it");
            let listed = self
                .post_json(
                    self.api("2/sharing/list_shared_links"),
                    token,
                    &json!({ "path": path, "direct_only": true }),
                )
                .await?;
            if !listed.status().is_success() {
                return Err(AppError::upstream(format!(
                    "Listing shared links failed with {}",
                    listed.status()
                )));
            }
            let listed: Value = listed.json().await?;
            listed
                .pointer("/links/0")
                .cloned()
                .ok_or_else(|| AppError::upstream("No shared link returned for uploaded file"))?
        } else if status.is_success() {
            response.json().await?
        } else {
            return Err(AppError::upstream(format!(
                "Creating shared link failed with {}",
                status
            )));
        };

        data.get("url")
            .and_then(Value::as_str)
            .map(to_raw_link)
            .ok_or_else(|| AppError::upstream("Shared link response has no url"))
    }
}

#[async_trait]
impl FileStorage for DropboxStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, _content_type: &str) -> AppResult<String> {
        let relative = sanitize_relative(path)?;
        let full_path = format!("{}/{}", self.config.root.trim_end_matches('/'), relative);
        let token = self.access_token().await?;

        let arg = json!({
            "path": full_path,
            "mode": "add",
            "autorename": true,
            "mute": true,
        });

        let response = self
            .http
            .post(self.content("2/files/upload"))
            .bearer_auth(&token)
            .header("Dropbox-API-Arg", arg.to_string())
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Storage upload rejected: {}", body);
            return Err(AppError::upstream(format!("Upload failed with {}", status)));
        }

        let uploaded: Value = response.json().await?;
        let stored_path = uploaded
            .get("path_display")
            .and_then(Value::as_str)
            .unwrap_or(&full_path)
            .to_string();

        info!(path = %stored_path, "Uploaded file to cloud storage");
        self.shared_link(&token, &stored_path).await
    }

    fn name(&self) -> &'static str {
        "dropbox"
    }
}

/// Files on local disk under the upload directory, served from `/uploads`.
pub struct LocalStorage {
    assets: AssetUrlHelper,
}

impl LocalStorage {
    pub fn new(assets: AssetUrlHelper) -> Self {
        Self { assets }
    }
}

#[async_trait]
impl FileStorage for LocalStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, _content_type: &str) -> AppResult<String> {
        let relative = sanitize_relative(path)?;
        let target = self.assets.upload_dir().join(&relative);

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;

        debug!(path = %target.display(), "Stored file locally");
        Ok(self.assets.build_url(&relative))
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_preview_links() {
        assert_eq!(
            to_raw_link("https://www.dropbox.com/s/abc/file.pdf?dl=0"),
            "https://www.dropbox.com/s/abc/file.pdf?raw=1"
        );
        assert_eq!(
            to_raw_link("https://www.dropbox.com/scl/fi/x/file.pdf?rlkey=k&dl=0"),
            "https://www.dropbox.com/scl/fi/x/file.pdf?rlkey=k&raw=1"
        );
        assert_eq!(to_raw_link("https://d.test/f?raw=1"), "https://d.test/f?raw=1");
        assert_eq!(to_raw_link("https://d.test/f"), "https://d.test/f?raw=1");
    }

    #[test]
    fn rejects_escaping_paths() {
        assert_eq!(sanitize_relative("/avatars/a.png").unwrap(), "avatars/a.png");
        assert!(sanitize_relative("../etc/passwd").is_err());
        assert!(sanitize_relative("").is_err());
    }

    #[test]
    fn dropbox_requires_full_credentials() {
        let mut config = StorageConfig {
            refresh_token: Some("r".into()),
            app_key: Some("k".into()),
            app_secret: None,
            api_url: "http://localhost".into(),
            content_url: "http://localhost".into(),
            root: "/root".into(),
        };
        assert!(DropboxStorage::from_config(Client::new(), config.clone()).is_none());
        config.app_secret = Some("s".into());
        assert!(DropboxStorage::from_config(Client::new(), config).is_some());
    }

    #[tokio::test]
    async fn local_storage_writes_under_upload_dir() {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetUrlHelper::new(&crate::config::AssetsConfig {
            base_url: "http://localhost:5000/uploads".into(),
            upload_dir: dir.path().to_string_lossy().into_owned(),
        });
        let storage = LocalStorage::new(assets);

        let url = storage
            .upload("avatars/u1.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:5000/uploads/avatars/u1.png");
        let written = std::fs::read(dir.path().join("avatars/u1.png")).unwrap();
        assert_eq!(written, vec![1, 2, 3]);
    }
}
