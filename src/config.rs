use crate::error::{AppError, AppResult};
use serde::Deserialize;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub database_min_connections: u32,
    #[serde(default = "default_connection_timeout")]
    pub database_connection_timeout: u64,

    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    #[serde(default = "default_host")]
    pub server_host: String,
    #[serde(default = "default_port")]
    pub server_port: u16,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    #[serde(default)]
    pub enforce_https: bool,
    #[serde(default = "default_slow_request_ms")]
    pub slow_request_ms: u64,

    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_access_token_expires")]
    pub jwt_access_token_expires_in: u64,

    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,

    #[serde(default = "default_assets_url")]
    pub assets_url: String,
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
    pub admin_creation_secret: Option<String>,
    #[serde(default = "default_frontend_base_url")]
    pub frontend_base_url: String,
    #[serde(default = "default_true")]
    pub notify_email_on_article: bool,

    pub google_api_key: Option<String>,
    #[serde(default = "default_gemini_model")]
    pub gemini_model_text: String,
    #[serde(default = "default_gemini_model")]
    pub gemini_model_chat: String,
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,
    #[serde(default = "default_ai_timeout_ms")]
    pub ai_timeout_ms: u64,

    pub serpapi_api_key: Option<String>,
    #[serde(default = "default_serpapi_base_url")]
    pub serpapi_base_url: String,

    pub dropbox_refresh_token: Option<String>,
    pub dropbox_app_key: Option<String>,
    pub dropbox_app_secret: Option<String>,
    #[serde(default = "default_dropbox_api_url")]
    pub dropbox_api_url: String,
    #[serde(default = "default_dropbox_content_url")]
    pub dropbox_content_url: String,
    #[serde(default = "default_dropbox_root")]
    pub dropbox_root: String,

    pub resend_api_key: Option<String>,
    #[serde(default = "default_resend_base_url")]
    pub resend_base_url: String,
    #[serde(default = "default_mail_from")]
    pub mail_from: String,

    pub project_webhook_url: Option<String>,
    pub task_webhook_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub enforce_https: bool,
    pub slow_request_ms: u64,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_expires_in: u64,
}

#[derive(Clone, Debug)]
pub struct AssetsConfig {
    pub base_url: String,
    pub upload_dir: String,
}

#[derive(Clone, Debug)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub text_model: String,
    pub chat_model: String,
    pub base_url: String,
    pub timeout_ms: u64,
}

#[derive(Clone, Debug)]
pub struct SearchConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub refresh_token: Option<String>,
    pub app_key: Option<String>,
    pub app_secret: Option<String>,
    pub api_url: String,
    pub content_url: String,
    pub root: String,
}

#[derive(Clone, Debug)]
pub struct MailConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub from: String,
}

#[derive(Clone, Debug)]
pub struct WebhookConfig {
    pub project_created_url: Option<String>,
    pub task_created_url: Option<String>,
}

// Default value functions
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    2
}
fn default_connection_timeout() -> u64 {
    15
}
fn default_redis_url() -> String {
    "redis://127.0.0.1/".to_string()
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_slow_request_ms() -> u64 {
    2000
}
fn default_jwt_secret() -> String {
    "your-secret-key".to_string()
}
fn default_access_token_expires() -> u64 {
    30 * 24 * 3600
} // 30 days
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_assets_url() -> String {
    "http://localhost:5000/uploads".to_string()
}
fn default_upload_dir() -> String {
    "uploads".to_string()
}
fn default_bcrypt_cost() -> u32 {
    10
}
fn default_frontend_base_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_true() -> bool {
    true
}
fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_ai_timeout_ms() -> u64 {
    12_000
}
fn default_serpapi_base_url() -> String {
    "https://serpapi.com".to_string()
}
fn default_dropbox_api_url() -> String {
    "https://api.dropboxapi.com".to_string()
}
fn default_dropbox_content_url() -> String {
    "https://content.dropboxapi.com".to_string()
}
fn default_dropbox_root() -> String {
    "/research-hub".to_string()
}
fn default_resend_base_url() -> String {
    "https://api.resend.com".to_string()
}
fn default_mail_from() -> String {
    "no-reply@example.com".to_string()
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let config = envy::from_env::<Config>()
            .map_err(|e| AppError::Config(format!("Failed to load config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Builds a config from explicit `KEY=value` pairs, as if they were the environment.
    pub fn from_vars<I>(vars: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| AppError::Config(format!("Failed to load config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> AppResult<()> {
        if self.database_max_connections == 0 {
            return Err(AppError::Config(
                "DATABASE_MAX_CONNECTIONS must be > 0".to_string(),
            ));
        }

        if self.database_min_connections > self.database_max_connections {
            return Err(AppError::Config(
                "DATABASE_MIN_CONNECTIONS cannot be greater than DATABASE_MAX_CONNECTIONS"
                    .to_string(),
            ));
        }

        if self.jwt_secret == "your-secret-key" {
            return Err(AppError::Config(
                "JWT_SECRET must be set to a secure value".to_string(),
            ));
        }

        if self.jwt_access_token_expires_in == 0 {
            return Err(AppError::Config(
                "JWT_ACCESS_TOKEN_EXPIRES_IN must be > 0".to_string(),
            ));
        }

        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(AppError::Config(
                "BCRYPT_COST must be between 4 and 31".to_string(),
            ));
        }

        if self.ai_timeout_ms == 0 {
            return Err(AppError::Config("AI_TIMEOUT_MS must be > 0".to_string()));
        }

        Ok(())
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn database(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database_url.clone(),
            max_connections: self.database_max_connections,
            min_connections: self.database_min_connections,
            connection_timeout: self.database_connection_timeout,
        }
    }

    pub fn server(&self) -> ServerConfig {
        ServerConfig {
            host: self.server_host.clone(),
            port: self.server_port,
            cors_origins: self.cors_origins.clone(),
            enforce_https: self.enforce_https,
            slow_request_ms: self.slow_request_ms,
        }
    }

    pub fn auth(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            access_token_expires_in: self.jwt_access_token_expires_in,
        }
    }

    pub fn assets(&self) -> AssetsConfig {
        AssetsConfig {
            base_url: self.assets_url.clone(),
            upload_dir: self.upload_dir.clone(),
        }
    }

    pub fn ai(&self) -> AiConfig {
        AiConfig {
            api_key: self.google_api_key.clone(),
            text_model: self.gemini_model_text.clone(),
            chat_model: self.gemini_model_chat.clone(),
            base_url: self.gemini_base_url.clone(),
            timeout_ms: self.ai_timeout_ms,
        }
    }

    pub fn search(&self) -> SearchConfig {
        SearchConfig {
            api_key: self.serpapi_api_key.clone(),
            base_url: self.serpapi_base_url.clone(),
        }
    }

    pub fn storage(&self) -> StorageConfig {
        StorageConfig {
            refresh_token: self.dropbox_refresh_token.clone(),
            app_key: self.dropbox_app_key.clone(),
            app_secret: self.dropbox_app_secret.clone(),
            api_url: self.dropbox_api_url.clone(),
            content_url: self.dropbox_content_url.clone(),
            root: self.dropbox_root.clone(),
        }
    }

    pub fn mail(&self) -> MailConfig {
        MailConfig {
            api_key: self.resend_api_key.clone(),
            base_url: self.resend_base_url.clone(),
            from: self.mail_from.clone(),
        }
    }

    pub fn webhooks(&self) -> WebhookConfig {
        WebhookConfig {
            project_created_url: self.project_webhook_url.clone(),
            task_created_url: self.task_webhook_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(extra: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("DATABASE_URL".to_string(), "postgres://localhost/research_hub_test".to_string()),
            ("JWT_SECRET".to_string(), "test-secret".to_string()),
        ];
        pairs.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        pairs
    }

    fn test_config() -> Config {
        Config::from_vars(vars(&[])).unwrap()
    }

    #[test]
    fn parses_optional_integrations() {
        let config = Config::from_vars(vars(&[
            ("GOOGLE_API_KEY", "g-key"),
            ("ENFORCE_HTTPS", "true"),
            ("CORS_ORIGINS", "http://a.test,http://b.test"),
        ]))
        .unwrap();
        assert_eq!(config.ai().api_key.as_deref(), Some("g-key"));
        assert!(config.server().enforce_https);
        assert_eq!(config.cors_origins.len(), 2);
        assert!(config.search().api_key.is_none());
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let result = Config::from_vars(vec![("JWT_SECRET".to_string(), "x".to_string())]);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn rejects_placeholder_jwt_secret() {
        let mut config = test_config();
        config.jwt_secret = default_jwt_secret();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_pool_bounds() {
        let mut config = test_config();
        config.database_min_connections = 10;
        config.database_max_connections = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn accepts_test_defaults() {
        let config = test_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.server_address(), "127.0.0.1:5000");
    }
}
