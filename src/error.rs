use crate::db::models::api::ApiResponse;
use axum::{Json, http::StatusCode, response::IntoResponse};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(DieselError),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Authentication error: {message}")]
    Auth { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        field: Option<String>,
        code: Option<String>,
    },

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Upstream timeout: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<DieselError> for AppError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => AppError::not_found("Record"),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info) => {
                AppError::Conflict {
                    message: "Resource already exists".to_string(),
                    field: info.column_name().map(str::to_string),
                    code: Some("DUPLICATE".to_string()),
                }
            }
            other => AppError::Database(other),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Auth { .. } | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Database(_)
            | AppError::Pool(_)
            | AppError::Redis(_)
            | AppError::Config(_)
            | AppError::Bcrypt(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let response = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                ApiResponse::<()>::internal_error("Database error")
            }
            AppError::Pool(ref e) => {
                tracing::error!("Connection pool error: {}", e);
                ApiResponse::<()>::internal_error("Connection error")
            }
            AppError::Redis(ref e) => {
                tracing::error!("Redis error: {}", e);
                ApiResponse::<()>::internal_error("Cache error")
            }
            AppError::Auth { ref message } => ApiResponse::<()>::unauthorized(message),
            AppError::Forbidden { ref message } => ApiResponse::<()>::forbidden(message),
            AppError::Validation { ref message } => ApiResponse::<()>::bad_request(message),
            AppError::NotFound { ref resource } => {
                ApiResponse::<()>::not_found(&format!("{} not found", resource))
            }
            AppError::Conflict {
                ref message,
                ref field,
                ref code,
            } => ApiResponse::<()>::conflict(
                message,
                field.clone(),
                code.as_deref().unwrap_or("CONFLICT"),
            ),
            AppError::Upstream(ref message) => {
                tracing::warn!("Upstream error: {}", message);
                ApiResponse::<()>::bad_gateway(message)
            }
            AppError::Timeout(ref message) => {
                tracing::warn!("Upstream timeout: {}", message);
                ApiResponse::<()>::gateway_timeout(message)
            }
            AppError::Config(ref e) => {
                tracing::error!("Configuration error: {}", e);
                ApiResponse::<()>::internal_error("Configuration error")
            }
            AppError::Jwt(ref e) => {
                tracing::debug!("JWT error: {}", e);
                ApiResponse::<()>::unauthorized("Invalid token")
            }
            AppError::Bcrypt(ref e) => {
                tracing::error!("Bcrypt error: {}", e);
                ApiResponse::<()>::internal_error("Password processing error")
            }
            AppError::Internal(ref message) => {
                tracing::error!("Internal error: {}", message);
                ApiResponse::<()>::internal_error(message)
            }
        };

        (status, Json(response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
            field: None,
            code: None,
        }
    }

    pub fn conflict_with_code(
        message: impl Into<String>,
        field: Option<String>,
        code: impl Into<String>,
    ) -> Self {
        Self::Conflict {
            message: message.into(),
            field,
            code: Some(code.into()),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(err.to_string())
        } else {
            AppError::Upstream(err.to_string())
        }
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout("Operation took too long".to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(format!("I/O error: {}", err))
    }
}
