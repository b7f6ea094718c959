pub mod auth;
pub mod invitation;
pub mod library;
pub mod project;
pub mod task;

use axum::{
    Json, async_trait,
    extract::{FromRequest, rejection::JsonRejection},
    http::Request,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::{db::models::api::ErrorDetail, error::AppError};

/// JSON body extractor that also runs the payload's `Validate` rules.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S, axum::body::Body> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(
        req: Request<axum::body::Body>,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                tracing::debug!("Rejected JSON body: {}", rejection);
                AppError::validation("Invalid JSON format")
            })?;

        value.validate().map_err(|errors| {
            let details = error_details(&errors);
            let message = details
                .first()
                .map(|d| d.message.clone())
                .unwrap_or_else(|| "Validation failed".to_string());
            AppError::validation(message)
        })?;

        Ok(ValidatedJson(value))
    }
}

pub fn error_details(errors: &validator::ValidationErrors) -> Vec<ErrorDetail> {
    let mut details: Vec<ErrorDetail> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| ErrorDetail {
                field: Some(field.to_string()),
                code: error.code.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Validation failed for field: {}", field)),
            })
        })
        .collect();
    details.sort_by(|a, b| a.field.cmp(&b.field));
    details
}

/// Treats `None`, empty and whitespace-only strings alike.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub mod rules {
    /// Absolute `http` or `https` URL with a host.
    pub fn is_http_url(value: &str) -> bool {
        match url::Url::parse(value.trim()) {
            Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
            Err(_) => false,
        }
    }

    /// A pragmatic shape check: one `@`, non-empty local part, dotted domain.
    pub fn is_valid_email(value: &str) -> bool {
        let value = value.trim();
        let Some((local, domain)) = value.split_once('@') else {
            return false;
        };
        !local.is_empty()
            && !domain.contains('@')
            && !value.chars().any(char::is_whitespace)
            && domain.split('.').count() >= 2
            && domain.split('.').all(|part| !part.is_empty())
    }

    /// Lowercased and trimmed, the way emails are stored.
    pub fn normalize_email(value: &str) -> String {
        value.trim().to_lowercase()
    }
}
