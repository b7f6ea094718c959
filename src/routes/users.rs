use crate::AppState;
use crate::clients::mailer::password_reset_email;
use crate::db::models::{
    ApiResponse, AuthUser, AvatarResponse, CheckEmailQuery, ForgotPasswordRequest, LoginRequest,
    RegisterRequest, ResetPasswordRequest, UpdateMeRequest, User,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUserInfo;
use crate::services::AccountService;
use crate::services::account_service::auth_response;
use crate::validation::ValidatedJson;
use axum::{
    Json,
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::path::Path;
use std::sync::Arc;

pub const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

fn issue_token(state: &AppState, user: &User) -> AppResult<String> {
    state
        .auth_service
        .generate_access_token(&AuthUser::from(user))
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let config = state.config.clone();
    let user = state
        .db_call(move |conn| AccountService::register(conn, &config, &payload))
        .await?;

    tracing::info!(user_id = %user.id, role = ?user.role, "User registered");
    let token = issue_token(&state, &user)?;
    let body = auth_response(&user, token, &state.asset_helper);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(body, "User registered successfully")),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let user = state
        .db_call(move |conn| AccountService::login(conn, &payload))
        .await?;

    let token = issue_token(&state, &user)?;
    let body = auth_response(&user, token, &state.asset_helper);
    Ok(Json(ApiResponse::success(body, "Login successful")))
}

pub async fn get_me(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let user = state
        .db_call(move |conn| AccountService::me(conn, user_id))
        .await?;

    Ok(Json(ApiResponse::success(
        user.profile(&state.asset_helper),
        "Profile retrieved successfully",
    )))
}

pub async fn update_me(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    ValidatedJson(payload): ValidatedJson<UpdateMeRequest>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let cost = state.config.bcrypt_cost;
    let user = state
        .db_call(move |conn| AccountService::update_me(conn, user_id, &payload, cost))
        .await?;
    state.user_cache.evict(user_id).await;

    let token = issue_token(&state, &user)?;
    let body = auth_response(&user, token, &state.asset_helper);
    Ok(Json(ApiResponse::success(body, "Profile updated successfully")))
}

pub async fn delete_me(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
) -> AppResult<StatusCode> {
    let user_id = auth_info.id();
    state
        .db_call(move |conn| AccountService::delete_me(conn, user_id))
        .await?;
    state.user_cache.evict(user_id).await;

    tracing::info!(user_id = %user_id, "Account deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn check_email(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Query(params): Query<CheckEmailQuery>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let result = state
        .db_call(move |conn| AccountService::check_email(conn, user_id, &params.email))
        .await?;
    Ok(Json(ApiResponse::success(result, "Email checked")))
}

/// `image/png` -> `png`; falls back to the uploaded file's extension.
pub fn avatar_extension(content_type: &str, file_name: Option<&str>) -> String {
    let from_mime = content_type
        .strip_prefix("image/")
        .map(|sub| sub.split(['+', ';']).next().unwrap_or(sub).trim())
        .filter(|sub| !sub.is_empty())
        .map(|sub| if sub == "jpeg" { "jpg" } else { sub });

    from_mime
        .map(str::to_string)
        .or_else(|| {
            file_name
                .and_then(|name| Path::new(name).extension())
                .and_then(|ext| ext.to_str())
                .map(str::to_ascii_lowercase)
        })
        .unwrap_or_else(|| "img".to_string())
}

pub async fn update_avatar(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut upload: Option<(String, Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("avatar") {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Could not read avatar: {}", e)))?;
        upload = Some((content_type, file_name, bytes.to_vec()));
    }

    let (content_type, file_name, bytes) =
        upload.ok_or_else(|| AppError::validation("No image was uploaded"))?;
    if !content_type.starts_with("image/") {
        return Err(AppError::validation("Only image files are allowed"));
    }
    if bytes.len() > MAX_AVATAR_BYTES {
        return Err(AppError::validation("Image must be 2MB or smaller"));
    }

    let user_id = auth_info.id();
    let path = format!(
        "avatars/{}-{}.{}",
        user_id,
        chrono::Utc::now().timestamp_millis(),
        avatar_extension(&content_type, file_name.as_deref())
    );
    let url = state.storage.upload(&path, bytes, &content_type).await?;

    let stored = url.clone();
    state
        .db_call(move |conn| AccountService::set_avatar(conn, user_id, &stored))
        .await?;
    state.user_cache.evict(user_id).await;

    tracing::info!(user_id = %user_id, storage = state.storage.name(), "Avatar updated");
    Ok(Json(ApiResponse::success(
        AvatarResponse {
            avatar_url: state.asset_helper.process_url(&url),
        },
        "Avatar updated successfully",
    )))
}

pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<ForgotPasswordRequest>,
) -> AppResult<impl IntoResponse> {
    let (user, raw_token) = state
        .db_call(move |conn| AccountService::forgot_password(conn, &payload.email))
        .await?;

    let email = password_reset_email(&user.email, &state.config.frontend_base_url, &raw_token);
    let mailer = state.mailer.clone();
    tokio::spawn(async move { mailer.send_best_effort(email).await });

    Ok(Json(ApiResponse::<()>::ok("Password reset email sent")))
}

pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<impl IntoResponse> {
    let cost = state.config.bcrypt_cost;
    state
        .db_call(move |conn| AccountService::reset_password(conn, &payload, cost))
        .await?;
    Ok(Json(ApiResponse::<()>::ok("Password updated successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_extension_prefers_mime_subtype() {
        assert_eq!(avatar_extension("image/png", Some("me.gif")), "png");
        assert_eq!(avatar_extension("image/jpeg", None), "jpg");
        assert_eq!(avatar_extension("image/svg+xml", None), "svg");
        assert_eq!(avatar_extension("image/", Some("Face.WEBP")), "webp");
        assert_eq!(avatar_extension("image/", None), "img");
    }
}
