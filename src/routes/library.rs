use crate::AppState;
use crate::clients::mailer::library_item_email;
use crate::db::models::{ApiResponse, LibraryListQuery, PdfUploadForm, SaveSuggestedRequest};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUserInfo;
use crate::services::LibraryService;
use crate::services::library_service::SavedItem;
use crate::validation::ValidatedJson;
use crate::validation::library::{
    MAX_PDF_BYTES, parse_tags, parse_upload_item_type, storage_file_name, title_or_file_stem,
};
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

fn notify_by_email(state: &AppState, saved: &SavedItem) {
    if !saved.wants_email() {
        return;
    }
    let email = library_item_email(&saved.owner.email, &saved.item.title);
    let mailer = state.mailer.clone();
    tokio::spawn(async move { mailer.send_best_effort(email).await });
}

async fn read_upload_form(mut multipart: Multipart) -> AppResult<PdfUploadForm> {
    let mut form = PdfUploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" | "pdf" => {
                form.file_name = field.file_name().map(str::to_string);
                form.content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Could not read file: {}", e)))?;
                form.bytes = Some(bytes.to_vec());
            }
            "title" | "summary" | "tags" | "itemType" | "item_type" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Invalid form field: {}", e)))?;
                match name.as_str() {
                    "title" => form.title = Some(value),
                    "summary" => form.summary = Some(value),
                    "tags" => form.tags = Some(value),
                    _ => form.item_type = Some(value),
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

pub async fn get_library(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Query(params): Query<LibraryListQuery>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let page = state
        .db_call(move |conn| LibraryService::list(conn, user_id, &params))
        .await?;
    let meta = page.meta();
    Ok(Json(ApiResponse::success_with_meta(
        page,
        "Library retrieved successfully",
        meta,
    )))
}

pub async fn upload_pdf(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = read_upload_form(multipart).await?;
    parse_upload_item_type(form.item_type.as_deref())?;

    let bytes = form
        .bytes
        .ok_or_else(|| AppError::validation("No file was uploaded"))?;
    if bytes.len() > MAX_PDF_BYTES {
        return Err(AppError::validation("File must be 25MB or smaller"));
    }

    let file_name = form.file_name.unwrap_or_else(|| "document.pdf".to_string());
    let title = title_or_file_stem(form.title.as_deref(), &file_name);
    let tags = parse_tags(form.tags.as_deref());
    let content_type = form
        .content_type
        .filter(|ct| !ct.is_empty())
        .unwrap_or_else(|| "application/pdf".to_string());

    let user_id = auth_info.id();
    let path = format!(
        "library/{}/{}_{}",
        user_id,
        chrono::Utc::now().timestamp_millis(),
        storage_file_name(&file_name)
    );
    let link = state.storage.upload(&path, bytes, &content_type).await?;

    let summary = form.summary;
    let saved = state
        .db_call(move |conn| LibraryService::add_pdf(conn, user_id, title, summary, tags, link))
        .await?;
    notify_by_email(&state, &saved);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(saved.item, "PDF added to library")),
    ))
}

pub async fn save_suggested(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    ValidatedJson(payload): ValidatedJson<SaveSuggestedRequest>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let saved = state
        .db_call(move |conn| LibraryService::save_suggested(conn, user_id, &payload))
        .await?;
    notify_by_email(&state, &saved);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(saved.item, "Article saved to library")),
    ))
}

pub async fn delete_library_item(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(item_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    state
        .db_call(move |conn| LibraryService::delete(conn, user_id, item_id))
        .await?;
    Ok(Json(ApiResponse::success(
        json!({ "id": item_id }),
        "Library item deleted",
    )))
}
