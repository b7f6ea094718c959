use crate::AppState;
use crate::clients::scholar::resolve_year_from;
use crate::db::models::{
    ApiResponse, ChatRequest, ChatResponse, SuggestArticlesRequest, SuggestedArticles,
    SummarizeRequest, SummaryResponse,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUserInfo;
use crate::services::MetricsService;
use crate::validation::{ValidatedJson, is_blank};
use axum::{Json, extract::State, response::IntoResponse};
use chrono::Datelike;
use std::sync::Arc;

pub async fn summarize(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    ValidatedJson(payload): ValidatedJson<SummarizeRequest>,
) -> AppResult<impl IntoResponse> {
    if is_blank(&payload.text) {
        return Err(AppError::validation("Text is required"));
    }

    let summary = state
        .ai
        .summarize(&payload.text, payload.prompt.as_deref())
        .await?;
    let model = state.ai.text_model().to_string();

    let user_id = auth_info.id();
    let chars = payload.text.chars().count();
    let recorded_model = model.clone();
    if let Err(e) = state
        .db_call(move |conn| MetricsService::record_summary(conn, user_id, &recorded_model, chars))
        .await
    {
        tracing::warn!(user_id = %user_id, "Failed to record summary metric: {}", e);
    }

    Ok(Json(ApiResponse::success(
        SummaryResponse { summary, model },
        "Summary generated",
    )))
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    _auth_info: AuthUserInfo,
    ValidatedJson(payload): ValidatedJson<ChatRequest>,
) -> AppResult<impl IntoResponse> {
    if is_blank(&payload.message) {
        return Err(AppError::validation("Message is required"));
    }

    let text = state.ai.chat(&payload.message, &payload.history).await?;
    Ok(Json(ApiResponse::success(
        ChatResponse {
            text,
            model: state.ai.chat_model().to_string(),
        },
        "Reply generated",
    )))
}

pub async fn suggest_articles(
    State(state): State<Arc<AppState>>,
    _auth_info: AuthUserInfo,
    ValidatedJson(payload): ValidatedJson<SuggestArticlesRequest>,
) -> AppResult<impl IntoResponse> {
    let query = payload.query.trim();
    if query.is_empty() {
        return Err(AppError::validation("Query is required"));
    }

    let current_year = chrono::Utc::now().year();
    let year_from = resolve_year_from(payload.year_from, payload.year, current_year);
    let results = state
        .search
        .search(query, year_from, payload.count() as usize)
        .await?;

    Ok(Json(ApiResponse::success(
        SuggestedArticles { results },
        "Suggestions retrieved",
    )))
}
