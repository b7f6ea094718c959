use crate::AppState;
use crate::db::models::{ApiResponse, ExportQuery, TimeseriesQuery};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUserInfo;
use crate::services::MetricsService;
use crate::services::metrics_service::overview_csv;
use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

pub fn parse_export_format(raw: Option<&str>) -> AppResult<ExportFormat> {
    match raw.map(str::trim).filter(|f| !f.is_empty()) {
        None => Ok(ExportFormat::Csv),
        Some(f) if f.eq_ignore_ascii_case("csv") => Ok(ExportFormat::Csv),
        Some(f) if f.eq_ignore_ascii_case("json") => Ok(ExportFormat::Json),
        Some(_) => Err(AppError::validation("format must be csv or json")),
    }
}

pub async fn admin_overview(State(state): State<Arc<AppState>>) -> AppResult<impl IntoResponse> {
    let overview = state
        .db_call(|conn| MetricsService::overview(conn, None))
        .await?;
    Ok(Json(ApiResponse::success(overview, "Metrics overview")))
}

pub async fn admin_export(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExportQuery>,
) -> AppResult<Response> {
    let format = parse_export_format(params.format.as_deref())?;
    let overview = state
        .db_call(|conn| MetricsService::overview(conn, None))
        .await?;

    Ok(match format {
        ExportFormat::Json => Json(overview).into_response(),
        ExportFormat::Csv => (
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"metrics.csv\"",
                ),
            ],
            overview_csv(&overview),
        )
            .into_response(),
    })
}

pub async fn admin_timeseries(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TimeseriesQuery>,
) -> AppResult<impl IntoResponse> {
    let days = params.clamped_days();
    let series = state
        .db_call(move |conn| MetricsService::timeseries(conn, None, days, Utc::now()))
        .await?;
    Ok(Json(ApiResponse::success(series, "Metrics timeseries")))
}

pub async fn user_overview(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
) -> AppResult<impl IntoResponse> {
    let scope = Some(auth_info.id());
    let overview = state
        .db_call(move |conn| MetricsService::overview(conn, scope))
        .await?;
    Ok(Json(ApiResponse::success(overview, "Metrics overview")))
}

pub async fn user_timeseries(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Query(params): Query<TimeseriesQuery>,
) -> AppResult<impl IntoResponse> {
    let scope = Some(auth_info.id());
    let days = params.clamped_days();
    let series = state
        .db_call(move |conn| MetricsService::timeseries(conn, scope, days, Utc::now()))
        .await?;
    Ok(Json(ApiResponse::success(series, "Metrics timeseries")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_format_defaults_to_csv() {
        assert_eq!(parse_export_format(None).unwrap(), ExportFormat::Csv);
        assert_eq!(parse_export_format(Some("")).unwrap(), ExportFormat::Csv);
        assert_eq!(parse_export_format(Some("JSON")).unwrap(), ExportFormat::Json);
        assert!(matches!(
            parse_export_format(Some("xml")),
            Err(AppError::Validation { .. })
        ));
    }
}
