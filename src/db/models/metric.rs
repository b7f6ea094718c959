use crate::schema::metric_events;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod event_types {
    pub const SUMMARY_GENERATED: &str = "summary_generated";
}

pub const DEFAULT_TIMESERIES_DAYS: i64 = 30;
pub const MAX_TIMESERIES_DAYS: i64 = 180;

#[derive(Queryable, Selectable, Serialize, Clone, Debug)]
#[diesel(table_name = metric_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MetricEvent {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub event_type: String,
    pub meta: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = metric_events)]
pub struct NewMetricEvent {
    pub user_id: Option<Uuid>,
    pub event_type: String,
    pub meta: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone, Copy)]
pub struct MetricsOverview {
    pub projects: i64,
    pub papers: i64,
    pub summaries: i64,
}

#[derive(Serialize, Debug, PartialEq, Clone)]
pub struct TimeseriesPoint {
    pub date: String,
    pub projects: i64,
    pub papers: i64,
    pub summaries: i64,
}

#[derive(Serialize, Debug)]
pub struct Timeseries {
    pub since: DateTime<Utc>,
    pub days: i64,
    pub data: Vec<TimeseriesPoint>,
}

#[derive(Deserialize, Default)]
pub struct TimeseriesQuery {
    pub days: Option<i64>,
}

impl TimeseriesQuery {
    pub fn clamped_days(&self) -> i64 {
        self.days
            .unwrap_or(DEFAULT_TIMESERIES_DAYS)
            .clamp(1, MAX_TIMESERIES_DAYS)
    }
}

#[derive(Deserialize, Default)]
pub struct ExportQuery {
    pub format: Option<String>,
}
