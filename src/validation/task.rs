use chrono::{DateTime, Duration, Utc};

use crate::db::enums::TaskStatus;
use crate::error::AppError;

use super::is_blank;

pub const DEFAULT_DUE_IN_DAYS: i64 = 7;
pub const DEFAULT_UPCOMING_DAYS: i64 = 7;
/// Undated tasks created within this many days count as upcoming.
pub const UNDATED_RECENT_DAYS: i64 = 7;
pub const MAX_UPCOMING_DAYS: i64 = 3650;

pub fn validate_task_title(title: &str) -> Result<(), AppError> {
    if is_blank(title) {
        return Err(AppError::validation("Task title is required"));
    }
    Ok(())
}

pub fn parse_task_status(raw: &str) -> Result<TaskStatus, AppError> {
    raw.parse::<TaskStatus>()
        .map_err(|_| AppError::validation(format!("Invalid task status: {}", raw)))
}

/// An explicit date wins, then `due_in_days` (negative counts as 0), then a week out.
/// A day count past the representable date range is a validation error.
pub fn resolve_due_date(
    explicit: Option<DateTime<Utc>>,
    due_in_days: Option<i64>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, AppError> {
    if let Some(date) = explicit {
        return Ok(date);
    }
    let days = due_in_days.map(|d| d.max(0)).unwrap_or(DEFAULT_DUE_IN_DAYS);
    Duration::try_days(days)
        .and_then(|delta| now.checked_add_signed(delta))
        .ok_or_else(|| AppError::validation("due_in_days is out of range"))
}

pub fn upcoming_window_days(days: Option<i64>) -> i64 {
    days.map(|d| d.clamp(0, MAX_UPCOMING_DAYS))
        .unwrap_or(DEFAULT_UPCOMING_DAYS)
}
