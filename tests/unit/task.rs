use chrono::{Duration, TimeZone, Utc};
use research_hub::db::enums::TaskStatus;
use research_hub::error::AppError;
use research_hub::validation::task::{
    MAX_UPCOMING_DAYS, parse_task_status, resolve_due_date, upcoming_window_days,
    validate_task_title,
};

#[test]
fn task_titles_are_required() {
    assert!(validate_task_title("Write abstract").is_ok());
    assert!(validate_task_title("   ").is_err());
}

#[test]
fn status_values() {
    assert_eq!(parse_task_status("pending").unwrap(), TaskStatus::Pending);
    assert_eq!(parse_task_status("in_progress").unwrap(), TaskStatus::InProgress);
    assert_eq!(parse_task_status("completed").unwrap(), TaskStatus::Completed);
    assert_eq!(parse_task_status("canceled").unwrap(), TaskStatus::Canceled);
    assert!(matches!(
        parse_task_status("done"),
        Err(AppError::Validation { .. })
    ));
}

#[test]
fn due_date_resolution() {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let explicit = Utc.with_ymd_and_hms(2025, 7, 4, 0, 0, 0).unwrap();

    assert_eq!(resolve_due_date(Some(explicit), Some(3), now).unwrap(), explicit);
    assert_eq!(resolve_due_date(None, Some(3), now).unwrap(), now + Duration::days(3));
    assert_eq!(resolve_due_date(None, Some(-5), now).unwrap(), now);
    assert_eq!(resolve_due_date(None, None, now).unwrap(), now + Duration::days(7));
}

#[test]
fn huge_due_in_days_is_rejected() {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

    for days in [100_000_000, 1_000_000_000_000, i64::MAX] {
        assert!(matches!(
            resolve_due_date(None, Some(days), now),
            Err(AppError::Validation { .. })
        ));
    }
}

#[test]
fn upcoming_window_defaults_to_a_week() {
    assert_eq!(upcoming_window_days(None), 7);
    assert_eq!(upcoming_window_days(Some(30)), 30);
    assert_eq!(upcoming_window_days(Some(-1)), 0);
}

#[test]
fn upcoming_window_is_capped() {
    let now = Utc::now();
    let days = upcoming_window_days(Some(1_000_000_000_000));
    assert_eq!(days, MAX_UPCOMING_DAYS);
    // the capped window must still be addable to the current time
    assert!(now.checked_add_signed(Duration::days(days)).is_some());
    assert_eq!(upcoming_window_days(Some(i64::MAX)), MAX_UPCOMING_DAYS);
}
