use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::{
    db::models::metric::{
        MetricsOverview, NewMetricEvent, Timeseries, TimeseriesPoint, event_types,
    },
    db::repositories::{library::LibraryRepo, metrics::MetricsRepo, projects::ProjectsRepo},
    error::AppResult,
};

pub struct MetricsService;

/// Counts per UTC day (`YYYY-MM-DD`) for the three series. Only days with at
/// least one event appear, in ascending order.
pub fn bucket_by_day(
    projects: &[DateTime<Utc>],
    papers: &[DateTime<Utc>],
    summaries: &[DateTime<Utc>],
) -> Vec<TimeseriesPoint> {
    let mut days: BTreeMap<String, [i64; 3]> = BTreeMap::new();
    for (slot, series) in [projects, papers, summaries].into_iter().enumerate() {
        for at in series {
            days.entry(at.format("%Y-%m-%d").to_string()).or_default()[slot] += 1;
        }
    }

    days.into_iter()
        .map(|(date, [projects, papers, summaries])| TimeseriesPoint {
            date,
            projects,
            papers,
            summaries,
        })
        .collect()
}

pub fn overview_csv(overview: &MetricsOverview) -> String {
    [
        "metric,value".to_string(),
        format!("projects,{}", overview.projects),
        format!("papers,{}", overview.papers),
        format!("summaries,{}", overview.summaries),
    ]
    .join("\n")
}

impl MetricsService {
    /// `scope` limits the counts to one user; `None` is global.
    pub fn overview(conn: &mut PgConnection, scope: Option<Uuid>) -> AppResult<MetricsOverview> {
        Ok(MetricsOverview {
            projects: ProjectsRepo::count(conn, scope)?,
            papers: LibraryRepo::count(conn, scope)?,
            summaries: MetricsRepo::count(conn, event_types::SUMMARY_GENERATED, scope)?,
        })
    }

    pub fn timeseries(
        conn: &mut PgConnection,
        scope: Option<Uuid>,
        days: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Timeseries> {
        let since = now - Duration::days(days);
        let projects = ProjectsRepo::created_since(conn, since, scope)?;
        let papers = LibraryRepo::created_since(conn, since, scope)?;
        let summaries =
            MetricsRepo::created_since(conn, event_types::SUMMARY_GENERATED, since, scope)?;

        Ok(Timeseries {
            since,
            days,
            data: bucket_by_day(&projects, &papers, &summaries),
        })
    }

    pub fn record_summary(conn: &mut PgConnection, user_id: Uuid, model: &str, chars: usize) -> AppResult<()> {
        MetricsRepo::insert(
            conn,
            &NewMetricEvent {
                user_id: Some(user_id),
                event_type: event_types::SUMMARY_GENERATED.to_string(),
                meta: Some(serde_json::json!({ "model": model, "chars": chars })),
            },
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, d, h, 0, 0).unwrap()
    }

    #[test]
    fn merges_series_by_day() {
        let points = bucket_by_day(&[at(2, 9), at(2, 23)], &[at(1, 0)], &[at(2, 1), at(4, 12)]);
        assert_eq!(
            points,
            vec![
                TimeseriesPoint { date: "2025-03-01".into(), projects: 0, papers: 1, summaries: 0 },
                TimeseriesPoint { date: "2025-03-02".into(), projects: 2, papers: 0, summaries: 1 },
                TimeseriesPoint { date: "2025-03-04".into(), projects: 0, papers: 0, summaries: 1 },
            ]
        );
    }

    #[test]
    fn empty_series_give_no_points() {
        assert!(bucket_by_day(&[], &[], &[]).is_empty());
    }

    #[test]
    fn csv_export_layout() {
        let csv = overview_csv(&MetricsOverview { projects: 3, papers: 7, summaries: 1 });
        assert_eq!(csv, "metric,value\nprojects,3\npapers,7\nsummaries,1");
    }
}
