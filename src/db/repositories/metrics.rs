use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::models::metric::{MetricEvent, NewMetricEvent};
use crate::schema::metric_events;

pub struct MetricsRepo;

impl MetricsRepo {
    pub fn insert(conn: &mut PgConnection, event: &NewMetricEvent) -> QueryResult<MetricEvent> {
        diesel::insert_into(metric_events::table)
            .values(event)
            .returning(MetricEvent::as_returning())
            .get_result(conn)
    }

    pub fn count(
        conn: &mut PgConnection,
        event_type: &str,
        user_id: Option<Uuid>,
    ) -> QueryResult<i64> {
        let mut query = metric_events::table
            .filter(metric_events::event_type.eq(event_type))
            .into_boxed();
        if let Some(uid) = user_id {
            query = query.filter(metric_events::user_id.eq(uid));
        }
        query.count().get_result(conn)
    }

    pub fn created_since(
        conn: &mut PgConnection,
        event_type: &str,
        since: DateTime<Utc>,
        user_id: Option<Uuid>,
    ) -> QueryResult<Vec<DateTime<Utc>>> {
        let mut query = metric_events::table
            .filter(metric_events::event_type.eq(event_type))
            .filter(metric_events::created_at.ge(since))
            .select(metric_events::created_at)
            .into_boxed();
        if let Some(uid) = user_id {
            query = query.filter(metric_events::user_id.eq(uid));
        }
        query.load(conn)
    }
}
