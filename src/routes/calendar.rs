use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::predictor::{self, DayInfo};
use crate::routes::cycle::fetch_cycles;

#[derive(Deserialize)]
pub struct CalendarQuery {
    user_id: Uuid,
    year: i32,
    month: u32,
}

#[derive(Serialize)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
    days: Vec<DayInfo>,
}

pub fn routes(pool: PgPool) -> Router {
    Router::new()
        .route("/cycle/calendar", get(get_calendar_month))
        .with_state(pool)
}

// Every day of the given month, or None when year/month do not name a
// real calendar month.
fn month_days(year: i32, month: u32) -> Option<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;

    let mut days = Vec::with_capacity(31);
    let mut day = first;
    while day.month() == month {
        days.push(day);
        day += Duration::days(1);
    }
    Some(days)
}

async fn get_calendar_month(
    State(pool): State<PgPool>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarMonth>, (StatusCode, String)> {
    let Some(days) = month_days(query.year, query.month) else {
        return Err((StatusCode::BAD_REQUEST, "Invalid year/month".into()));
    };

    let cycles = fetch_cycles(&pool, query.user_id)
        .await
        .map_err(|status| (status, "DB error".into()))?;

    let data = predictor::calculate_cycle_data(&cycles);
    let days = days
        .into_iter()
        .map(|day| predictor::day_info(day, &cycles, &data))
        .collect();

    Ok(Json(CalendarMonth {
        year: query.year,
        month: query.month,
        days,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_days_covers_the_whole_month() {
        let days = month_days(2025, 1).unwrap();
        assert_eq!(days.len(), 31);
        assert_eq!(days[0], NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(days[30], NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
    }

    #[test]
    fn month_days_handles_leap_february() {
        assert_eq!(month_days(2024, 2).unwrap().len(), 29);
        assert_eq!(month_days(2025, 2).unwrap().len(), 28);
    }

    #[test]
    fn month_days_rejects_out_of_range_months() {
        assert!(month_days(2025, 0).is_none());
        assert!(month_days(2025, 13).is_none());
    }
}
