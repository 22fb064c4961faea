use axum::{Router, routing::{get, post, delete}, Json, extract::{State, Query, Path}};
use sqlx::PgPool;
use uuid::Uuid;
use chrono::NaiveDate;
use serde::Deserialize;
use crate::models::Cycle;
use crate::predictor::{self, TodaySummary};
use axum::http::StatusCode;

#[derive(Deserialize)]
pub struct UserQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct NewCycle {
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub flow_level: Option<String>,
    pub notes: Option<String>,
}

pub fn routes(pool: PgPool) -> Router {
    Router::new()
        .route("/cycle", post(create_cycle))
        .route("/cycle/today", get(get_today_summary))
        .route("/cycle/:id", delete(delete_cycle))
        .route("/cycles", get(list_cycles))
        .with_state(pool)
}

async fn create_cycle(
    State(pool): State<PgPool>,
    Json(body): Json<NewCycle>,
) -> Result<StatusCode, StatusCode> {
    sqlx::query(
        "INSERT INTO cycles (user_id, start_date, end_date, flow_level, notes) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(body.user_id)
    .bind(body.start_date)
    .bind(body.end_date)
    .bind(body.flow_level)
    .bind(body.notes)
    .execute(&pool)
    .await
    .map_err(|e| {
        if let Some(db_err) = e.as_database_error() {
            tracing::error!("❌ DB insert failed: {}", db_err.message());

            if let Some(code) = db_err.code() {
                tracing::info!("ℹ️ SQLSTATE code: {}", code);
            }

            if let Some(constraint) = db_err.constraint() {
                tracing::info!("🔒 Constraint violated: {}", constraint);
            }
        } else {
            tracing::error!("❌ Unknown DB error: {}", e);
        }

        StatusCode::UNPROCESSABLE_ENTITY
    })?;

    Ok(StatusCode::CREATED)
}

async fn list_cycles(
    State(pool): State<PgPool>,
    Query(params): Query<UserQuery>,
) -> Result<Json<Vec<Cycle>>, StatusCode> {
    let cycles = fetch_cycles(&pool, params.user_id).await?;
    Ok(Json(cycles))
}

async fn delete_cycle(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserQuery>,
) -> Result<StatusCode, (StatusCode, String)> {
    let result = sqlx::query("DELETE FROM cycles WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(params.user_id)
        .execute(&pool)
        .await;

    match result {
        Ok(r) if r.rows_affected() > 0 => Ok(StatusCode::NO_CONTENT),
        Ok(_) => Err((StatusCode::NOT_FOUND, "No cycle found".into())),
        Err(e) => {
            tracing::error!("❌ DB error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "DB error".into()))
        }
    }
}

async fn get_today_summary(
    State(pool): State<PgPool>,
    Query(params): Query<UserQuery>,
) -> Result<Json<TodaySummary>, StatusCode> {
    let cycles = fetch_cycles(&pool, params.user_id).await?;

    let today = chrono::Utc::now().naive_utc().date();
    Ok(Json(predictor::today_summary(&cycles, today)))
}

// All predictor inputs come through here; newest first to match what the
// dashboard list renders.
pub async fn fetch_cycles(pool: &PgPool, user_id: Uuid) -> Result<Vec<Cycle>, StatusCode> {
    sqlx::query_as::<_, Cycle>(
        "SELECT id, user_id, start_date, end_date, flow_level, notes, created_at
         FROM cycles WHERE user_id = $1 ORDER BY start_date DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("❌ Failed to fetch cycles: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}
