use serde::Serialize;
use uuid::Uuid;
use chrono::{NaiveDate, DateTime, Utc};

/// One recorded menstruation episode. `end_date` stays empty until the
/// owner logs when the flow stopped.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Cycle {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub flow_level: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
