use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Academic session, identified by its date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct AcademicSession {
    pub id: Uuid,
    pub start_year: NaiveDate,
    pub end_year: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub staff_id: Uuid,
    pub course_id: Uuid,
}
