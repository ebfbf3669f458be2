use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use super::models::{
    AcademicSession, Course, NewUser, Profile, ProfileAssignment, RecordCounts, Staff,
    StudentListing, Subject, User,
};

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence interface for college records.
///
/// The `get_or_create_*` methods are keyed by natural keys and report whether
/// a row was created (`true`) or an existing one returned (`false`).
#[async_trait]
pub trait Store: Send + Sync {
    async fn get_or_create_course(&self, name: &str) -> Result<(Course, bool), DatabaseError>;

    async fn get_or_create_session(
        &self,
        start_year: NaiveDate,
        end_year: NaiveDate,
    ) -> Result<(AcademicSession, bool), DatabaseError>;

    async fn get_or_create_subject(
        &self,
        name: &str,
        staff_id: Uuid,
        course_id: Uuid,
    ) -> Result<(Subject, bool), DatabaseError>;

    /// Case-insensitive lookup.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn get_user(&self, id: Uuid) -> Result<User, DatabaseError>;

    /// Creates the user and its role profile atomically. Fails with
    /// `Conflict` when the email is taken and `InvalidReference` when the
    /// assignment points at a missing course or session.
    async fn create_user_with_profile(
        &self,
        user: NewUser,
        assignment: ProfileAssignment,
    ) -> Result<(User, Profile), DatabaseError>;

    async fn find_staff_by_user(&self, user_id: Uuid) -> Result<Option<Staff>, DatabaseError>;

    async fn list_courses(&self) -> Result<Vec<Course>, DatabaseError>;

    async fn list_students(&self) -> Result<Vec<StudentListing>, DatabaseError>;

    async fn counts(&self) -> Result<RecordCounts, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
