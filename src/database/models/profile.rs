use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Staff {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Student {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Option<Uuid>,
    pub session_id: Option<Uuid>,
}

/// Role-specific profile row created alongside every user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Profile {
    Admin(Admin),
    Staff(Staff),
    Student(Student),
}

impl Profile {
    pub fn role(&self) -> Role {
        match self {
            Profile::Admin(_) => Role::Admin,
            Profile::Staff(_) => Role::Staff,
            Profile::Student(_) => Role::Student,
        }
    }
}

/// Optional links set on the profile at creation time. Admin profiles ignore
/// both; staff profiles ignore `session_id`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileAssignment {
    pub course_id: Option<Uuid>,
    pub session_id: Option<Uuid>,
}

/// Student joined with its user row, for listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StudentListing {
    pub student_id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub course_id: Option<Uuid>,
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordCounts {
    pub users: i64,
    pub admins: i64,
    pub staff: i64,
    pub students: i64,
    pub courses: i64,
    pub sessions: i64,
    pub subjects: i64,
}
