// Sample data for a fresh installation. Every step is get-or-create on a
// natural key, so running it again leaves the data unchanged.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::auth::{hash_password_blocking, AuthError};
use crate::database::{DatabaseError, NewUser, ProfileAssignment, Store};
use crate::types::Role;

pub const COURSE_NAME: &str = "Computer Science";
pub const SUBJECT_NAME: &str = "Python Programming";
pub const STAFF_EMAIL: &str = "staff@college.com";
pub const STAFF_PASSWORD: &str = "staff123";
pub const STUDENT_EMAIL: &str = "student@college.com";
pub const STUDENT_PASSWORD: &str = "student123";

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Staff profile missing for {0}")]
    MissingStaffProfile(String),

    #[error("Invalid seed date")]
    InvalidDate,
}

/// What the run created; `false` means the record already existed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub course_created: bool,
    pub session_created: bool,
    pub staff_created: bool,
    pub subject_created: bool,
    pub student_created: bool,
}

impl SeedReport {
    pub fn created_anything(&self) -> bool {
        self.course_created
            || self.session_created
            || self.staff_created
            || self.subject_created
            || self.student_created
    }
}

pub async fn seed_sample_data(store: &dyn Store, bcrypt_cost: u32) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    let (course, created) = store.get_or_create_course(COURSE_NAME).await?;
    report.course_created = created;
    log_step(created, &format!("{} course", COURSE_NAME));

    let start = NaiveDate::from_ymd_opt(2024, 9, 1).ok_or(SeedError::InvalidDate)?;
    let end = NaiveDate::from_ymd_opt(2025, 6, 30).ok_or(SeedError::InvalidDate)?;
    let (session, created) = store.get_or_create_session(start, end).await?;
    report.session_created = created;
    log_step(created, "2024-2025 academic session");

    let staff_user = match store.find_user_by_email(STAFF_EMAIL).await? {
        Some(user) => {
            log_step(false, &format!("staff user {}", STAFF_EMAIL));
            user
        }
        None => {
            let new_user = NewUser {
                email: STAFF_EMAIL.to_string(),
                first_name: "John".to_string(),
                last_name: "Teacher".to_string(),
                role: Role::Staff,
                gender: "M".to_string(),
                address: "123 Faculty Street, College Town".to_string(),
                password_hash: hash_password_blocking(STAFF_PASSWORD.to_string(), bcrypt_cost).await?,
            };
            let assignment = ProfileAssignment {
                course_id: Some(course.id),
                session_id: None,
            };
            let (user, _) = store.create_user_with_profile(new_user, assignment).await?;
            report.staff_created = true;
            log_step(true, &format!("staff user {}", STAFF_EMAIL));
            user
        }
    };

    let staff = store
        .find_staff_by_user(staff_user.id)
        .await?
        .ok_or_else(|| SeedError::MissingStaffProfile(STAFF_EMAIL.to_string()))?;

    let (_, created) = store
        .get_or_create_subject(SUBJECT_NAME, staff.id, course.id)
        .await?;
    report.subject_created = created;
    log_step(created, &format!("{} subject", SUBJECT_NAME));

    if store.find_user_by_email(STUDENT_EMAIL).await?.is_some() {
        log_step(false, &format!("student user {}", STUDENT_EMAIL));
    } else {
        let new_user = NewUser {
            email: STUDENT_EMAIL.to_string(),
            first_name: "Jane".to_string(),
            last_name: "Student".to_string(),
            role: Role::Student,
            gender: "F".to_string(),
            address: "456 Student Avenue, College Town".to_string(),
            password_hash: hash_password_blocking(STUDENT_PASSWORD.to_string(), bcrypt_cost).await?,
        };
        let assignment = ProfileAssignment {
            course_id: Some(course.id),
            session_id: Some(session.id),
        };
        store.create_user_with_profile(new_user, assignment).await?;
        report.student_created = true;
        log_step(true, &format!("student user {}", STUDENT_EMAIL));
    }

    Ok(report)
}

fn log_step(created: bool, what: &str) {
    if created {
        info!("Created {}", what);
    } else {
        info!("{} already exists", what);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::database::{MemoryStore, RecordCounts};
    use crate::testing::TEST_BCRYPT_COST;

    #[tokio::test]
    async fn first_run_creates_everything() {
        let store = MemoryStore::new();
        let report = seed_sample_data(&store, TEST_BCRYPT_COST).await.unwrap();

        assert_eq!(
            report,
            SeedReport {
                course_created: true,
                session_created: true,
                staff_created: true,
                subject_created: true,
                student_created: true,
            }
        );

        let student = store.find_user_by_email(STUDENT_EMAIL).await.unwrap().unwrap();
        assert_eq!(student.role(), Some(Role::Student));
        assert!(verify_password(STUDENT_PASSWORD, &student.password_hash).unwrap());

        let listing = store.list_students().await.unwrap();
        assert_eq!(listing.len(), 1);
        assert!(listing[0].course_id.is_some());
        assert!(listing[0].session_id.is_some());
    }

    #[tokio::test]
    async fn second_run_is_idempotent() {
        let store = MemoryStore::new();
        seed_sample_data(&store, TEST_BCRYPT_COST).await.unwrap();
        let after_first = store.counts().await.unwrap();

        let report = seed_sample_data(&store, TEST_BCRYPT_COST).await.unwrap();
        assert!(!report.created_anything());
        assert_eq!(store.counts().await.unwrap(), after_first);
        assert_eq!(
            after_first,
            RecordCounts {
                users: 2,
                admins: 0,
                staff: 1,
                students: 1,
                courses: 1,
                sessions: 1,
                subjects: 1,
            }
        );
    }

    #[tokio::test]
    async fn subject_is_linked_to_seeded_staff_and_course() {
        let store = MemoryStore::new();
        seed_sample_data(&store, TEST_BCRYPT_COST).await.unwrap();

        let staff_user = store.find_user_by_email(STAFF_EMAIL).await.unwrap().unwrap();
        let staff = store.find_staff_by_user(staff_user.id).await.unwrap().unwrap();
        let (course, _) = store.get_or_create_course(COURSE_NAME).await.unwrap();
        let (subject, created) = store
            .get_or_create_subject(SUBJECT_NAME, staff.id, course.id)
            .await
            .unwrap();

        assert!(!created);
        assert_eq!(subject.staff_id, staff.id);
        assert_eq!(subject.course_id, course.id);
        assert_eq!(staff.course_id, Some(course.id));
    }
}
