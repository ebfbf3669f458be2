use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;
use uuid::Uuid;

use super::models::{
    AcademicSession, Admin, Course, NewUser, Profile, ProfileAssignment, RecordCounts, Staff,
    Student, StudentListing, Subject, User,
};
use super::store::{DatabaseError, Store};
use crate::config::DatabaseConfig;
use crate::types::Role;

const SCHEMA: &str = include_str!("../../sql/schema.sql");

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, user_type, gender, address, password_hash, created_at";

/// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Created database pool (max {} connections)", config.max_connections);
        Ok(Self { pool })
    }

    /// Creates missing tables and indexes.
    pub async fn apply_schema(&self) -> Result<(), DatabaseError> {
        for statement in SCHEMA.split(';') {
            let sql = statement
                .lines()
                .filter(|line| !line.trim_start().starts_with("--"))
                .collect::<Vec<_>>()
                .join("\n");
            if sql.trim().is_empty() {
                continue;
            }
            sqlx::query(&sql).execute(&self.pool).await?;
        }
        info!("Database schema is up to date");
        Ok(())
    }
}

/// Maps constraint violations to client-facing errors.
fn map_write_error(err: sqlx::Error, what: &str) -> DatabaseError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some("23505") => return DatabaseError::Conflict(format!("{} already exists", what)),
            Some("23503") => {
                return DatabaseError::InvalidReference(format!("{} references a missing record", what))
            }
            _ => {}
        }
    }
    DatabaseError::Sqlx(err)
}

#[async_trait]
impl Store for PgStore {
    async fn get_or_create_course(&self, name: &str) -> Result<(Course, bool), DatabaseError> {
        let inserted = sqlx::query_as::<_, Course>(
            "INSERT INTO courses (id, name) VALUES ($1, $2) \
             ON CONFLICT (name) DO NOTHING \
             RETURNING id, name, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(course) = inserted {
            return Ok((course, true));
        }

        let existing = sqlx::query_as::<_, Course>("SELECT id, name, created_at FROM courses WHERE name = $1")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok((existing, false))
    }

    async fn get_or_create_session(
        &self,
        start_year: NaiveDate,
        end_year: NaiveDate,
    ) -> Result<(AcademicSession, bool), DatabaseError> {
        let inserted = sqlx::query_as::<_, AcademicSession>(
            "INSERT INTO sessions (id, start_year, end_year) VALUES ($1, $2, $3) \
             ON CONFLICT (start_year, end_year) DO NOTHING \
             RETURNING id, start_year, end_year",
        )
        .bind(Uuid::new_v4())
        .bind(start_year)
        .bind(end_year)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(session) = inserted {
            return Ok((session, true));
        }

        let existing = sqlx::query_as::<_, AcademicSession>(
            "SELECT id, start_year, end_year FROM sessions WHERE start_year = $1 AND end_year = $2",
        )
        .bind(start_year)
        .bind(end_year)
        .fetch_one(&self.pool)
        .await?;
        Ok((existing, false))
    }

    async fn get_or_create_subject(
        &self,
        name: &str,
        staff_id: Uuid,
        course_id: Uuid,
    ) -> Result<(Subject, bool), DatabaseError> {
        let inserted = sqlx::query_as::<_, Subject>(
            "INSERT INTO subjects (id, name, staff_id, course_id) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (name) DO NOTHING \
             RETURNING id, name, staff_id, course_id",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(staff_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Subject"))?;

        if let Some(subject) = inserted {
            return Ok((subject, true));
        }

        let existing = sqlx::query_as::<_, Subject>(
            "SELECT id, name, staff_id, course_id FROM subjects WHERE name = $1",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok((existing, false))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let query = format!("SELECT {} FROM users WHERE lower(email) = lower($1)", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> Result<User, DatabaseError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("User {} not found", id)))
    }

    async fn create_user_with_profile(
        &self,
        user: NewUser,
        assignment: ProfileAssignment,
    ) -> Result<(User, Profile), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let insert_user = format!(
            "INSERT INTO users (id, email, first_name, last_name, user_type, gender, address, password_hash) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
            USER_COLUMNS
        );
        let created = sqlx::query_as::<_, User>(&insert_user)
            .bind(Uuid::new_v4())
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.role.code())
            .bind(&user.gender)
            .bind(&user.address)
            .bind(&user.password_hash)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, &format!("User with email '{}'", user.email)))?;

        let profile = match user.role {
            Role::Admin => Profile::Admin(
                sqlx::query_as::<_, Admin>("INSERT INTO admins (id, user_id) VALUES ($1, $2) RETURNING id, user_id")
                    .bind(Uuid::new_v4())
                    .bind(created.id)
                    .fetch_one(&mut *tx)
                    .await?,
            ),
            Role::Staff => Profile::Staff(
                sqlx::query_as::<_, Staff>(
                    "INSERT INTO staff (id, user_id, course_id) VALUES ($1, $2, $3) \
                     RETURNING id, user_id, course_id",
                )
                .bind(Uuid::new_v4())
                .bind(created.id)
                .bind(assignment.course_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| map_write_error(e, "Staff profile"))?,
            ),
            Role::Student => Profile::Student(
                sqlx::query_as::<_, Student>(
                    "INSERT INTO students (id, user_id, course_id, session_id) VALUES ($1, $2, $3, $4) \
                     RETURNING id, user_id, course_id, session_id",
                )
                .bind(Uuid::new_v4())
                .bind(created.id)
                .bind(assignment.course_id)
                .bind(assignment.session_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| map_write_error(e, "Student profile"))?,
            ),
        };

        tx.commit().await?;
        info!("Created {} user {}", user.role, created.email);
        Ok((created, profile))
    }

    async fn find_staff_by_user(&self, user_id: Uuid) -> Result<Option<Staff>, DatabaseError> {
        let staff = sqlx::query_as::<_, Staff>("SELECT id, user_id, course_id FROM staff WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(staff)
    }

    async fn list_courses(&self) -> Result<Vec<Course>, DatabaseError> {
        let courses = sqlx::query_as::<_, Course>("SELECT id, name, created_at FROM courses ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(courses)
    }

    async fn list_students(&self) -> Result<Vec<StudentListing>, DatabaseError> {
        let students = sqlx::query_as::<_, StudentListing>(
            "SELECT s.id AS student_id, u.id AS user_id, u.email, u.first_name, u.last_name, \
                    s.course_id, s.session_id \
             FROM students s JOIN users u ON u.id = s.user_id \
             ORDER BY u.last_name, u.first_name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(students)
    }

    async fn counts(&self) -> Result<RecordCounts, DatabaseError> {
        let row: (i64, i64, i64, i64, i64, i64, i64) = sqlx::query_as(
            "SELECT \
                (SELECT count(*) FROM users), \
                (SELECT count(*) FROM admins), \
                (SELECT count(*) FROM staff), \
                (SELECT count(*) FROM students), \
                (SELECT count(*) FROM courses), \
                (SELECT count(*) FROM sessions), \
                (SELECT count(*) FROM subjects)",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(RecordCounts {
            users: row.0,
            admins: row.1,
            staff: row.2,
            students: row.3,
            courses: row.4,
            sessions: row.5,
            subjects: row.6,
        })
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
