// handlers/admin/users.rs - staff and student accounts
//
// POST /api/admin/staff     → create a Staff user with its profile
// GET  /api/admin/students  → list students with their course/session
// POST /api/admin/students  → create a Student user with its profile

use std::collections::HashMap;

use axum::extract::State;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::hash_password_blocking;
use crate::config::AppConfig;
use crate::database::{NewUser, Profile, ProfileAssignment, StudentListing, User};
use crate::error::ApiError;
use crate::gate::ParsedJson;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::Role;

/// Free-text fields that are sanitized before storage.
const TEXT_FIELDS: &[&str] = &["first_name", "last_name", "address"];

#[derive(Debug, Deserialize)]
pub struct UserFields {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateStaff {
    #[serde(flatten)]
    pub user: UserFields,
    pub course_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CreateStudent {
    #[serde(flatten)]
    pub user: UserFields,
    pub course_id: Option<Uuid>,
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub user: User,
    pub profile: Profile,
}

/**
 * POST /api/admin/staff - Create a staff account
 *
 * Expected Input:
 * ```json
 * {
 *   "email": "teacher@college.com",
 *   "password": "secret123",
 *   "first_name": "John",
 *   "last_name": "Teacher",
 *   "gender": "M",
 *   "address": "123 Faculty Street",
 *   "course_id": "<optional course id>"
 * }
 * ```
 */
pub async fn staff_post(State(state): State<AppState>, body: ParsedJson) -> ApiResult<CreatedUser> {
    let input: CreateStaff = body.sanitize_fields(TEXT_FIELDS).decode()?;
    let assignment = ProfileAssignment {
        course_id: input.course_id,
        session_id: None,
    };

    create_user(&state, input.user, Role::Staff, assignment).await
}

/**
 * POST /api/admin/students - Create a student account
 *
 * Same fields as staff, plus an optional `session_id`.
 */
pub async fn students_post(
    State(state): State<AppState>,
    body: ParsedJson,
) -> ApiResult<CreatedUser> {
    let input: CreateStudent = body.sanitize_fields(TEXT_FIELDS).decode()?;
    let assignment = ProfileAssignment {
        course_id: input.course_id,
        session_id: input.session_id,
    };

    create_user(&state, input.user, Role::Student, assignment).await
}

pub async fn students_get(State(state): State<AppState>) -> ApiResult<Vec<StudentListing>> {
    let students = state.store.list_students().await?;
    Ok(ApiResponse::success(students))
}

async fn create_user(
    state: &AppState,
    fields: UserFields,
    role: Role,
    assignment: ProfileAssignment,
) -> ApiResult<CreatedUser> {
    validate_user_fields(&fields, &state.config)?;

    let password_hash =
        hash_password_blocking(fields.password, state.config.security.bcrypt_cost).await?;
    let new_user = NewUser {
        email: fields.email.trim().to_lowercase(),
        first_name: fields.first_name.trim().to_string(),
        last_name: fields.last_name.trim().to_string(),
        role,
        gender: fields.gender,
        address: fields.address.trim().to_string(),
        password_hash,
    };

    let (user, profile) = state
        .store
        .create_user_with_profile(new_user, assignment)
        .await?;
    tracing::info!("Created {} user {}", profile.role(), user.email);

    Ok(ApiResponse::created(CreatedUser { user, profile }))
}

fn validate_user_fields(fields: &UserFields, config: &AppConfig) -> Result<(), ApiError> {
    let mut errors = HashMap::new();

    let email = fields.email.trim();
    if email.is_empty() || !email.contains('@') {
        errors.insert("email".to_string(), "Enter a valid email address".to_string());
    }

    if fields.first_name.trim().is_empty() {
        errors.insert("first_name".to_string(), "This field is required".to_string());
    }
    if fields.last_name.trim().is_empty() {
        errors.insert("last_name".to_string(), "This field is required".to_string());
    }

    if !matches!(fields.gender.as_str(), "M" | "F") {
        errors.insert("gender".to_string(), "Gender must be M or F".to_string());
    }

    let min_length = config.security.password_min_length;
    if fields.password.chars().count() < min_length {
        errors.insert(
            "password".to_string(),
            format!("Password must be at least {} characters", min_length),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error("Invalid user data", Some(errors)))
    }
}
