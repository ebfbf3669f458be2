// handlers/admin/subjects.rs - POST /api/admin/subjects

use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::Subject;
use crate::error::ApiError;
use crate::gate::ParsedJson;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSubject {
    pub name: String,
    pub staff_id: Uuid,
    pub course_id: Uuid,
}

/**
 * POST /api/admin/subjects - Create a subject taught by a staff member
 *
 * Expected Input:
 * ```json
 * { "name": "Python Programming", "staff_id": "<staff profile id>", "course_id": "<course id>" }
 * ```
 *
 * Unknown staff or course ids are a 400; an existing subject name a 409.
 */
pub async fn subjects_post(State(state): State<AppState>, body: ParsedJson) -> ApiResult<Subject> {
    let input: CreateSubject = body.sanitize_fields(&["name"]).decode()?;
    let name = input.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation_error("Subject name is required", None));
    }

    let (subject, created) = state
        .store
        .get_or_create_subject(name, input.staff_id, input.course_id)
        .await?;
    if !created {
        return Err(ApiError::conflict(format!("Subject '{}' already exists", subject.name)));
    }

    Ok(ApiResponse::created(subject))
}
