// handlers/admin/courses.rs - GET/POST /api/admin/courses

use axum::extract::State;
use serde::Deserialize;

use crate::database::Course;
use crate::error::ApiError;
use crate::gate::ParsedJson;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCourse {
    pub name: String,
}

pub async fn courses_get(State(state): State<AppState>) -> ApiResult<Vec<Course>> {
    let courses = state.store.list_courses().await?;
    Ok(ApiResponse::success(courses))
}

/**
 * POST /api/admin/courses - Create a course
 *
 * Expected Input:
 * ```json
 * { "name": "Computer Science" }
 * ```
 *
 * The name is sanitized before storage. An existing course is a 409.
 */
pub async fn courses_post(State(state): State<AppState>, body: ParsedJson) -> ApiResult<Course> {
    let input: CreateCourse = body.sanitize_fields(&["name"]).decode()?;
    let name = input.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation_error("Course name is required", None));
    }

    let (course, created) = state.store.get_or_create_course(name).await?;
    if !created {
        return Err(ApiError::conflict(format!("Course '{}' already exists", course.name)));
    }

    tracing::info!("Created course {}", course.name);
    Ok(ApiResponse::created(course))
}
