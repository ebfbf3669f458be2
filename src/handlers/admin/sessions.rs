// handlers/admin/sessions.rs - POST /api/admin/sessions

use axum::extract::State;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::database::AcademicSession;
use crate::error::ApiError;
use crate::gate::ParsedJson;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSession {
    pub start_year: NaiveDate,
    pub end_year: NaiveDate,
}

/**
 * POST /api/admin/sessions - Create an academic session
 *
 * Expected Input:
 * ```json
 * { "start_year": "2024-09-01", "end_year": "2025-06-30" }
 * ```
 */
pub async fn sessions_post(
    State(state): State<AppState>,
    body: ParsedJson,
) -> ApiResult<AcademicSession> {
    let input: CreateSession = body.decode()?;
    if input.start_year >= input.end_year {
        return Err(ApiError::validation_error(
            "Session must start before it ends",
            None,
        ));
    }

    let (session, created) = state
        .store
        .get_or_create_session(input.start_year, input.end_year)
        .await?;
    if !created {
        return Err(ApiError::conflict(format!(
            "Session {} to {} already exists",
            session.start_year, session.end_year
        )));
    }

    Ok(ApiResponse::created(session))
}
