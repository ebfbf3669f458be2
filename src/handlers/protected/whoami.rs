// handlers/protected/whoami.rs - GET /api/whoami handler

use axum::extract::State;

use crate::database::{DatabaseError, User};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::security::check_user_permissions;
use crate::state::AppState;
use crate::types::Principal;

/// Returns the user behind the bearer token. A token for a deleted user is
/// treated like an invalid token.
pub async fn whoami_get(State(state): State<AppState>, principal: Principal) -> ApiResult<User> {
    check_user_permissions(&principal, None)?;

    let id = principal
        .id
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    match state.store.get_user(id).await {
        Ok(user) => Ok(ApiResponse::success(user)),
        Err(DatabaseError::NotFound(_)) => Err(ApiError::unauthorized("Authentication required")),
        Err(e) => Err(e.into()),
    }
}
