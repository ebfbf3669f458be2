// handlers/public/login.rs - POST /auth/login handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::{generate_jwt, verify_password_blocking};
use crate::database::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::security::{log_security_event_for, SecurityEvent};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
    pub user: User,
}

/**
 * POST /auth/login - Exchange email and password for a bearer token
 *
 * Expected Input:
 * ```json
 * { "email": "staff@college.com", "password": "staff123" }
 * ```
 *
 * Unknown email and wrong password get the same 401. Repeated failures
 * lock the email out for `security.login_lockout_secs` (429).
 */
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(payload) = payload.map_err(|_| ApiError::invalid_json("Invalid JSON data"))?;
    let email = payload.email.trim().to_lowercase();

    if let Some(remaining) = state.throttle.locked_for(&email).await {
        log_security_event_for(
            SecurityEvent::LoginLockedOut,
            &email,
            Some(&format!("{}s of lockout remaining", remaining.as_secs())),
        );
        return Err(ApiError::too_many_requests("Too many login attempts"));
    }

    let user = state.store.find_user_by_email(&email).await?;
    let verified = match &user {
        Some(user) => verify_password_blocking(payload.password, user.password_hash.clone()).await?,
        None => false,
    };

    let user = match user {
        Some(user) if verified => user,
        _ => {
            let locked = state.throttle.record_failure(&email).await;
            log_security_event_for(
                SecurityEvent::LoginFailed,
                &email,
                Some(if locked { "invalid credentials, now locked" } else { "invalid credentials" }),
            );
            return Err(ApiError::unauthorized("Invalid email or password"));
        }
    };

    state.throttle.record_success(&email).await;
    let token = generate_jwt(&user, &state.config.security)?;
    tracing::info!("User {} logged in", user.email);

    Ok(ApiResponse::success(LoginResponse {
        token,
        expires_in: state.config.security.session_timeout_secs,
        user,
    }))
}
