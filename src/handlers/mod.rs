// handlers/mod.rs - handler tiers
//
// public    → no authentication (/, /health, /auth/login)
// protected → any authenticated role, behind the access gate (/api/*)
// admin     → Admin role only, behind the access gate (/api/admin/*)

pub mod admin;
pub mod protected;
pub mod public;

use axum::http::Method;

use crate::error::ApiError;

/// Fallback for methods a route does not serve, in the same shape the gate
/// uses for its own 405s.
pub async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::method_not_allowed(format!("Method {} not allowed", method))
}
