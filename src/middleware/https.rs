use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::security::{log_security_event_for, SecurityEvent};

/// Rejects plain-HTTP requests. Behind a proxy the scheme comes from
/// `X-Forwarded-Proto`.
pub async fn require_https_middleware(request: Request, next: Next) -> Response {
    if !is_https(&request) {
        log_security_event_for(
            SecurityEvent::InsecureTransport,
            "anonymous",
            Some(&format!("{} {}", request.method(), request.uri().path())),
        );
        return ApiError::forbidden("HTTPS required").into_response();
    }

    next.run(request).await
}

fn is_https(request: &Request) -> bool {
    if request.uri().scheme_str() == Some("https") {
        return true;
    }

    request
        .headers()
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .map_or(false, |proto| proto.trim().eq_ignore_ascii_case("https"))
}
