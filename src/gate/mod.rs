//! Access gate applied in front of every mutating endpoint.
//!
//! Checks run in a fixed order and the first failure is final:
//!
//! 1. HTTP method against the policy's allow-list (405)
//! 2. authentication (401)
//! 3. role membership when the policy names roles (403)
//! 4. JSON body parsing when the policy asks for it and the request declares
//!    `application/json` (400)
//!
//! [`evaluate`] is a pure function of request, principal and policy apart
//! from audit logging of 401/403 denials. [`layer::gate_middleware`] adapts
//! it to axum.

pub mod layer;
pub mod policy;
pub mod stages;

pub use layer::{gate_middleware, AccessGate, ParsedJson};
pub use policy::GatePolicy;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use serde_json::Value;

use crate::error::ApiError;
use crate::security::{log_security_event, SecurityEvent};
use crate::types::Principal;
use stages::{GateContext, HEADER_STAGES, PIPELINE};

/// The parts of an inbound request the gate looks at.
#[derive(Debug, Clone)]
pub struct GateRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl GateRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_content_type(mut self, content_type: &'static str) -> Self {
        self.headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Media type of the `Content-Type` header, lowercased, parameters dropped.
    pub fn declared_content_type(&self) -> Option<String> {
        let raw = self.headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
        let media_type = raw.split(';').next().unwrap_or_default().trim();
        if media_type.is_empty() {
            None
        } else {
            Some(media_type.to_ascii_lowercase())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    MethodNotAllowed,
    Unauthorized,
    Forbidden,
    BadRequest,
}

impl FailureKind {
    pub fn status_code(&self) -> StatusCode {
        match self {
            FailureKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            FailureKind::Unauthorized => StatusCode::UNAUTHORIZED,
            FailureKind::Forbidden => StatusCode::FORBIDDEN,
            FailureKind::BadRequest => StatusCode::BAD_REQUEST,
        }
    }
}

/// Outcome of one gate evaluation. Never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessDecision {
    pub allowed: bool,
    pub failure_kind: Option<FailureKind>,
    pub message: Option<String>,
    pub parsed_json: Option<Value>,
}

impl AccessDecision {
    pub fn allow(parsed_json: Option<Value>) -> Self {
        Self {
            allowed: true,
            failure_kind: None,
            message: None,
            parsed_json,
        }
    }

    pub fn deny(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            allowed: false,
            failure_kind: Some(kind),
            message: Some(message.into()),
            parsed_json: None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.failure_kind
            .map_or(StatusCode::OK, |kind| kind.status_code())
    }

    /// Parsed body on success, the matching API error on denial.
    pub fn into_result(self) -> Result<Option<Value>, ApiError> {
        let Some(kind) = self.failure_kind else {
            return Ok(self.parsed_json);
        };
        let message = self.message.unwrap_or_default();
        Err(match kind {
            FailureKind::MethodNotAllowed => ApiError::method_not_allowed(message),
            FailureKind::Unauthorized => ApiError::unauthorized(message),
            FailureKind::Forbidden => ApiError::forbidden(message),
            FailureKind::BadRequest => ApiError::invalid_json(message),
        })
    }
}

/// Runs every stage against the request.
pub fn evaluate(request: &GateRequest, principal: &Principal, policy: &GatePolicy) -> AccessDecision {
    let decision = stages::run(&PIPELINE, GateContext::new(request, principal, policy));
    audit(&decision, request, principal, policy);
    decision
}

/// Runs only the stages that do not need the body. Used when the body could
/// not be read, so an earlier failure still takes precedence.
pub fn precheck(request: &GateRequest, principal: &Principal, policy: &GatePolicy) -> AccessDecision {
    let decision = stages::run(&PIPELINE[..HEADER_STAGES], GateContext::new(request, principal, policy));
    audit(&decision, request, principal, policy);
    decision
}

fn audit(decision: &AccessDecision, request: &GateRequest, principal: &Principal, policy: &GatePolicy) {
    match decision.failure_kind {
        Some(FailureKind::Unauthorized) => log_security_event(
            SecurityEvent::UnauthenticatedAccess,
            principal,
            Some(&format!("{} {}", request.method, request.path)),
        ),
        Some(FailureKind::Forbidden) => {
            let mut roles: Vec<&str> = policy.required_roles.iter().map(|role| role.code()).collect();
            roles.sort_unstable();
            log_security_event(
                SecurityEvent::UnauthorizedAccess,
                principal,
                Some(&format!(
                    "{} {} requires role in [{}]",
                    request.method,
                    request.path,
                    roles.join(", ")
                )),
            );
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{json_request, principal};
    use crate::types::Role;
    use serde_json::json;

    fn admin_json_policy() -> GatePolicy {
        GatePolicy::validate_json().with_roles([Role::Admin])
    }

    #[test]
    fn method_is_checked_before_authentication() {
        let request = GateRequest::new(Method::GET, "/api/admin/courses");
        let decision = evaluate(&request, &Principal::anonymous(), &admin_json_policy());

        assert!(!decision.allowed);
        assert_eq!(decision.failure_kind, Some(FailureKind::MethodNotAllowed));
        assert_eq!(decision.message.as_deref(), Some("Method GET not allowed"));
        assert_eq!(decision.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn unauthenticated_fails_regardless_of_roles() {
        let request = json_request(Method::POST, "not valid json");
        for policy in [GatePolicy::default(), admin_json_policy()] {
            let decision = evaluate(&request, &Principal::anonymous(), &policy);
            assert_eq!(decision.failure_kind, Some(FailureKind::Unauthorized));
            assert_eq!(decision.message.as_deref(), Some("Authentication required"));
        }
    }

    #[test]
    fn role_outside_required_set_is_forbidden() {
        let request = json_request(Method::POST, "not valid json");
        for role in [Role::Staff, Role::Student] {
            let decision = evaluate(&request, &principal(role), &admin_json_policy());
            assert_eq!(decision.failure_kind, Some(FailureKind::Forbidden));
            assert_eq!(decision.message.as_deref(), Some("Insufficient permissions"));
        }
    }

    #[test]
    fn empty_role_set_admits_every_role() {
        let request = GateRequest::new(Method::POST, "/api/uploads/validate");
        for role in Role::ALL {
            let decision = evaluate(&request, &principal(role), &GatePolicy::default());
            assert!(decision.allowed, "{role} should pass");
        }
    }

    #[test]
    fn invalid_json_is_bad_request() {
        let request = json_request(Method::POST, "not valid json");
        let decision = evaluate(&request, &principal(Role::Admin), &admin_json_policy());

        assert_eq!(decision.failure_kind, Some(FailureKind::BadRequest));
        assert_eq!(decision.message.as_deref(), Some("Invalid JSON data"));
        assert_eq!(decision.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn empty_json_body_is_bad_request() {
        let request = json_request(Method::POST, "");
        let decision = evaluate(&request, &principal(Role::Admin), &admin_json_policy());
        assert_eq!(decision.failure_kind, Some(FailureKind::BadRequest));
    }

    #[test]
    fn valid_json_is_attached() {
        let request = json_request(Method::POST, r#"{"name": "Mathematics"}"#);
        let decision = evaluate(&request, &principal(Role::Admin), &admin_json_policy());

        assert!(decision.allowed);
        assert_eq!(decision.parsed_json, Some(json!({"name": "Mathematics"})));
    }

    #[test]
    fn content_type_parameters_are_ignored() {
        let request = GateRequest::new(Method::POST, "/")
            .with_content_type("Application/JSON; charset=utf-8")
            .with_body("{}");
        assert_eq!(request.declared_content_type().as_deref(), Some("application/json"));

        let decision = evaluate(&request, &principal(Role::Admin), &admin_json_policy());
        assert_eq!(decision.parsed_json, Some(json!({})));
    }

    #[test]
    fn non_json_content_type_skips_parsing() {
        let request = GateRequest::new(Method::POST, "/")
            .with_content_type("application/x-www-form-urlencoded")
            .with_body("name=Mathematics");
        let decision = evaluate(&request, &principal(Role::Admin), &admin_json_policy());

        assert!(decision.allowed);
        assert_eq!(decision.parsed_json, None);
    }

    #[test]
    fn json_is_not_parsed_unless_required() {
        let request = json_request(Method::POST, "not valid json");
        let decision = evaluate(&request, &principal(Role::Staff), &GatePolicy::default());
        assert!(decision.allowed);
        assert_eq!(decision.parsed_json, None);
    }

    #[test]
    fn precheck_ignores_body() {
        let request = json_request(Method::POST, "not valid json");
        let decision = precheck(&request, &principal(Role::Admin), &admin_json_policy());
        assert!(decision.allowed);
    }

    #[test]
    fn denial_maps_to_api_error() {
        let err = AccessDecision::deny(FailureKind::Forbidden, "Insufficient permissions")
            .into_result()
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            err.to_json(),
            json!({"status": "error", "message": "Insufficient permissions"})
        );
    }
}
