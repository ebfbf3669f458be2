use std::sync::Arc;

use axum::{
    async_trait,
    body::{Body, Bytes},
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{evaluate, precheck, AccessDecision, GatePolicy, GateRequest};
use crate::error::ApiError;
use crate::security::sanitize_fields;
use crate::types::Principal;

/// A gate policy bound to the body size limit used when buffering requests.
#[derive(Debug, Clone)]
pub struct AccessGate {
    policy: GatePolicy,
    max_body_bytes: usize,
}

impl AccessGate {
    pub fn new(policy: GatePolicy, max_body_bytes: usize) -> Self {
        Self {
            policy,
            max_body_bytes,
        }
    }

    pub fn evaluate(&self, request: &GateRequest, principal: &Principal) -> AccessDecision {
        evaluate(request, principal, &self.policy)
    }
}

/// JSON body parsed by the gate, available to handlers behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedJson(pub Value);

impl ParsedJson {
    pub fn sanitize_fields(mut self, fields: &[&str]) -> Self {
        sanitize_fields(&mut self.0, fields);
        self
    }

    pub fn decode<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(self.0)
            .map_err(|e| ApiError::bad_request(format!("Invalid request data: {}", e)))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ParsedJson
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ParsedJson>()
            .cloned()
            .ok_or_else(|| ApiError::unsupported_media_type("Expected an application/json request body"))
    }
}

/// Runs the gate for one request. The inner handler is only called when every
/// stage passed; the buffered body is handed back to it unchanged.
pub async fn gate_middleware(
    State(gate): State<Arc<AccessGate>>,
    request: Request,
    next: Next,
) -> Response {
    let principal = request
        .extensions()
        .get::<Principal>()
        .cloned()
        .unwrap_or_default();

    let (parts, body) = request.into_parts();
    let mut gate_request = GateRequest {
        method: parts.method.clone(),
        path: parts.uri.path().to_string(),
        headers: parts.headers.clone(),
        body: Bytes::new(),
    };

    match axum::body::to_bytes(body, gate.max_body_bytes).await {
        Ok(bytes) => gate_request.body = bytes,
        Err(err) => {
            if let Err(api_error) = precheck(&gate_request, &principal, &gate.policy).into_result() {
                return api_error.into_response();
            }
            tracing::debug!("Failed to buffer request body for {}: {}", gate_request.path, err);
            return ApiError::payload_too_large("Request body too large").into_response();
        }
    }

    let parsed_json = match gate.evaluate(&gate_request, &principal).into_result() {
        Ok(parsed_json) => parsed_json,
        Err(api_error) => return api_error.into_response(),
    };

    let mut request = Request::from_parts(parts, Body::from(gate_request.body));
    if let Some(value) = parsed_json {
        request.extensions_mut().insert(ParsedJson(value));
    }

    next.run(request).await
}
