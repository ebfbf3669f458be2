// Gate stages. Each stage sees the context produced by the previous one and
// either hands on a (possibly extended) context or stops with a decision.

use serde_json::Value;

use super::{AccessDecision, FailureKind, GatePolicy, GateRequest};
use crate::types::Principal;

#[derive(Debug, Clone)]
pub struct GateContext<'a> {
    pub request: &'a GateRequest,
    pub principal: &'a Principal,
    pub policy: &'a GatePolicy,
    pub parsed_json: Option<Value>,
}

impl<'a> GateContext<'a> {
    pub fn new(request: &'a GateRequest, principal: &'a Principal, policy: &'a GatePolicy) -> Self {
        Self {
            request,
            principal,
            policy,
            parsed_json: None,
        }
    }
}

#[derive(Debug)]
pub enum StageOutcome<'a> {
    Continue(GateContext<'a>),
    Halt(AccessDecision),
}

pub type Stage = for<'a> fn(GateContext<'a>) -> StageOutcome<'a>;

/// Stage order is the contract: the first failing stage decides.
pub const PIPELINE: [Stage; 4] = [check_method, check_authenticated, check_role, parse_json_body];

/// Stages that only need the request line and headers.
pub const HEADER_STAGES: usize = 3;

pub fn run<'a>(stages: &[Stage], context: GateContext<'a>) -> AccessDecision {
    let mut context = context;
    for stage in stages {
        match stage(context) {
            StageOutcome::Continue(next) => context = next,
            StageOutcome::Halt(decision) => return decision,
        }
    }
    AccessDecision::allow(context.parsed_json)
}

fn check_method(context: GateContext<'_>) -> StageOutcome<'_> {
    if context.policy.allows_method(&context.request.method) {
        StageOutcome::Continue(context)
    } else {
        StageOutcome::Halt(AccessDecision::deny(
            FailureKind::MethodNotAllowed,
            format!("Method {} not allowed", context.request.method),
        ))
    }
}

fn check_authenticated(context: GateContext<'_>) -> StageOutcome<'_> {
    if context.principal.authenticated {
        StageOutcome::Continue(context)
    } else {
        StageOutcome::Halt(AccessDecision::deny(
            FailureKind::Unauthorized,
            "Authentication required",
        ))
    }
}

fn check_role(context: GateContext<'_>) -> StageOutcome<'_> {
    if context.policy.allows_role(context.principal.role) {
        StageOutcome::Continue(context)
    } else {
        StageOutcome::Halt(AccessDecision::deny(
            FailureKind::Forbidden,
            "Insufficient permissions",
        ))
    }
}

fn parse_json_body(context: GateContext<'_>) -> StageOutcome<'_> {
    if !context.policy.require_json {
        return StageOutcome::Continue(context);
    }
    if context.request.declared_content_type().as_deref() != Some("application/json") {
        return StageOutcome::Continue(context);
    }

    match serde_json::from_slice::<Value>(&context.request.body) {
        Ok(value) => StageOutcome::Continue(GateContext {
            parsed_json: Some(value),
            ..context
        }),
        Err(err) => {
            tracing::debug!("Gate rejected malformed JSON body: {}", err);
            StageOutcome::Halt(AccessDecision::deny(FailureKind::BadRequest, "Invalid JSON data"))
        }
    }
}
