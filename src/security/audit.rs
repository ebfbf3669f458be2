use std::fmt;

use crate::types::Principal;

/// Security events recorded for auditing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityEvent {
    UnauthenticatedAccess,
    UnauthorizedAccess,
    LoginFailed,
    LoginLockedOut,
    InsecureTransport,
}

impl SecurityEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityEvent::UnauthenticatedAccess => "UNAUTHENTICATED_ACCESS",
            SecurityEvent::UnauthorizedAccess => "UNAUTHORIZED_ACCESS",
            SecurityEvent::LoginFailed => "LOGIN_FAILED",
            SecurityEvent::LoginLockedOut => "LOGIN_LOCKED_OUT",
            SecurityEvent::InsecureTransport => "INSECURE_TRANSPORT",
        }
    }
}

impl fmt::Display for SecurityEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emits a security audit record under the `security` target.
///
/// Goes through `tracing` only; there is nothing here that can fail the
/// request being processed.
pub fn log_security_event(event: SecurityEvent, principal: &Principal, details: Option<&str>) {
    log_security_event_for(event, principal.identity(), details);
}

/// Same as [`log_security_event`] for callers that only know an identity string
/// (failed logins have no principal yet).
pub fn log_security_event_for(event: SecurityEvent, identity: &str, details: Option<&str>) {
    tracing::warn!(
        target: "security",
        event = event.as_str(),
        user = identity,
        details = details.unwrap_or(""),
        "Security Event: {} - User: {} - Details: {}",
        event,
        identity,
        details.unwrap_or("none")
    );
}
