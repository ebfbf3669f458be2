// Security helpers shared by the gate and the handlers.

pub mod audit;
pub mod sanitize;
pub mod upload;

pub use audit::{log_security_event, log_security_event_for, SecurityEvent};
pub use sanitize::{sanitize, sanitize_fields, DENYLIST};
pub use upload::{validate_upload, FileMeta, UploadError};

use thiserror::Error;

use crate::types::{Principal, Role};

/// Raised by [`check_user_permissions`]; surfaces as 403 through the API.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct PermissionDenied(pub String);

/// Direct permission check for code paths that do not run behind the gate.
pub fn check_user_permissions(
    principal: &Principal,
    required_role: Option<Role>,
) -> Result<(), PermissionDenied> {
    if !principal.authenticated {
        return Err(PermissionDenied("Authentication required".to_string()));
    }

    if let Some(required) = required_role {
        if !principal.has_role(required) {
            log_security_event(
                SecurityEvent::UnauthorizedAccess,
                principal,
                Some(&format!("Required role: {}", required.code())),
            );
            return Err(PermissionDenied("Insufficient permissions".to_string()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn anonymous_is_denied() {
        let err = check_user_permissions(&Principal::anonymous(), None).unwrap_err();
        assert_eq!(err.0, "Authentication required");
    }

    #[test]
    fn role_mismatch_is_denied() {
        let staff = Principal::authenticated(Uuid::new_v4(), "staff@college.com", Role::Staff);
        let err = check_user_permissions(&staff, Some(Role::Admin)).unwrap_err();
        assert_eq!(err.0, "Insufficient permissions");
    }

    #[test]
    fn matching_or_absent_role_passes() {
        let staff = Principal::authenticated(Uuid::new_v4(), "staff@college.com", Role::Staff);
        assert!(check_user_permissions(&staff, Some(Role::Staff)).is_ok());
        assert!(check_user_permissions(&staff, None).is_ok());
    }
}
