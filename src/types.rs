/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// College roles. The wire codes match the stored `user_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    Student,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Staff, Role::Student];

    pub fn code(&self) -> &'static str {
        match self {
            Role::Admin => "1",
            Role::Staff => "2",
            Role::Student => "3",
        }
    }

    pub fn from_code(code: &str) -> Option<Role> {
        match code {
            "1" => Some(Role::Admin),
            "2" => Some(Role::Staff),
            "3" => Some(Role::Student),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Staff => write!(f, "staff"),
            Role::Student => write!(f, "student"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    /// Accepts either the role name or its numeric code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(role) = Role::from_code(s.trim()) {
            return Ok(role);
        }
        match s.trim().to_lowercase().as_str() {
            "admin" | "hod" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            "student" => Ok(Role::Student),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// The actor behind a request. Anonymous principals carry no id and no role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub id: Option<Uuid>,
    pub email: String,
    pub role: Option<Role>,
    pub authenticated: bool,
}

impl Principal {
    pub fn anonymous() -> Self {
        Self {
            id: None,
            email: String::new(),
            role: None,
            authenticated: false,
        }
    }

    pub fn authenticated(id: Uuid, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: Some(id),
            email: email.into(),
            role: Some(role),
            authenticated: true,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.authenticated && self.role == Some(role)
    }

    /// Identity string used in audit records.
    pub fn identity(&self) -> &str {
        if self.authenticated {
            &self.email
        } else {
            "anonymous"
        }
    }
}

impl Default for Principal {
    fn default() -> Self {
        Self::anonymous()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_codes_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::from_code(role.code()), Some(role));
        }
        assert_eq!(Role::from_code("4"), None);
    }

    #[test]
    fn role_parses_names_and_codes() {
        assert_eq!("Staff".parse::<Role>().unwrap(), Role::Staff);
        assert_eq!("3".parse::<Role>().unwrap(), Role::Student);
        assert!("teacher".parse::<Role>().is_err());
    }

    #[test]
    fn anonymous_identity() {
        let principal = Principal::anonymous();
        assert_eq!(principal.identity(), "anonymous");
        assert!(!principal.has_role(Role::Admin));
    }
}
