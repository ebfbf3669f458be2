use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::{Principal, Role};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: String,
    pub gender: String,
    pub address: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Option<Role> {
        Role::from_code(&self.user_type)
    }

    /// `None` when the stored user_type is not a known role code.
    pub fn principal(&self) -> Option<Principal> {
        self.role()
            .map(|role| Principal::authenticated(self.id, self.email.clone(), role))
    }
}

/// Input for creating a user together with its role profile.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub gender: String,
    pub address: String,
    pub password_hash: String,
}
