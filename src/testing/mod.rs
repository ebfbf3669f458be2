// Helpers shared by unit tests.

use axum::http::Method;
use uuid::Uuid;

use crate::database::NewUser;
use crate::gate::GateRequest;
use crate::types::{Principal, Role};

/// Lowest cost bcrypt accepts; keeps hashing in tests fast.
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn principal(role: Role) -> Principal {
    Principal::authenticated(Uuid::new_v4(), format!("{}@college.com", role), role)
}

pub fn json_request(method: Method, body: &'static str) -> GateRequest {
    GateRequest::new(method, "/test")
        .with_content_type("application/json")
        .with_body(body)
}

pub fn new_user(email: &str, role: Role, password: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        first_name: "Test".to_string(),
        last_name: role.to_string(),
        role,
        gender: "F".to_string(),
        address: "1 Test Lane".to_string(),
        password_hash: bcrypt::hash(password, TEST_BCRYPT_COST).expect("bcrypt hash"),
    }
}
