pub mod throttle;

pub use throttle::LoginThrottle;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::database::User;
use crate::types::{Principal, Role};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    /// Role code as stored in `users.user_type`
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn for_user(user: &User, ttl_secs: u64) -> Self {
        let now = Utc::now();
        Self {
            sub: user.id,
            email: user.email.clone(),
            role: user.user_type.clone(),
            exp: (now + Duration::seconds(ttl_secs as i64)).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// `None` when the role code is unknown.
    pub fn principal(&self) -> Option<Principal> {
        let role = Role::from_code(&self.role)?;
        Some(Principal::authenticated(self.sub, self.email.clone(), role))
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Background task failed: {0}")]
    Task(String),
}

pub fn generate_jwt(user: &User, security: &SecurityConfig) -> Result<String, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let claims = Claims::for_user(user, security.session_timeout_secs);
    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

pub fn decode_jwt(token: &str, security: &SecurityConfig) -> Result<Claims, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    Ok(bcrypt::hash(password, cost)?)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    Ok(bcrypt::verify(password, hash)?)
}

/// bcrypt is deliberately slow; keep it off the async workers.
pub async fn hash_password_blocking(password: String, cost: u32) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| AuthError::Task(e.to_string()))?
}

pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AuthError::Task(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::testing::TEST_BCRYPT_COST;

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            email: "staff@college.com".to_string(),
            first_name: "John".to_string(),
            last_name: "Teacher".to_string(),
            user_type: role.code().to_string(),
            gender: "M".to_string(),
            address: "123 Faculty Street".to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn token_round_trips_to_principal() {
        let security = AppConfig::development().security;
        let user = user(Role::Staff);

        let token = generate_jwt(&user, &security).unwrap();
        let principal = decode_jwt(&token, &security).unwrap().principal().unwrap();

        assert_eq!(principal.id, Some(user.id));
        assert_eq!(principal.role, Some(Role::Staff));
        assert!(principal.authenticated);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let security = AppConfig::development().security;
        let mut other = security.clone();
        other.jwt_secret = "another-secret".to_string();

        let token = generate_jwt(&user(Role::Admin), &other).unwrap();
        assert!(matches!(decode_jwt(&token, &security), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn empty_secret_refuses_to_sign() {
        let security = AppConfig::production().security;
        assert!(matches!(generate_jwt(&user(Role::Admin), &security), Err(AuthError::InvalidSecret)));
    }

    #[test]
    fn unknown_role_code_yields_no_principal() {
        let mut claims = Claims::for_user(&user(Role::Admin), 60);
        claims.role = "9".to_string();
        assert!(claims.principal().is_none());
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("staff123", TEST_BCRYPT_COST).unwrap();
        assert!(verify_password("staff123", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }
}
