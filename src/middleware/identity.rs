use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{decode_jwt, AuthError};
use crate::state::AppState;
use crate::types::Principal;

/// Resolves the bearer token into a [`Principal`] request extension.
///
/// Never rejects: a missing, expired or malformed token yields the anonymous
/// principal and the access gate decides what that means for the route.
pub async fn identity_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    let principal = match resolve_principal(&headers, &state) {
        Ok(principal) => principal,
        Err(AuthError::MissingToken) => Principal::anonymous(),
        Err(err) => {
            tracing::debug!("Treating request as anonymous: {}", err);
            Principal::anonymous()
        }
    };

    request.extensions_mut().insert(principal);
    next.run(request).await
}

fn resolve_principal(headers: &HeaderMap, state: &AppState) -> Result<Principal, AuthError> {
    let token = extract_bearer_token(headers)?;
    let claims = decode_jwt(&token, &state.config.security)?;
    claims
        .principal()
        .ok_or_else(|| AuthError::InvalidToken(format!("unknown role code '{}'", claims.role)))
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid Authorization header format".to_string()))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        Some(_) => Err(AuthError::InvalidToken("Empty bearer token".to_string())),
        None => Err(AuthError::InvalidToken(
            "Authorization header must use Bearer token format".to_string(),
        )),
    }
}

/// Handlers can take the current principal directly; requests that bypassed
/// the identity middleware are anonymous.
#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Principal>().cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn missing_and_malformed_headers() {
        assert!(matches!(extract_bearer_token(&HeaderMap::new()), Err(AuthError::MissingToken)));
        assert!(matches!(extract_bearer_token(&headers("Basic xyz")), Err(AuthError::InvalidToken(_))));
        assert!(matches!(extract_bearer_token(&headers("Bearer   ")), Err(AuthError::InvalidToken(_))));
    }
}
