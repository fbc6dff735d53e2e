//! Bearer-token authentication.
//!
//! Tokens are issued by the identity provider: HS256 JWTs whose `id` claim is
//! the user id. The user record is looked up on every request so role changes
//! and deletions take effect immediately.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use super::AppState;
use crate::domain::aggregates::Principal;
use crate::StorefrontError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: &str, ttl: chrono::Duration) -> Self {
        let now = chrono::Utc::now();
        Self { id: user_id.to_string(), exp: (now + ttl).timestamp(), iat: now.timestamp() }
    }
}

pub fn create_token(secret: &[u8], user_id: &str, ttl: chrono::Duration) -> Result<String, jsonwebtoken::errors::Error> {
    encode(&Header::default(), &Claims::new(user_id, ttl), &EncodingKey::from_secret(secret))
}

pub fn decode_token(secret: &[u8], token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let validation = Validation::default();
    Ok(decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)?.claims)
}

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = StorefrontError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(StorefrontError::Unauthorized("Not authorized, no token"))?;

        let claims = decode_token(&state.jwt_secret, token).map_err(|e| {
            debug!(error = %e, "rejected bearer token");
            StorefrontError::Unauthorized("Not authorized")
        })?;

        match state.users.get(&claims.id).await {
            Ok(user) => Ok(AuthUser(Principal::from(&user))),
            Err(StorefrontError::NotFound(_)) => Err(StorefrontError::Unauthorized("User not found")),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let token = create_token(b"secret", "u1", chrono::Duration::hours(1)).unwrap();
        assert_eq!(decode_token(b"secret", &token).unwrap().id, "u1");
        assert!(decode_token(b"other", &token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = create_token(b"secret", "u1", chrono::Duration::hours(-2)).unwrap();
        assert!(decode_token(b"secret", &token).is_err());
    }
}
