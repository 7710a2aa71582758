//! Bearer token authentication.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, Header, authorization::Bearer};
use chrono::{Duration, Utc};
use engine::User;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

/// Payload of the HS256 tokens handed out by register and login.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Identity attached to every authenticated request.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    expiry: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, expiry: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            expiry,
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, ServerError> {
        self.sign(user.id, &user.email)
    }

    fn sign(&self, user_id: Uuid, email: &str) -> Result<String, ServerError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.expiry).timestamp(),
        };
        jsonwebtoken::encode(&jsonwebtoken::Header::default(), &claims, &self.encoding).map_err(
            |err| {
                tracing::error!("failed to sign token: {err}");
                ServerError::Internal("failed to sign token".to_string())
            },
        )
    }

    pub fn verify(&self, token: &str) -> Result<AuthUser, ServerError> {
        let invalid = || ServerError::Unauthorized("Invalid or expired token".to_string());
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| {
                tracing::warn!("rejected token: {err}");
                invalid()
            })?;
        let id = Uuid::parse_str(&data.claims.sub).map_err(|_| invalid())?;
        Ok(AuthUser {
            id,
            email: data.claims.email,
        })
    }
}

pub(crate) async fn require_auth(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let headers = request.headers();
    if headers.get(AUTHORIZATION).is_none() {
        return Err(ServerError::Unauthorized(
            "Missing authorization header".to_string(),
        ));
    }
    let bearer = Authorization::<Bearer>::decode(&mut headers.get_all(AUTHORIZATION).iter())
        .map_err(|_| ServerError::Unauthorized("Invalid authorization format".to_string()))?;

    let user = state.keys.verify(bearer.token())?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_token_verifies() {
        let keys = JwtKeys::new("secret", Duration::minutes(5));
        let id = Uuid::new_v4();
        let token = keys.sign(id, "alice@example.com").unwrap();

        let auth = keys.verify(&token).unwrap();
        assert_eq!(auth.id, id);
        assert_eq!(auth.email, "alice@example.com");
    }

    #[test]
    fn foreign_and_expired_tokens_are_rejected() {
        let keys = JwtKeys::new("secret", Duration::minutes(5));
        let other = JwtKeys::new("another secret", Duration::minutes(5));
        let token = other.sign(Uuid::new_v4(), "alice@example.com").unwrap();
        assert!(keys.verify(&token).is_err());

        let expired = JwtKeys::new("secret", Duration::hours(-2));
        let token = expired.sign(Uuid::new_v4(), "alice@example.com").unwrap();
        assert!(keys.verify(&token).is_err());

        assert!(keys.verify("not-a-token").is_err());
    }
}
