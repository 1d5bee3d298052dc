use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

/// How long an issued token stays valid.
pub const TOKEN_TTL_DAYS: i64 = 30;

/// Hashes a password for storage using Argon2id with a fresh random salt.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| anyhow::anyhow!("password hashing failed: {err}"))?;
    Ok(hash.to_string())
}

/// Checks a password against a stored hash. An unparseable hash counts as a
/// mismatch rather than an error; the caller only needs yes or no.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Bearer-token claims: the owning user id and the expiry timestamp.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// The signing and verification keys for bearer tokens, both derived from
/// one shared secret.
#[derive(Clone)]
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl AuthKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issues a token for a user, valid for [`TOKEN_TTL_DAYS`]
    ///
    /// ### Arguments
    ///
    /// * `user_id` - The id embedded as the token subject
    ///
    /// ### Returns
    ///
    /// The encoded JWT
    pub fn issue_token(&self, user_id: &str) -> anyhow::Result<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (Utc::now() + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Validates a token and returns the user id it was issued for.
    pub fn verify_token(&self, token: &str) -> Result<String, ApiError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| ApiError::Unauthorized("Could not validate credentials".to_string()))?;
        Ok(data.claims.sub)
    }
}

/// Extractor for the authenticated user behind the bearer token.
///
/// Handlers that take an `AuthUser` argument reject unauthenticated
/// requests with 401 before their body runs.
#[derive(Debug)]
pub struct AuthUser {
    pub user_id: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AuthKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

        let keys = AuthKeys::from_ref(state);
        let user_id = keys.verify_token(token)?;
        Ok(AuthUser { user_id })
    }
}
