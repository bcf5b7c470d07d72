use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use axum::{
    async_trait,
    extract::{FromRequestParts, Json},
    http::{StatusCode, request::Parts},
};
use serde_json::json;

use crate::domain::DomainError;
use crate::infrastructure::AppState;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

const TOKEN_LIFETIME_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub username: String,
    pub role: String,
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<i32, DomainError> {
        self.sub.parse().map_err(|_| DomainError::Unauthorized)
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn require_admin(&self) -> Result<(), DomainError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(DomainError::Forbidden)
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Claims {
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or((
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "unauthorized",
                    "message": "Missing Authorization header"
                })),
            ))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or((
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "unauthorized",
                "message": "Invalid Authorization header format"
            })),
        ))?;

        decode_jwt(&state.jwt_secret, token).map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "unauthorized",
                    "message": "Invalid or expired token"
                })),
            )
        })
    }
}

pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| e.to_string())?
        .to_string();
    Ok(password_hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, String> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| e.to_string())?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn create_jwt(
    secret: &str,
    user_id: i32,
    username: &str,
    role: &str,
) -> Result<String, String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(TOKEN_LIFETIME_HOURS))
        .ok_or_else(|| "token expiry out of range".to_string())?
        .timestamp();

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_owned(),
        role: role.to_owned(),
        exp: expiration as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| e.to_string())
}

pub fn decode_jwt(secret: &str, token: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jwt_round_trip_keeps_identity() {
        let token = create_jwt("kunci", 42, "budi", ROLE_USER).unwrap();
        let claims = decode_jwt("kunci", &token).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.username, "budi");
        assert!(!claims.is_admin());
        assert_eq!(claims.require_admin(), Err(DomainError::Forbidden));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = create_jwt("kunci", 1, "admin", ROLE_ADMIN).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(decode_jwt("kunci", &tampered).is_err());
    }

    #[test]
    fn token_from_another_key_is_rejected() {
        let token = create_jwt("kunci-lama", 1, "admin", ROLE_ADMIN).unwrap();
        assert!(decode_jwt("kunci-baru", &token).is_err());
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("rahasia123").unwrap();
        assert!(verify_password("rahasia123", &hash).unwrap());
        assert!(!verify_password("salah", &hash).unwrap());
    }
}
