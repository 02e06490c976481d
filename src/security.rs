//! Password hashing and JWT issuance/validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::User;

/// Token lifetime in minutes.
const TOKEN_TTL_MINUTES: i64 = 60;

/// JWT claims carried by issued tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i32,
    /// Role label (ADMIN, TECNICO, CLIENTE).
    pub role: String,
    pub exp: usize,
}

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, hash)
}

/// Issues a signed token for a logged-in user, valid for one hour.
pub fn issue_token(user: &User, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let expires_at = Utc::now() + Duration::minutes(TOKEN_TTL_MINUTES);
    let claims = Claims {
        sub: user.id,
        role: user.role.as_str().to_string(),
        exp: expires_at.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decodes and validates a token, returning its claims.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn sample_user() -> User {
        User {
            id: 42,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: String::new(),
            role: Role::Tecnico,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn password_round_trip() {
        let hash = hash_password("hunter22").unwrap();
        assert_ne!(hash, "hunter22");
        assert!(verify_password("hunter22", &hash).unwrap());
        assert!(!verify_password("hunter23", &hash).unwrap());
    }

    #[test]
    fn token_round_trip_carries_id_and_role() {
        let token = issue_token(&sample_user(), "test-secret").unwrap();
        let claims = decode_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "TECNICO");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = issue_token(&sample_user(), "test-secret").unwrap();
        assert!(decode_token(&token, "another-secret").is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(decode_token("not.a.token", "test-secret").is_err());
    }
}
