// JWT access token generation and validation

use crate::auth::{error::AuthError, models::Role};
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default access token lifetime (60 minutes)
const ACCESS_TOKEN_SECONDS: i64 = 3600;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,   // user_id
    pub role: Role,
    pub exp: i64,    // expiration timestamp
    pub iat: i64,    // issued at timestamp
}

/// Token service for JWT operations
///
/// Real users receive tokens from the identity service; issuing here exists
/// for local development and tests.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    access_token_duration: i64,
}

impl TokenService {
    /// Create a new TokenService with secret key
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_duration: ACCESS_TOKEN_SECONDS,
        }
    }

    /// Generate an access token for a user and role
    pub fn generate_access_token(&self, user_id: Uuid, role: Role) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: user_id,
            role,
            iat: now,
            exp: now + self.access_token_duration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Validate an access token and return its claims
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })
    }
}
