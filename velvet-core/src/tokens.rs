use jsonwebtoken::{
    decode, encode, get_current_timestamp, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::PrimaryKey;

const TOKEN_LIFETIME_IN_DAYS: u64 = 7;

#[derive(Debug, Error)]
pub enum TokenError {
    /// The token is malformed, carries a bad signature, or expired
    #[error("Invalid token")]
    InvalidToken,
    #[error("SigningError: {0}")]
    SigningError(String),
}

/// The identity a verified token decodes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: PrimaryKey,
    pub admin: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    admin: bool,
    exp: u64,
}

/// Issues and verifies the signed session tokens used in place of
/// server-side sessions. Tokens cannot be enumerated or revoked, a
/// compromise is handled by rotating the secret, which invalidates every
/// outstanding session at once.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Produces a signed token for the given user, valid for seven days
    pub fn issue(&self, user_id: PrimaryKey, admin: bool) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id.to_string(),
            admin,
            exp: get_current_timestamp() + TOKEN_LIFETIME_IN_DAYS * 24 * 60 * 60,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| TokenError::SigningError(e.to_string()))
    }

    /// Verifies a token, returning the identity it was issued for
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| TokenError::InvalidToken)?;

        let user_id = data
            .claims
            .sub
            .parse()
            .map_err(|_| TokenError::InvalidToken)?;

        Ok(Identity {
            user_id,
            admin: data.claims.admin,
        })
    }
}
