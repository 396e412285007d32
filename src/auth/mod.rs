use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only algorithm tokens are signed or accepted with
pub const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(id: i64, email: impl Into<String>, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            id,
            email: email.into(),
            exp,
            iat: now.timestamp(),
        }
    }
}

/// Identity asserted by a verified bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            email: claims.email,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Unauthorized: No token provided")]
    MissingToken,

    #[error("Unauthorized: Invalid token")]
    InvalidToken(Option<jsonwebtoken::errors::Error>),

    #[error("JWT generation error: {0}")]
    Issue(#[from] jsonwebtoken::errors::Error),
}

/// Signing and verification keys derived from the process-wide secret
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_hours: u64,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys")
            .field("algorithm", &JWT_ALGORITHM)
            .field("expiry_hours", &self.expiry_hours)
            .finish_non_exhaustive()
    }
}

impl JwtKeys {
    pub fn new(secret: &str, expiry_hours: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        }
    }

    /// Mint a token for the given identity using the configured lifetime
    pub fn issue(&self, id: i64, email: &str) -> Result<String, AuthError> {
        self.issue_claims(&Claims::new(id, email, self.expiry_hours))
    }

    pub fn issue_claims(&self, claims: &Claims) -> Result<String, AuthError> {
        Ok(encode(&Header::new(JWT_ALGORITHM), claims, &self.encoding)?)
    }

    /// Verify signature, algorithm and expiry, then decode the identity
    pub fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::InvalidToken(None));
        }

        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| AuthError::InvalidToken(Some(e)))?;

        Ok(data.claims.into())
    }
}
