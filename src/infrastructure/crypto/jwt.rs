//! JWT handling for the admin session.
//!
//! Access and refresh tokens share the claim layout but are signed with
//! different secrets and carry a `kind`, so one can never stand in for the
//! other.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ISSUER: &str = "salon-booking";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Signing parameters for one token kind
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl: Duration,
    pub issuer: String,
    pub kind: TokenKind,
}

impl JwtConfig {
    pub fn access(secret: impl Into<String>, minutes: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::minutes(minutes),
            issuer: ISSUER.to_string(),
            kind: TokenKind::Access,
        }
    }

    pub fn refresh(secret: impl Into<String>, days: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::days(days),
            issuer: ISSUER.to_string(),
            kind: TokenKind::Refresh,
        }
    }
}

/// Claims carried by admin tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AdminClaims {
    /// Admin email
    pub sub: String,
    pub email: String,
    pub admin: bool,
    pub kind: TokenKind,
    /// Unique per token so two tokens minted in the same second differ
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
}

impl AdminClaims {
    pub fn new(email: &str, config: &JwtConfig) -> Self {
        let now = Utc::now();
        Self {
            sub: email.to_string(),
            email: email.to_string(),
            admin: true,
            kind: config.kind,
            jti: Uuid::new_v4().to_string(),
            exp: (now + config.ttl).timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }

    pub fn expires_in_secs(&self) -> i64 {
        (self.exp - Utc::now().timestamp()).max(0)
    }
}

pub fn create_token(
    email: &str,
    config: &JwtConfig,
) -> Result<(String, AdminClaims), jsonwebtoken::errors::Error> {
    let claims = AdminClaims::new(email, config);
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;
    Ok((token, claims))
}

/// Verify signature, expiry and issuer, then check the token kind.
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<AdminClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);
    validation.leeway = 0;

    let claims = decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?
    .claims;

    if claims.kind != config.kind {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
    }
    Ok(claims)
}
