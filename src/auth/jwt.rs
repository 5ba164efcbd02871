use std::time::Duration;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use super::claims::Claims;
use crate::config::JwtConfig;

/// Lifetime applied when a caller does not supply one.
pub const DEFAULT_TTL: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    #[error("token expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),

    #[error("token lifetime of {0:?} is out of range")]
    TtlOutOfRange(Duration),
}

/// Signing and verification keys, built once from the configured secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    pub access_ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &[u8], access_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            access_ttl,
        }
    }

    pub fn from_config(cfg: &JwtConfig) -> Self {
        // an unrepresentable lifetime surfaces later as TtlOutOfRange from `issue`
        let secs = u64::try_from(cfg.ttl_minutes)
            .unwrap_or(0)
            .checked_mul(60)
            .unwrap_or(u64::MAX);
        Self::new(cfg.secret.as_bytes(), Duration::from_secs(secs))
    }

    /// Signs a token for `subject`, expiring `ttl` from now (15 minutes if `None`).
    pub fn issue(&self, subject: &str, ttl: Option<Duration>) -> Result<String, TokenError> {
        self.issue_at(subject, ttl, OffsetDateTime::now_utc())
    }

    pub fn issue_at(
        &self,
        subject: &str,
        ttl: Option<Duration>,
        now: OffsetDateTime,
    ) -> Result<String, TokenError> {
        let ttl = ttl.unwrap_or(DEFAULT_TTL);
        let exp = i64::try_from(ttl.as_secs())
            .ok()
            .and_then(|secs| now.checked_add(TimeDuration::seconds(secs)))
            .ok_or(TokenError::TtlOutOfRange(ttl))?;
        let claims = Claims {
            sub: subject.to_owned(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token =
            encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Sign)?;
        debug!(subject, exp = claims.exp, "jwt signed");
        Ok(token)
    }

    /// Returns the subject of a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        self.verify_at(token, OffsetDateTime::now_utc())
    }

    /// Expiry is checked against `now` with zero leeway: a token is dead at `exp`.
    pub fn verify_at(&self, token: &str, now: OffsetDateTime) -> Result<String, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        if data.claims.exp as i64 <= now.unix_timestamp() {
            debug!(subject = %data.claims.sub, "jwt expired");
            return Err(TokenError::Expired);
        }
        debug!(subject = %data.claims.sub, "jwt verified");
        Ok(data.claims.sub)
    }
}
