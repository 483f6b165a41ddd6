use crate::error::NaviconomyError;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);
const INVALID_TOKEN: &str = "Invalid or expired token.";

/// Time source for token timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Claims embedded in an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub iat: i64,
    pub exp: i64,
    /// Any further claims embedded by the issuer, returned as-is on verify.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A verified token: its subject and the full claim set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenData {
    pub subject: String,
    pub claims: Claims,
}

/// Issues and verifies HMAC-signed access tokens.
#[derive(Clone)]
pub struct TokenService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(secret: &str, algorithm: Algorithm, ttl: Duration) -> Self {
        Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `subject` valid for the configured TTL.
    pub fn issue(&self, subject: &str) -> Result<String, NaviconomyError> {
        self.issue_with_ttl(subject, self.ttl)
    }

    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String, NaviconomyError> {
        self.issue_claims(subject, Map::new(), ttl)
    }

    /// Issue a token carrying `extra` claims alongside `sub`, `iat` and `exp`.
    ///
    /// Keys named `sub`, `iat` or `exp` in `extra` are ignored.
    pub fn issue_claims(
        &self,
        subject: &str,
        mut extra: Map<String, Value>,
        ttl: Duration,
    ) -> Result<String, NaviconomyError> {
        for reserved in ["sub", "iat", "exp"] {
            extra.remove(reserved);
        }
        let now = self.clock.now().timestamp();
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: Some(subject.to_string()),
            iat: now,
            exp: now.saturating_add(ttl_secs),
            extra,
        };
        encode(&Header::new(self.algorithm), &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign token");
            NaviconomyError::service_unavailable()
        })
    }

    /// Verify signature, expiry (against the injected clock) and subject.
    pub fn verify(&self, token: &str) -> Result<TokenData, NaviconomyError> {
        let mut validation = Validation::new(self.algorithm);
        // expiry is checked below against the injected clock, without leeway
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                debug!(error = %e, "token rejected");
                invalid_token()
            })?
            .claims;

        if claims.exp <= self.clock.now().timestamp() {
            debug!(exp = claims.exp, "token expired");
            return Err(invalid_token());
        }

        let subject = claims
            .sub
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(invalid_token)?;
        Ok(TokenData { subject, claims })
    }
}

fn invalid_token() -> NaviconomyError {
    NaviconomyError::InvalidToken(INVALID_TOKEN.to_string())
}
