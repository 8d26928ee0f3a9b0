use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::{debug, error};
use uuid::Uuid;

use super::claims::{Claims, Session};
use crate::{config::JwtConfig, users::repo_types::Role};

/// Sessions expire this long after issuance.
pub const SESSION_TTL: Duration = Duration::hours(24);

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT secret is not configured")]
    SecretNotConfigured,
    #[error(transparent)]
    Token(#[from] jsonwebtoken::errors::Error),
}

#[derive(Clone)]
struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Holds JWT signing and verification keys with config data.
///
/// Built without a secret, every sign and verify call fails with
/// [`JwtError::SecretNotConfigured`].
#[derive(Clone)]
pub struct JwtKeys {
    keys: Option<SigningKeys>,
    issuer: String,
    audience: String,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        let keys = cfg
            .secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|secret| SigningKeys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            });
        Self {
            keys,
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.keys.is_some()
    }

    fn keys(&self) -> Result<&SigningKeys, JwtError> {
        self.keys.as_ref().ok_or_else(|| {
            error!("JWT secret is not configured; refusing to sign or verify");
            JwtError::SecretNotConfigured
        })
    }

    pub fn sign(&self, user_id: Uuid, role: Role) -> Result<String, JwtError> {
        let keys = self.keys()?;
        let now = OffsetDateTime::now_utc();
        let exp = now + SESSION_TTL;
        let claims = Claims {
            sub: user_id,
            role,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding)?;
        debug!(user_id = %user_id, role = %role, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let keys = self.keys()?;
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &keys.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, role = %data.claims.role, "jwt verified");
        Ok(data.claims)
    }

    pub fn validate_session(&self, token: &str) -> Result<Session, JwtError> {
        self.verify(token).map(Session::from)
    }
}
