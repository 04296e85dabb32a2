use std::time::Duration;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use anyhow::Context;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{claims::Claims, services::AuthService};
use crate::{
    config::JwtConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

/// A freshly signed token and the instant it stops being accepted.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs((cfg.ttl_minutes.max(0) as u64).saturating_mul(60)),
        }
    }

    pub fn sign(&self, username: &str) -> anyhow::Result<IssuedToken> {
        self.sign_at(username, OffsetDateTime::now_utc())
    }

    fn sign_at(&self, username: &str, now: OffsetDateTime) -> anyhow::Result<IssuedToken> {
        let ttl_secs = i64::try_from(self.ttl.as_secs()).context("token ttl out of range")?;
        let exp = now
            .checked_add(TimeDuration::seconds(ttl_secs))
            .context("token expiry out of range")?;
        let claims = Claims {
            sub: username.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.unix_timestamp().max(0) as usize,
            exp: exp.unix_timestamp().max(0) as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(username = %username, jti = %claims.jti, "jwt signed");
        Ok(IssuedToken {
            token,
            expires_at: exp,
        })
    }

    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AppError::Expired,
                _ => AppError::InvalidSignature,
            }
        })?;
        debug!(username = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

/// Extracts and validates the bearer token, yielding the username it was issued to.
pub struct AuthUser(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AuthService: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthService::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthenticated)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or(AppError::Unauthenticated)?;

        let claims = auth.verify(token.trim()).map_err(|e| {
            warn!(error = %e, "rejected bearer token");
            e
        })?;

        Ok(AuthUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str, issuer: &str, audience: &str) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_minutes: 60,
        })
    }

    #[test]
    fn sign_and_verify_token() {
        let keys = make_keys("dev-secret", "test-issuer", "test-aud");
        let issued = keys.sign("alice").expect("sign");
        let claims = keys.verify(&issued.token).expect("verify token");
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(issued.expires_at > OffsetDateTime::now_utc());
    }

    #[test]
    fn oversized_ttl_fails_to_sign_without_panicking() {
        let keys = JwtKeys::new(&JwtConfig {
            secret: "dev-secret".into(),
            issuer: "iss".into(),
            audience: "aud".into(),
            ttl_minutes: 10_000_000_000,
        });
        let err = keys.sign("u").unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn each_token_gets_a_fresh_jti() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let a = keys.verify(&keys.sign("bob").unwrap().token).unwrap();
        let b = keys.verify(&keys.sign("bob").unwrap().token).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let issued = keys
            .sign_at("carol", OffsetDateTime::now_utc() - TimeDuration::hours(2))
            .unwrap();
        assert!(matches!(keys.verify(&issued.token), Err(AppError::Expired)));
    }

    #[test]
    fn verify_rejects_foreign_secret() {
        let good = make_keys("secret-a", "iss", "aud");
        let other = make_keys("secret-b", "iss", "aud");
        let issued = other.sign("mallory").unwrap();
        assert!(matches!(
            good.verify(&issued.token),
            Err(AppError::InvalidSignature)
        ));
    }

    #[test]
    fn verify_rejects_wrong_issuer_or_audience() {
        let good = make_keys("same-secret", "good-iss", "good-aud");
        let bad = make_keys("same-secret", "bad-iss", "bad-aud");
        let issued = good.sign("dave").unwrap();
        assert!(bad.verify(&issued.token).is_err());
    }

    #[test]
    fn verify_rejects_garbage() {
        let keys = make_keys("dev-secret", "iss", "aud");
        assert!(matches!(
            keys.verify("not.a.jwt"),
            Err(AppError::InvalidSignature)
        ));
    }
}
