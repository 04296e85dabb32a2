use anyhow::Context;
use serde::Deserialize;

/// One year.
pub const MAX_JWT_TTL_MINUTES: i64 = 525_600;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// `None` runs the service on in-memory stores.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub jwt: JwtConfig,
    pub password_min_length: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "flights".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "flights-users".into()),
            ttl_minutes: jwt_ttl_minutes(env_or("JWT_TTL_MINUTES", 60)?)?,
        };
        Ok(Self {
            database_url,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10)?,
            jwt,
            password_min_length: env_or("PASSWORD_MIN_LENGTH", 6)?,
        })
    }
}

fn jwt_ttl_minutes(minutes: i64) -> anyhow::Result<i64> {
    anyhow::ensure!(
        (1..=MAX_JWT_TTL_MINUTES).contains(&minutes),
        "JWT_TTL_MINUTES must be between 1 and {}, got {}",
        MAX_JWT_TTL_MINUTES,
        minutes
    );
    Ok(minutes)
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(v) => v.parse::<T>().with_context(|| format!("invalid {}: {:?}", key, v)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_when_unset() {
        let v: i64 = env_or("FLIGHTS_TEST_SURELY_UNSET_VAR", 42).unwrap();
        assert_eq!(v, 42);
    }

    #[test]
    fn jwt_ttl_must_be_positive_and_bounded() {
        assert_eq!(jwt_ttl_minutes(60).unwrap(), 60);
        assert_eq!(jwt_ttl_minutes(MAX_JWT_TTL_MINUTES).unwrap(), MAX_JWT_TTL_MINUTES);
        assert!(jwt_ttl_minutes(0).is_err());
        assert!(jwt_ttl_minutes(-5).is_err());
        let err = jwt_ttl_minutes(10_000_000_000).unwrap_err();
        assert!(err.to_string().contains("JWT_TTL_MINUTES"));
    }

    #[test]
    fn env_or_reports_unparsable_value() {
        std::env::set_var("FLIGHTS_TEST_BAD_NUMBER", "sixty");
        let err = env_or::<i64>("FLIGHTS_TEST_BAD_NUMBER", 60).unwrap_err();
        assert!(err.to_string().contains("FLIGHTS_TEST_BAD_NUMBER"));
    }
}
