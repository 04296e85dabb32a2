use std::sync::Arc;

use anyhow::Context;
use axum::extract::FromRef;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::{
    auth::{
        password::PasswordPolicy,
        repo::{CredentialStore, InMemoryCredentialStore, PgCredentialStore},
        services::AuthService,
    },
    config::AppConfig,
    flights::{
        repo::{FlightStore, InMemoryFlightStore, PgFlightStore},
        services::FlightService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub flights: FlightService,
}

impl AppState {
    /// Connects to Postgres and runs migrations, or falls back to in-memory
    /// stores when no database is configured.
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let Some(url) = config.database_url.clone() else {
            warn!("DATABASE_URL not set; using in-memory stores, data is lost on restart");
            return Ok(Self::in_memory(&config));
        };

        let db = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&url)
            .await
            .context("connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;
        info!("database ready");

        Ok(Self::postgres(&config, db))
    }

    pub fn postgres(config: &AppConfig, db: PgPool) -> Self {
        Self::from_parts(
            config,
            Arc::new(PgCredentialStore::new(db.clone())),
            Arc::new(PgFlightStore::new(db)),
        )
    }

    pub fn in_memory(config: &AppConfig) -> Self {
        Self::from_parts(
            config,
            Arc::new(InMemoryCredentialStore::new()),
            Arc::new(InMemoryFlightStore::new()),
        )
    }

    pub fn from_parts(
        config: &AppConfig,
        credentials: Arc<dyn CredentialStore>,
        flights: Arc<dyn FlightStore>,
    ) -> Self {
        let policy = PasswordPolicy::with_min_length(config.password_min_length);
        let auth = AuthService::new(credentials, &config.jwt, policy);
        Self {
            auth,
            flights: FlightService::new(flights),
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        let config = AppConfig {
            database_url: None,
            max_connections: 1,
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 60,
            },
            password_min_length: 6,
        };
        Self::in_memory(&config)
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
