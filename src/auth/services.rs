use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        claims::Claims,
        jwt::{IssuedToken, JwtKeys},
        password::{hash_password, verify_password, PasswordPolicy},
        repo::CredentialStore,
        repo_types::{InsertOutcome, NewUser},
    },
    config::JwtConfig,
    error::{AppError, AppResult},
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Registers users and turns credentials into signed tokens.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    keys: JwtKeys,
    policy: PasswordPolicy,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, jwt: &JwtConfig, policy: PasswordPolicy) -> Self {
        Self {
            store,
            keys: JwtKeys::new(jwt),
            policy,
        }
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> AppResult<()> {
        if username.trim().is_empty() {
            return Err(AppError::Validation("Username is required.".into()));
        }
        if email.trim().is_empty() {
            return Err(AppError::Validation("Email is required.".into()));
        }
        if password.is_empty() {
            return Err(AppError::Validation("Password is required.".into()));
        }
        if !is_valid_email(email) {
            warn!(email = %email, "invalid email");
            return Err(AppError::Validation("Invalid email format.".into()));
        }

        if self.store.find_by_username(username).await?.is_some() {
            warn!(username = %username, "username already registered");
            return Err(AppError::DuplicateUser);
        }

        let violations = self.policy.violations(password);
        if !violations.is_empty() {
            warn!(username = %username, "weak password");
            return Err(AppError::WeakPassword(violations.join(", ")));
        }

        let password_hash = hash_password(password)?;
        let new_user = NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
        };
        match self.store.create(new_user).await? {
            InsertOutcome::Created(user) => {
                info!(user_id = user.id, username = %user.username, "user registered");
                Ok(())
            }
            InsertOutcome::Duplicate => {
                warn!(username = %username, "username taken during insert");
                Err(AppError::DuplicateUser)
            }
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> AppResult<IssuedToken> {
        let Some(user) = self.store.find_by_username(username).await? else {
            warn!(username = %username, "login unknown username");
            return Err(AppError::Unauthenticated);
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(username = %username, user_id = user.id, "login invalid password");
            return Err(AppError::Unauthenticated);
        }

        let issued = self.keys.sign(&user.username)?;
        info!(username = %user.username, "user logged in");
        Ok(issued)
    }

    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        self.keys.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;
    use crate::auth::repo::InMemoryCredentialStore;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(InMemoryCredentialStore::new()),
            &JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 60,
            },
            PasswordPolicy::default(),
        )
    }

    #[test]
    fn email_format() {
        assert!(is_valid_email("pilot@example.com"));
        assert!(!is_valid_email("pilot@example"));
        assert!(!is_valid_email("pilot example.com"));
        assert!(!is_valid_email(""));
    }

    #[tokio::test]
    async fn register_twice_is_duplicate() {
        let svc = service();
        svc.register("alice", "alice@example.com", "Pa$$w0rd")
            .await
            .expect("first registration");
        let err = svc
            .register("alice", "other@example.com", "Pa$$w0rd")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateUser));
    }

    #[tokio::test]
    async fn register_rejects_password_without_digit() {
        let err = service()
            .register("bob", "bob@example.com", "Password!")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::WeakPassword(ref m) if m.contains("digit")));
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let err = service()
            .register("bob", "bob@example.com", "A1!a")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::WeakPassword(_)));
    }

    #[tokio::test]
    async fn register_rejects_bad_email() {
        let err = service()
            .register("bob", "not-an-email", "Pa$$w0rd")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn register_requires_email() {
        let err = service()
            .register("bob", "", "Pa$$w0rd")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Email is required."));
    }

    #[tokio::test]
    async fn login_issues_token_for_subject() {
        let svc = service();
        svc.register("carol", "carol@example.com", "Pa$$w0rd")
            .await
            .unwrap();
        let issued = svc.login("carol", "Pa$$w0rd").await.expect("login");
        assert!(issued.expires_at > OffsetDateTime::now_utc());
        let claims = svc.verify(&issued.token).expect("verify");
        assert_eq!(claims.sub, "carol");
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthenticated() {
        let svc = service();
        svc.register("dave", "dave@example.com", "Pa$$w0rd")
            .await
            .unwrap();
        let err = svc.login("dave", "Wr0ng!pass").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
    }

    #[tokio::test]
    async fn login_unknown_user_is_unauthenticated() {
        let err = service().login("ghost", "Pa$$w0rd").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
    }
}
