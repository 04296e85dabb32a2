use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// `{status, message}` body shared by registration and error responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub status: String,
    pub message: String,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "Success".into(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "Error".into(),
            message: message.into(),
        }
    }
}

/// Every failure a request can end in.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("User already exists")]
    DuplicateUser,

    #[error("{0}")]
    WeakPassword(String),

    #[error("invalid credentials")]
    Unauthenticated,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token expired")]
    Expired,

    #[error("Flight not found.")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(_) | AppError::DuplicateUser | AppError::WeakPassword(_) => (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse::error(self.to_string())),
            )
                .into_response(),
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED.into_response(),
            AppError::InvalidSignature => bearer_challenge("The signature is invalid"),
            AppError::Expired => bearer_challenge("The token expired"),
            AppError::NotFound => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
            AppError::Internal(e) => {
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(MessageResponse::error("Internal server error")),
                )
                    .into_response()
            }
        }
    }
}

fn bearer_challenge(description: &str) -> Response {
    let value = format!(
        r#"Bearer error="invalid_token", error_description="{}""#,
        description
    );
    let mut res = StatusCode::UNAUTHORIZED.into_response();
    if let Ok(v) = HeaderValue::from_str(&value) {
        res.headers_mut().insert(header::WWW_AUTHENTICATE, v);
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn validation_error_renders_message_body() {
        let res = AppError::Validation("Departure location is required.".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let parsed: MessageResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.status, "Error");
        assert_eq!(parsed.message, "Departure location is required.");
    }

    #[test]
    fn not_found_is_bad_request() {
        let res = AppError::NotFound.into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn token_errors_carry_challenge() {
        let res = AppError::Expired.into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let challenge = res.headers().get(header::WWW_AUTHENTICATE).unwrap();
        assert!(challenge.to_str().unwrap().contains("token expired"));
    }

    #[test]
    fn bad_credentials_have_no_challenge() {
        let res = AppError::Unauthenticated.into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(res.headers().get(header::WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn internal_is_server_error() {
        let res = AppError::Internal(anyhow::anyhow!("db down")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
