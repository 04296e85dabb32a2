use axum::{extract::{rejection::JsonRejection, State}, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    auth::dto::{LoginRequest, RegisterRequest, TokenResponse},
    error::{AppError, AppResult, MessageResponse},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Json(mut payload) = payload?;
    payload.username = payload.username.trim().to_string();
    payload.email = payload.email.trim().to_string();

    state
        .auth
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok(Json(MessageResponse::success("User created successfully.")))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<TokenResponse>> {
    let Json(payload) = payload?;
    if payload.username.trim().is_empty() {
        return Err(AppError::Validation("Username is required.".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password is required.".into()));
    }

    let issued = state
        .auth
        .login(payload.username.trim(), &payload.password)
        .await?;

    Ok(Json(TokenResponse {
        token: issued.token,
        expiration: issued.expires_at,
    }))
}
