use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    error::AppResult,
    flights::{dto::FlightRequest, repo_types::Flight},
    state::AppState,
};

pub fn flight_routes() -> Router<AppState> {
    Router::new()
        .route("/flights", get(list_flights).post(create_flight))
        .route(
            "/flights/:id",
            get(get_flight).put(update_flight).delete(delete_flight),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_flight(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    payload: Result<Json<FlightRequest>, JsonRejection>,
) -> AppResult<Json<Flight>> {
    let Json(body) = payload?;
    let flight = state.flights.create(body.validate()?).await?;
    Ok(Json(flight))
}

#[instrument(skip(state))]
pub async fn list_flights(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
) -> AppResult<Json<Vec<Flight>>> {
    Ok(Json(state.flights.get_all().await?))
}

#[instrument(skip(state))]
pub async fn get_flight(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Flight>> {
    Ok(Json(state.flights.get_by_id(id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_flight(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Path(id): Path<i64>,
    payload: Result<Json<FlightRequest>, JsonRejection>,
) -> AppResult<Json<Flight>> {
    let Json(body) = payload?;
    let flight = state.flights.update(id, body.validate()?).await?;
    Ok(Json(flight))
}

#[instrument(skip(state))]
pub async fn delete_flight(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Path(id): Path<i64>,
) -> AppResult<&'static str> {
    state.flights.delete(id).await?;
    Ok("Flight deleted.")
}
