use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use super::{error_response, ApiError};
use crate::models::FlightSummary;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/favorites", get(list_favorites).post(add_favorite))
        .route("/favorites/{id}", delete(remove_favorite))
}

// GET /api/favorites
async fn list_favorites(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.favorites.list().await)
}

// POST /api/favorites
async fn add_favorite(
    State(state): State<Arc<AppState>>,
    Json(flight): Json<FlightSummary>,
) -> Result<impl IntoResponse, ApiError> {
    let flight_id = flight.id;
    match state.favorites.add(flight).await {
        Ok(true) => Ok((StatusCode::CREATED, Json(json!({"id": flight_id, "added": true})))),
        Ok(false) => Ok((StatusCode::OK, Json(json!({"id": flight_id, "added": false})))),
        Err(e) => {
            tracing::error!("Failed to save favorite flight {}: {}", flight_id, e);
            Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save favorites"))
        }
    }
}

// DELETE /api/favorites/{id}
async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    Path(flight_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    match state.favorites.remove(flight_id).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err(error_response(
            StatusCode::NOT_FOUND,
            &format!("Flight {} is not in favorites", flight_id),
        )),
        Err(e) => {
            tracing::error!("Failed to remove favorite flight {}: {}", flight_id, e);
            Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save favorites"))
        }
    }
}
