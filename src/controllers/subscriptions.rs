use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde_json::json;
use std::sync::Arc;

use super::{error_response, ApiError};
use crate::subscriptions::SubscriptionRequest;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/subscriptions", post(subscribe))
}

// POST /api/subscriptions
async fn subscribe(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubscriptionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let subscription = state
        .subscriptions
        .subscribe(req)
        .await
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, &e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": subscription.id,
            "message": subscription.confirmation(),
            "activeSubscriptions": state.subscriptions.count().await,
        })),
    ))
}
