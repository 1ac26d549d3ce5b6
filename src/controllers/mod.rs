pub mod favorites;
pub mod flights;
pub mod subscriptions;

use axum::{http::StatusCode, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;

/// Ответ с ошибкой в формате, который ждет фронт: `{"error": "..."}`.
pub type ApiError = (StatusCode, Json<Value>);

pub fn error_response(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "error": message })))
}

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(flights::routes())
        .merge(favorites::routes())
        .merge(subscriptions::routes())
}
