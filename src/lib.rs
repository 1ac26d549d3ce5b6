pub mod config;
pub mod controllers;
pub mod favorites;
pub mod flight_client;
pub mod models;
pub mod services;
pub mod subscriptions;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use favorites::{FavoritesStore, LocalStore};
use flight_client::FlightClient;
use services::seat_layout::SeatGrid;
use subscriptions::SubscriptionService;

// Shared state для всего приложения
pub struct AppState {
    pub config: config::Config,
    pub flight_client: FlightClient,
    pub favorites: FavoritesStore,
    pub subscriptions: SubscriptionService,
    pub seat_grid: SeatGrid,
}

impl AppState {
    pub async fn new(config: config::Config) -> Result<Arc<Self>, Box<dyn std::error::Error + Send + Sync>> {
        let flight_client = FlightClient::from_config(&config.backend)?;
        let seat_grid = SeatGrid::new(config.seat_map.total_seats, config.seat_map.seats_per_row)?;
        let favorites = FavoritesStore::load(LocalStore::new(&config.favorites.path)).await;

        Ok(Arc::new(Self {
            config,
            flight_client,
            favorites,
            subscriptions: SubscriptionService::new(),
            seat_grid,
        }))
    }
}

/// Полный роутер приложения: служебные маршруты + API под `/api`.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Flight Search API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
