//! flights.rs
//!
//! Маршруты рейсов: проксирование поиска и деталей во внешний сервис,
//! плюс производные данные для экрана рейса - схема салона, график
//! истории цен и расчет итоговой стоимости. `/live` держит открытым
//! экран рейса и шлет его состояние по SSE, пока клиент подключен.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use validator::Validate;

use super::{error_response, ApiError};
use crate::flight_client::FlightSearchQuery;
use crate::models::{ChartRow, FlightDetails, SeatCell};
use crate::services::{
    flight_view::{FlightDetailsState, FlightDetailsView},
    price_pivot::{pivot_price_history, CHART_DATE_KEY},
    seat_layout::build_layout,
    seat_selection::{select_luggage, PriceQuote, SeatSelection},
};
use crate::AppState;

const FLIGHTS_FETCH_ERROR: &str = "Failed to fetch flights";
const DETAILS_FETCH_ERROR: &str = "Failed to fetch flight details";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/flights", get(search_flights))
        .route("/flights/{id}", get(get_flight))
        .route("/flights/{id}/seats", get(get_seat_map))
        .route("/flights/{id}/price-history", get(get_price_history))
        .route("/flights/{id}/quote", post(quote_price))
        .route("/flights/{id}/live", get(live_flight))
}

/* ---------- helpers ---------- */

async fn fetch_details(state: &AppState, flight_id: i64) -> Result<FlightDetails, ApiError> {
    state.flight_client.get_flight(flight_id).await.map_err(|e| {
        tracing::error!("Error fetching flight details for {}: {}", flight_id, e);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, DETAILS_FETCH_ERROR)
    })
}

/* ---------- SEARCH ---------- */

// GET /api/flights
async fn search_flights(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FlightSearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if let Err(e) = query.validate() {
        return Err(error_response(StatusCode::BAD_REQUEST, &e.to_string()));
    }

    match state.flight_client.search_flights(&query).await {
        Ok(page) => Ok(Json(page)),
        Err(e) => {
            tracing::error!("Error fetching flights: {}", e);
            Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, FLIGHTS_FETCH_ERROR))
        }
    }
}

// GET /api/flights/{id}
async fn get_flight(
    State(state): State<Arc<AppState>>,
    Path(flight_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(fetch_details(&state, flight_id).await?))
}

/* ---------- SEAT MAP ---------- */

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SeatMapResponse {
    flight_id: i64,
    capacity: usize,
    seats_per_row: usize,
    available_seats: usize,
    max_reservable_seats: usize,
    rows: Vec<Vec<SeatCell>>,
}

// GET /api/flights/{id}/seats
async fn get_seat_map(
    State(state): State<Arc<AppState>>,
    Path(flight_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let details = fetch_details(&state, flight_id).await?;

    let layout = build_layout(&details.available_seats, &state.seat_grid).map_err(|e| {
        tracing::warn!("Flight {} has an unusable seat list: {}", flight_id, e);
        error_response(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string())
    })?;

    Ok(Json(SeatMapResponse {
        flight_id,
        capacity: state.seat_grid.capacity(),
        seats_per_row: state.seat_grid.row_width(),
        available_seats: layout.available_count(),
        max_reservable_seats: state.config.seat_map.max_reservable_seats,
        rows: layout.rows,
    }))
}

/* ---------- PRICE HISTORY ---------- */

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PriceHistoryResponse {
    flight_id: i64,
    class_types: Vec<String>,
    rows: Vec<ChartRow>,
}

// GET /api/flights/{id}/price-history
async fn get_price_history(
    State(state): State<Arc<AppState>>,
    Path(flight_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let details = fetch_details(&state, flight_id).await?;
    let history = &details.price_history.history_by_class;

    let rows = pivot_price_history(history).map_err(|e| {
        tracing::warn!("Flight {} has a broken price history: {}", flight_id, e);
        error_response(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string())
    })?;

    Ok(Json(PriceHistoryResponse {
        flight_id,
        class_types: history
            .keys()
            .filter(|class_type| class_type.as_str() != CHART_DATE_KEY)
            .cloned()
            .collect(),
        rows,
    }))
}

/* ---------- QUOTE ---------- */

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteRequest {
    #[serde(default)]
    seat_ids: Vec<u32>,
    #[serde(default)]
    luggage: Option<String>,
}

// POST /api/flights/{id}/quote
async fn quote_price(
    State(state): State<Arc<AppState>>,
    Path(flight_id): Path<i64>,
    Json(req): Json<QuoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let details = fetch_details(&state, flight_id).await?;

    let layout = build_layout(&details.available_seats, &state.seat_grid)
        .map_err(|e| error_response(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string()))?;

    let mut selection = SeatSelection::new(&layout, state.config.seat_map.max_reservable_seats);
    for seat_id in req.seat_ids {
        selection
            .add_seat(seat_id)
            .map_err(|e| error_response(StatusCode::BAD_REQUEST, &e.to_string()))?;
    }

    let luggage = select_luggage(&details, req.luggage.as_deref())
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, &e.to_string()))?;

    Ok(Json(PriceQuote::new(&selection, luggage)))
}

/* ---------- LIVE ---------- */

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LiveSnapshot<'a> {
    #[serde(flatten)]
    state: &'a FlightDetailsState,
    minutes: u32,
    seconds: u32,
}

fn live_event(state: &FlightDetailsState) -> Event {
    let (minutes, seconds) = state.minutes_seconds();
    Event::default()
        .event("flight")
        .json_data(LiveSnapshot { state, minutes, seconds })
        .unwrap_or_else(|e| {
            tracing::error!("Failed to encode live flight state: {}", e);
            Event::default().comment("encode error")
        })
}

// GET /api/flights/{id}/live
async fn live_flight(
    State(state): State<Arc<AppState>>,
    Path(flight_id): Path<i64>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let view = FlightDetailsView::open(
        Arc::new(state.flight_client.clone()),
        flight_id,
        state.config.refresh.countdown_seconds,
    );
    let rx = view.subscribe();
    tracing::info!("Live view opened for flight {}", view.flight_id());

    // Модель живет внутри стрима: клиент отключился - стрим дропнут - таймер остановлен
    let events = stream::unfold((view, rx, true), |(view, mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let event = live_event(&rx.borrow_and_update());
        Some((Ok(event), (view, rx, false)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
