use serde::Serialize;
use thiserror::Error;

use crate::models::{FlightDetails, LuggageOption, SeatLayout};

/// Значение формы "без багажа".
pub const NO_LUGGAGE: &str = "none";

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("seat {0} does not exist")]
    UnknownSeat(u32),

    #[error("seat {0} is not available")]
    SeatReserved(u32),

    #[error("seat {0} is already selected")]
    AlreadySelected(u32),

    #[error("at most {0} seats can be reserved")]
    LimitReached(usize),

    #[error("unknown luggage option {0:?}")]
    UnknownLuggage(String),
}

/// Выбранные места в рамках одной схемы салона.
#[derive(Debug)]
pub struct SeatSelection<'a> {
    layout: &'a SeatLayout,
    max_seats: usize,
    selected: Vec<u32>,
}

impl<'a> SeatSelection<'a> {
    pub fn new(layout: &'a SeatLayout, max_seats: usize) -> Self {
        Self {
            layout,
            max_seats,
            selected: Vec::new(),
        }
    }

    pub fn add_seat(&mut self, seat_id: u32) -> Result<(), SelectionError> {
        let seat = self.layout.seat(seat_id).ok_or(SelectionError::UnknownSeat(seat_id))?;
        if seat.is_reserved() {
            return Err(SelectionError::SeatReserved(seat_id));
        }
        if self.selected.contains(&seat_id) {
            return Err(SelectionError::AlreadySelected(seat_id));
        }
        if self.selected.len() >= self.max_seats {
            return Err(SelectionError::LimitReached(self.max_seats));
        }
        self.selected.push(seat_id);
        Ok(())
    }

    /// Возвращает false, если место не было выбрано.
    pub fn remove_seat(&mut self, seat_id: u32) -> bool {
        let before = self.selected.len();
        self.selected.retain(|id| *id != seat_id);
        self.selected.len() != before
    }

    pub fn selected(&self) -> &[u32] {
        &self.selected
    }

    pub fn seat_total(&self) -> f64 {
        self.selected
            .iter()
            .filter_map(|id| self.layout.seat(*id))
            .filter_map(|seat| seat.price())
            .sum()
    }
}

/// Выбор багажа по имени опции. `None` и "none" означают без багажа.
pub fn select_luggage<'d>(
    details: &'d FlightDetails,
    name: Option<&str>,
) -> Result<Option<&'d LuggageOption>, SelectionError> {
    match name.map(str::trim) {
        None | Some("") | Some(NO_LUGGAGE) => Ok(None),
        Some(name) => details
            .luggage_option(name)
            .map(Some)
            .ok_or_else(|| SelectionError::UnknownLuggage(name.to_string())),
    }
}

/// Итоговая стоимость: места плюс багаж.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub seat_ids: Vec<u32>,
    pub seat_total: f64,
    pub luggage: Option<LuggageOption>,
    pub luggage_price: f64,
    pub total_price: f64,
}

impl PriceQuote {
    pub fn new(selection: &SeatSelection<'_>, luggage: Option<&LuggageOption>) -> Self {
        let seat_total = selection.seat_total();
        let luggage_price = luggage.map(|option| option.price).unwrap_or(0.0);
        Self {
            seat_ids: selection.selected().to_vec(),
            seat_total,
            luggage: luggage.cloned(),
            luggage_price,
            total_price: seat_total + luggage_price,
        }
    }
}
