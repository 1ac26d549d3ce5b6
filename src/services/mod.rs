pub mod countdown;
pub mod flight_view;
pub mod price_pivot;
pub mod seat_layout;
pub mod seat_selection;
