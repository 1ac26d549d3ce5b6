pub mod chart;
pub mod flight;
pub mod seat;

pub use chart::ChartRow;
pub use flight::{
    FlightDetails, FlightPage, FlightSummary, LuggageOption, PriceHistory, PriceSample, SeatQuota,
};
pub use seat::{SeatAssignment, SeatCell, SeatLayout, SeatStatus};
