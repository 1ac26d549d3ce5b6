use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Краткая карточка рейса из выдачи поиска (`GET /flights`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSummary {
    pub id: i64,
    pub departure_location: String,
    pub arrival_location: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub airline: String,
    pub duration: String,
    pub min_price: f64,
    #[serde(default)]
    pub class_types: Vec<String>,
}

/// Страница выдачи поиска. Бэкенд отдает и служебные поля пагинации, нам нужен только `content`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightPage {
    #[serde(default)]
    pub content: Vec<FlightSummary>,
}

/// Полная информация о рейсе (`GET /flights/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightDetails {
    pub id: i64,
    pub departure_location: String,
    pub arrival_location: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    pub airline: String,
    #[serde(default)]
    pub available_seats: Vec<SeatQuota>,
    #[serde(default)]
    pub luggage_options: Vec<LuggageOption>,
    #[serde(default)]
    pub prices: BTreeMap<String, f64>,
    #[serde(default)]
    pub price_history: PriceHistory,
}

impl FlightDetails {
    pub fn luggage_option(&self, name: &str) -> Option<&LuggageOption> {
        self.luggage_options.iter().find(|option| option.name == name)
    }
}

/// Квота мест одного типа: класс, опция, цена и сколько таких мест есть.
///
/// `amount` знаковый: отрицательное значение приходит с бэкенда как есть
/// и отклоняется при построении схемы салона.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatQuota {
    pub class_type: String,
    pub seat_option: String,
    pub price: f64,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LuggageOption {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub weight_limit: f64,
    pub price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistory {
    #[serde(default)]
    pub history_by_class: BTreeMap<String, Vec<PriceSample>>,
}

/// Точка истории цен. Класс задается ключом в `history_by_class`,
/// timestamp хранится строкой и разбирается при построении графика.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub price: f64,
    pub timestamp: String,
}
