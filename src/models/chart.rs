use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Строка графика истории цен: дата и цена по каждому классу.
///
/// `None` означает "нет данных" за этот день, не ноль: график должен
/// пропускать такие точки. Сериализуется плоско, как ждет фронт:
/// `{"date": "2024-01-01", "ECONOMY": 100.0, "BUSINESS": null}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub prices: BTreeMap<String, Option<f64>>,
}

impl ChartRow {
    pub fn price(&self, class_type: &str) -> Option<f64> {
        self.prices.get(class_type).copied().flatten()
    }
}
