//! Сведение истории цен по классам в одну таблицу для графика.
//!
//! Ось дат общая для всех классов: объединение календарных дат из всех
//! точек, по возрастанию. Для каждой пары (дата, класс) берется цена первой
//! точки этого класса за эту дату, иначе `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::warn;

use crate::models::{ChartRow, PriceSample};

/// Ключ даты в строке графика. Класс с таким именем затер бы дату, поэтому он пропускается.
pub const CHART_DATE_KEY: &str = "date";

#[derive(Debug, Error, PartialEq)]
pub enum PivotError {
    #[error("invalid timestamp {timestamp:?} in {class_type} price history")]
    InvalidTimestamp {
        class_type: String,
        timestamp: String,
    },
}

pub fn pivot_price_history(
    history_by_class: &BTreeMap<String, Vec<PriceSample>>,
) -> Result<Vec<ChartRow>, PivotError> {
    let mut dates = BTreeSet::new();
    let mut by_class: BTreeMap<&str, BTreeMap<NaiveDate, f64>> = BTreeMap::new();

    for (class_type, samples) in history_by_class {
        if class_type == CHART_DATE_KEY {
            warn!("Skipping price history class {:?}: it collides with the chart date key", class_type);
            continue;
        }
        let prices = by_class.entry(class_type.as_str()).or_default();
        for sample in samples {
            let date = calendar_date(&sample.timestamp).ok_or_else(|| PivotError::InvalidTimestamp {
                class_type: class_type.clone(),
                timestamp: sample.timestamp.clone(),
            })?;
            dates.insert(date);
            // Первая точка за день побеждает, последующие игнорируются
            prices.entry(date).or_insert(sample.price);
        }
    }

    let rows = dates
        .into_iter()
        .map(|date| ChartRow {
            date,
            prices: by_class
                .iter()
                .map(|(class_type, prices)| (class_type.to_string(), prices.get(&date).copied()))
                .collect(),
        })
        .collect();

    Ok(rows)
}

/// Календарная дата точки. Для времени со смещением дата берется в этом же смещении.
pub fn calendar_date(timestamp: &str) -> Option<NaiveDate> {
    let timestamp = timestamp.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(with_offset.date_naive());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.date());
    }
    NaiveDate::parse_from_str(timestamp, "%Y-%m-%d").ok()
}
