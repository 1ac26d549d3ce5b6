use chrono::NaiveDate;
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};
use validator::Validate;

use crate::config::BackendConfig;
use crate::models::{FlightDetails, FlightPage};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend responded with status {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to encode search query: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassType {
    Economy,
    Business,
    First,
}

impl FromStr for ClassType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "ECONOMY" => Ok(ClassType::Economy),
            "BUSINESS" => Ok(ClassType::Business),
            "FIRST" => Ok(ClassType::First),
            other => Err(format!("unknown class type {}", other)),
        }
    }
}

/// Параметры поиска рейсов. Пустые поля формы в запрос к бэкенду не попадают.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FlightSearchQuery {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    #[validate(length(min = 1, max = 100))]
    pub departure_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    #[validate(length(min = 1, max = 100))]
    pub arrival_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    pub departure_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    pub arrival_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    #[validate(range(min = 1, max = 500))]
    pub passengers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    pub class_type: Option<ClassType>,
}

impl FlightSearchQuery {
    pub fn to_query_string(&self) -> Result<String, ClientError> {
        Ok(serde_urlencoded::to_string(self)?)
    }
}

// Поля формы приходят строками, пустая строка = поле не заполнено
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Источник деталей рейса. Нужен, чтобы модель экрана рейса не зависела от HTTP.
pub trait FlightSource: Send + Sync {
    fn fetch_details(&self, flight_id: i64) -> BoxFuture<'_, Result<FlightDetails, ClientError>>;
}

/// Клиент внешнего сервиса рейсов
#[derive(Clone)]
pub struct FlightClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl FlightClient {
    pub fn new(base_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        }
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        info!("Flight client configured for {}", config.base_url);
        Ok(Self::new(config.base_url.clone(), http_client))
    }

    /// `GET /flights?...`
    pub async fn search_flights(&self, query: &FlightSearchQuery) -> Result<FlightPage, ClientError> {
        let query_string = query.to_query_string()?;
        let url = if query_string.is_empty() {
            format!("{}/flights", self.base_url)
        } else {
            format!("{}/flights?{}", self.base_url, query_string)
        };
        debug!("Searching flights: {}", url);

        let page: FlightPage = self.get_json(&url).await?;
        info!("Backend returned {} flights", page.content.len());
        Ok(page)
    }

    /// `GET /flights/{id}`
    pub async fn get_flight(&self, flight_id: i64) -> Result<FlightDetails, ClientError> {
        let url = format!("{}/flights/{}", self.base_url, flight_id);
        debug!("Fetching flight details: {}", url);
        self.get_json(&url).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        let response = self
            .http_client
            .get(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("Backend {} responded with {}", url, status);
            return Err(ClientError::Status(status));
        }

        Ok(response.json::<T>().await?)
    }
}

impl FlightSource for FlightClient {
    fn fetch_details(&self, flight_id: i64) -> BoxFuture<'_, Result<FlightDetails, ClientError>> {
        self.get_flight(flight_id).boxed()
    }
}
