use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("invalid subscription request: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Запрос на отслеживание цен. Без `flight_id` - подписка на появление билетов вообще.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest {
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub flight_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    pub email: String,
    pub flight_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    pub fn confirmation(&self) -> &'static str {
        match self.flight_id {
            Some(_) => "Successfully subscribed to price tracking",
            None => "Successfully subscribed to free ticket tracking",
        }
    }
}

#[derive(Default)]
pub struct SubscriptionService {
    subscriptions: RwLock<Vec<Subscription>>,
}

impl SubscriptionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe(&self, mut request: SubscriptionRequest) -> Result<Subscription, SubscriptionError> {
        // Пробелы вокруг адреса из формы не делают его невалидным
        request.email = request.email.trim().to_string();
        request.validate()?;

        let subscription = Subscription {
            id: Uuid::new_v4(),
            email: request.email,
            flight_id: request.flight_id,
            created_at: Utc::now(),
        };
        self.subscriptions.write().await.push(subscription.clone());
        info!(
            "New price subscription {} for flight {:?}",
            subscription.id, subscription.flight_id
        );
        Ok(subscription)
    }

    pub async fn count(&self) -> usize {
        self.subscriptions.read().await.len()
    }
}
