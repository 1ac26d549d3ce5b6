//! Избранные рейсы.
//!
//! Список хранится в локальном key-value файле (JSON-объект) под ключом
//! `favoriteFlights` и перезаписывается целиком при каждом изменении.
//! Все чтения и записи идут через один `FavoritesStore`, мьютекс держится
//! на время записи файла, поэтому изменения внутри процесса не теряются.

use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::models::FlightSummary;

pub const FAVORITES_KEY: &str = "favoriteFlights";

#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("favorites storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("favorites storage format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Локальное key-value хранилище поверх одного JSON-файла.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self, key: &str) -> Result<Option<Value>, FavoritesError> {
        Ok(self.read_all().await?.remove(key))
    }

    pub async fn set(&self, key: &str, value: Value) -> Result<(), FavoritesError> {
        // Остальные ключи файла не трогаем. Битый JSON перезаписывается, ошибки чтения - наружу.
        let mut entries = match self.read_all().await {
            Ok(entries) => entries,
            Err(FavoritesError::Format(e)) => {
                warn!("Overwriting malformed store {}: {}", self.path.display(), e);
                Map::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), value);

        let data = serde_json::to_vec_pretty(&Value::Object(entries))?;
        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, data).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    async fn read_all(&self) -> Result<Map<String, Value>, FavoritesError> {
        match tokio::fs::read(&self.path).await {
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }
}

pub struct FavoritesStore {
    store: LocalStore,
    flights: Mutex<Vec<FlightSummary>>,
}

impl FavoritesStore {
    /// Загружает избранное. Нет файла или ключа - пустой список,
    /// испорченные данные логируются и тоже дают пустой список.
    pub async fn load(store: LocalStore) -> Self {
        let flights = match store.get(FAVORITES_KEY).await {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!("Ignoring malformed {} in {}: {}", FAVORITES_KEY, store.path().display(), e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read favorites from {}: {}", store.path().display(), e);
                Vec::new()
            }
        };
        info!("Loaded {} favorite flights", flights.len());

        Self {
            store,
            flights: Mutex::new(flights),
        }
    }

    pub async fn list(&self) -> Vec<FlightSummary> {
        self.flights.lock().await.clone()
    }

    pub async fn contains(&self, flight_id: i64) -> bool {
        self.flights.lock().await.iter().any(|f| f.id == flight_id)
    }

    /// Возвращает false, если рейс уже в избранном.
    pub async fn add(&self, flight: FlightSummary) -> Result<bool, FavoritesError> {
        let mut flights = self.flights.lock().await;
        if flights.iter().any(|f| f.id == flight.id) {
            return Ok(false);
        }

        let mut updated = flights.clone();
        updated.push(flight);
        self.persist(&updated).await?;
        *flights = updated;
        Ok(true)
    }

    /// Возвращает false, если такого рейса в избранном не было.
    pub async fn remove(&self, flight_id: i64) -> Result<bool, FavoritesError> {
        let mut flights = self.flights.lock().await;
        if !flights.iter().any(|f| f.id == flight_id) {
            return Ok(false);
        }

        let updated: Vec<FlightSummary> = flights.iter().filter(|f| f.id != flight_id).cloned().collect();
        self.persist(&updated).await?;
        *flights = updated;
        info!("Flight {} has been removed from favorites", flight_id);
        Ok(true)
    }

    async fn persist(&self, flights: &[FlightSummary]) -> Result<(), FavoritesError> {
        self.store.set(FAVORITES_KEY, serde_json::to_value(flights)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight(id: i64) -> FlightSummary {
        FlightSummary {
            id,
            departure_location: "Lisbon".to_string(),
            arrival_location: "Madrid".to_string(),
            departure_time: "2024-04-10T06:45:00".to_string(),
            arrival_time: "2024-04-10T09:05:00".to_string(),
            airline: "TAP".to_string(),
            duration: "1h 20m".to_string(),
            min_price: 59.0,
            class_types: vec!["ECONOMY".to_string(), "BUSINESS".to_string()],
        }
    }

    #[tokio::test]
    async fn favorites_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.json");

        let store = FavoritesStore::load(LocalStore::new(&path)).await;
        assert!(store.add(flight(1)).await.unwrap());
        assert!(store.add(flight(2)).await.unwrap());
        assert!(store.remove(1).await.unwrap());

        let reloaded = FavoritesStore::load(LocalStore::new(&path)).await;
        let ids: Vec<i64> = reloaded.list().await.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn duplicates_are_not_added() {
        let dir = tempfile::tempdir().unwrap();
        let store = FavoritesStore::load(LocalStore::new(dir.path().join("f.json"))).await;

        assert!(store.add(flight(3)).await.unwrap());
        assert!(!store.add(flight(3)).await.unwrap());
        assert_eq!(store.list().await.len(), 1);
        assert!(store.contains(3).await);
        assert!(!store.remove(4).await.unwrap());
    }

    #[tokio::test]
    async fn corrupt_file_starts_empty_and_is_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let store = FavoritesStore::load(LocalStore::new(&path)).await;
        assert!(store.list().await.is_empty());

        store.add(flight(8)).await.unwrap();
        let raw: Value = serde_json::from_slice(&tokio::fs::read(&path).await.unwrap()).unwrap();
        assert_eq!(raw[FAVORITES_KEY][0]["id"], 8);
        assert_eq!(raw[FAVORITES_KEY][0]["minPrice"], 59.0);
    }

    #[tokio::test]
    async fn other_keys_are_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");
        tokio::fs::write(&path, br#"{"theme": "dark"}"#).await.unwrap();

        let store = FavoritesStore::load(LocalStore::new(&path)).await;
        store.add(flight(1)).await.unwrap();

        let local = LocalStore::new(&path);
        assert_eq!(local.get("theme").await.unwrap(), Some(Value::String("dark".to_string())));
    }

    #[tokio::test]
    async fn unreadable_store_fails_the_write() {
        let dir = tempfile::tempdir().unwrap();
        // Каталог вместо файла: чтение падает с i/o ошибкой, а не с ошибкой формата
        let path = dir.path().join("store.json");
        tokio::fs::create_dir(&path).await.unwrap();
        let store = FavoritesStore::load(LocalStore::new(&path)).await;

        let result = store.add(flight(5)).await;

        assert!(matches!(result, Err(FavoritesError::Io(_))));
        assert!(!store.contains(5).await);
        // До записи дело не дошло
        assert!(!dir.path().join("store.tmp").exists());
    }
}
