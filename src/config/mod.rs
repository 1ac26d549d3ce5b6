use serde::Deserialize;
use std::env;
use std::str::FromStr;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub backend: BackendConfig,
    pub seat_map: SeatMapConfig,
    pub refresh: RefreshConfig,
    pub favorites: FavoritesConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
}

// Внешний сервис рейсов
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

// Схема салона
#[derive(Debug, Clone, Deserialize)]
pub struct SeatMapConfig {
    pub total_seats: usize,
    pub seats_per_row: usize,
    pub max_reservable_seats: usize,
}

// Таймер автообновления деталей рейса
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    pub countdown_seconds: u32,
}

// Локальное хранилище избранного
#[derive(Debug, Clone, Deserialize)]
pub struct FavoritesConfig {
    pub path: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app: AppConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                environment: "development".to_string(),
                rust_log: "flight_search=debug,tower_http=debug".to_string(),
            },
            backend: BackendConfig {
                base_url: "http://localhost:8080".to_string(),
                timeout_seconds: 10,
            },
            seat_map: SeatMapConfig {
                total_seats: 90,
                seats_per_row: 5,
                max_reservable_seats: 3,
            },
            refresh: RefreshConfig {
                countdown_seconds: 60,
            },
            favorites: FavoritesConfig {
                path: "favorites.json".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or(defaults.app.host),
                port: parse_var("PORT", defaults.app.port),
                environment: env::var("ENVIRONMENT").unwrap_or(defaults.app.environment),
                rust_log: env::var("RUST_LOG").unwrap_or(defaults.app.rust_log),
            },
            backend: BackendConfig {
                base_url: env::var("BACKEND_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.backend.base_url),
                timeout_seconds: parse_var("BACKEND_TIMEOUT_SECONDS", defaults.backend.timeout_seconds),
            },
            seat_map: SeatMapConfig {
                total_seats: parse_var("SEAT_MAP_TOTAL_SEATS", defaults.seat_map.total_seats),
                seats_per_row: parse_var("SEAT_MAP_SEATS_PER_ROW", defaults.seat_map.seats_per_row),
                max_reservable_seats: parse_var(
                    "MAX_RESERVABLE_SEATS",
                    defaults.seat_map.max_reservable_seats,
                ),
            },
            refresh: RefreshConfig {
                countdown_seconds: parse_var(
                    "REFRESH_COUNTDOWN_SECONDS",
                    defaults.refresh.countdown_seconds,
                ),
            },
            favorites: FavoritesConfig {
                path: env::var("FAVORITES_PATH").unwrap_or(defaults.favorites.path),
            },
        }
    }
}

// Переменная не задана - берем значение по умолчанию, задана криво - падаем сразу при старте
fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{} must be a valid value, got {:?}", name, raw)),
        Err(_) => default,
    }
}
