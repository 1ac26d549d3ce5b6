//! Модель экрана деталей рейса.
//!
//! Состояние экрана (детали, флаг загрузки, ошибка, секунды до обновления)
//! живет в `watch`-канале: подписчики получают уведомление на каждое изменение.
//! Фоновая задача раз в секунду двигает обратный отсчет и перезапрашивает
//! рейс, когда он доходит до нуля. Пока идет запрос, отсчет стоит.
//! Задача останавливается, когда модель уничтожается.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error};

use crate::flight_client::FlightSource;
use crate::models::FlightDetails;
use crate::services::countdown::{Countdown, Tick};

pub const FETCH_ERROR_MESSAGE: &str =
    "An error occurred while fetching flight details. Please try again.";

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightDetailsState {
    pub details: Option<FlightDetails>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub time_left: u32,
}

impl FlightDetailsState {
    fn loading(time_left: u32) -> Self {
        Self {
            details: None,
            is_loading: true,
            error: None,
            time_left,
        }
    }

    pub fn minutes_seconds(&self) -> (u32, u32) {
        (self.time_left / 60, self.time_left % 60)
    }
}

pub struct FlightDetailsView {
    flight_id: i64,
    state: watch::Receiver<FlightDetailsState>,
    task: JoinHandle<()>,
}

impl FlightDetailsView {
    /// Открывает экран: первый запрос сразу, дальше обновление по таймеру.
    pub fn open<S>(source: Arc<S>, flight_id: i64, countdown_seconds: u32) -> Self
    where
        S: FlightSource + 'static,
    {
        let countdown = Countdown::new(countdown_seconds);
        let (tx, rx) = watch::channel(FlightDetailsState::loading(countdown.remaining()));
        let task = tokio::spawn(run_refresh_loop(source, flight_id, countdown, tx));
        Self {
            flight_id,
            state: rx,
            task,
        }
    }

    pub fn flight_id(&self) -> i64 {
        self.flight_id
    }

    /// Новый подписчик на изменения состояния.
    pub fn subscribe(&self) -> watch::Receiver<FlightDetailsState> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> FlightDetailsState {
        self.state.borrow().clone()
    }
}

impl Drop for FlightDetailsView {
    fn drop(&mut self) {
        debug!("Closing flight details view for flight {}", self.flight_id);
        self.task.abort();
    }
}

async fn run_refresh_loop<S: FlightSource>(
    source: Arc<S>,
    flight_id: i64,
    mut countdown: Countdown,
    state: watch::Sender<FlightDetailsState>,
) {
    refresh(source.as_ref(), flight_id, &state).await;

    let mut ticker = interval_at(Instant::now() + TICK, TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match countdown.tick() {
            Tick::Running(left) => state.send_modify(|s| s.time_left = left),
            Tick::Expired => {
                let ceiling = countdown.remaining();
                state.send_modify(|s| s.time_left = ceiling);
                refresh(source.as_ref(), flight_id, &state).await;
                // Следующий тик через секунду после окончания запроса
                ticker.reset();
            }
        }
    }
}

async fn refresh<S: FlightSource + ?Sized>(
    source: &S,
    flight_id: i64,
    state: &watch::Sender<FlightDetailsState>,
) {
    state.send_modify(|s| {
        s.is_loading = true;
        s.error = None;
    });

    match source.fetch_details(flight_id).await {
        Ok(details) => state.send_modify(|s| {
            s.details = Some(details);
            s.is_loading = false;
        }),
        Err(e) => {
            error!("Error fetching flight details for {}: {}", flight_id, e);
            state.send_modify(|s| {
                s.error = Some(FETCH_ERROR_MESSAGE.to_string());
                s.is_loading = false;
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight_client::ClientError;
    use futures::future::{BoxFuture, FutureExt};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubSource {
        calls: AtomicUsize,
        // Номер первого вызова, который падает; 0 - не падает никогда
        fail_from: usize,
        slow_call: Option<(usize, Duration)>,
    }

    impl StubSource {
        fn new(fail: bool) -> Arc<Self> {
            Self::scripted(if fail { 1 } else { 0 }, None)
        }

        fn scripted(fail_from: usize, slow_call: Option<(usize, Duration)>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail_from,
                slow_call,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl FlightSource for StubSource {
        fn fetch_details(&self, flight_id: i64) -> BoxFuture<'_, Result<FlightDetails, ClientError>> {
            async move {
                let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
                if let Some((slow, delay)) = self.slow_call {
                    if slow == call {
                        tokio::time::sleep(delay).await;
                    }
                }
                if self.fail_from != 0 && call >= self.fail_from {
                    return Err(ClientError::Status(reqwest::StatusCode::BAD_GATEWAY));
                }
                Ok(FlightDetails {
                    id: flight_id,
                    departure_location: "Oslo".to_string(),
                    arrival_location: "Paris".to_string(),
                    departure_time: "2024-09-01T07:00:00".to_string(),
                    arrival_time: "2024-09-01T09:30:00".to_string(),
                    duration: format!("fetch #{}", call),
                    airline: "SAS".to_string(),
                    available_seats: vec![],
                    luggage_options: vec![],
                    prices: Default::default(),
                    price_history: Default::default(),
                })
            }
            .boxed()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn loads_then_counts_down() {
        let source = StubSource::new(false);
        let view = FlightDetailsView::open(source.clone(), 5, 60);
        let mut rx = view.subscribe();

        let state = rx.wait_for(|s| !s.is_loading).await.unwrap().clone();
        assert_eq!(state.details.as_ref().map(|d| d.id), Some(5));
        assert_eq!(state.time_left, 60);

        tokio::time::sleep(Duration::from_millis(10_500)).await;

        let state = view.snapshot();
        assert_eq!(state.time_left, 50);
        assert_eq!(state.minutes_seconds(), (0, 50));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn refetches_when_countdown_expires() {
        let source = StubSource::new(false);
        let view = FlightDetailsView::open(source.clone(), 5, 60);

        tokio::time::sleep(Duration::from_millis(60_500)).await;

        let state = view.snapshot();
        assert_eq!(source.calls(), 2);
        assert_eq!(state.time_left, 60);
        assert_eq!(state.details.map(|d| d.duration), Some("fetch #2".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_sets_error_message() {
        let source = StubSource::new(true);
        let view = FlightDetailsView::open(source, 9, 60);
        let mut rx = view.subscribe();

        let state = rx.wait_for(|s| !s.is_loading).await.unwrap().clone();

        assert_eq!(state.error.as_deref(), Some(FETCH_ERROR_MESSAGE));
        assert!(state.details.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_view_stops_refreshing() {
        let source = StubSource::new(false);
        let view = FlightDetailsView::open(source.clone(), 5, 2);
        let mut rx = view.subscribe();
        rx.wait_for(|s| !s.is_loading).await.unwrap();

        drop(view);
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_stands_still_while_refetching() {
        let source = StubSource::scripted(0, Some((2, Duration::from_secs(5))));
        let view = FlightDetailsView::open(source.clone(), 5, 60);

        // Отсчет истек на 60-й секунде, второй запрос идет 5 секунд
        tokio::time::sleep(Duration::from_millis(62_500)).await;
        let state = view.snapshot();
        assert_eq!(source.calls(), 2);
        assert!(state.is_loading);
        assert_eq!(state.time_left, 60);

        tokio::time::sleep(Duration::from_secs(3)).await;
        let state = view.snapshot();
        assert!(!state.is_loading);
        assert_eq!(state.time_left, 60);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(view.snapshot().time_left, 59);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refetch_keeps_previous_details() {
        let source = StubSource::scripted(2, Some((2, Duration::from_secs(5))));
        let view = FlightDetailsView::open(source.clone(), 5, 60);
        let mut rx = view.subscribe();

        let state = rx.wait_for(|s| s.error.is_some()).await.unwrap().clone();

        assert_eq!(source.calls(), 2);
        assert!(!state.is_loading);
        assert_eq!(state.error.as_deref(), Some(FETCH_ERROR_MESSAGE));
        assert_eq!(state.details.map(|d| d.duration), Some("fetch #1".to_string()));
    }

    #[test]
    fn state_serializes_in_camel_case() {
        let state = FlightDetailsState::loading(42);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"details": null, "isLoading": true, "error": null, "timeLeft": 42})
        );
    }
}
