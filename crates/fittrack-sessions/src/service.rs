//! Sessions view backend: session list, selection and derived weather.
//!
//! Network work runs on the tokio runtime; the view state sits behind a
//! `parking_lot::Mutex` that is never held across an `.await`.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::client::SessionQuery;
use crate::error::FetchError;
use crate::matcher::nearest_observation;
use crate::selection::{Selection, SelectionState};
use crate::stats::{aggregate, field_coverage};
use crate::types::{FieldCoverage, Session, WeatherObservation, WeatherStats};

/// Presentation values derived from one observation snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherView {
    /// Observation closest to the session start; `None` when there are none.
    pub nearest: Option<WeatherObservation>,
    /// Aggregate stats; `None` when there are no observations.
    pub stats: Option<WeatherStats>,
    pub coverage: FieldCoverage,
}

impl WeatherView {
    /// Derive the nearest match and the stats from the same snapshot.
    pub fn derive(session: &Session, observations: &[WeatherObservation]) -> Self {
        Self {
            nearest: nearest_observation(observations, &session.start_time).cloned(),
            stats: aggregate(observations),
            coverage: field_coverage(observations),
        }
    }
}

/// Point-in-time copy of the view state.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionsSnapshot {
    pub sessions: Vec<Session>,
    pub selected: Option<Session>,
    pub state: SelectionState,
    pub weather: Option<WeatherView>,
    pub last_error: Option<String>,
}

#[derive(Debug, Default)]
struct ViewState {
    sessions: Vec<Session>,
    selected: Option<Session>,
    selection: Selection,
    last_error: Option<String>,
}

#[derive(Clone)]
pub struct SessionsService {
    query: Arc<dyn SessionQuery>,
    state: Arc<Mutex<ViewState>>,
}

impl SessionsService {
    pub fn new(query: Arc<dyn SessionQuery>) -> Self {
        Self {
            query,
            state: Arc::new(Mutex::new(ViewState::default())),
        }
    }

    /// Reload the session list. On failure the previous list is kept and the
    /// error recorded for display.
    pub async fn refresh(&self) -> Result<usize, FetchError> {
        match self.query.list_sessions().await {
            Ok(sessions) => {
                let count = sessions.len();
                let mut state = self.state.lock();
                state.sessions = sessions;
                state.last_error = None;
                tracing::info!("Loaded {} sessions", count);
                Ok(count)
            }
            Err(err) => {
                tracing::warn!("Session list refresh failed: {}", err);
                self.state.lock().last_error = Some(err.message().to_string());
                Err(err)
            }
        }
    }

    /// Select a session and start loading its weather.
    ///
    /// The returned handle resolves to `true` if the result was applied and
    /// `false` if a later selection superseded it first. Only an applied result
    /// touches `last_error`: a failure sets it and a success clears it.
    pub fn select(&self, session: Session) -> JoinHandle<bool> {
        let ticket = {
            let mut state = self.state.lock();
            let ticket = state.selection.begin(session.id);
            state.selected = Some(session);
            ticket
        };

        let query = Arc::clone(&self.query);
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let result = query.get_weather(ticket.session_id()).await;
            let error = result.as_ref().err().map(|e| e.message().to_string());

            let mut state = state.lock();
            let applied = state.selection.complete(ticket, result);
            if applied {
                state.last_error = error;
            }
            applied
        })
    }

    /// Select by id from the loaded list. Returns `None` if the id is unknown.
    pub fn select_id(&self, session_id: i64) -> Option<JoinHandle<bool>> {
        let session = self
            .state
            .lock()
            .sessions
            .iter()
            .find(|s| s.id == session_id)
            .cloned()?;
        Some(self.select(session))
    }

    /// Clear the selection; any load in flight becomes stale.
    pub fn clear_selection(&self) {
        let mut state = self.state.lock();
        state.selection.clear();
        state.selected = None;
    }

    pub fn snapshot(&self) -> SessionsSnapshot {
        let state = self.state.lock();
        let selection_state = state.selection.state().clone();

        let weather = match (&state.selected, selection_state.observations()) {
            (Some(session), Some(observations)) => Some(WeatherView::derive(session, observations)),
            _ => None,
        };

        SessionsSnapshot {
            sessions: state.sessions.clone(),
            selected: state.selected.clone(),
            state: selection_state,
            weather,
            last_error: state.last_error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::{oneshot, Mutex as AsyncMutex};

    type Pending = oneshot::Receiver<Result<Vec<WeatherObservation>, FetchError>>;

    /// Query whose weather responses are released by the test.
    #[derive(Default)]
    struct ScriptedQuery {
        sessions: parking_lot::Mutex<Vec<Result<Vec<Session>, FetchError>>>,
        weather: AsyncMutex<HashMap<i64, Pending>>,
    }

    #[async_trait]
    impl SessionQuery for ScriptedQuery {
        async fn list_sessions(&self) -> Result<Vec<Session>, FetchError> {
            self.sessions.lock().remove(0)
        }

        async fn get_weather(
            &self,
            session_id: i64,
        ) -> Result<Vec<WeatherObservation>, FetchError> {
            let rx = self.weather.lock().await.remove(&session_id);
            match rx {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(FetchError::fetch_failed("dropped"))),
                None => Ok(vec![]),
            }
        }
    }

    fn session(id: i64, start: &str) -> Session {
        Session {
            id,
            user_id: 1,
            start_time: start.to_string(),
            end_time: start.to_string(),
            sport: Some("run".into()),
            distance_km: None,
            avg_hr: None,
            calories: None,
            steps: None,
            lat: 0.0,
            lon: 0.0,
        }
    }

    fn obs(ts: &str, temp: f64) -> WeatherObservation {
        WeatherObservation {
            timestamp: ts.to_string(),
            temperature_c: Some(temp),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn refresh_failure_keeps_previous_list() {
        let query = Arc::new(ScriptedQuery::default());
        query.sessions.lock().push(Ok(vec![session(1, "2025-03-01T10:00:00Z")]));
        query
            .sessions
            .lock()
            .push(Err(FetchError::fetch_failed("HTTP 500 fetching x")));

        let service = SessionsService::new(query);
        assert_eq!(service.refresh().await.unwrap(), 1);
        assert!(service.refresh().await.is_err());

        let snapshot = service.snapshot();
        assert_eq!(snapshot.sessions.len(), 1);
        assert_eq!(snapshot.last_error.as_deref(), Some("HTTP 500 fetching x"));
    }

    #[tokio::test]
    async fn selection_derives_badge_and_stats_from_same_snapshot() {
        let query = Arc::new(ScriptedQuery::default());
        let (tx, rx) = oneshot::channel();
        query.weather.lock().await.insert(1, rx);

        let service = SessionsService::new(query);
        let handle = service.select(session(1, "2025-03-01T10:20:00Z"));
        assert!(service.snapshot().state.is_loading());

        tx.send(Ok(vec![
            obs("2025-03-01T10:00:00Z", 20.0),
            obs("2025-03-01T10:30:00Z", 22.0),
        ]))
        .unwrap();
        assert!(handle.await.unwrap());

        let weather = service.snapshot().weather.unwrap();
        assert_eq!(weather.nearest.unwrap().timestamp, "2025-03-01T10:30:00Z");
        assert_eq!(weather.stats.unwrap().avg_temp_c, 21.0);
    }

    #[tokio::test]
    async fn stale_response_does_not_overwrite_newer_selection() {
        let query = Arc::new(ScriptedQuery::default());
        let (tx_a, rx_a) = oneshot::channel();
        let (tx_b, rx_b) = oneshot::channel();
        query.weather.lock().await.insert(1, rx_a);
        query.weather.lock().await.insert(2, rx_b);

        let service = SessionsService::new(query);
        let first = service.select(session(1, "2025-03-01T10:00:00Z"));
        let second = service.select(session(2, "2025-03-02T10:00:00Z"));

        tx_b.send(Ok(vec![obs("2025-03-02T10:00:00Z", 5.0)])).unwrap();
        assert!(second.await.unwrap());

        tx_a.send(Ok(vec![obs("2025-03-01T10:00:00Z", 30.0)])).unwrap();
        assert!(!first.await.unwrap());

        let snapshot = service.snapshot();
        assert_eq!(snapshot.selected.unwrap().id, 2);
        assert_eq!(snapshot.state.session_id(), Some(2));
        assert_eq!(snapshot.weather.unwrap().stats.unwrap().avg_temp_c, 5.0);
    }

    #[tokio::test]
    async fn empty_observations_yield_no_match_and_no_stats() {
        let service = SessionsService::new(Arc::new(ScriptedQuery::default()));
        assert!(service.select(session(3, "2025-03-01T10:00:00Z")).await.unwrap());

        let weather = service.snapshot().weather.unwrap();
        assert!(weather.nearest.is_none());
        assert!(weather.stats.is_none());
    }

    #[tokio::test]
    async fn failed_weather_load_is_reported() {
        let query = Arc::new(ScriptedQuery::default());
        let (tx, rx) = oneshot::channel();
        query.weather.lock().await.insert(4, rx);

        let service = SessionsService::new(query);
        let handle = service.select(session(4, "2025-03-01T10:00:00Z"));
        tx.send(Err(FetchError::fetch_failed("HTTP 404 fetching y"))).unwrap();
        assert!(handle.await.unwrap());

        let snapshot = service.snapshot();
        assert!(snapshot.weather.is_none());
        assert!(matches!(snapshot.state, SelectionState::Failed { session_id: 4, .. }));
        assert_eq!(snapshot.last_error.as_deref(), Some("HTTP 404 fetching y"));
    }

    #[tokio::test]
    async fn stale_failure_leaves_no_error_behind() {
        let query = Arc::new(ScriptedQuery::default());
        let (tx_a, rx_a) = oneshot::channel();
        let (tx_b, rx_b) = oneshot::channel();
        query.weather.lock().await.insert(1, rx_a);
        query.weather.lock().await.insert(2, rx_b);

        let service = SessionsService::new(query);
        let first = service.select(session(1, "2025-03-01T10:00:00Z"));
        let second = service.select(session(2, "2025-03-02T10:00:00Z"));

        tx_b.send(Ok(vec![obs("2025-03-02T10:00:00Z", 5.0)])).unwrap();
        assert!(second.await.unwrap());

        tx_a.send(Err(FetchError::fetch_failed("HTTP 500 stale"))).unwrap();
        assert!(!first.await.unwrap());

        let snapshot = service.snapshot();
        assert_eq!(snapshot.state.session_id(), Some(2));
        assert!(snapshot.weather.is_some());
        assert_eq!(snapshot.last_error, None);
    }

    #[tokio::test]
    async fn successful_load_clears_previous_weather_error() {
        let query = Arc::new(ScriptedQuery::default());
        let (tx_a, rx_a) = oneshot::channel();
        let (tx_b, rx_b) = oneshot::channel();
        query.weather.lock().await.insert(1, rx_a);
        query.weather.lock().await.insert(2, rx_b);

        let service = SessionsService::new(query);
        let first = service.select(session(1, "2025-03-01T10:00:00Z"));
        tx_a.send(Err(FetchError::fetch_failed("HTTP 500 old"))).unwrap();
        assert!(first.await.unwrap());
        assert_eq!(service.snapshot().last_error.as_deref(), Some("HTTP 500 old"));

        let second = service.select(session(2, "2025-03-02T10:00:00Z"));
        tx_b.send(Ok(vec![obs("2025-03-02T10:00:00Z", 5.0)])).unwrap();
        assert!(second.await.unwrap());

        let snapshot = service.snapshot();
        assert!(snapshot.state.observations().is_some());
        assert_eq!(snapshot.last_error, None);
    }

    #[tokio::test]
    async fn select_id_requires_loaded_session() {
        let query = Arc::new(ScriptedQuery::default());
        query.sessions.lock().push(Ok(vec![session(9, "2025-03-01T10:00:00Z")]));

        let service = SessionsService::new(query);
        assert!(service.select_id(9).is_none());

        service.refresh().await.unwrap();
        let handle = service.select_id(9).unwrap();
        assert!(handle.await.unwrap());
        assert!(service.select_id(10).is_none());
    }

    #[tokio::test]
    async fn clear_selection_discards_in_flight_load() {
        let query = Arc::new(ScriptedQuery::default());
        let (tx, rx) = oneshot::channel();
        query.weather.lock().await.insert(5, rx);

        let service = SessionsService::new(query);
        let handle = service.select(session(5, "2025-03-01T10:00:00Z"));
        service.clear_selection();
        tx.send(Ok(vec![obs("2025-03-01T10:00:00Z", 1.0)])).unwrap();

        assert!(!handle.await.unwrap());
        let snapshot = service.snapshot();
        assert!(snapshot.selected.is_none());
        assert_eq!(snapshot.state, SelectionState::Idle);
    }
}
