//! Session state: current forecast, history ledger and the in-flight guard
//!
//! A session accepts at most one outstanding forecast. A second submission
//! while one is pending fails with [`BikecastError::Busy`] instead of queueing.
//! The ledger append and the current-result update happen under one write
//! lock, so readers never see one without the other.

use crate::export;
use crate::forecast::ForecastProvider;
use crate::history::{HistoryEntry, HistoryLedger, LedgerSummary, SortOrder};
use crate::models::{ForecastRequest, ForecastResult};
use crate::validation;
use crate::{BikecastError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// The latest successful forecast together with the inputs it was made for
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CompletedForecast {
    pub request: ForecastRequest,
    pub result: ForecastResult,
}

/// Outcome of a successful submission
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub result: ForecastResult,
    pub entry: HistoryEntry,
}

#[derive(Debug, Default)]
struct SessionState {
    ledger: HistoryLedger,
    current: Option<CompletedForecast>,
}

/// Clears the in-flight flag when the submission ends, however it ends
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn claim(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ForecastSession {
    id: Uuid,
    provider: Arc<dyn ForecastProvider>,
    state: RwLock<SessionState>,
    in_flight: AtomicBool,
    last_active: Mutex<Instant>,
}

impl ForecastSession {
    #[must_use]
    pub fn new(provider: Arc<dyn ForecastProvider>) -> Self {
        Self {
            id: Uuid::new_v4(),
            provider,
            state: RwLock::new(SessionState::default()),
            in_flight: AtomicBool::new(false),
            last_active: Mutex::new(Instant::now()),
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether a forecast is currently outstanding
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn touch(&self) {
        *self.last_active.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    /// Time since the session was last looked up or created
    #[must_use]
    pub fn idle_for(&self) -> Duration {
        self.last_active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validate, forecast and record a request.
    ///
    /// Nothing is recorded on validation or engine failure.
    #[instrument(skip_all, fields(session = %self.id, provider = self.provider.name()))]
    pub async fn submit(&self, request: ForecastRequest) -> Result<Submission> {
        let Some(_guard) = InFlightGuard::claim(&self.in_flight) else {
            warn!("Rejected submission while a forecast is in flight");
            return Err(BikecastError::Busy);
        };

        validation::validate(&request)?;

        let result = self.provider.forecast(&request).await?;

        let entry = {
            let mut state = self.write();
            let entry = state.ledger.append(&request, &result, Utc::now()).clone();
            state.current = Some(CompletedForecast { request, result });
            entry
        };

        info!(
            prediction = result.prediction,
            confidence = result.confidence,
            entry = %entry.id,
            "Forecast recorded"
        );
        Ok(Submission { result, entry })
    }

    #[must_use]
    pub fn current(&self) -> Option<CompletedForecast> {
        self.read().current.clone()
    }

    /// Owned copy of the history in the requested order
    #[must_use]
    pub fn history(&self, order: SortOrder) -> Vec<HistoryEntry> {
        self.read()
            .ledger
            .sorted_view(order)
            .into_iter()
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn summary(&self) -> LedgerSummary {
        self.read().ledger.aggregate()
    }

    pub fn clear_history(&self) {
        self.write().ledger.clear();
        info!(session = %self.id, "History cleared");
    }

    /// CSV of the history in stored order
    pub fn export_csv(&self) -> Result<String> {
        export::export_csv(&self.read().ledger)
    }
}

/// Sessions untouched for this long are dropped on the next sweep
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// All live sessions of the process, sharing one provider.
///
/// Idle sessions are swept whenever a new one is created, so the map stays
/// bounded by the creation rate over one idle timeout.
pub struct SessionRegistry {
    provider: Arc<dyn ForecastProvider>,
    sessions: RwLock<HashMap<Uuid, Arc<ForecastSession>>>,
    idle_timeout: Duration,
}

impl SessionRegistry {
    #[must_use]
    pub fn new(provider: Arc<dyn ForecastProvider>) -> Self {
        Self::with_idle_timeout(provider, DEFAULT_IDLE_TIMEOUT)
    }

    #[must_use]
    pub fn with_idle_timeout(provider: Arc<dyn ForecastProvider>, idle_timeout: Duration) -> Self {
        Self {
            provider,
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    #[must_use]
    pub fn provider(&self) -> Arc<dyn ForecastProvider> {
        Arc::clone(&self.provider)
    }

    pub fn create(&self) -> Arc<ForecastSession> {
        self.sweep_idle();
        let session = Arc::new(ForecastSession::new(self.provider()));
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.id(), Arc::clone(&session));
        info!(session = %session.id(), "Session created");
        session
    }

    /// Look up a session by its textual id and mark it active
    pub fn get(&self, id: &str) -> Result<Arc<ForecastSession>> {
        let parsed = parse_id(id)?;
        let session = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&parsed)
            .cloned()
            .ok_or_else(|| BikecastError::session_not_found(id))?;
        session.touch();
        Ok(session)
    }

    /// End a session. A forecast still in flight completes against the
    /// detached session and is discarded with it.
    pub fn remove(&self, id: &str) -> Result<()> {
        let parsed = parse_id(id)?;
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&parsed)
            .ok_or_else(|| BikecastError::session_not_found(id))?;
        info!(session = %parsed, "Session ended");
        Ok(())
    }

    /// Drop sessions idle longer than the timeout. Busy sessions are kept.
    pub fn sweep_idle(&self) -> usize {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, session| session.is_busy() || session.idle_for() < self.idle_timeout);
        let expired = before - sessions.len();
        if expired > 0 {
            debug!(expired, remaining = sessions.len(), "Expired idle sessions");
        }
        expired
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| BikecastError::session_not_found(id))
}
