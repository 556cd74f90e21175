//! Forecast provider abstraction and the simulated in-process provider

use super::engine;
use super::random::{RandomSource, ThreadRandom};
use crate::models::{ForecastRequest, ForecastResult};
use crate::{BikecastError, Result};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, instrument};

/// Default simulated engine latency
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(2000);

/// Request/response boundary in front of a forecast engine.
///
/// Callers may be suspended while the provider works. Requests are assumed
/// to be validated already.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn forecast(&self, request: &ForecastRequest) -> Result<ForecastResult>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Runs the heuristic engine locally after a fixed delay
pub struct SimulatedProvider {
    latency: Duration,
    random: Mutex<Box<dyn RandomSource>>,
}

impl SimulatedProvider {
    #[must_use]
    pub fn new(latency: Duration, random: Box<dyn RandomSource>) -> Self {
        Self {
            latency,
            random: Mutex::new(random),
        }
    }

    /// Provider without delay, useful for tests and batch use
    #[must_use]
    pub fn immediate(random: Box<dyn RandomSource>) -> Self {
        Self::new(Duration::ZERO, random)
    }
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY, Box::new(ThreadRandom))
    }
}

#[async_trait]
impl ForecastProvider for SimulatedProvider {
    #[instrument(name = "simulated_forecast", level = "debug", skip_all, fields(date = %request.date))]
    async fn forecast(&self, request: &ForecastRequest) -> Result<ForecastResult> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let mut random = self
            .random
            .lock()
            .map_err(|_| BikecastError::engine("random source lock poisoned"))?;
        let result = engine::predict(request, &mut **random);
        debug!(
            prediction = result.prediction,
            confidence = result.confidence,
            "Heuristic forecast computed"
        );
        Ok(result)
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}
