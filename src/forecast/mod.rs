//! Forecast engine
//!
//! - `engine`: the heuristic demand score
//! - `random`: injectable random sources for jitter and confidence
//! - `provider`: async request/response boundary and the simulated provider
//! - `remote`: HTTP provider for a real inference backend

pub mod engine;
pub mod provider;
pub mod random;
pub mod remote;

pub use engine::{base_demand, predict};
pub use provider::{ForecastProvider, SimulatedProvider};
pub use random::{FixedRandom, RandomSource, SeededRandom, ThreadRandom};
pub use remote::RemoteProvider;

use crate::config::{BikecastConfig, EngineMode};
use crate::{BikecastError, Result};
use std::sync::Arc;
use std::time::Duration;

/// Build the provider selected by the engine configuration
pub fn provider_from_config(config: &BikecastConfig) -> Result<Arc<dyn ForecastProvider>> {
    match config.engine.mode {
        EngineMode::Simulated => {
            let random: Box<dyn RandomSource> = match config.engine.seed {
                Some(seed) => Box::new(SeededRandom::new(seed)),
                None => Box::new(ThreadRandom),
            };
            Ok(Arc::new(SimulatedProvider::new(
                Duration::from_millis(config.engine.latency_ms),
                random,
            )))
        }
        EngineMode::Remote => {
            let endpoint = config
                .remote
                .endpoint
                .clone()
                .ok_or_else(|| BikecastError::config("remote.endpoint is not set"))?;
            let timeout = Duration::from_secs(u64::from(config.remote.timeout_seconds));
            Ok(Arc::new(RemoteProvider::new(endpoint, timeout)?))
        }
    }
}
