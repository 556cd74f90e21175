//! Remote forecast provider
//!
//! Posts the request JSON to an inference endpoint and reads a
//! `ForecastResult` back. Every failure mode (network, timeout, status,
//! body) surfaces as an engine failure.

use super::provider::ForecastProvider;
use crate::models::{ForecastRequest, ForecastResult};
use crate::{BikecastError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Confidence is a percentage
const MAX_CONFIDENCE: u8 = 100;

pub struct RemoteProvider {
    client: Client,
    endpoint: String,
}

impl RemoteProvider {
    /// Create a provider for `endpoint` with a bounded request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("BikeCast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BikecastError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ForecastProvider for RemoteProvider {
    #[instrument(name = "remote_forecast", skip_all, fields(endpoint = %self.endpoint))]
    async fn forecast(&self, request: &ForecastRequest) -> Result<ForecastResult> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    warn!("Forecast endpoint timed out");
                    BikecastError::engine("forecast request timed out")
                } else {
                    warn!("Forecast request failed: {}", e);
                    BikecastError::engine(format!("forecast request failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!("Forecast endpoint returned {}: {}", status, error_text);
            return Err(BikecastError::engine(format!(
                "forecast endpoint returned {status}"
            )));
        }

        let result: ForecastResult = response
            .json()
            .await
            .map_err(|e| BikecastError::engine(format!("malformed forecast response: {e}")))?;

        if result.prediction < 0 || result.confidence > MAX_CONFIDENCE {
            warn!(
                prediction = result.prediction,
                confidence = result.confidence,
                "Forecast endpoint returned out-of-range values"
            );
            return Err(BikecastError::engine(format!(
                "malformed forecast response: prediction {} / confidence {} out of range",
                result.prediction, result.confidence
            )));
        }

        info!(
            prediction = result.prediction,
            confidence = result.confidence,
            "Remote forecast received"
        );
        Ok(result)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
