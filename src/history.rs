//! In-memory forecast history for a session
//!
//! Entries are stored newest first and never modified after insertion. Sorted
//! views borrow from storage without reordering it.

use crate::models::{ForecastRequest, ForecastResult, WeatherCondition};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// One completed forecast run
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: Uuid,
    /// Forecast day as submitted
    pub date: String,
    pub prediction: i64,
    pub weather: WeatherCondition,
    /// Temperature in Celsius
    pub temperature: f64,
    /// When the forecast completed
    pub timestamp: DateTime<Utc>,
}

/// Display order for history views
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

/// Aggregates over the whole ledger
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct LedgerSummary {
    pub count: usize,
    /// Arithmetic mean of predictions, 0 when empty
    pub mean: f64,
    /// Prediction of the most recently appended entry
    pub latest: Option<i64>,
}

#[derive(Debug, Default, Clone)]
pub struct HistoryLedger {
    entries: VecDeque<HistoryEntry>,
}

impl HistoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed forecast at the front of the ledger
    pub fn append(
        &mut self,
        request: &ForecastRequest,
        result: &ForecastResult,
        completed_at: DateTime<Utc>,
    ) -> &HistoryEntry {
        self.entries.push_front(HistoryEntry {
            id: Uuid::new_v4(),
            date: request.date.clone(),
            prediction: result.prediction,
            weather: request.weather.clone(),
            temperature: request.temperature,
            timestamp: completed_at,
        });
        &self.entries[0]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in stored order (most recently appended first)
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &HistoryEntry> + DoubleEndedIterator {
        self.entries.iter()
    }

    /// Entries ordered by timestamp; ties keep their append order
    #[must_use]
    pub fn sorted_view(&self, order: SortOrder) -> Vec<&HistoryEntry> {
        match order {
            SortOrder::Newest => {
                let mut view: Vec<&HistoryEntry> = self.entries.iter().collect();
                view.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                view
            }
            SortOrder::Oldest => {
                let mut view: Vec<&HistoryEntry> = self.entries.iter().rev().collect();
                view.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
                view
            }
        }
    }

    #[must_use]
    pub fn aggregate(&self) -> LedgerSummary {
        let count = self.entries.len();
        let mean = if count == 0 {
            0.0
        } else {
            self.entries.iter().map(|e| e.prediction as f64).sum::<f64>() / count as f64
        };

        LedgerSummary {
            count,
            mean,
            latest: self.entries.front().map(|e| e.prediction),
        }
    }
}
