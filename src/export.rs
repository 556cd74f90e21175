//! CSV projection of a session's forecast history
//!
//! Fields are written verbatim; embedded commas are not escaped.

use crate::history::{HistoryEntry, HistoryLedger};
use crate::{BikecastError, Result};
use chrono::{NaiveDate, SecondsFormat};

pub const CSV_HEADER: [&str; 5] = ["Data", "Previsão", "Clima", "Temperatura", "Timestamp"];

/// Render the ledger in stored order. Refuses an empty ledger.
pub fn export_csv(ledger: &HistoryLedger) -> Result<String> {
    if ledger.is_empty() {
        return Err(BikecastError::ExportRefused);
    }

    let mut rows = Vec::with_capacity(ledger.len() + 1);
    rows.push(CSV_HEADER.join(","));
    rows.extend(ledger.entries().map(format_row));
    Ok(rows.join("\n"))
}

/// Download filename for an export made on `day`
#[must_use]
pub fn export_filename(day: NaiveDate) -> String {
    format!("bike_predictions_{}.csv", day.format("%Y-%m-%d"))
}

fn format_row(entry: &HistoryEntry) -> String {
    // adding 0.0 folds -0 into 0
    let temperature = entry.temperature + 0.0;
    [
        entry.date.clone(),
        entry.prediction.to_string(),
        entry.weather.to_string(),
        format!("{temperature}°C"),
        entry.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
    ]
    .join(",")
}
