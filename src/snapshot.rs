//! Derived metrics exposed to presentation consumers.
//!
//! A snapshot is immutable once built; the engine publishes a new one by
//! replacing the shared reference, never by mutating fields in place.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::model::{Bank, TxnStatus};

/// Categorical classification of a bank's recent success rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthTier {
    Healthy,
    Warning,
    Critical,
}

impl fmt::Display for HealthTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tier = match self {
            HealthTier::Healthy => "healthy",
            HealthTier::Warning => "warning",
            HealthTier::Critical => "critical",
        };
        f.write_str(tier)
    }
}

/// Per-bank aggregate line of the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankHealth {
    pub bank: Bank,
    /// Rounded average latency in ms; `None` when no event carried one.
    pub avg_latency: Option<u64>,
    /// Success percentage, rounded to one decimal.
    pub success_rate: f64,
    pub retry_count: u32,
    pub tier: HealthTier,
}

/// One line of the recent-log view, projected 1:1 from a stored record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Display time (`HH:MM:SS`, UTC) of the record's latest event.
    pub time: String,
    pub txn_id: String,
    pub status: TxnStatus,
    /// Mirrors the status string; there is no separate human message.
    pub message: String,
    pub bank: Bank,
    pub attempts: u32,
}

/// Fully recomputed view of all derived metrics at one point in time.
///
/// Banks with no records are absent from the maps rather than zero-filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub retry_count_per_bank: BTreeMap<Bank, u32>,
    pub latency_per_bank: BTreeMap<Bank, u64>,
    pub status_distribution: BTreeMap<TxnStatus, u32>,
    pub bank_health: Vec<BankHealth>,
    pub recent_logs: Vec<LogEntry>,
}
