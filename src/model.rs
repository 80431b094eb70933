//! Core domain types for the switch metrics core.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Amount;

/// Transaction identifier, the reconciliation key for lifecycle events.
pub type TxnId = String;

/// Bank codes known to the switch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Bank {
    Sbi,
    Hdfc,
    Axis,
    Icici,
}

impl Bank {
    pub fn code(&self) -> &'static str {
        match self {
            Bank::Sbi => "SBI",
            Bank::Hdfc => "HDFC",
            Bank::Axis => "AXIS",
            Bank::Icici => "ICICI",
        }
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Lifecycle state of a transaction as last reported by the switch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum TxnStatus {
    Success,
    Processing,
    Failed,
    Retrying,
}

impl TxnStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnStatus::Success => "SUCCESS",
            TxnStatus::Processing => "PROCESSING",
            TxnStatus::Failed => "FAILED",
            TxnStatus::Retrying => "RETRYING",
        }
    }
}

impl fmt::Display for TxnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single lifecycle event as handed over by the transport adapter.
///
/// Repeated events carry the same `txn_id`; the optional fields are only
/// required the first time a transaction is seen.
#[derive(Debug, Clone)]
pub struct TxnEvent {
    pub txn_id: TxnId,
    pub sender_vpa: Option<String>,
    pub receiver_vpa: Option<String>,
    pub amount: Option<Amount>,
    pub status: TxnStatus,
    pub attempts: u32,
    /// Switch-to-bank round trip in milliseconds.
    pub latency: Option<f64>,
    pub bank: Bank,
    pub timestamp: DateTime<Utc>,
}

/// Reconciled state of one transaction.
///
/// `txn_id`, the VPAs and the amount are fixed at first insert; the rest is
/// last-write-wins across later events for the same id. No causality check
/// is applied, so a stale event can overwrite a newer state.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub txn_id: TxnId,
    pub sender_vpa: String,
    pub receiver_vpa: String,
    pub amount: Amount,
    pub status: TxnStatus,
    pub attempts: u32,
    pub latency: Option<f64>,
    pub bank: Bank,
    pub timestamp: DateTime<Utc>,
}
