//! Single-pass metrics aggregation over the transaction store.

use std::collections::BTreeMap;

use crate::model::{Bank, TxnStatus};
use crate::snapshot::{BankHealth, HealthTier, LogEntry, MetricsSnapshot};
use crate::store::TransactionStore;

/// Success percentage above which a bank is healthy.
const HEALTHY_ABOVE: f64 = 90.0;
/// Success percentage above which a bank is degraded rather than critical.
const WARNING_ABOVE: f64 = 75.0;

/// Running per-bank totals accumulated during the pass; never persisted.
#[derive(Debug, Default)]
struct BankStats {
    total: u32,
    success: u32,
    latency_sum: f64,
    latency_count: u32,
    retries: u32,
}

/// Map a success rate to a health tier.
///
/// Thresholds are fixed and there is no hysteresis; a bank near a boundary
/// may change tier on every recompute.
pub fn classify(success_rate: f64) -> HealthTier {
    if success_rate > HEALTHY_ABOVE {
        HealthTier::Healthy
    } else if success_rate > WARNING_ABOVE {
        HealthTier::Warning
    } else {
        HealthTier::Critical
    }
}

fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Derive a full [`MetricsSnapshot`] from the current store contents.
///
/// Pure function of the store: one pass over the records, then per-bank
/// derivation. Tiers are classified on the rounded success rate so the
/// exposed rate and tier can never disagree.
pub fn recompute(store: &TransactionStore, recent_log_cap: usize) -> MetricsSnapshot {
    let mut per_bank: BTreeMap<Bank, BankStats> = BTreeMap::new();
    let mut status_distribution: BTreeMap<TxnStatus, u32> = BTreeMap::new();
    let mut recent_logs = Vec::with_capacity(recent_log_cap.min(store.len()));

    for record in store.iter() {
        *status_distribution.entry(record.status).or_insert(0) += 1;

        let stats = per_bank.entry(record.bank).or_default();
        stats.total += 1;
        if record.status == TxnStatus::Success {
            stats.success += 1;
        }
        if record.attempts > 1 {
            stats.retries += record.attempts - 1;
        }
        if let Some(latency) = record.latency {
            stats.latency_sum += latency;
            stats.latency_count += 1;
        }

        // store iteration is newest first, so the log view just takes the head
        if recent_logs.len() < recent_log_cap {
            recent_logs.push(LogEntry {
                time: record.timestamp.format("%H:%M:%S").to_string(),
                txn_id: record.txn_id.clone(),
                status: record.status,
                message: record.status.to_string(),
                bank: record.bank,
                attempts: record.attempts,
            });
        }
    }

    let mut retry_count_per_bank = BTreeMap::new();
    let mut latency_per_bank = BTreeMap::new();
    let mut bank_health = Vec::with_capacity(per_bank.len());

    for (bank, stats) in per_bank {
        retry_count_per_bank.insert(bank, stats.retries);

        let avg_latency = (stats.latency_count > 0)
            .then(|| (stats.latency_sum / stats.latency_count as f64).round() as u64);
        if let Some(avg) = avg_latency {
            latency_per_bank.insert(bank, avg);
        }

        // total is >= 1 for every bank present in the map
        let success_rate = one_decimal(stats.success as f64 / stats.total as f64 * 100.0);
        bank_health.push(BankHealth {
            bank,
            avg_latency,
            success_rate,
            retry_count: stats.retries,
            tier: classify(success_rate),
        });
    }

    MetricsSnapshot {
        retry_count_per_bank,
        latency_per_bank,
        status_distribution,
        bank_health,
        recent_logs,
    }
}
