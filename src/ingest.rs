//! Ingestion boundary between the transport adapter and the engine.
//!
//! A dedicated task owns the [`Engine`] and drains a bounded channel of
//! incoming events, so upserts and recomputes are serialized without any
//! shared mutable state.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tracing::warn;

use crate::engine::{Engine, EngineConfig, IngestError};
use crate::model::TxnEvent;
use crate::snapshot::MetricsSnapshot;

const EVENT_QUEUE_DEPTH: usize = 64;

/// Handle to a running ingestion task.
pub struct Ingestor {
    events: mpsc::Sender<TxnEvent>,
    snapshots: watch::Receiver<Arc<MetricsSnapshot>>,
    task: JoinHandle<()>,
}

impl Ingestor {
    /// Spawn an engine on its own task and return the handle feeding it.
    pub fn spawn(config: EngineConfig) -> Self {
        let (events, queue) = mpsc::channel(EVENT_QUEUE_DEPTH);
        let mut engine = Engine::new(config);
        let snapshots = engine.subscribe();
        let task = tokio::spawn(async move {
            engine.run(ReceiverStream::new(queue)).await;
        });
        Self {
            events,
            snapshots,
            task,
        }
    }

    /// Forward one event to the engine.
    ///
    /// Events without a transaction id are rejected here, before they reach
    /// the queue; deeper validation failures are logged by the engine task.
    pub async fn publish(&self, event: TxnEvent) -> Result<(), IngestError> {
        if event.txn_id.is_empty() {
            return Err(IngestError::MissingTxnId);
        }
        self.events
            .send(event)
            .await
            .map_err(|_| IngestError::Closed)
    }

    /// Latest complete snapshot.
    pub fn latest(&self) -> Arc<MetricsSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// Subscribe to snapshot updates; dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<MetricsSnapshot>> {
        self.snapshots.clone()
    }

    /// Stop accepting events, wait for the queue to drain and return the
    /// final snapshot.
    pub async fn shutdown(self) -> Arc<MetricsSnapshot> {
        drop(self.events);
        if let Err(e) = self.task.await {
            warn!("ingestion task failed: {e}");
        }
        self.snapshots.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Amount;
    use crate::model::{Bank, TxnStatus};
    use chrono::{TimeZone, Utc};

    fn event(txn_id: &str, status: TxnStatus, attempts: u32) -> TxnEvent {
        TxnEvent {
            txn_id: txn_id.to_string(),
            sender_vpa: Some("user1@paytm".to_string()),
            receiver_vpa: Some("user2@phonepe".to_string()),
            amount: Some(Amount::from_float(500.0)),
            status,
            attempts,
            latency: Some(200.0),
            bank: Bank::Hdfc,
            timestamp: Utc.with_ymd_and_hms(2026, 8, 27, 10, 15, 10).unwrap(),
        }
    }

    #[tokio::test]
    async fn publish_then_shutdown_returns_final_snapshot() {
        let ingestor = Ingestor::spawn(EngineConfig::default());
        ingestor
            .publish(event("T1", TxnStatus::Processing, 1))
            .await
            .unwrap();
        ingestor
            .publish(event("T1", TxnStatus::Success, 2))
            .await
            .unwrap();
        ingestor
            .publish(event("T2", TxnStatus::Failed, 1))
            .await
            .unwrap();

        let snapshot = ingestor.shutdown().await;

        assert_eq!(snapshot.status_distribution[&TxnStatus::Success], 1);
        assert_eq!(snapshot.status_distribution[&TxnStatus::Failed], 1);
        assert_eq!(snapshot.retry_count_per_bank[&Bank::Hdfc], 1);
        assert_eq!(snapshot.recent_logs.len(), 2);
    }

    #[tokio::test]
    async fn publish_rejects_missing_txn_id() {
        let ingestor = Ingestor::spawn(EngineConfig::default());

        let result = ingestor.publish(event("", TxnStatus::Success, 1)).await;
        assert!(matches!(result, Err(IngestError::MissingTxnId)));

        let snapshot = ingestor.shutdown().await;
        assert!(snapshot.recent_logs.is_empty());
    }

    #[tokio::test]
    async fn subscriber_observes_updates() {
        let ingestor = Ingestor::spawn(EngineConfig::default());
        let mut rx = ingestor.subscribe();

        ingestor
            .publish(event("T1", TxnStatus::Success, 1))
            .await
            .unwrap();

        rx.changed().await.unwrap();
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.recent_logs[0].txn_id, "T1");
    }

    #[tokio::test]
    async fn dropped_subscriber_does_not_block_later_events() {
        let ingestor = Ingestor::spawn(EngineConfig::default());
        drop(ingestor.subscribe());

        ingestor
            .publish(event("T1", TxnStatus::Success, 1))
            .await
            .unwrap();
        ingestor
            .publish(event("T2", TxnStatus::Success, 1))
            .await
            .unwrap();

        let snapshot = ingestor.shutdown().await;
        assert_eq!(snapshot.recent_logs.len(), 2);
    }

    #[tokio::test]
    async fn slow_subscriber_coalesces_snapshots() {
        let ingestor = Ingestor::spawn(EngineConfig::default());
        let mut rx = ingestor.subscribe();

        for n in 0..5 {
            ingestor
                .publish(event(&format!("T{n}"), TxnStatus::Success, 1))
                .await
                .unwrap();
        }
        let snapshot = ingestor.shutdown().await;

        // the receiver was never polled in between: it sees only the latest
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), snapshot);
        assert_eq!(snapshot.recent_logs.len(), 5);
    }
}
