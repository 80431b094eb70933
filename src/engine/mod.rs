//! Switch metrics engine.
//!
//! Consumes transaction lifecycle events, reconciles them into the bounded
//! store and publishes a freshly derived [`MetricsSnapshot`] after every
//! accepted event. Also supports an async stream of events.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::{Stream, StreamExt};
use tracing::info;

use crate::model::TxnEvent;
use crate::snapshot::MetricsSnapshot;
use crate::store::TransactionStore;

mod aggregate;
pub use aggregate::{classify, recompute};

mod error;
pub use error::IngestError;

/// Default bounded-store capacity.
pub const DEFAULT_STORE_CAPACITY: usize = 500;
/// Default size of the recent-log view.
pub const DEFAULT_RECENT_LOGS: usize = 50;

/// Capacity limits for the engine.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Bounded store size; the oldest-inserted record is evicted beyond this.
    pub store_capacity: usize,
    /// Maximum number of entries in the recent-log view.
    pub recent_logs: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store_capacity: DEFAULT_STORE_CAPACITY,
            recent_logs: DEFAULT_RECENT_LOGS,
        }
    }
}

/// The metrics engine.
///
/// Owns the transaction store and the snapshot channel. Upsert and recompute
/// run back to back under `&mut self`, so no reader can ever observe a
/// snapshot that disagrees with a half-updated store.
pub struct Engine {
    store: TransactionStore,
    recent_logs: usize,
    snapshots: watch::Sender<Arc<MetricsSnapshot>>,
}

/// Public API
impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let (snapshots, _) = watch::channel(Arc::new(MetricsSnapshot::default()));
        Self {
            store: TransactionStore::new(config.store_capacity),
            recent_logs: config.recent_logs,
            snapshots,
        }
    }

    /// Run the engine over the given event stream.
    pub async fn run(&mut self, mut stream: impl Stream<Item = TxnEvent> + Unpin) {
        while let Some(event) = stream.next().await {
            // a rejected event should not stop the engine
            let _ = self.apply(event);
        }
    }

    /// The transactions currently held.
    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<MetricsSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// Subscribe to snapshot updates.
    ///
    /// Dropping the receiver unsubscribes. Delivery is best effort: a slow
    /// subscriber observes a coalesced later snapshot and never blocks
    /// ingestion.
    pub fn subscribe(&self) -> watch::Receiver<Arc<MetricsSnapshot>> {
        self.snapshots.subscribe()
    }

    /// Apply a single event: upsert, recompute, publish.
    pub fn apply(&mut self, event: TxnEvent) -> Result<(), IngestError> {
        let txn_id = event.txn_id.clone();
        let status = event.status;
        let bank = event.bank;

        if let Err(e) = self.store.upsert(event) {
            info!(txn_id = %txn_id, bank = %bank, reason = %e, "event skipped");
            return Err(e);
        }
        info!(txn_id = %txn_id, status = %status, bank = %bank, "event applied");

        let snapshot = recompute(&self.store, self.recent_logs);
        self.snapshots.send_replace(Arc::new(snapshot));
        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
