pub mod amount;
pub mod engine;
pub mod ingest;
pub mod model;
pub mod snapshot;
pub mod store;
pub mod wire;

pub use amount::Amount;
pub use engine::{Engine, EngineConfig, IngestError};
pub use ingest::Ingestor;
pub use model::{Bank, TransactionRecord, TxnEvent, TxnId, TxnStatus};
pub use snapshot::{BankHealth, HealthTier, LogEntry, MetricsSnapshot};
pub use store::TransactionStore;
