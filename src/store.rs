//! Bounded, order-preserving transaction store.
//!
//! Records are keyed by transaction id and kept in insertion order, newest
//! first. Repeated events for a known id reconcile in place without moving
//! the record; once the configured capacity is exceeded the oldest-inserted
//! record is evicted regardless of its status.

use std::collections::{HashMap, VecDeque};

use crate::engine::IngestError;
use crate::model::{TransactionRecord, TxnEvent, TxnId};

pub struct TransactionStore {
    capacity: usize,
    /// Insertion order, newest id at the front.
    order: VecDeque<TxnId>,
    records: HashMap<TxnId, TransactionRecord>,
}

impl TransactionStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity + 1),
            records: HashMap::with_capacity(capacity + 1),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, txn_id: &str) -> Option<&TransactionRecord> {
        self.records.get(txn_id)
    }

    /// Iterate records in insertion order, most recently inserted first.
    pub fn iter(&self) -> impl Iterator<Item = &TransactionRecord> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// Insert a new record or reconcile an existing one.
    ///
    /// The store is left untouched when the event is rejected. Updates are
    /// last-write-wins with no ordering check against what is already held,
    /// and never change the record's position.
    pub fn upsert(&mut self, event: TxnEvent) -> Result<(), IngestError> {
        if event.txn_id.is_empty() {
            return Err(IngestError::MissingTxnId);
        }
        if event.attempts == 0 {
            return Err(IngestError::ZeroAttempts {
                txn_id: event.txn_id,
            });
        }

        if let Some(record) = self.records.get_mut(&event.txn_id) {
            record.status = event.status;
            record.attempts = event.attempts;
            record.latency = event.latency;
            record.bank = event.bank;
            record.timestamp = event.timestamp;
            return Ok(());
        }

        let record = first_insert(event)?;
        self.order.push_front(record.txn_id.clone());
        self.records.insert(record.txn_id.clone(), record);

        if self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_back() {
                self.records.remove(&oldest);
            }
        }

        Ok(())
    }
}

/// Build the initial record from a first-seen event; the fields that are
/// optional on updates must all be present here.
fn first_insert(event: TxnEvent) -> Result<TransactionRecord, IngestError> {
    let TxnEvent {
        txn_id,
        sender_vpa,
        receiver_vpa,
        amount,
        status,
        attempts,
        latency,
        bank,
        timestamp,
    } = event;

    let Some(sender_vpa) = sender_vpa else {
        return Err(IngestError::MissingField {
            txn_id,
            field: "senderVpa",
        });
    };
    let Some(receiver_vpa) = receiver_vpa else {
        return Err(IngestError::MissingField {
            txn_id,
            field: "receiverVpa",
        });
    };
    let Some(amount) = amount else {
        return Err(IngestError::MissingField {
            txn_id,
            field: "amount",
        });
    };
    if amount.is_negative() {
        return Err(IngestError::NegativeAmount { txn_id });
    }

    Ok(TransactionRecord {
        txn_id,
        sender_vpa,
        receiver_vpa,
        amount,
        status,
        attempts,
        latency,
        bank,
        timestamp,
    })
}
