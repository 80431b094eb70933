//! Newline-delimited JSON wire adapter.
//!
//! Decodes one event per line in the transport's camelCase shape and writes
//! snapshots back out as JSON. Transport framing itself (sockets, files) is
//! a collaborator concern; this module only handles the payload.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::Amount;
use crate::model::{Bank, TxnEvent, TxnStatus};
use crate::snapshot::MetricsSnapshot;

/// Errors that can occur when decoding wire events
#[derive(Debug, Error)]
pub enum WireError {
    #[error("line {line}: failed to read: {source}")]
    Read { line: usize, source: io::Error },

    #[error("line {line}: failed to parse event: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },

    #[error("line {line}: timestamp out of range")]
    BadTimestamp { line: usize },
}

/// Event time on the wire: RFC-3339 string or integer epoch-millis.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EventTime {
    Millis(i64),
    Iso(DateTime<Utc>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    txn_id: String,
    sender_vpa: Option<String>,
    receiver_vpa: Option<String>,
    amount: Option<Amount>,
    status: TxnStatus,
    attempts: u32,
    latency: Option<f64>,
    bank: Bank,
    timestamp: EventTime,
}

/// Read newline-delimited JSON events from a file.
///
/// Yields one result per non-empty line; a bad line does not stop the
/// iterator.
pub fn read_events(path: impl AsRef<Path>) -> impl Iterator<Item = Result<TxnEvent, WireError>> {
    let file = File::open(path).expect("failed to open event log");
    let reader = BufReader::new(file);

    reader.lines().enumerate().filter_map(|(idx, result)| {
        let line = idx + 1;
        let text = match result {
            Ok(text) => text,
            Err(source) => return Some(Err(WireError::Read { line, source })),
        };
        if text.trim().is_empty() {
            return None;
        }
        Some(decode_event(line, &text))
    })
}

/// Decode a single wire line into a [`TxnEvent`].
pub fn decode_event(line: usize, text: &str) -> Result<TxnEvent, WireError> {
    let raw: RawEvent =
        serde_json::from_str(text).map_err(|source| WireError::Parse { line, source })?;

    let timestamp = match raw.timestamp {
        EventTime::Millis(ms) => DateTime::from_timestamp_millis(ms)
            .ok_or(WireError::BadTimestamp { line })?,
        EventTime::Iso(ts) => ts,
    };

    Ok(TxnEvent {
        txn_id: raw.txn_id,
        sender_vpa: raw.sender_vpa,
        receiver_vpa: raw.receiver_vpa,
        amount: raw.amount,
        status: raw.status,
        attempts: raw.attempts,
        latency: raw.latency,
        bank: raw.bank,
        timestamp,
    })
}

/// Write a snapshot to stdout as pretty-printed json
pub fn write_snapshot(snapshot: &MetricsSnapshot) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, snapshot).expect("failed to write snapshot");
    out.write_all(b"\n").expect("failed to flush snapshot");
}
