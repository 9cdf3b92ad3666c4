//! Machine-readable output for finished transmissions.
//!
//! Two row schemas:
//! - [`SummaryRow`]: one per transmission
//! - [`TurnEvent`](covert_core::TurnEvent): one per turn, when recorded
//!
//! Backend: NDJSON to any `Write` impl ([`json_stream`]).

pub mod json_stream;

use serde::Serialize;
use std::time::SystemTime;

use crate::reporter::Report;

/// One row per transmission.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub input_bytes: u64,
    pub decoded_bytes: u64,
    pub bits_sent: u64,
    pub creates: u64,
    pub handoffs: u64,
    pub intact: bool,
    pub elapsed_us: u64,
    pub finished_at_unix_ms: u64,
}

impl Report {
    /// Flatten the report into a sink-ready row.
    pub fn to_row(&self) -> SummaryRow {
        SummaryRow {
            input_bytes: self.input_bytes as u64,
            decoded_bytes: self.decoded_bytes as u64,
            bits_sent: self.bits_sent as u64,
            creates: self.creates as u64,
            handoffs: self.handoffs,
            intact: self.intact,
            elapsed_us: self.elapsed.as_micros() as u64,
            finished_at_unix_ms: unix_millis(),
        }
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
