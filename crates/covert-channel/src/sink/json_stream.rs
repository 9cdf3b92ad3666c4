//! NDJSON (newline-delimited JSON) stream sink.
//!
//! ```ignore
//! let mut sink = JsonStreamSink::stdout();
//! sink.write_summary(&report.to_row())?;
//! sink.write_events(&tx.events)?;
//! sink.finish()?;
//! ```

use covert_core::types::TurnEvent;
use serde::Serialize;
use std::io::{self, BufWriter, Write};

use super::SummaryRow;

/// Buffered NDJSON writer; each row is serialized straight into the
/// `BufWriter` via `serde_json::to_writer`.
pub struct JsonStreamSink<W: Write> {
    writer: BufWriter<W>,
    rows_written: usize,
}

impl JsonStreamSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonStreamSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(64 * 1024, writer),
            rows_written: 0,
        }
    }

    pub fn write_summary(&mut self, row: &SummaryRow) -> io::Result<()> {
        self.write_row(row)
    }

    /// One line per turn, in turn order.
    pub fn write_events(&mut self, events: &[TurnEvent]) -> io::Result<()> {
        for event in events {
            self.write_row(event)?;
        }
        Ok(())
    }

    /// Flush and return how many rows were written.
    pub fn finish(mut self) -> io::Result<usize> {
        self.writer.flush()?;
        Ok(self.rows_written)
    }

    fn write_row<T: Serialize>(&mut self, row: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, row)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        self.writer.write_all(b"\n")?;
        self.rows_written += 1;
        Ok(())
    }
}
