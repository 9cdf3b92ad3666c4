//! Per-turn log shared by both actors.
//!
//! In verbose mode each turn becomes one `info` line. With recording on,
//! turns are also kept in order for the report and the NDJSON sink.
//! Recording happens while the recording actor still holds the turn, so
//! the stored order is the turn order.
//!
//! Actors only ever write here; neither reads the log back, so it is not a
//! channel between them. The session drains it after both have finished.

use covert_core::types::{Participant, TurnEvent};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct TurnLog {
    verbose: bool,
    events: Option<Mutex<Vec<TurnEvent>>>,
}

impl TurnLog {
    /// `verbose` logs each turn; `record` keeps each turn for later.
    pub fn new(verbose: bool, record: bool) -> Self {
        Self {
            verbose,
            events: record.then(|| Mutex::new(Vec::new())),
        }
    }

    /// Logs nothing and keeps nothing.
    pub fn quiet() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.events.is_some()
    }

    /// Called by the acting participant before it passes the token.
    pub fn record(&self, event: TurnEvent) {
        if self.verbose {
            log_turn(&event);
        }
        if let Some(events) = &self.events {
            events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event);
        }
    }

    /// Drains everything recorded so far.
    pub fn take_events(&self) -> Vec<TurnEvent> {
        match &self.events {
            Some(events) => std::mem::take(&mut *events.lock().unwrap_or_else(PoisonError::into_inner)),
            None => Vec::new(),
        }
    }
}

fn log_turn(event: &TurnEvent) {
    let issued = if event.instructions.is_empty() {
        "(none)".to_string()
    } else {
        event
            .instructions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    };
    let bit = u8::from(event.bit);

    match event.participant {
        Participant::Sender => {
            tracing::info!(turn = event.turn, bit, issued = %issued, "sender signalled");
        }
        Participant::Receiver => {
            tracing::info!(turn = event.turn, bit, issued = %issued, "receiver decoded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use covert_core::types::Instruction;
    use smallvec::{smallvec, SmallVec};
    use std::sync::Arc;

    fn event(turn: u64) -> TurnEvent {
        TurnEvent {
            turn,
            participant: Participant::Sender,
            instructions: smallvec![Instruction::create("obj")],
            bit: false,
        }
    }

    #[test]
    fn quiet_log_keeps_nothing() {
        let log = TurnLog::quiet();
        log.record(event(0));
        assert!(!log.is_recording());
        assert!(log.take_events().is_empty());
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture_logs(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn verbose_log_emits_one_line_per_turn() {
        let log = TurnLog::new(true, false);
        let output = capture_logs(|| {
            log.record(event(0));
            log.record(TurnEvent {
                turn: 1,
                participant: Participant::Receiver,
                instructions: smallvec![
                    Instruction::create("obj"),
                    Instruction::write("obj", 1),
                    Instruction::read("obj"),
                    Instruction::destroy("obj"),
                ],
                bit: true,
            });
            log.record(TurnEvent {
                turn: 2,
                participant: Participant::Sender,
                instructions: SmallVec::new(),
                bit: true,
            });
        });

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3, "{output}");
        assert!(lines[0].contains("sender signalled"));
        assert!(lines[0].contains("CREATE obj"));
        assert!(lines[1].contains("receiver decoded"));
        assert!(lines[1].contains("CREATE obj; WRITE obj 1; READ obj; DESTROY obj"));
        assert!(lines[2].contains("(none)"));
        assert!(lines[2].contains("bit=1"));
    }

    #[test]
    fn quiet_log_emits_nothing() {
        let log = TurnLog::new(false, true);
        let output = capture_logs(|| log.record(event(0)));
        assert!(output.is_empty());
    }

    #[test]
    fn recording_preserves_order_and_drains() {
        let log = TurnLog::new(false, true);
        for t in 0..3 {
            log.record(event(t));
        }
        let turns: Vec<u64> = log.take_events().iter().map(|e| e.turn).collect();
        assert_eq!(turns, vec![0, 1, 2]);
        assert!(log.take_events().is_empty());
    }
}
