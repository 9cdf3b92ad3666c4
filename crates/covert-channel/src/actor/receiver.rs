//! LOW-side decoder.
//!
//! Every turn runs the same four-step probe against the shared object:
//!
//! ```text
//! CREATE obj     no-op if the sender created it this turn (object is HIGH)
//! WRITE  obj 1   write-up is always allowed
//! READ   obj     HIGH object: denied -> 0; our own LOW object -> 1
//! DESTROY obj    destroy-up is always allowed
//! ```
//!
//! So "sender created" decodes as 0 and "sender stayed silent" as 1.

use covert_core::error::CovertResult;
use covert_core::types::{Command, Instruction, Participant, TurnEvent};
use covert_monitor::ReferenceMonitor;
use smallvec::SmallVec;

use crate::bits::{ByteAssembler, SENTINEL};
use crate::token::TurnScheduler;
use crate::trace::TurnLog;

#[derive(Debug, Clone)]
pub struct Receiver {
    name: String,
    object: String,
}

impl Receiver {
    pub fn new(name: &str, object: &str) -> Self {
        Self {
            name: name.to_lowercase(),
            object: object.to_lowercase(),
        }
    }

    /// Probes once per turn until a sentinel byte is assembled. Returns
    /// the decoded bytes without the sentinel.
    pub fn run(
        &self,
        token: &TurnScheduler,
        monitor: &ReferenceMonitor,
        log: &TurnLog,
    ) -> CovertResult<Vec<u8>> {
        let mut assembler = ByteAssembler::new();
        let mut decoded = Vec::new();

        loop {
            token.has_turn(Participant::Receiver);

            let (bit, issued) = self.probe(monitor)?;
            log.record(TurnEvent {
                turn: token.turn(),
                participant: Participant::Receiver,
                instructions: issued,
                bit,
            });
            token.pass_token();

            match assembler.push(bit) {
                Some(SENTINEL) => break,
                Some(byte) => decoded.push(byte),
                None => {}
            }
        }

        tracing::debug!(receiver = %self.name, bytes = decoded.len(), "receiver done");
        Ok(decoded)
    }

    fn probe(&self, monitor: &ReferenceMonitor) -> CovertResult<(bool, SmallVec<[Instruction; 4]>)> {
        let steps: SmallVec<[Instruction; 4]> = SmallVec::from_buf([
            Instruction::create(&self.object),
            Instruction::write(&self.object, 1),
            Instruction::read(&self.object),
            Instruction::destroy(&self.object),
        ]);

        let mut observed = 0;
        for instr in &steps {
            let value = monitor.execute(&self.name, instr)?;
            if instr.command() == Command::Read {
                observed = value;
            }
        }

        Ok((observed != 0, steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use covert_core::types::SecurityLevel;

    fn monitor() -> ReferenceMonitor {
        let rm = ReferenceMonitor::new();
        rm.register_subject("hal", SecurityLevel::High).unwrap();
        rm.register_subject("lyle", SecurityLevel::Low).unwrap();
        rm
    }

    #[test]
    fn probe_reads_one_when_sender_silent() {
        let rm = monitor();
        let rx = Receiver::new("lyle", "obj");
        let (bit, issued) = rx.probe(&rm).unwrap();
        assert!(bit);
        assert_eq!(issued.len(), 4);
        assert!(!rm.contains("obj"));
    }

    #[test]
    fn probe_reads_zero_after_sender_create() {
        let rm = monitor();
        rm.execute("hal", &Instruction::create("obj")).unwrap();

        let rx = Receiver::new("lyle", "obj");
        let (bit, _) = rx.probe(&rm).unwrap();
        assert!(!bit);
        // destroy-up cleared the HIGH object for the next turn
        assert!(!rm.contains("obj"));
    }
}
