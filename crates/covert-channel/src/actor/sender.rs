//! HIGH-side encoder.
//!
//! One bit per turn: a `0` bit creates the shared object, a `1` bit does
//! nothing. The sender never destroys the object; the receiver's probe
//! cleans up every turn.

use covert_core::error::CovertResult;
use covert_core::types::{Instruction, Participant, TurnEvent};
use covert_monitor::ReferenceMonitor;
use serde::Serialize;
use smallvec::SmallVec;

use crate::token::TurnScheduler;
use crate::trace::TurnLog;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SenderStats {
    pub bits_sent: usize,
    pub creates: usize,
}

#[derive(Debug, Clone)]
pub struct Sender {
    name: String,
    object: String,
    bits: Vec<bool>,
}

impl Sender {
    /// `bits` must already carry the trailing sentinel byte.
    pub fn new(name: &str, object: &str, bits: Vec<bool>) -> Self {
        Self {
            name: name.to_lowercase(),
            object: object.to_lowercase(),
            bits,
        }
    }

    /// Takes exactly one turn per bit, then returns.
    pub fn run(
        &self,
        token: &TurnScheduler,
        monitor: &ReferenceMonitor,
        log: &TurnLog,
    ) -> CovertResult<SenderStats> {
        let mut stats = SenderStats::default();

        for &bit in &self.bits {
            // Blocks until our turn; never returns false.
            token.has_turn(Participant::Sender);

            let mut issued = SmallVec::new();
            if !bit {
                let create = Instruction::create(&self.object);
                monitor.execute(&self.name, &create)?;
                issued.push(create);
                stats.creates += 1;
            }

            log.record(TurnEvent {
                turn: token.turn(),
                participant: Participant::Sender,
                instructions: issued,
                bit,
            });
            stats.bits_sent += 1;
            token.pass_token();
        }

        tracing::debug!(sender = %self.name, bits = stats.bits_sent, creates = stats.creates, "sender done");
        Ok(stats)
    }
}
