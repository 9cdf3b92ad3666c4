//! Replays a parsed instruction script through a [`ReferenceMonitor`].

use covert_core::error::CovertResult;
use covert_core::types::{Command, Instruction};
use covert_core::ScriptStep;
use serde::Serialize;
use std::fmt;

use crate::monitor::{ObjectState, ReferenceMonitor};

/// Result of one script step plus the object state right after it.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub line: usize,
    pub subject: Option<String>,
    pub instruction: Instruction,
    pub result: i32,
    pub state: Vec<ObjectState>,
}

/// Executes `steps` in order. SLEEP steps are handled here and never
/// reach the monitor. Stops at the first contract violation.
pub fn replay(monitor: &ReferenceMonitor, steps: &[ScriptStep]) -> CovertResult<Vec<StepOutcome>> {
    let mut outcomes = Vec::with_capacity(steps.len());

    for step in steps {
        let result = match step.instruction.command() {
            Command::Sleep => {
                tracing::debug!(line = step.line, "sleep");
                0
            }
            _ => {
                let subject = step.subject.as_deref().unwrap_or_default();
                monitor.execute(subject, &step.instruction)?
            }
        };

        outcomes.push(StepOutcome {
            line: step.line,
            subject: step.subject.clone(),
            instruction: step.instruction.clone(),
            result,
            state: monitor.snapshot(),
        });
    }

    Ok(outcomes)
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>4}: {:<6} {:<20} -> {:<6} |",
            self.line,
            self.subject.as_deref().unwrap_or("-"),
            self.instruction.to_string(),
            self.result
        )?;
        if self.state.is_empty() {
            return f.write_str(" (no objects)");
        }
        for obj in &self.state {
            write!(f, " {}={} [{}]", obj.name, obj.value, obj.level)?;
        }
        Ok(())
    }
}
