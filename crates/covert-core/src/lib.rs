//! Domain models, shared types, and error definitions.
//!
//! Foundation crate -- no threads or I/O.

pub mod error;
pub mod script;
pub mod types;

pub use error::{CovertError, CovertResult};
pub use script::{parse_script, parse_step, ScriptStep};
pub use types::{Command, Instruction, Participant, SecurityLevel, TurnEvent};
