//! Storage covert channel: turn scheduler, bit framing, sender/receiver
//! actors, session orchestration, reports, and trace sinks.

pub mod actor;
pub mod bits;
pub mod reporter;
pub mod session;
pub mod sink;
pub mod token;
pub mod trace;

pub use session::{Session, SessionConfig, Transmission};
pub use token::TurnScheduler;
pub use trace::TurnLog;
