//! Reference monitor, object store, and script replay.

pub mod monitor;
pub mod replay;
pub mod store;

pub use monitor::{ObjectState, ReferenceMonitor};
pub use replay::{replay, StepOutcome};
pub use store::ObjectStore;
