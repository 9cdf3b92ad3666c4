//! The two channel participants.
//!
//! Each actor is a plain struct run on its own thread with explicit
//! references to the shared [`TurnScheduler`](crate::TurnScheduler) and
//! [`ReferenceMonitor`](covert_monitor::ReferenceMonitor). They never talk
//! to each other any other way.

pub mod receiver;
pub mod sender;

pub use receiver::Receiver;
pub use sender::{Sender, SenderStats};

/// HIGH subject that encodes the message.
pub const SENDER_NAME: &str = "hal";

/// LOW subject that decodes it.
pub const RECEIVER_NAME: &str = "lyle";

/// Object whose existence carries the signal unless configured otherwise.
pub const DEFAULT_OBJECT: &str = "obj";
