//! Wires a reference monitor, a turn token, and the two actors together
//! for one transmission.
//!
//! ```ignore
//! let session = Session::new(SessionConfig::default());
//! let tx = session.transmit(b"hello")?;
//! assert_eq!(tx.decoded, b"hello");
//! ```

use covert_core::error::{CovertError, CovertResult};
use covert_core::types::{SecurityLevel, TurnEvent};
use covert_monitor::ReferenceMonitor;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use crate::actor::{Receiver, Sender, SenderStats, DEFAULT_OBJECT, RECEIVER_NAME, SENDER_NAME};
use crate::bits;
use crate::token::TurnScheduler;
use crate::trace::TurnLog;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Name of the shared signalling object.
    pub object: String,
    /// One `info` line per turn.
    pub verbose: bool,
    /// Keep every [`TurnEvent`] for the caller.
    pub record_trace: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            object: DEFAULT_OBJECT.to_string(),
            verbose: false,
            record_trace: false,
        }
    }
}

/// Everything a finished transmission produced.
#[derive(Debug, Clone)]
pub struct Transmission {
    /// Receiver output, sentinel dropped.
    pub decoded: Vec<u8>,
    pub sender: SenderStats,
    /// Total token hand-offs across both actors.
    pub handoffs: u64,
    /// Empty unless `record_trace` was set.
    pub events: Vec<TurnEvent>,
    pub elapsed: Duration,
}

enum ActorExit {
    Sender(CovertResult<SenderStats>),
    Receiver(CovertResult<Vec<u8>>),
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    config: SessionConfig,
}

impl Session {
    /// A reusable session; each `transmit` builds fresh shared state.
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Moves `message` from the HIGH sender to the LOW receiver through
    /// object existence alone.
    ///
    /// Fails fast: the first actor error is returned without waiting for
    /// the peer, which may be parked in the scheduler for good.
    pub fn transmit(&self, message: &[u8]) -> CovertResult<Transmission> {
        if let Some(pos) = message.iter().position(|&b| b == bits::SENTINEL) {
            return Err(CovertError::InvalidInput(format!(
                "message contains a zero byte at offset {pos}; zero is the end-of-message sentinel"
            )));
        }

        let t0 = Instant::now();

        let monitor = Arc::new(ReferenceMonitor::new());
        monitor.register_subject(SENDER_NAME, SecurityLevel::High)?;
        monitor.register_subject(RECEIVER_NAME, SecurityLevel::Low)?;

        let token = Arc::new(TurnScheduler::new());
        let log = Arc::new(TurnLog::new(self.config.verbose, self.config.record_trace));

        let sender = Sender::new(SENDER_NAME, &self.config.object, bits::frame(message));
        let receiver = Receiver::new(RECEIVER_NAME, &self.config.object);

        tracing::info!(
            bytes = message.len(),
            turns = bits::frame_len(message.len()),
            object = %self.config.object,
            "transmission started"
        );

        let (exit_tx, exit_rx) = mpsc::channel();

        let sender_handle = {
            let (token, monitor, log, exit_tx) = (
                Arc::clone(&token),
                Arc::clone(&monitor),
                Arc::clone(&log),
                exit_tx.clone(),
            );
            spawn_actor(SENDER_NAME, move || {
                let result = guarded(|| sender.run(&token, &monitor, &log));
                let _ = exit_tx.send(ActorExit::Sender(result));
            })?
        };

        let receiver_handle = {
            let (token, monitor, log) =
                (Arc::clone(&token), Arc::clone(&monitor), Arc::clone(&log));
            spawn_actor(RECEIVER_NAME, move || {
                let result = guarded(|| receiver.run(&token, &monitor, &log));
                let _ = exit_tx.send(ActorExit::Receiver(result));
            })?
        };

        let (sender, decoded) = collect_exits(&exit_rx)?;

        for handle in [sender_handle, receiver_handle] {
            handle
                .join()
                .map_err(|p| CovertError::Actor(panic_message(p.as_ref())))?;
        }

        let elapsed = t0.elapsed();
        tracing::info!(
            decoded = decoded.len(),
            creates = sender.creates,
            elapsed_ms = elapsed.as_millis(),
            "transmission complete"
        );

        Ok(Transmission {
            decoded,
            sender,
            handoffs: token.turn(),
            events: log.take_events(),
            elapsed,
        })
    }
}

/// Waits for both actors to report. Returns the first error as soon as it
/// arrives; the other actor is not waited for.
fn collect_exits(exits: &mpsc::Receiver<ActorExit>) -> CovertResult<(SenderStats, Vec<u8>)> {
    let mut stats = None;
    let mut decoded = None;
    while stats.is_none() || decoded.is_none() {
        match exits.recv() {
            Ok(ActorExit::Sender(result)) => stats = Some(result?),
            Ok(ActorExit::Receiver(result)) => decoded = Some(result?),
            Err(_) => {
                return Err(CovertError::Actor(
                    "actor thread exited without reporting".into(),
                ))
            }
        }
    }
    match (stats, decoded) {
        (Some(sender), Some(bytes)) => Ok((sender, bytes)),
        _ => Err(CovertError::Internal("actor results missing".into())),
    }
}

fn spawn_actor<F>(name: &str, body: F) -> CovertResult<thread::JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name.to_string())
        .spawn(body)
        .map_err(|e| CovertError::Actor(format!("failed to spawn {name}: {e}")))
}

/// Turns a panic inside an actor into an error the session can report.
fn guarded<T>(f: impl FnOnce() -> CovertResult<T>) -> CovertResult<T> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|p| Err(CovertError::Actor(panic_message(p.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "actor panicked".to_string()
    }
}
