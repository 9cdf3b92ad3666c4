//! Strict two-party turn alternation.
//!
//! ```text
//!   TurnOf(Sender) ---pass_token---> TurnOf(Receiver)
//!         ^                                 |
//!         +-----------pass_token------------+
//! ```
//!
//! Starts at `TurnOf(Sender)`. There is no terminal state and no way to
//! tell a waiter that its peer is gone: each participant must stop asking
//! for turns on its own once its protocol is complete.

use covert_core::types::Participant;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct TurnState {
    holder: Participant,
    handoffs: u64,
}

/// Mutex + condvar token shared by reference between the two actors.
#[derive(Debug)]
pub struct TurnScheduler {
    state: Mutex<TurnState>,
    turn_changed: Condvar,
}

impl Default for TurnScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TurnState {
                holder: Participant::Sender,
                handoffs: 0,
            }),
            turn_changed: Condvar::new(),
        }
    }

    /// Blocks until it is `who`'s turn, then returns `true`.
    ///
    /// Never returns `false`: a participant always waits rather than
    /// skipping. Spurious wake-ups go back to waiting.
    pub fn has_turn(&self, who: Participant) -> bool {
        let guard = self.lock();
        let _guard = self
            .turn_changed
            .wait_while(guard, |state| state.holder != who)
            .unwrap_or_else(PoisonError::into_inner);
        true
    }

    /// Hands the turn to the other participant and wakes its waiter.
    pub fn pass_token(&self) {
        let mut state = self.lock();
        state.holder = state.holder.other();
        state.handoffs += 1;
        tracing::trace!(holder = %state.holder, handoffs = state.handoffs, "token passed");
        drop(state);
        self.turn_changed.notify_all();
    }

    /// Who may act right now.
    pub fn holder(&self) -> Participant {
        self.lock().holder
    }

    /// Number of completed hand-offs, i.e. the index of the current turn.
    pub fn turn(&self) -> u64 {
        self.lock().handoffs
    }

    // Holder and counter are plain values updated together under the
    // lock, so a poisoned guard still holds consistent state.
    fn lock(&self) -> MutexGuard<'_, TurnState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
