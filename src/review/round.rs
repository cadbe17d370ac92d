//! Round lifecycle and countdown
//!
//! A round runs from a reset until the countdown reaches zero or the
//! active stack is empty. The controller watches the stack through the
//! snapshot channel rather than asking the store.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::stack::{StackManager, StackSnapshot};
use crate::cards::storage::Result;
use crate::cards::CardStore;

/// Ticks per round unless configured otherwise
pub const DEFAULT_ROUND_DURATION: u32 = 100;

/// Why a round stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EndReason {
    Timeout,
    StackEmpty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundState {
    Running,
    /// Backgrounded; ticks are ignored
    Paused,
    Ended(EndReason),
}

pub struct RoundController {
    state: RoundState,
    remaining: u32,
    duration: u32,
    stack: watch::Receiver<StackSnapshot>,
}

impl RoundController {
    pub fn new(duration: u32, stack: watch::Receiver<StackSnapshot>) -> Self {
        Self {
            state: RoundState::Running,
            remaining: duration,
            duration,
            stack,
        }
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn is_running(&self) -> bool {
        self.state == RoundState::Running
    }

    /// Whether the head card may be resolved right now
    pub fn accepts_input(&self) -> bool {
        self.is_running() && self.remaining > 0
    }

    /// Advance the countdown by one tick
    pub fn tick(&mut self) -> RoundState {
        if self.evaluate() != RoundState::Running {
            return self.state;
        }

        self.remaining = self.remaining.saturating_sub(1);
        self.evaluate()
    }

    /// Check the latest stack snapshot and the countdown, ending the round
    /// if either is exhausted. Does nothing unless running.
    pub fn evaluate(&mut self) -> RoundState {
        if self.state != RoundState::Running {
            return self.state;
        }

        if self.stack.borrow_and_update().is_empty() {
            log::info!("Round ended: no active cards left");
            self.state = RoundState::Ended(EndReason::StackEmpty);
        } else if self.remaining == 0 {
            log::info!("Round ended: time is up");
            self.state = RoundState::Ended(EndReason::Timeout);
        }
        self.state
    }

    /// The app went to the background; stop consuming time
    pub fn background(&mut self) -> RoundState {
        if self.state != RoundState::Paused {
            log::debug!("Round paused with {} ticks left", self.remaining);
            self.state = RoundState::Paused;
        }
        self.state
    }

    /// The app is visible again; resume only if cards are left
    pub fn foreground(&mut self) -> RoundState {
        if self.state != RoundState::Paused {
            return self.state;
        }

        if self.stack.borrow_and_update().is_empty() {
            self.state = RoundState::Ended(EndReason::StackEmpty);
            return self.state;
        }

        log::debug!("Round resumed with {} ticks left", self.remaining);
        self.state = RoundState::Running;
        self.evaluate()
    }

    /// Start a new round: reactivate every card and refill the countdown.
    ///
    /// The countdown restarts even if saving the reactivated cards fails;
    /// the error is still returned.
    pub fn reset<S: CardStore>(&mut self, stack: &mut StackManager<S>) -> Result<usize> {
        let reactivated = stack.commit(reactivate_all);

        self.remaining = self.duration;
        self.state = RoundState::Running;
        self.evaluate();

        let count = reactivated?;
        log::info!(
            "New round: {} cards reactivated, {} ticks",
            count,
            self.duration
        );
        Ok(count)
    }
}

/// Mark every inactive card active again, returning how many changed
fn reactivate_all<S: CardStore>(store: &mut S) -> Result<usize> {
    let mut count = 0;
    for mut card in store.query_all()? {
        if !card.active {
            card.active = true;
            card.touch();
            store.update(&card)?;
            count += 1;
        }
    }
    Ok(count)
}
