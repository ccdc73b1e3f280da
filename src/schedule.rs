//! Cancelable callback slots for the engine's two loops.
//!
//! Each loop owns one [`LoopSlot`] holding at most one pending callback. The
//! host advances slots by elapsed time once per repaint; a slot that fires is
//! consumed and stays empty until the loop re-arms it.
//!
//! Repaints rarely line up with a delay, so a delay usually fires late. The
//! slot remembers by how much and takes it off the next delay it is armed
//! with, keeping a timer loop on its period instead of rounding every period
//! up to whole repaints.

use std::time::Duration;

/// What a pending callback waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Fires on the next repaint.
    Frame,
    /// Fires once the delay has elapsed.
    Delay(Duration),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoopSlot {
    pending: Option<Trigger>,
    /// How far past due the last delay fired.
    late: Duration,
}

impl LoopSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a callback, replacing any pending one. A delay is shortened
    /// by however late the previous one fired.
    pub fn arm(&mut self, trigger: Trigger) {
        let late = std::mem::take(&mut self.late);
        self.pending = Some(match trigger {
            Trigger::Frame => Trigger::Frame,
            Trigger::Delay(delay) => Trigger::Delay(delay.saturating_sub(late)),
        });
    }

    /// Drops the pending callback and any carried lateness. Returns whether
    /// a callback was pending.
    pub fn cancel(&mut self) -> bool {
        self.late = Duration::ZERO;
        self.pending.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<Trigger> {
        self.pending
    }

    /// Advances by `elapsed`; returns true (and empties the slot) when the
    /// pending callback is due.
    pub fn poll(&mut self, elapsed: Duration) -> bool {
        match self.pending {
            None => false,
            Some(Trigger::Frame) => {
                self.pending = None;
                true
            }
            Some(Trigger::Delay(remaining)) => {
                if elapsed >= remaining {
                    self.pending = None;
                    self.late = elapsed - remaining;
                    true
                } else {
                    self.pending = Some(Trigger::Delay(remaining - elapsed));
                    false
                }
            }
        }
    }
}
