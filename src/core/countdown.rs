//! Countdown Timer
//!
//! Delayed-trigger primitive shared by every perishable or growable tile.
//! A countdown only advances when its owner is explicitly updated, so the
//! simulation clock is the sequence of player turns and nothing else.

use serde::{Serialize, Deserialize};

/// An optional, non-negative countdown.
///
/// `None` means no event is pending. Ticking an armed countdown down to zero
/// clears it and reports that the owner's trigger must run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: Option<u32>,
}

impl Countdown {
    /// Create a disarmed countdown.
    pub const fn new() -> Self {
        Self { remaining: None }
    }

    /// Arm the countdown so that it fires after `turns` ticks.
    ///
    /// Arming with 0 fires on the next tick.
    #[inline]
    pub fn arm(&mut self, turns: u32) {
        self.remaining = Some(turns);
    }

    /// Clear any pending event.
    #[inline]
    pub fn disarm(&mut self) {
        self.remaining = None;
    }

    /// Is an event pending?
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.remaining.is_some()
    }

    /// Ticks left until the event fires, if armed.
    #[inline]
    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    /// Advance by one tick.
    ///
    /// Returns `true` exactly when the countdown expired on this tick. The
    /// countdown is already cleared at that point, so the owner's trigger is
    /// free to re-arm it.
    pub fn tick(&mut self) -> bool {
        let Some(remaining) = self.remaining else {
            return false;
        };
        let next = remaining.saturating_sub(1);
        if next == 0 {
            self.remaining = None;
            true
        } else {
            self.remaining = Some(next);
            false
        }
    }
}

/// An entity that owns a [`Countdown`] and reacts when it expires.
///
/// The expiry reaction is the only extension point: barns spoil, acreages
/// grow. Everything else about the timer is shared.
pub trait Timed {
    /// The owned countdown.
    fn countdown(&self) -> &Countdown;

    /// Mutable access to the owned countdown.
    fn countdown_mut(&mut self) -> &mut Countdown;

    /// Called once when the countdown reaches zero.
    fn on_countdown(&mut self);

    /// Tick the countdown and run the trigger if it expired.
    ///
    /// Returns whether the trigger ran.
    fn update(&mut self) -> bool {
        let expired = self.countdown_mut().tick();
        if expired {
            self.on_countdown();
        }
        expired
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Probe {
        countdown: Countdown,
        fired: u32,
        rearm: Option<u32>,
    }

    impl Timed for Probe {
        fn countdown(&self) -> &Countdown {
            &self.countdown
        }

        fn countdown_mut(&mut self) -> &mut Countdown {
            &mut self.countdown
        }

        fn on_countdown(&mut self) {
            self.fired += 1;
            if let Some(turns) = self.rearm {
                self.countdown.arm(turns);
            }
        }
    }

    #[test]
    fn test_disarmed_tick_is_noop() {
        let mut countdown = Countdown::new();
        assert!(!countdown.tick());
        assert!(!countdown.is_armed());
        assert_eq!(countdown.remaining(), None);
    }

    #[test]
    fn test_fires_after_armed_ticks() {
        let mut countdown = Countdown::new();
        countdown.arm(3);
        assert!(!countdown.tick());
        assert_eq!(countdown.remaining(), Some(2));
        assert!(!countdown.tick());
        assert!(countdown.tick());
        assert!(!countdown.is_armed());
        // Stays quiet once cleared
        assert!(!countdown.tick());
    }

    #[test]
    fn test_zero_fires_on_next_tick() {
        let mut countdown = Countdown::new();
        countdown.arm(0);
        assert!(countdown.is_armed());
        assert!(countdown.tick());
        assert!(!countdown.is_armed());
    }

    #[test]
    fn test_disarm_cancels() {
        let mut countdown = Countdown::new();
        countdown.arm(1);
        countdown.disarm();
        assert!(!countdown.tick());
    }

    #[test]
    fn test_trigger_runs_once_and_may_rearm() {
        let mut probe = Probe { rearm: Some(2), ..Default::default() };
        probe.countdown.arm(1);

        assert!(probe.update());
        assert_eq!(probe.fired, 1);
        assert_eq!(probe.countdown().remaining(), Some(2));

        assert!(!probe.update());
        assert!(probe.update());
        assert_eq!(probe.fired, 2);
    }

    #[test]
    fn test_trigger_not_run_while_counting() {
        let mut probe = Probe::default();
        probe.countdown.arm(5);
        for _ in 0..4 {
            assert!(!probe.update());
        }
        assert_eq!(probe.fired, 0);
        assert!(probe.update());
        assert_eq!(probe.fired, 1);
        assert!(!probe.countdown().is_armed());
    }
}
