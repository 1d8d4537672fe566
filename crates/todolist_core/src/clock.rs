//! Injectable time source for scheduling and record timestamps.
//!
//! # Responsibility
//! - Provide monotonic instants for deadlines and wall time for records from
//!   one capability, so tests can advance virtual time deterministically.
//!
//! # Invariants
//! - `instant()` is monotonic within one clock instance.
//! - `ManualClock` clones share state; advancing one advances all.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Time capability consumed by the state core.
pub trait Clock {
    /// Monotonic instant used for debounce and error-expiry deadlines.
    fn instant(&self) -> Instant;
    /// Wall-clock time recorded on domain records and envelopes.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Real time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn instant(&self) -> Instant {
        Instant::now()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug)]
struct ManualClockState {
    base_instant: Instant,
    base_utc: DateTime<Utc>,
    offset: Duration,
}

/// Virtual time under explicit test control.
///
/// Clones share the same state through a handle, so a test can keep one copy
/// and hand another to the service it drives.
#[derive(Debug, Clone)]
pub struct ManualClock {
    state: Rc<RefCell<ManualClockState>>,
}

impl ManualClock {
    /// Starts virtual time at a fixed, reproducible origin.
    pub fn new() -> Self {
        let base_utc = DateTime::from_timestamp(1_700_000_000, 0)
            .unwrap_or_else(Utc::now);
        Self {
            state: Rc::new(RefCell::new(ManualClockState {
                base_instant: Instant::now(),
                base_utc,
                offset: Duration::ZERO,
            })),
        }
    }

    /// Moves virtual time forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.state.borrow_mut().offset += delta;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn instant(&self) -> Instant {
        let state = self.state.borrow();
        state.base_instant + state.offset
    }

    fn now_utc(&self) -> DateTime<Utc> {
        let state = self.state.borrow();
        state.base_utc
            + ChronoDuration::from_std(state.offset).unwrap_or(ChronoDuration::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, ManualClock};
    use std::time::Duration;

    #[test]
    fn manual_clock_starts_at_zero_offset() {
        let clock = ManualClock::new();
        assert_eq!(clock.instant(), clock.instant());
    }

    #[test]
    fn advance_moves_instant_and_wall_time_together() {
        let clock = ManualClock::new();
        let i0 = clock.instant();
        let t0 = clock.now_utc();

        clock.advance(Duration::from_secs(3));

        assert_eq!(clock.instant() - i0, Duration::from_secs(3));
        assert_eq!((clock.now_utc() - t0).num_seconds(), 3);
    }

    #[test]
    fn clones_share_virtual_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        let before = clock.instant();

        handle.advance(Duration::from_millis(500));

        assert_eq!(clock.instant() - before, Duration::from_millis(500));
    }
}
