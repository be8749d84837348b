//! Time source and frame pacing
//!
//! The library never reads a platform clock. Everything that waits goes
//! through [`Clock`], so the same code drives a board, a desktop preview, or a
//! virtual clock in tests.

use embassy_time::{Duration, Instant};

/// Monotonic time source that can block
pub trait Clock {
    /// Current monotonic instant
    fn now(&self) -> Instant;

    /// Block for `duration`
    fn sleep(&mut self, duration: Duration);
}

/// Milliseconds from `since` to `now`, zero if `now` is earlier
pub fn elapsed_since(since: Instant, now: Instant) -> Duration {
    Duration::from_millis(now.as_millis().saturating_sub(since.as_millis()))
}

/// Fixed-rate frame pacing with drift correction
///
/// Frames are scheduled on a fixed grid starting at the first [`wait`].
/// If a frame overruns by more than two periods the grid is reset to now,
/// so a slow sink never causes a catch-up burst.
///
/// [`wait`]: FramePacer::wait
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    next_frame: Option<Instant>,
    frame_duration: Duration,
}

impl FramePacer {
    pub const fn new(frame_duration: Duration) -> Self {
        Self {
            next_frame: None,
            frame_duration,
        }
    }

    /// Sleep until the next frame deadline
    pub fn wait<C: Clock>(&mut self, clock: &mut C) {
        let now = clock.now();
        let deadline = match self.next_frame {
            Some(next) => next,
            None => now,
        };

        let max_drift = self.frame_duration.as_millis() * 2;
        let deadline = if now.as_millis() > deadline.as_millis() + max_drift {
            now
        } else {
            deadline
        };

        let next = deadline + self.frame_duration;
        self.next_frame = Some(next);

        let sleep_ms = next.as_millis().saturating_sub(now.as_millis());
        clock.sleep(Duration::from_millis(sleep_ms.max(1)));
    }
}
