//! Reaction delay adjusted with a single momentary button
//!
//! A quick tap adds one second. Holding past the threshold removes one second
//! per decrement interval, never below zero. The controller is driven by
//! samples or edges with explicit timestamps, so the caller decides how often
//! it runs.

use embassy_time::{Duration, Instant};
use log::{debug, info};

use crate::pacer::elapsed_since;

/// Button timing and the starting delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayConfig {
    /// Presses shorter than this are taps
    pub hold_threshold: Duration,
    /// Time between two decrements while holding
    pub decrement_interval: Duration,
    /// Delay at startup, in seconds
    pub default_seconds: u32,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            hold_threshold: Duration::from_millis(300),
            decrement_interval: Duration::from_millis(200),
            default_seconds: 10,
        }
    }
}

/// How raw button readings map to a finger on the button
///
/// Resolved once from the idle reading: if the idle level already reads as
/// pressed, the wiring is normally-closed and every reading is flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Normal,
    Inverted,
}

impl Polarity {
    pub const fn detect(idle_reads_pressed: bool) -> Self {
        if idle_reads_pressed {
            Self::Inverted
        } else {
            Self::Normal
        }
    }

    /// Physical press state for a raw reading
    pub const fn is_pressed(self, raw_pressed: bool) -> bool {
        match self {
            Self::Normal => raw_pressed,
            Self::Inverted => !raw_pressed,
        }
    }
}

/// Observable delay change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayChange {
    /// Tap added a second; carries the new delay
    Incremented(u32),
    /// Hold removed a second; carries the new delay
    Decremented(u32),
}

impl DelayChange {
    pub const fn seconds(self) -> u32 {
        match self {
            Self::Incremented(seconds) | Self::Decremented(seconds) => seconds,
        }
    }
}

/// Current delay and the in-progress press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayState {
    pub seconds: u32,
    pub press_start: Option<Instant>,
    pub holding: bool,
}

/// Tap-to-increment, hold-to-decrement delay state machine
#[derive(Debug, Clone)]
pub struct DelayController {
    config: DelayConfig,
    polarity: Polarity,
    state: DelayState,
    last_pressed: bool,
    last_decrement_at: Instant,
}

impl DelayController {
    /// Create a controller with a resolved polarity
    ///
    /// The button is assumed released at construction.
    pub fn new(config: DelayConfig, polarity: Polarity) -> Self {
        info!(
            "Delay controller: default {}s, polarity {:?}",
            config.default_seconds, polarity
        );
        Self {
            config,
            polarity,
            state: DelayState {
                seconds: config.default_seconds,
                press_start: None,
                holding: false,
            },
            last_pressed: false,
            last_decrement_at: Instant::from_millis(0),
        }
    }

    /// Current delay in seconds
    pub const fn delay(&self) -> u32 {
        self.state.seconds
    }

    pub const fn state(&self) -> &DelayState {
        &self.state
    }

    pub const fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Feed a raw button reading taken at `now`
    ///
    /// Detects press/release edges against the previous reading and runs the
    /// hold timer. Returns the change this reading caused, if any.
    pub fn sample(&mut self, now: Instant, raw_pressed: bool) -> Option<DelayChange> {
        let pressed = self.polarity.is_pressed(raw_pressed);
        let mut change = None;

        if pressed && !self.last_pressed {
            debug!("Button press");
            self.state.press_start = Some(now);
            self.state.holding = true;
            self.last_decrement_at = now;
        }

        if pressed {
            change = self.hold_tick(now);
        }

        if !pressed && self.last_pressed {
            debug!("Button release");
            change = self.hold_tick(now).or(change);
            change = self.release(now).or(change);
        }

        self.last_pressed = pressed;
        change
    }

    /// Advance the hold timer without a new reading
    pub fn tick(&mut self, now: Instant) -> Option<DelayChange> {
        if self.last_pressed {
            self.hold_tick(now)
        } else {
            None
        }
    }

    /// Apply every decrement due up to `now`
    ///
    /// Decrements land on a fixed grid: the first at the hold threshold, then
    /// one per interval. A late call catches up on all of them at once.
    fn hold_tick(&mut self, now: Instant) -> Option<DelayChange> {
        let start = self.state.press_start?;
        if !self.state.holding {
            return None;
        }

        let mut decremented = false;
        while self.state.seconds > 0 {
            let Some(due) = self.next_decrement(start) else {
                break;
            };
            if due > now {
                break;
            }
            self.state.seconds -= 1;
            self.last_decrement_at = due;
            decremented = true;
        }

        if !decremented {
            return None;
        }
        info!("Delay updated (hold): {}s", self.state.seconds);
        Some(DelayChange::Decremented(self.state.seconds))
    }

    fn next_decrement(&self, start: Instant) -> Option<Instant> {
        let threshold = start.checked_add(self.config.hold_threshold)?;
        let interval = self
            .last_decrement_at
            .checked_add(self.config.decrement_interval)?;
        Some(threshold.max(interval))
    }

    fn release(&mut self, now: Instant) -> Option<DelayChange> {
        self.state.holding = false;
        let start = self.state.press_start.take()?;

        if elapsed_since(start, now) < self.config.hold_threshold {
            self.state.seconds = self.state.seconds.saturating_add(1);
            info!("Quick tap: delay incremented to {}s", self.state.seconds);
            return Some(DelayChange::Incremented(self.state.seconds));
        }
        None
    }
}
