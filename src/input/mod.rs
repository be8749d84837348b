//! Button input for the delay controller
//!
//! Two ways to feed the controller: sample a pin level on every service call
//! ([`PolledButton`]) or drain edges recorded by an interrupt
//! ([`QueuedButton`]). Either way every mutation of the delay happens inside
//! `service`, on the caller's thread.

mod edges;

use embassy_time::Instant;

pub use edges::{ButtonEdge, EdgeQueue};

use crate::delay::{DelayChange, DelayController};

/// Raw digital input
pub trait ButtonPin {
    /// Raw reading: `true` when the electrical level means "active"
    fn reads_pressed(&mut self) -> bool;
}

/// Source of button activity for a [`DelayController`]
pub trait DelayInput {
    /// Raw reading while nobody touches the button, used to detect polarity
    fn idle_reads_pressed(&mut self) -> bool;

    /// Apply pending button activity up to `now`
    ///
    /// Returns the last delay change caused, if any.
    fn service(&mut self, delay: &mut DelayController, now: Instant) -> Option<DelayChange>;
}

/// Pin sampled on every service call
pub struct PolledButton<P> {
    pin: P,
}

impl<P: ButtonPin> PolledButton<P> {
    pub const fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: ButtonPin> DelayInput for PolledButton<P> {
    fn idle_reads_pressed(&mut self) -> bool {
        self.pin.reads_pressed()
    }

    fn service(&mut self, delay: &mut DelayController, now: Instant) -> Option<DelayChange> {
        let raw = self.pin.reads_pressed();
        delay.sample(now, raw)
    }
}

/// Edges recorded by an interrupt into an [`EdgeQueue`]
pub struct QueuedButton<'a, const SIZE: usize> {
    queue: &'a EdgeQueue<SIZE>,
    idle_reads_pressed: bool,
}

impl<'a, const SIZE: usize> QueuedButton<'a, SIZE> {
    /// `idle_reads_pressed` is the raw level read once at startup
    pub const fn new(queue: &'a EdgeQueue<SIZE>, idle_reads_pressed: bool) -> Self {
        Self {
            queue,
            idle_reads_pressed,
        }
    }
}

impl<const SIZE: usize> DelayInput for QueuedButton<'_, SIZE> {
    fn idle_reads_pressed(&mut self) -> bool {
        self.idle_reads_pressed
    }

    fn service(&mut self, delay: &mut DelayController, now: Instant) -> Option<DelayChange> {
        let mut change = None;
        while let Some(edge) = self.queue.pop() {
            change = delay.sample(edge.at, edge.raw_pressed).or(change);
        }
        delay.tick(now).or(change)
    }
}
