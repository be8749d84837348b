#![no_std]

pub mod animation;
pub mod color;
pub mod compositor;
pub mod delay;
pub mod detector;
pub mod display;
pub mod error;
pub mod feed;
pub mod geometry;
pub mod glyph;
pub mod input;
pub mod math8;
pub mod pacer;
pub mod rig;

#[cfg(feature = "esp32-log")]
pub mod logger;

pub use animation::AnimationSettings;
pub use color::{ColorResolver, Rgb, TeamColors};
pub use compositor::Compositor;
pub use delay::{DelayChange, DelayConfig, DelayController, Polarity};
pub use detector::{EventDetector, PollIntervals};
pub use display::{StatusDisplay, TextSink};
pub use error::{Error, Result};
pub use feed::{GameNow, GameSnapshot, ScoreFeed};
pub use geometry::{MatrixGeometry, RunDirection, SerpentineAxis, StartCorner};
pub use input::{ButtonPin, DelayInput, EdgeQueue, PolledButton, QueuedButton};
pub use pacer::{Clock, FramePacer};
pub use rig::{CountdownMode, Outputs, Rig, RigConfig};

pub use embassy_time::{Duration, Instant};

/// Addressable LED output
///
/// Implement this trait to support different hardware platforms. Writes are
/// buffered until [`show`](PixelSink::show) latches them.
pub trait PixelSink {
    /// Number of pixels wired to this output
    fn pixel_count(&self) -> usize;

    /// Buffer `color` for the pixel at physical `index`
    fn set_pixel(&mut self, index: usize, color: Rgb);

    /// Push buffered colors to the hardware
    fn show(&mut self);
}

/// Write `leds` in order from index 0 and latch the sink
///
/// Pixels beyond the sink's count are dropped.
pub fn write_strip<S: PixelSink + ?Sized>(sink: &mut S, leds: &[Rgb]) {
    let count = sink.pixel_count();
    for (index, color) in leds.iter().take(count).enumerate() {
        sink.set_pixel(index, *color);
    }
    sink.show();
}
