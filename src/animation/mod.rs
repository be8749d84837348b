//! Timed multi-frame animations
//!
//! Every animation is a fixed sequence of frames: mutate the buffer, push it
//! to the sink, sleep. Colors and glyphs are captured when the animation
//! starts and nothing external is read until it returns.

mod backlight;
mod emoji;
mod goal_number;

use embassy_time::Duration;
use rand::RngCore;

pub use backlight::{BacklightEffect, PhasePlan, goal_flash_sequence};
pub use emoji::{emoji_animation, show_emoji};
pub use goal_number::goal_number_animation;

use crate::PixelSink;
use crate::color::Rgb;
use crate::compositor::Compositor;
use crate::pacer::{Clock, FramePacer};

/// Timings and tunables for every animation
#[derive(Debug, Clone)]
pub struct AnimationSettings {
    /// Delay between columns of the background wipe
    pub wipe_step: Duration,
    /// Frame time of the pop/bounce phase
    pub bounce_step: Duration,
    /// Number of confetti frames
    pub sparkle_frames: u16,
    /// Frame time of the confetti phase
    pub sparkle_step: Duration,
    /// Fraction of matrix pixels sprinkled per confetti frame
    pub sparkle_density: f32,
    /// Frame time of the brightness pulse hold
    pub pulse_step: Duration,
    /// Inverted/normal flash pairs after the pulse
    pub flash_pairs: u8,
    /// Duration of each half of a flash pair
    pub flash_step: Duration,
    /// How long the final number stays before returning
    pub final_hold: Duration,
    /// Duration of each dim/full half of an emoji pulse
    pub emoji_step: Duration,
    /// Brightness factor of the dim emoji frame
    pub emoji_dim: f32,
    /// Total length of the backlight goal sequence
    pub backlight_duration: Duration,
    /// Frame time of the backlight strobe
    pub strobe_step: Duration,
    /// Time for the chase head to advance one pixel
    pub chase_step: Duration,
    /// Frame time of the chase phase
    pub chase_frame: Duration,
    /// Fraction of strip pixels sparkling white per frame
    pub strip_sparkle_density: f32,
    /// Frame time of the strip sparkle phase
    pub strip_sparkle_step: Duration,
    /// Duration of the white and team halves of a finale punch
    pub punch_on: Duration,
    /// Dark gap after each finale punch
    pub punch_off: Duration,
    /// Frame time of the closing fade
    pub fade_frame: Duration,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            wipe_step: Duration::from_millis(20),
            bounce_step: Duration::from_millis(80),
            sparkle_frames: 24,
            sparkle_step: Duration::from_millis(70),
            sparkle_density: 0.18,
            pulse_step: Duration::from_millis(180),
            flash_pairs: 3,
            flash_step: Duration::from_millis(150),
            final_hold: Duration::from_millis(1200),
            emoji_step: Duration::from_millis(200),
            emoji_dim: 0.65,
            backlight_duration: Duration::from_secs(10),
            strobe_step: Duration::from_millis(80),
            chase_step: Duration::from_millis(15),
            chase_frame: Duration::from_millis(10),
            strip_sparkle_density: 1.0 / 18.0,
            strip_sparkle_step: Duration::from_millis(70),
            punch_on: Duration::from_millis(120),
            punch_off: Duration::from_millis(100),
            fade_frame: Duration::from_millis(30),
        }
    }
}

/// Number of pixels to touch for a sparkle `density` over `total` pixels
///
/// At least one pixel sparkles whenever there are pixels at all.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn sparkle_count(total: usize, density: f32) -> usize {
    if total == 0 {
        return 0;
    }
    let count = libm::roundf(total as f32 * density.clamp(0.0, 1.0)) as usize;
    count.clamp(1, total)
}

/// Everything a matrix animation draws with
pub struct MatrixStage<'a, S, C, R, const N: usize> {
    pub canvas: &'a mut Compositor<N>,
    pub sink: &'a mut S,
    pub clock: &'a mut C,
    pub rng: &'a mut R,
    pub settings: &'a AnimationSettings,
}

impl<S: PixelSink, C: Clock, R: RngCore, const N: usize> MatrixStage<'_, S, C, R, N> {
    /// Flush the current buffer and hold it for `hold`
    pub fn present(&mut self, hold: Duration) {
        self.canvas.flush(self.sink);
        self.clock.sleep(hold);
    }
}

/// Everything a backlight strip animation draws with
pub struct StripStage<'a, S, C, R> {
    pub leds: &'a mut [Rgb],
    pub sink: &'a mut S,
    pub clock: &'a mut C,
    pub rng: &'a mut R,
    pub settings: &'a AnimationSettings,
}

impl<S: PixelSink, C: Clock, R: RngCore> StripStage<'_, S, C, R> {
    /// Set the whole strip to `color` and show it
    pub fn fill(&mut self, color: Rgb) {
        for led in self.leds.iter_mut() {
            *led = color;
        }
        self.write();
    }

    /// Push the strip buffer to the sink
    pub fn write(&mut self) {
        crate::write_strip(self.sink, self.leds);
    }

    /// Push the strip buffer and wait for the next paced frame
    pub fn present_paced(&mut self, pacer: &mut FramePacer) {
        self.write();
        pacer.wait(self.clock);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparkle_count_never_zero_on_non_empty() {
        assert_eq!(sparkle_count(168, 0.0), 1);
        assert_eq!(sparkle_count(168, 0.18), 30);
        assert_eq!(sparkle_count(15, 1.0 / 18.0), 1);
        assert_eq!(sparkle_count(10, 4.0), 10);
        assert_eq!(sparkle_count(0, 0.5), 0);
    }
}
