//! Mood face shown on the matrix, held or pulsed between dim and full

use rand::RngCore;

use super::MatrixStage;
use crate::PixelSink;
use crate::color::{Rgb, scale_color};
use crate::error::Result;
use crate::glyph::{Mood, emoji_glyph};
use crate::pacer::Clock;

/// Draw the mood face centered over `bg` and flush it
pub fn show_emoji<S, C, R, const N: usize>(
    stage: &mut MatrixStage<'_, S, C, R, N>,
    mood: Mood,
    fg: Rgb,
    bg: Rgb,
) -> Result<()>
where
    S: PixelSink,
    C: Clock,
    R: RngCore,
{
    stage.canvas.fill(bg);
    stage.canvas.draw_glyph_centered(emoji_glyph(mood), fg)?;
    stage.canvas.flush(stage.sink);
    Ok(())
}

/// Breathe the mood face `pulses` times, then leave it at full brightness
pub fn emoji_animation<S, C, R, const N: usize>(
    stage: &mut MatrixStage<'_, S, C, R, N>,
    mood: Mood,
    fg: Rgb,
    bg: Rgb,
    pulses: u8,
) -> Result<()>
where
    S: PixelSink,
    C: Clock,
    R: RngCore,
{
    let settings = stage.settings;
    let dim = scale_color(fg, settings.emoji_dim);

    for _ in 0..pulses {
        show_emoji(stage, mood, dim, bg)?;
        stage.clock.sleep(settings.emoji_step);
        show_emoji(stage, mood, fg, bg)?;
        stage.clock.sleep(settings.emoji_step);
    }

    show_emoji(stage, mood, fg, bg)
}
