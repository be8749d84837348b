//! Jersey number celebration on the matrix

use rand::{Rng, RngCore};

use super::{MatrixStage, sparkle_count};
use crate::PixelSink;
use crate::color::{Rgb, scale_color};
use crate::error::Result;
use crate::pacer::Clock;

/// Pop/bounce frames: (dx, dy, brightness)
const BOUNCE_FRAMES: [(i32, i32, f32); 11] = [
    (0, 2, 0.35),
    (0, 1, 0.55),
    (0, 0, 0.75),
    (0, 0, 1.00), // impact
    (1, 0, 1.00),
    (-1, 0, 1.00),
    (0, 0, 1.00),
    (0, 1, 0.85),
    (0, 0, 1.00),
    (0, 1, 0.90),
    (0, 0, 1.00),
];

/// Brightness levels of the pulse hold
const PULSE_LEVELS: [f32; 6] = [0.85, 1.0, 0.9, 1.0, 0.95, 1.0];

/// Brightness of the alternate confetti color
const CONFETTI_DIM: f32 = 0.35;

/// Share of confetti drawn in the full foreground color
const CONFETTI_BRIGHT_SHARE: f64 = 0.6;

/// Celebrate jersey number `n`
///
/// Phases: background wipe, pop/bounce, confetti over the number, brightness
/// pulse, inverted flashes, steady hold. The number is validated before the
/// first frame, so an invalid number leaves the matrix untouched.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn goal_number_animation<S, C, R, const N: usize>(
    stage: &mut MatrixStage<'_, S, C, R, N>,
    n: i32,
    fg: Rgb,
    bg: Rgb,
    gap: usize,
) -> Result<()>
where
    S: PixelSink,
    C: Clock,
    R: RngCore,
{
    let layout = stage.canvas.number_layout(n, gap)?;
    let settings = stage.settings;
    let width = stage.canvas.geometry().width;
    let height = stage.canvas.geometry().height;

    // Background wipe, one column at a time
    for x in 0..width as i32 {
        for y in 0..height as i32 {
            stage.canvas.set_pixel(x, y, bg);
        }
        stage.present(settings.wipe_step);
    }

    for (dx, dy, brightness) in BOUNCE_FRAMES {
        stage.canvas.fill(bg);
        let color = scale_color(fg, brightness);
        stage
            .canvas
            .draw_number_at(&layout, layout.x + dx, layout.y + dy, color, gap)?;
        stage.present(settings.bounce_step);
    }

    let confetti = scale_color(fg, CONFETTI_DIM);
    let count = sparkle_count(width * height, settings.sparkle_density);
    for _ in 0..settings.sparkle_frames {
        stage.canvas.fill(bg);
        stage
            .canvas
            .draw_number_at(&layout, layout.x, layout.y, fg, gap)?;
        for _ in 0..count {
            let x = stage.rng.gen_range(0..width) as i32;
            let y = stage.rng.gen_range(0..height) as i32;
            let color = if stage.rng.gen_bool(CONFETTI_BRIGHT_SHARE) {
                fg
            } else {
                confetti
            };
            stage.canvas.set_pixel(x, y, color);
        }
        stage.present(settings.sparkle_step);
    }

    for level in PULSE_LEVELS {
        stage.canvas.fill(bg);
        stage
            .canvas
            .draw_number_at(&layout, layout.x, layout.y, scale_color(fg, level), gap)?;
        stage.present(settings.pulse_step);
    }

    for _ in 0..settings.flash_pairs {
        stage.canvas.draw_number(n, bg, fg, gap)?;
        stage.present(settings.flash_step);
        stage.canvas.draw_number(n, fg, bg, gap)?;
        stage.present(settings.flash_step);
    }

    stage.canvas.draw_number(n, fg, bg, gap)?;
    stage.present(settings.final_hold);
    Ok(())
}
