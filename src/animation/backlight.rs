//! Backlight strip goal sequence
//!
//! The sequence is split into four phases, each an effect that renders a
//! frame from the time elapsed since *its own* start. A phase ends when that
//! elapsed time crosses its budget; no clock is shared across phases.

use embassy_time::Duration;
use rand::{Rng, RngCore};

use super::{AnimationSettings, StripStage, sparkle_count};
use crate::PixelSink;
use crate::color::{BLACK, Rgb, WHITE, blend_colors, scale_color};
use crate::math8::{remaining8, scale8};
use crate::pacer::{Clock, FramePacer, elapsed_since};

const STROBE_CAP: Duration = Duration::from_millis(2500);
const CHASE_CAP: Duration = Duration::from_millis(3500);
const FINALE_BUDGET: Duration = Duration::from_millis(1500);
/// Finale gets three punches from this much time on, otherwise two
const FULL_FINALE: Duration = Duration::from_millis(1400);
const MIN_FADE: Duration = Duration::from_millis(200);

const CHASE_BREATH_PERIOD_MS: f32 = 700.0;
const SPARKLE_BASE: f32 = 0.12;

/// Phase budgets of the goal sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhasePlan {
    pub strobe: Duration,
    pub chase: Duration,
    pub sparkle: Duration,
    pub finale: Duration,
}

impl PhasePlan {
    /// Split `total` across the phases
    ///
    /// Strobe takes a quarter (at most 2.5 s), chase 35% (at most 3.5 s),
    /// 1.5 s is kept for the finale and sparkle gets what is left.
    pub fn split(total: Duration) -> Self {
        let total_ms = total.as_millis();
        let strobe = (total_ms / 4).min(STROBE_CAP.as_millis());
        let chase = (total_ms * 35 / 100).min(CHASE_CAP.as_millis());
        let sparkle = total_ms.saturating_sub(strobe + chase + FINALE_BUDGET.as_millis());
        let finale = total_ms.saturating_sub(strobe + chase + sparkle);

        Self {
            strobe: Duration::from_millis(strobe),
            chase: Duration::from_millis(chase),
            sparkle: Duration::from_millis(sparkle),
            finale: Duration::from_millis(finale),
        }
    }
}

/// One phase of the goal sequence
#[derive(Debug, Clone, Copy)]
pub enum BacklightEffect {
    /// Bursts of team -> white -> accent -> black
    Strobe { team: Rgb, accent: Rgb, step: Duration },
    /// Accent head with a white tail over a breathing team base
    Chase {
        team: Rgb,
        accent: Rgb,
        step: Duration,
    },
    /// Dim team base with random white and accent glitter
    Sparkle {
        team: Rgb,
        accent: Rgb,
        density: f32,
    },
    /// White/team punches, then a fade of the team color to black
    Finale {
        team: Rgb,
        punches: u8,
        punch_on: Duration,
        punch_off: Duration,
        fade: Duration,
    },
}

impl BacklightEffect {
    /// Render the frame `elapsed` into this phase
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn render<R: RngCore>(&self, elapsed: Duration, leds: &mut [Rgb], rng: &mut R) {
        if leds.is_empty() {
            return;
        }
        let elapsed_ms = elapsed.as_millis();

        match *self {
            Self::Strobe { team, accent, step } => {
                let burst = [team, WHITE, accent, BLACK];
                let slot = (elapsed_ms / step.as_millis().max(1)) % 4;
                leds.fill(burst[slot as usize]);
            }
            Self::Chase { team, accent, step } => {
                let len = leds.len();
                let head = (elapsed_ms / step.as_millis().max(1)) as usize % len;
                let tail_len = (len / 12).max(6);

                let phase = elapsed_ms as f32 / CHASE_BREATH_PERIOD_MS;
                let breathe =
                    0.10 + 0.25 * (0.5 - 0.5 * libm::cosf(2.0 * core::f32::consts::PI * phase));
                let base = scale_color(team, breathe);
                leds.fill(base);

                leds[head] = accent;
                for k in 1..=tail_len {
                    // Tail fades linearly towards the base
                    let level = 255 - (k * 255 / (tail_len + 1)) as u8;
                    let idx = (head + len * tail_len - k) % len;
                    leds[idx] = blend_colors(base, WHITE, level);
                }
            }
            Self::Sparkle {
                team,
                accent,
                density,
            } => {
                let len = leds.len();
                leds.fill(scale_color(team, SPARKLE_BASE));
                let white = sparkle_count(len, density);
                for _ in 0..white {
                    leds[rng.gen_range(0..len)] = WHITE;
                }
                // Accent glitter is three quarters as dense as the white
                for _ in 0..(white * 3 / 4).max(1) {
                    leds[rng.gen_range(0..len)] = accent;
                }
            }
            Self::Finale {
                team,
                punches,
                punch_on,
                punch_off,
                fade,
            } => {
                let on = punch_on.as_millis();
                let period = on * 2 + punch_off.as_millis();
                let punch_total = period * u64::from(punches);

                if elapsed_ms < punch_total {
                    let offset = elapsed_ms % period.max(1);
                    let color = if offset < on {
                        WHITE
                    } else if offset < on * 2 {
                        team
                    } else {
                        BLACK
                    };
                    leds.fill(color);
                } else {
                    let fade_elapsed = Duration::from_millis(elapsed_ms - punch_total);
                    let level = remaining8(fade_elapsed, fade);
                    leds.fill(team.map_scale(level));
                }
            }
        }
    }

    /// Time between two frames of this phase
    pub fn frame_duration(&self, settings: &AnimationSettings) -> Duration {
        match self {
            Self::Strobe { step, .. } => *step,
            Self::Chase { .. } => settings.chase_frame,
            Self::Sparkle { .. } => settings.strip_sparkle_step,
            Self::Finale { .. } => settings.fade_frame,
        }
    }

    /// Build the finale for a `budget`, choosing the punch count from it
    pub fn finale(team: Rgb, budget: Duration, settings: &AnimationSettings) -> Self {
        let punches: u8 = if budget >= FULL_FINALE { 3 } else { 2 };
        let period = settings.punch_on.as_millis() * 2 + settings.punch_off.as_millis();
        let fade = budget
            .as_millis()
            .saturating_sub(period * u64::from(punches))
            .max(MIN_FADE.as_millis());
        Self::Finale {
            team,
            punches,
            punch_on: settings.punch_on,
            punch_off: settings.punch_off,
            fade: Duration::from_millis(fade),
        }
    }

    /// Full length of the finale, including the fade
    fn finale_length(&self) -> Option<Duration> {
        match self {
            Self::Finale {
                punches,
                punch_on,
                punch_off,
                fade,
                ..
            } => {
                let period = punch_on.as_millis() * 2 + punch_off.as_millis();
                Some(Duration::from_millis(
                    period * u64::from(*punches) + fade.as_millis(),
                ))
            }
            _ => None,
        }
    }
}

/// Scale helper for strip colors using 8-bit math
trait MapScale {
    fn map_scale(self, level: u8) -> Self;
}

impl MapScale for Rgb {
    fn map_scale(self, level: u8) -> Self {
        Rgb {
            r: scale8(self.r, level),
            g: scale8(self.g, level),
            b: scale8(self.b, level),
        }
    }
}

/// Run one phase until its own budget is spent
fn run_phase<S, C, R>(stage: &mut StripStage<'_, S, C, R>, effect: &BacklightEffect, budget: Duration)
where
    S: PixelSink,
    C: Clock,
    R: RngCore,
{
    if budget.as_millis() == 0 {
        return;
    }
    let mut pacer = FramePacer::new(effect.frame_duration(stage.settings));
    let start = stage.clock.now();
    loop {
        let elapsed = elapsed_since(start, stage.clock.now());
        if elapsed >= budget {
            break;
        }
        effect.render(elapsed, stage.leds, stage.rng);
        stage.present_paced(&mut pacer);
    }
}

/// Strobe, chase, sparkle and finale over the backlight, then dark
///
/// The total length comes from `settings.backlight_duration`.
pub fn goal_flash_sequence<S, C, R>(stage: &mut StripStage<'_, S, C, R>, team: Rgb, accent: Rgb)
where
    S: PixelSink,
    C: Clock,
    R: RngCore,
{
    let settings = stage.settings;
    let plan = PhasePlan::split(settings.backlight_duration);

    let strobe = BacklightEffect::Strobe {
        team,
        accent,
        step: settings.strobe_step,
    };
    run_phase(stage, &strobe, plan.strobe);

    let chase = BacklightEffect::Chase {
        team,
        accent,
        step: settings.chase_step,
    };
    run_phase(stage, &chase, plan.chase);

    let sparkle = BacklightEffect::Sparkle {
        team,
        accent,
        density: settings.strip_sparkle_density,
    };
    run_phase(stage, &sparkle, plan.sparkle);

    let finale = BacklightEffect::finale(team, plan.finale, settings);
    if let Some(length) = finale.finale_length() {
        run_phase(stage, &finale, length);
    }

    stage.fill(BLACK);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn split_ten_seconds() {
        let plan = PhasePlan::split(Duration::from_secs(10));
        assert_eq!(plan.strobe, Duration::from_millis(2500));
        assert_eq!(plan.chase, Duration::from_millis(3500));
        assert_eq!(plan.sparkle, Duration::from_millis(2500));
        assert_eq!(plan.finale, Duration::from_millis(1500));
    }

    #[test]
    fn split_short_budget_keeps_total() {
        let plan = PhasePlan::split(Duration::from_secs(4));
        assert_eq!(plan.strobe, Duration::from_millis(1000));
        assert_eq!(plan.chase, Duration::from_millis(1400));
        assert_eq!(plan.sparkle, Duration::from_millis(100));
        assert_eq!(plan.finale, Duration::from_millis(1500));
    }

    #[test]
    fn strobe_cycles_through_burst() {
        let team = Rgb::new(200, 0, 0);
        let accent = Rgb::new(0, 0, 200);
        let effect = BacklightEffect::Strobe {
            team,
            accent,
            step: Duration::from_millis(80),
        };
        let mut rng = SmallRng::seed_from_u64(1);
        let mut leds = [BLACK; 4];

        effect.render(Duration::from_millis(0), &mut leds, &mut rng);
        assert_eq!(leds[0], team);
        effect.render(Duration::from_millis(90), &mut leds, &mut rng);
        assert_eq!(leds[0], WHITE);
        effect.render(Duration::from_millis(170), &mut leds, &mut rng);
        assert_eq!(leds[3], accent);
        effect.render(Duration::from_millis(250), &mut leds, &mut rng);
        assert_eq!(leds[2], BLACK);
    }

    #[test]
    fn chase_head_wears_accent() {
        let accent = Rgb::new(0, 120, 255);
        let effect = BacklightEffect::Chase {
            team: Rgb::new(255, 0, 0),
            accent,
            step: Duration::from_millis(15),
        };
        let mut rng = SmallRng::seed_from_u64(1);
        let mut leds = [BLACK; 15];

        effect.render(Duration::from_millis(45), &mut leds, &mut rng);
        assert_eq!(leds[3], accent);
        // First tail pixel is the brightest white
        assert!(leds[2].r > leds[1].r);
    }

    #[test]
    fn finale_fades_to_black() {
        let settings = AnimationSettings::default();
        let team = Rgb::new(255, 0, 0);
        let finale = BacklightEffect::finale(team, Duration::from_millis(1500), &settings);
        let length = finale.finale_length().unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut leds = [BLACK; 3];

        finale.render(Duration::from_millis(0), &mut leds, &mut rng);
        assert_eq!(leds[0], WHITE);
        finale.render(length, &mut leds, &mut rng);
        assert_eq!(leds[0], BLACK);
    }
}
