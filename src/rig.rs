//! The goal light rig
//!
//! [`Rig`] owns every component and runs the cooperative loop: poll the
//! feed, play the reactions the detector reports, then wait for the next
//! poll while servicing the delay button. Animations and feed queries block
//! the loop; the button is serviced only between polls and during a goal
//! countdown.

use embassy_time::Duration;
use log::{info, warn};
use rand::RngCore;

use crate::PixelSink;
use crate::animation::{
    AnimationSettings, MatrixStage, StripStage, emoji_animation, goal_flash_sequence,
    goal_number_animation,
};
use crate::color::{BLACK, ColorResolver, Rgb, TeamColorTable, TeamColors, scale_color};
use crate::compositor::Compositor;
use crate::delay::{DelayChange, DelayConfig, DelayController, Polarity};
use crate::detector::{
    CycleOutcome, EventDetector, GoalEvent, GoalSide, MoodCue, PollIntervals, Reaction,
};
use crate::display::{StatusDisplay, TextSink};
use crate::error::{Error, Result};
use crate::feed::{GameSnapshot, ScoreFeed};
use crate::geometry::{MatrixGeometry, StartCorner};
use crate::glyph::Mood;
use crate::input::DelayInput;
use crate::pacer::{Clock, elapsed_since};

const COUNTDOWN_STEP: Duration = Duration::from_secs(1);
const MIN_SLICE: Duration = Duration::from_millis(1);

/// How the goal countdown treats delay changes made while it runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownMode {
    /// Count down the delay read when the goal was detected
    Fixed,
    /// Restart from the new delay whenever it changes
    Resample,
}

/// Everything the rig can be tuned with
#[derive(Debug, Clone)]
pub struct RigConfig {
    pub geometry: MatrixGeometry,
    pub backlight_pixels: usize,
    /// Tracked team code
    pub team: &'static str,
    pub display_columns: usize,
    pub intervals: PollIntervals,
    pub delay: DelayConfig,
    /// How often the button is serviced while waiting
    pub input_period: Duration,
    /// Wait after a goal reaction before the follow-up mood
    pub mood_follow_up: Duration,
    pub countdown: CountdownMode,
    pub emoji_pulses: u8,
    /// Blank columns between the two digits of a jersey number
    pub digit_gap: usize,
    /// Brightness of the secondary color wash shown when there is no game
    pub idle_wash: f32,
    pub animation: AnimationSettings,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            geometry: MatrixGeometry::serpentine_rows(14, 12).with_start_corner(StartCorner::BottomRight),
            backlight_pixels: 15,
            team: "MTL",
            display_columns: 16,
            intervals: PollIntervals::default(),
            delay: DelayConfig::default(),
            input_period: Duration::from_millis(50),
            mood_follow_up: Duration::from_secs(20),
            countdown: CountdownMode::Fixed,
            emoji_pulses: 4,
            digit_gap: 1,
            idle_wash: 0.15,
            animation: AnimationSettings::default(),
        }
    }
}

impl RigConfig {
    /// Check the layout against the sinks and the buffers holding their frames
    pub fn validate(
        &self,
        matrix_pixels: usize,
        matrix_capacity: usize,
        backlight_pixels: usize,
        backlight_capacity: usize,
    ) -> Result<()> {
        let needed = self.geometry.pixel_count();
        if needed != matrix_pixels {
            return Err(Error::GeometryMismatch {
                expected: needed,
                actual: matrix_pixels,
            });
        }
        if needed > matrix_capacity {
            return Err(Error::BufferTooSmall {
                capacity: matrix_capacity,
                needed,
            });
        }
        if self.backlight_pixels != backlight_pixels {
            return Err(Error::GeometryMismatch {
                expected: self.backlight_pixels,
                actual: backlight_pixels,
            });
        }
        if self.backlight_pixels > backlight_capacity {
            return Err(Error::BufferTooSmall {
                capacity: backlight_capacity,
                needed: self.backlight_pixels,
            });
        }
        Ok(())
    }
}

/// Hardware the rig draws on
pub struct Outputs<M, L, T> {
    pub matrix: M,
    pub backlight: L,
    pub text: T,
}

/// Remember the first error of a cycle, log the rest
fn keep_first(first: &mut Option<Error>, result: Result<()>) {
    if let Err(err) = result {
        warn!("Reaction failed: {err}");
        first.get_or_insert(err);
    }
}

/// Goal light controller for one team
pub struct Rig<F, I, M, L, T, C, R, const MAX_PIXELS: usize, const MAX_STRIP: usize> {
    config: RigConfig,
    feed: F,
    input: I,
    delay: DelayController,
    detector: EventDetector,
    canvas: Compositor<MAX_PIXELS>,
    strip: [Rgb; MAX_STRIP],
    matrix: M,
    backlight: L,
    status: StatusDisplay<T>,
    clock: C,
    rng: R,
    colors: &'static dyn ColorResolver,
}

impl<F, I, M, L, T, C, R, const MAX_PIXELS: usize, const MAX_STRIP: usize>
    Rig<F, I, M, L, T, C, R, MAX_PIXELS, MAX_STRIP>
where
    F: ScoreFeed,
    I: DelayInput,
    M: PixelSink,
    L: PixelSink,
    T: TextSink,
    C: Clock,
    R: RngCore,
{
    /// Validate the configuration and resolve the button polarity
    ///
    /// The button must be released while this runs.
    pub fn new(
        config: RigConfig,
        feed: F,
        mut input: I,
        outputs: Outputs<M, L, T>,
        clock: C,
        rng: R,
    ) -> Result<Self> {
        config.validate(
            outputs.matrix.pixel_count(),
            MAX_PIXELS,
            outputs.backlight.pixel_count(),
            MAX_STRIP,
        )?;

        let polarity = Polarity::detect(input.idle_reads_pressed());
        let delay = DelayController::new(config.delay, polarity);
        let detector = EventDetector::new(config.team, config.intervals, config.mood_follow_up);
        let canvas = Compositor::new(config.geometry)?;
        let status = StatusDisplay::new(outputs.text, config.display_columns);

        Ok(Self {
            config,
            feed,
            input,
            delay,
            detector,
            canvas,
            strip: [BLACK; MAX_STRIP],
            matrix: outputs.matrix,
            backlight: outputs.backlight,
            status,
            clock,
            rng,
            colors: &TeamColorTable,
        })
    }

    /// Use another team color table
    #[must_use]
    pub fn with_colors(mut self, colors: &'static dyn ColorResolver) -> Self {
        self.colors = colors;
        self
    }

    pub const fn config(&self) -> &RigConfig {
        &self.config
    }

    pub const fn delay(&self) -> &DelayController {
        &self.delay
    }

    pub const fn detector(&self) -> &EventDetector {
        &self.detector
    }

    pub const fn canvas(&self) -> &Compositor<MAX_PIXELS> {
        &self.canvas
    }

    pub fn feed_mut(&mut self) -> &mut F {
        &mut self.feed
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub const fn matrix_sink(&self) -> &M {
        &self.matrix
    }

    pub const fn backlight_sink(&self) -> &L {
        &self.backlight
    }

    pub const fn text_sink(&self) -> &T {
        self.status.sink()
    }

    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Startup banner and dark outputs
    pub fn start(&mut self) {
        info!(
            "Goal light started: team {}, delay {}s",
            self.config.team,
            self.delay.delay()
        );
        self.status.show_startup(self.delay.delay());
        self.blank();
    }

    /// Run one poll cycle and return how long to wait before the next
    ///
    /// Never fails: an error is logged and shown, and the standard interval
    /// is returned.
    pub fn run_cycle(&mut self) -> Duration {
        match self.try_cycle() {
            Ok(cadence) => cadence,
            Err(err) => {
                warn!("Cycle failed: {err}");
                self.status.show_error(&err);
                self.config.intervals.standard
            }
        }
    }

    /// Wait `cadence` while servicing the delay button
    pub fn wait(&mut self, cadence: Duration) {
        self.service_input_for(cadence, &mut || true);
    }

    /// Poll until `keep_running` turns false, then shut down
    ///
    /// `keep_running` is checked between polls and on every input service
    /// tick while waiting.
    pub fn run(&mut self, mut keep_running: impl FnMut() -> bool) {
        self.start();
        while keep_running() {
            let cadence = self.run_cycle();
            self.service_input_for(cadence, &mut keep_running);
        }
        self.shutdown();
    }

    /// Clear the matrix, turn the backlight off and clear the text
    pub fn shutdown(&mut self) {
        info!("Goal light stopping");
        self.blank();
        self.status.clear();
    }

    fn blank(&mut self) {
        self.canvas.fill(BLACK);
        self.canvas.flush(&mut self.matrix);
        self.fill_backlight(BLACK);
    }

    fn fill_backlight(&mut self, color: Rgb) {
        let len = self.config.backlight_pixels;
        self.strip[..len].fill(color);
        crate::write_strip(&mut self.backlight, &self.strip[..len]);
    }

    fn try_cycle(&mut self) -> Result<Duration> {
        let now = self.clock.now();
        if let Some(change) = self.input.service(&mut self.delay, now) {
            self.status.show_delay(change.seconds());
        }

        let report = self.detector.poll(&mut self.feed, now)?;
        let snapshot = match report.outcome {
            CycleOutcome::NoGame { message } => {
                self.show_idle(&message);
                return Ok(report.cadence);
            }
            CycleOutcome::Game(snapshot) => snapshot,
        };
        self.status.show_score(&snapshot, self.delay.delay());

        let mut first_error = None;
        for reaction in report.reactions {
            let result = match reaction {
                Reaction::StartMood(cue) => {
                    info!("Start-of-game mood: {}", cue.mood.as_str());
                    self.play_mood(&cue)
                }
                Reaction::ScheduledMood(cue) => {
                    info!("Scheduled mood: {}", cue.mood.as_str());
                    self.play_mood(&cue)
                }
                Reaction::Goal(event) => self.react_to_goal(&event, &snapshot),
            };
            keep_first(&mut first_error, result);
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(report.cadence),
        }
    }

    fn show_idle(&mut self, message: &str) {
        let colors = self.colors.team_colors(self.config.team);
        self.canvas.fill(scale_color(colors.secondary, self.config.idle_wash));
        self.canvas.flush(&mut self.matrix);
        self.fill_backlight(colors.secondary);
        self.status.show_no_game(message, self.delay.delay());
    }

    fn play_mood(&mut self, cue: &MoodCue) -> Result<()> {
        let colors = self.colors.team_colors(&cue.colors_of);
        self.emoji(cue.mood, colors)
    }

    fn emoji(&mut self, mood: Mood, colors: TeamColors) -> Result<()> {
        let mut stage = MatrixStage {
            canvas: &mut self.canvas,
            sink: &mut self.matrix,
            clock: &mut self.clock,
            rng: &mut self.rng,
            settings: &self.config.animation,
        };
        emoji_animation(
            &mut stage,
            mood,
            colors.primary,
            colors.secondary,
            self.config.emoji_pulses,
        )
    }

    /// Countdown, the reaction for the scoring side, then the mood timer
    fn react_to_goal(&mut self, event: &GoalEvent, snapshot: &GameSnapshot) -> Result<()> {
        if event.skipped > 0 {
            info!("{} earlier goal(s) in this poll not animated", event.skipped);
        }
        self.countdown();

        let scorer = &event.goal.scorer;
        let team = if scorer.team.is_empty() {
            self.config.team
        } else {
            scorer.team.as_str()
        };
        let colors = self.colors.team_colors(team);

        let mut first_error = None;
        match event.side {
            GoalSide::Against => {
                info!("Opponent goal by {team}, score {}-{}", snapshot.home.score, snapshot.away.score);
                self.status.show_goal_against(team);
                keep_first(&mut first_error, self.emoji(Mood::Sad, colors));
            }
            GoalSide::For => {
                self.status.show_goal(team, scorer.number);
                if let Some(number) = scorer.number {
                    keep_first(&mut first_error, self.jersey(i32::from(number), colors));
                }
                self.flash_backlight(colors);
            }
        }

        self.detector.arm_mood_timer(self.clock.now());
        first_error.map_or(Ok(()), Err)
    }

    fn jersey(&mut self, number: i32, colors: TeamColors) -> Result<()> {
        let mut stage = MatrixStage {
            canvas: &mut self.canvas,
            sink: &mut self.matrix,
            clock: &mut self.clock,
            rng: &mut self.rng,
            settings: &self.config.animation,
        };
        goal_number_animation(
            &mut stage,
            number,
            colors.primary,
            colors.secondary,
            self.config.digit_gap,
        )
    }

    fn flash_backlight(&mut self, colors: TeamColors) {
        let len = self.config.backlight_pixels;
        let mut stage = StripStage {
            leds: &mut self.strip[..len],
            sink: &mut self.backlight,
            clock: &mut self.clock,
            rng: &mut self.rng,
            settings: &self.config.animation,
        };
        goal_flash_sequence(&mut stage, colors.primary, colors.secondary);
    }

    /// Count the delay down in one-second steps, servicing the button
    fn countdown(&mut self) {
        let mut remaining = self.delay.delay();
        info!("Waiting {remaining}s before the goal reaction");

        while remaining > 0 {
            self.status.show_countdown(remaining);
            let change = self.service_input_for(COUNTDOWN_STEP, &mut || true);

            if self.config.countdown == CountdownMode::Resample
                && let Some(change) = change
            {
                remaining = change.seconds();
                info!("Delay changed, countdown restarted at {remaining}s");
                continue;
            }
            remaining -= 1;
        }
    }

    /// Service the button every input period until `duration` has passed
    ///
    /// Returns the last delay change seen.
    fn service_input_for(
        &mut self,
        duration: Duration,
        keep_running: &mut dyn FnMut() -> bool,
    ) -> Option<DelayChange> {
        let start = self.clock.now();
        let mut last = None;

        loop {
            let now = self.clock.now();
            if let Some(change) = self.input.service(&mut self.delay, now) {
                self.status.show_delay(change.seconds());
                last = Some(change);
            }

            let elapsed = elapsed_since(start, now);
            if elapsed >= duration || !keep_running() {
                return last;
            }
            let left = Duration::from_millis(duration.as_millis() - elapsed.as_millis());
            self.clock
                .sleep(left.min(self.config.input_period).max(MIN_SLICE));
        }
    }
}
