//! Desktop simulator for the goal light rig
//!
//! Runs the real `Rig` on a background thread against a scripted feed and
//! draws what the rig would show on the matrix, the backlight strip and the
//! LCD. The delay button can be tapped or held with the mouse.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Instant as StdInstant, SystemTime, UNIX_EPOCH};

use eframe::egui::{self};
use goal_light_composer::detector::PollIntervals;
use goal_light_composer::feed::{
    GameId, GameNow, GameSnapshot, GameState, Goal, GoalList, ScoreFeed, Scorer, TeamScore,
};
use goal_light_composer::input::{ButtonPin, PolledButton};
use goal_light_composer::{
    Clock, Duration, Error, Instant, MatrixGeometry, Outputs, PixelSink, Rgb, Rig, RigConfig,
    TextSink,
};
use log::{LevelFilter, Log, Metadata, Record, error, info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Frame buffer capacity of the simulated matrix
const MAX_PIXELS: usize = 256;

/// Buffer capacity of the simulated backlight
const MAX_STRIP: usize = 64;

/// Gap between LEDs
const LED_GAP: f32 = 2.0;

/// Default size of each LED rectangle in pixels
const LED_SIZE: f32 = 18.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// Matrix drawn in logical (x, y) coordinates
    Logical,
    /// Matrix drawn in physical strip order, wrapped to the window
    Strip,
}

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    #[allow(clippy::print_stderr)]
    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("{:>5} {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Scripted game the feed reports
struct Script {
    team: &'static str,
    opponent: String,
    game_id: GameId,
    live: bool,
    failing: bool,
    home: u32,
    away: u32,
    goals: GoalList,
}

impl Script {
    fn snapshot(&self) -> GameNow {
        if !self.live {
            return GameNow::no_game("Simulator idle");
        }
        GameNow::Game(GameSnapshot {
            id: self.game_id,
            state: GameState::Live,
            home: TeamScore::new(self.team, self.home),
            away: TeamScore::new(&self.opponent, self.away),
        })
    }

    fn add_goal(&mut self, team: &str, jersey: u16) {
        let scorer = Scorer::new("Preview Skater", Some(jersey), team);
        let goal = Goal::new(1, "10:00", scorer, self.home, self.away);
        if self.goals.push(goal).is_err() {
            warn!("Goal list full, goal dropped");
        }
    }
}

/// Latched output of the rig, as the hardware would show it
struct Panel {
    matrix: Vec<Rgb>,
    backlight: Vec<Rgb>,
    lcd: [String; 2],
}

/// State shared between the UI and the rig thread
struct Shared {
    script: Mutex<Script>,
    panel: Mutex<Panel>,
    button: AtomicBool,
    running: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct ScriptedFeed(Arc<Shared>);

impl ScoreFeed for ScriptedFeed {
    fn game_now(&mut self, _team: &str) -> goal_light_composer::Result<GameNow> {
        let script = lock(&self.0.script);
        if script.failing {
            return Err(Error::FeedUnavailable);
        }
        Ok(script.snapshot())
    }

    fn goals(&mut self, _game: GameId) -> goal_light_composer::Result<GoalList> {
        let script = lock(&self.0.script);
        if script.failing {
            return Err(Error::FeedUnavailable);
        }
        Ok(script.goals.clone())
    }
}

#[derive(Clone, Copy)]
enum Target {
    Matrix,
    Backlight,
}

/// Pixel sink latching into the shared panel on `show`
struct PanelSink {
    shared: Arc<Shared>,
    target: Target,
    pending: Vec<Rgb>,
}

impl PanelSink {
    fn new(shared: Arc<Shared>, target: Target, count: usize) -> Self {
        Self {
            shared,
            target,
            pending: vec![Rgb::default(); count],
        }
    }
}

impl PixelSink for PanelSink {
    fn pixel_count(&self) -> usize {
        self.pending.len()
    }

    fn set_pixel(&mut self, index: usize, color: Rgb) {
        if let Some(pixel) = self.pending.get_mut(index) {
            *pixel = color;
        }
    }

    fn show(&mut self) {
        let mut panel = lock(&self.shared.panel);
        match self.target {
            Target::Matrix => panel.matrix.clone_from(&self.pending),
            Target::Backlight => panel.backlight.clone_from(&self.pending),
        }
    }
}

struct PanelText(Arc<Shared>);

impl TextSink for PanelText {
    fn write_line(&mut self, row: usize, text: &str) {
        if let Some(line) = lock(&self.0.panel).lcd.get_mut(row) {
            *line = text.to_string();
        }
    }

    fn clear(&mut self) {
        lock(&self.0.panel).lcd = Default::default();
    }
}

struct HeldButton(Arc<Shared>);

impl ButtonPin for HeldButton {
    fn reads_pressed(&mut self) -> bool {
        self.0.button.load(Ordering::Relaxed)
    }
}

struct WallClock {
    start: StdInstant,
}

impl Clock for WallClock {
    fn now(&self) -> Instant {
        let elapsed = u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX);
        Instant::from_millis(elapsed)
    }

    fn sleep(&mut self, duration: Duration) {
        thread::sleep(std::time::Duration::from_millis(duration.as_millis()));
    }
}

/// Simulator cadence: fast enough to try things out by hand
fn preview_config() -> RigConfig {
    RigConfig {
        intervals: PollIntervals {
            live: Duration::from_secs(2),
            pre_game: Duration::from_secs(5),
            finished: Duration::from_secs(5),
            no_game: Duration::from_secs(3),
            standard: Duration::from_secs(3),
        },
        ..RigConfig::default()
    }
}

fn spawn_rig(shared: Arc<Shared>, config: RigConfig) {
    thread::spawn(move || {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(7, |since| u64::from(since.subsec_nanos()));
        let outputs = Outputs {
            matrix: PanelSink::new(shared.clone(), Target::Matrix, config.geometry.pixel_count()),
            backlight: PanelSink::new(shared.clone(), Target::Backlight, config.backlight_pixels),
            text: PanelText(shared.clone()),
        };
        let rig = Rig::<_, _, _, _, _, _, _, MAX_PIXELS, MAX_STRIP>::new(
            config,
            ScriptedFeed(shared.clone()),
            PolledButton::new(HeldButton(shared.clone())),
            outputs,
            WallClock {
                start: StdInstant::now(),
            },
            SmallRng::seed_from_u64(seed),
        );
        match rig {
            Ok(mut rig) => rig.run(|| shared.running.load(Ordering::Relaxed)),
            Err(err) => error!("Rig setup failed: {err}"),
        }
    });
}

fn main() -> eframe::Result<()> {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 640.0])
            .with_title("Goal Light Preview"),
        ..Default::default()
    };

    eframe::run_native(
        "goal-light-preview",
        options,
        Box::new(|_cc| Ok(Box::new(PreviewApp::new()))),
    )
}

struct PreviewApp {
    shared: Arc<Shared>,
    geometry: MatrixGeometry,
    /// Jersey number used for the next goal
    jersey: u16,
    /// Opponent code as typed
    opponent: String,
    layout: Layout,
    led_size: f32,
}

impl PreviewApp {
    fn new() -> Self {
        let config = preview_config();
        let opponent = String::from("WSH");
        let shared = Arc::new(Shared {
            script: Mutex::new(Script {
                team: config.team,
                opponent: opponent.clone(),
                game_id: 2_025_020_000,
                live: false,
                failing: false,
                home: 0,
                away: 0,
                goals: GoalList::new(),
            }),
            panel: Mutex::new(Panel {
                matrix: vec![Rgb::default(); config.geometry.pixel_count()],
                backlight: vec![Rgb::default(); config.backlight_pixels],
                lcd: Default::default(),
            }),
            button: AtomicBool::new(false),
            running: AtomicBool::new(true),
        });
        let geometry = config.geometry;
        spawn_rig(shared.clone(), config);

        Self {
            shared,
            geometry,
            jersey: 22,
            opponent,
            layout: Layout::Logical,
            led_size: LED_SIZE,
        }
    }

    fn start_game(&self) {
        let mut script = lock(&self.shared.script);
        script.game_id += 1;
        script.live = true;
        script.home = 0;
        script.away = 0;
        script.goals.clear();
        info!("Preview: game {} started", script.game_id);
    }

    fn goal_for(&self) {
        let mut script = lock(&self.shared.script);
        script.home += 1;
        let team = script.team;
        script.add_goal(team, self.jersey);
    }

    fn goal_against(&self) {
        let mut script = lock(&self.shared.script);
        script.away += 1;
        let opponent = script.opponent.clone();
        script.add_goal(&opponent, self.jersey);
    }

    fn end_game(&self) {
        lock(&self.shared.script).live = false;
    }

    fn draw_leds(painter: &egui::Painter, origin: egui::Pos2, pitch: f32, size: f32, cells: impl Iterator<Item = (usize, usize, Rgb)>) {
        #[allow(clippy::cast_precision_loss)]
        for (col, row, pixel) in cells {
            let rect = egui::Rect::from_min_size(
                egui::pos2(origin.x + col as f32 * pitch, origin.y + row as f32 * pitch),
                egui::vec2(size, size),
            );
            painter.rect_filled(rect, 3.0, egui::Color32::from_rgb(pixel.r, pixel.g, pixel.b));
        }
    }
}

impl Drop for PreviewApp {
    fn drop(&mut self) {
        self.shared.running.store(false, Ordering::Relaxed);
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint();

        let (matrix, backlight, lcd) = {
            let panel = lock(&self.shared.panel);
            (panel.matrix.clone(), panel.backlight.clone(), panel.lcd.clone())
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                // <FeedControls>
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        if ui.button("Start game").clicked() {
                            self.start_game();
                        }
                        if ui.button("End game").clicked() {
                            self.end_game();
                        }
                    });

                    ui.add_space(4.0);

                    ui.horizontal(|ui| {
                        if ui.button("Goal for").clicked() {
                            self.goal_for();
                        }
                        if ui.button("Goal against").clicked() {
                            self.goal_against();
                        }
                        ui.label("Jersey:");
                        ui.add(egui::DragValue::new(&mut self.jersey).range(0u16..=120u16));
                    });

                    ui.add_space(4.0);

                    ui.horizontal(|ui| {
                        ui.label("Opponent:");
                        if ui
                            .add(egui::TextEdit::singleline(&mut self.opponent).desired_width(48.0))
                            .changed()
                        {
                            lock(&self.shared.script).opponent = self.opponent.trim().to_uppercase();
                        }

                        let mut failing = lock(&self.shared.script).failing;
                        if ui.checkbox(&mut failing, "Feed failure").changed() {
                            lock(&self.shared.script).failing = failing;
                        }
                    });
                });
                // </FeedControls>
                ui.add_space(16.0);
                // <DelayButton>
                ui.vertical(|ui| {
                    let response = ui.add(
                        egui::Button::new("DELAY\n(tap / hold)")
                            .min_size(egui::vec2(96.0, 48.0))
                            .sense(egui::Sense::click_and_drag()),
                    );
                    self.shared
                        .button
                        .store(response.is_pointer_button_down_on(), Ordering::Relaxed);
                });
                // </DelayButton>
            });

            ui.add_space(12.0);

            // === LCD ===
            egui::Frame::new()
                .fill(egui::Color32::from_rgb(40, 70, 160))
                .inner_margin(8.0)
                .show(ui, |ui| {
                    for line in &lcd {
                        ui.label(
                            egui::RichText::new(format!("{line:<16}"))
                                .monospace()
                                .size(20.0)
                                .color(egui::Color32::WHITE),
                        );
                    }
                });

            ui.add_space(12.0);

            ui.horizontal(|ui| {
                ui.label("Size:");
                ui.add(egui::Slider::new(&mut self.led_size, 6.0..=32.0));
                ui.add_space(8.0);
                ui.label("Layout:");
                ui.selectable_value(&mut self.layout, Layout::Logical, "logical");
                ui.selectable_value(&mut self.layout, Layout::Strip, "strip order");
            });

            ui.add_space(8.0);

            // === Matrix ===
            let pitch = self.led_size + LED_GAP;
            let available_width = ui.available_width();
            let geometry = self.geometry;
            match self.layout {
                Layout::Logical => {
                    #[allow(clippy::cast_precision_loss)]
                    let size = egui::vec2(
                        geometry.width as f32 * pitch,
                        geometry.height as f32 * pitch,
                    );
                    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
                    let cells = (0..geometry.height).flat_map(|y| {
                        let matrix = &matrix;
                        (0..geometry.width).map(move |x| {
                            let pixel = matrix.get(geometry.index(x, y)).copied().unwrap_or_default();
                            (x, y, pixel)
                        })
                    });
                    Self::draw_leds(&painter, response.rect.min, pitch, self.led_size, cells);
                }
                Layout::Strip => {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let per_row = (available_width / pitch).floor().max(1.0) as usize;
                    #[allow(clippy::cast_precision_loss)]
                    let height = matrix.len().div_ceil(per_row) as f32 * pitch;
                    let (response, painter) =
                        ui.allocate_painter(egui::vec2(available_width, height), egui::Sense::hover());
                    let cells = matrix
                        .iter()
                        .enumerate()
                        .map(|(i, pixel)| (i % per_row, i / per_row, *pixel));
                    Self::draw_leds(&painter, response.rect.min, pitch, self.led_size, cells);
                }
            }

            ui.add_space(12.0);

            // === Backlight ===
            ui.label("Backlight");
            #[allow(clippy::cast_precision_loss)]
            let width = backlight.len() as f32 * pitch;
            let (response, painter) = ui.allocate_painter(egui::vec2(width, pitch), egui::Sense::hover());
            let cells = backlight.iter().enumerate().map(|(i, pixel)| (i, 0, *pixel));
            Self::draw_leds(&painter, response.rect.min, pitch, self.led_size, cells);
        });
    }
}
