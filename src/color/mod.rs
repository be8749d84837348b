mod team;
mod utils;

use smart_leds::RGB8;
pub use team::{ColorResolver, FALLBACK_COLORS, TeamColorTable, TeamColors, team_colors};
pub use utils::{blend_colors, rgb_from_u32, scale_color};

pub type Rgb = RGB8;

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
pub const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};
