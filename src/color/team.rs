//! Team color lookup

use super::{Rgb, rgb_from_u32};

/// Primary and secondary colors of a team
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamColors {
    pub primary: Rgb,
    pub secondary: Rgb,
}

/// Grey pair returned for unknown team codes
pub const FALLBACK_COLORS: TeamColors = TeamColors {
    primary: rgb_from_u32(0x99_99_99),
    secondary: rgb_from_u32(0x33_33_33),
};

/// Maps a team code to its color pair
pub trait ColorResolver {
    fn team_colors(&self, code: &str) -> TeamColors;
}

/// Build the team table from (code, 0xRRGGBB, 0xRRGGBB) rows
macro_rules! team_table {
    ($(($code:literal, $primary:expr, $secondary:expr)),* $(,)?) => {
        [
            $(($code, TeamColors {
                primary: rgb_from_u32($primary),
                secondary: rgb_from_u32($secondary),
            })),*
        ]
    };
}

#[allow(clippy::unreadable_literal)]
const NHL_TEAMS: [(&str, TeamColors); 32] = team_table![
    ("ANA", 0xFF8C42, 0xC9A24D),
    ("ARI", 0xA62639, 0xE6D8B8),
    ("BOS", 0xFFD23F, 0x000000),
    ("BUF", 0x0050B5, 0xFFD23F),
    ("CGY", 0xE3172D, 0xFFD966),
    ("CAR", 0xE10600, 0x111111),
    ("CHI", 0xE10600, 0x000000),
    ("COL", 0x8B2A3A, 0x2A6EBB),
    ("CBJ", 0x003F91, 0xE3172D),
    ("DAL", 0x00875A, 0xA0A0A0),
    ("DET", 0xE10600, 0xFFFFFF),
    ("EDM", 0x003F91, 0xFF6A00),
    ("FLA", 0x003F91, 0xE3172D),
    ("LAK", 0x1A1A1A, 0xB3B3B3),
    ("MIN", 0x1E6F4A, 0xC62828),
    ("MTL", 0xE10600, 0x003DA5),
    ("NSH", 0xFFD23F, 0x003F91),
    ("NJD", 0xE10600, 0x000000),
    ("NYI", 0x0066CC, 0xFF8C42),
    ("NYR", 0x0047AB, 0xE10600),
    ("OTT", 0xE3172D, 0xD4AF37),
    ("PHI", 0xFF6A00, 0x000000),
    ("PIT", 0xFFD23F, 0x000000),
    ("SJS", 0x00A3AD, 0xFF8C42),
    ("SEA", 0x9FE0E0, 0x002033),
    ("STL", 0x0047AB, 0xFFD23F),
    ("TBL", 0x0047AB, 0xFFFFFF),
    ("TOR", 0x0033A0, 0xFFFFFF),
    ("VAN", 0x0033A0, 0x00A86B),
    ("VGK", 0xC9A24D, 0x3A3F44),
    ("WSH", 0x003F91, 0xE3172D),
    ("WPG", 0x003F91, 0xC62828),
];

/// Look up a team's colors by code
///
/// Case-insensitive, surrounding whitespace ignored. Unknown codes get
/// [`FALLBACK_COLORS`].
pub fn team_colors(code: &str) -> TeamColors {
    let code = code.trim();
    NHL_TEAMS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(code))
        .map(|(_, colors)| *colors)
        .unwrap_or(FALLBACK_COLORS)
}

/// Built-in NHL color table
#[derive(Debug, Clone, Copy, Default)]
pub struct TeamColorTable;

impl ColorResolver for TeamColorTable {
    fn team_colors(&self, code: &str) -> TeamColors {
        team_colors(code)
    }
}
