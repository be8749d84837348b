//! Score feed model
//!
//! The feed itself (HTTP, a simulator, a test script) lives outside the crate
//! behind [`ScoreFeed`]. Text fields use fixed-capacity `heapless` strings and
//! are truncated on construction.

use heapless::{String, Vec};

use crate::error::Result;

pub type GameId = u64;

/// Longest team abbreviation kept
pub const ABBR_LEN: usize = 4;
/// Longest scorer name kept
pub const NAME_LEN: usize = 32;
/// Longest no-game message kept
pub const MESSAGE_LEN: usize = 48;
/// Most goals tracked per game
pub const MAX_GOALS: usize = 32;

pub type GoalList = Vec<Goal, MAX_GOALS>;

/// Copy as much of `text` as fits into a fixed-capacity string
///
/// Truncation always lands on a character boundary.
pub fn truncated<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

/// Game state code reported by the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Future,
    PreGame,
    Live,
    Critical,
    Off,
    Final,
    Unknown,
}

impl GameState {
    /// Parse a feed state code, unknown codes map to [`GameState::Unknown`]
    pub fn parse_from_str(code: &str) -> Self {
        match code.trim() {
            "FUT" => Self::Future,
            "PRE" => Self::PreGame,
            "LIVE" => Self::Live,
            "CRIT" => Self::Critical,
            "OFF" => Self::Off,
            "FINAL" => Self::Final,
            _ => Self::Unknown,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Future => "FUT",
            Self::PreGame => "PRE",
            Self::Live => "LIVE",
            Self::Critical => "CRIT",
            Self::Off => "OFF",
            Self::Final => "FINAL",
            Self::Unknown => "?",
        }
    }

    /// Whether the goal list is worth fetching in this state
    pub const fn tracks_goals(self) -> bool {
        matches!(self, Self::Live | Self::Critical | Self::PreGame | Self::Off)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamScore {
    pub abbr: String<ABBR_LEN>,
    pub score: u32,
}

impl TeamScore {
    pub fn new(abbr: &str, score: u32) -> Self {
        Self {
            abbr: truncated(abbr.trim()),
            score,
        }
    }

    /// Case-insensitive abbreviation match
    pub fn is(&self, team: &str) -> bool {
        self.abbr.eq_ignore_ascii_case(team.trim())
    }
}

/// One poll of the current game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub id: GameId,
    pub state: GameState,
    pub home: TeamScore,
    pub away: TeamScore,
}

impl GameSnapshot {
    /// Tracked team's score and the opponent's, or `None` if `team` is not playing
    pub fn split_for(&self, team: &str) -> Option<(&TeamScore, &TeamScore)> {
        if self.home.is(team) {
            Some((&self.home, &self.away))
        } else if self.away.is(team) {
            Some((&self.away, &self.home))
        } else {
            None
        }
    }
}

/// Result of the game-now query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameNow {
    NoGame { message: String<MESSAGE_LEN> },
    Game(GameSnapshot),
}

impl GameNow {
    pub fn no_game(message: &str) -> Self {
        Self::NoGame {
            message: truncated(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scorer {
    pub full_name: String<NAME_LEN>,
    pub number: Option<u16>,
    pub team: String<ABBR_LEN>,
}

impl Scorer {
    pub fn new(full_name: &str, number: Option<u16>, team: &str) -> Self {
        Self {
            full_name: truncated(full_name),
            number,
            team: truncated(team.trim()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    pub period: u8,
    /// Clock time within the period, `MM:SS`
    pub time_in_period: String<8>,
    pub scorer: Scorer,
    pub assists: Vec<Scorer, 2>,
    pub home_score: u32,
    pub away_score: u32,
}

impl Goal {
    /// Goal without assists
    pub fn new(period: u8, time_in_period: &str, scorer: Scorer, home_score: u32, away_score: u32) -> Self {
        Self {
            period,
            time_in_period: truncated(time_in_period),
            scorer,
            assists: Vec::new(),
            home_score,
            away_score,
        }
    }
}

/// Source of game and goal data
///
/// Any transport or parse failure is reported as
/// [`Error::FeedUnavailable`](crate::Error::FeedUnavailable).
pub trait ScoreFeed {
    /// Current or next game of `team`
    fn game_now(&mut self, team: &str) -> Result<GameNow>;

    /// Goals of `game` in scoring order
    fn goals(&mut self, game: GameId) -> Result<GoalList>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_state_codes() {
        assert_eq!(GameState::parse_from_str("LIVE"), GameState::Live);
        assert_eq!(GameState::parse_from_str(" CRIT "), GameState::Critical);
        assert_eq!(GameState::parse_from_str("POSTPONED"), GameState::Unknown);
        assert!(!GameState::Final.tracks_goals());
        assert!(GameState::PreGame.tracks_goals());
    }

    #[test]
    fn long_text_is_truncated() {
        let scorer = Scorer::new("A Remarkably Long Hockey Player Name Indeed", Some(8), "wsh");
        assert_eq!(scorer.full_name.len(), NAME_LEN);
        assert_eq!(scorer.team.as_str(), "wsh");
    }

    #[test]
    fn split_for_either_side() {
        let snapshot = GameSnapshot {
            id: 7,
            state: GameState::Live,
            home: TeamScore::new("MTL", 2),
            away: TeamScore::new("WSH", 1),
        };
        let (own, other) = snapshot.split_for("wsh").unwrap();
        assert_eq!(own.score, 1);
        assert_eq!(other.abbr.as_str(), "MTL");
        assert!(snapshot.split_for("BOS").is_none());
    }
}
