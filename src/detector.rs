//! Per-poll game event detection
//!
//! [`EventDetector`] owns the goal tracking state and turns one feed poll into
//! a [`CycleReport`]: what the feed said, which reactions the rig should play
//! and how long to wait before the next poll. It never draws, sleeps or reads
//! the delay button; the rig does that with the report.

use embassy_time::{Duration, Instant};
use heapless::{String, Vec};
use log::{debug, info, warn};

use crate::error::Result;
use crate::feed::{ABBR_LEN, GameId, GameNow, GameSnapshot, GameState, Goal, MESSAGE_LEN, ScoreFeed, truncated};
use crate::glyph::Mood;

/// Poll cadence per game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    /// `LIVE` and `CRIT`
    pub live: Duration,
    /// `PRE`
    pub pre_game: Duration,
    /// Every other state
    pub finished: Duration,
    /// No game scheduled
    pub no_game: Duration,
    /// After a failed cycle
    pub standard: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            live: Duration::from_secs(2),
            pre_game: Duration::from_secs(60),
            finished: Duration::from_secs(600),
            no_game: Duration::from_secs(1200),
            standard: Duration::from_secs(5),
        }
    }
}

impl PollIntervals {
    pub const fn for_state(&self, state: GameState) -> Duration {
        match state {
            GameState::Live | GameState::Critical => self.live,
            GameState::PreGame => self.pre_game,
            _ => self.finished,
        }
    }
}

/// What the detector remembers about the tracked game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GoalTrackingState {
    pub game_id: Option<GameId>,
    /// `None` until the first goal list of the game has been seen
    pub last_goal_count: Option<usize>,
    pub emoji_shown_for_game: Option<GameId>,
    pub emoji_due_at: Option<Instant>,
}

impl GoalTrackingState {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Mood face and the team whose colors it is drawn in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodCue {
    pub mood: Mood,
    pub colors_of: String<ABBR_LEN>,
}

/// Mood for the current scoreline, seen from `team`
///
/// Ahead is happy and behind is sad, both in the tracked team's colors except
/// that sad uses the opponent's. A tie is stressed. If `team` is not the home
/// side it is taken to be the away side.
pub fn mood_for(snapshot: &GameSnapshot, team: &str) -> MoodCue {
    let (own, other) = if snapshot.home.is(team) {
        (&snapshot.home, &snapshot.away)
    } else {
        (&snapshot.away, &snapshot.home)
    };

    let (mood, colors_of) = match own.score.cmp(&other.score) {
        core::cmp::Ordering::Greater => (Mood::Happy, team.trim()),
        core::cmp::Ordering::Less => (Mood::Sad, other.abbr.as_str()),
        core::cmp::Ordering::Equal => (Mood::Stressed, team.trim()),
    };

    MoodCue {
        mood,
        colors_of: truncated(colors_of),
    }
}

/// Which side scored relative to the tracked team
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalSide {
    For,
    Against,
}

/// Newest goal found by a poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalEvent {
    pub goal: Goal,
    pub side: GoalSide,
    /// Older new goals in the same poll that will not be animated
    pub skipped: usize,
}

/// Something the rig should play this cycle, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    /// First sighting of a game id
    StartMood(MoodCue),
    Goal(GoalEvent),
    /// Follow-up mood after a goal, fired once
    ScheduledMood(MoodCue),
}

/// What the feed reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    NoGame { message: String<MESSAGE_LEN> },
    Game(GameSnapshot),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub outcome: CycleOutcome,
    pub reactions: Vec<Reaction, 3>,
    /// Wait before the next poll
    pub cadence: Duration,
}

/// Goal and mood tracking for one team
pub struct EventDetector {
    team: String<ABBR_LEN>,
    intervals: PollIntervals,
    mood_follow_up: Duration,
    tracking: GoalTrackingState,
}

impl EventDetector {
    pub fn new(team: &str, intervals: PollIntervals, mood_follow_up: Duration) -> Self {
        Self {
            team: truncated(team.trim()),
            intervals,
            mood_follow_up,
            tracking: GoalTrackingState::default(),
        }
    }

    pub fn team(&self) -> &str {
        &self.team
    }

    pub const fn tracking(&self) -> &GoalTrackingState {
        &self.tracking
    }

    pub const fn intervals(&self) -> &PollIntervals {
        &self.intervals
    }

    /// Schedule the follow-up mood, replacing any pending one
    pub fn arm_mood_timer(&mut self, now: Instant) {
        let due = now.checked_add(self.mood_follow_up).unwrap_or(Instant::MAX);
        debug!("Mood emoji scheduled in {}s", self.mood_follow_up.as_secs());
        self.tracking.emoji_due_at = Some(due);
    }

    /// Run one poll against `feed`
    ///
    /// A failed game query is returned as an error with the tracking state
    /// untouched. A failed goal query only skips goal detection. When a goal
    /// is reported the goal count is already updated and the mood timer is
    /// cleared; the caller re-arms it with [`arm_mood_timer`](Self::arm_mood_timer)
    /// once its reaction has played.
    pub fn poll<F: ScoreFeed>(&mut self, feed: &mut F, now: Instant) -> Result<CycleReport> {
        let snapshot = match feed.game_now(&self.team)? {
            GameNow::NoGame { message } => {
                info!("No game: {}", message.as_str());
                self.tracking.reset();
                return Ok(CycleReport {
                    outcome: CycleOutcome::NoGame { message },
                    reactions: Vec::new(),
                    cadence: self.intervals.no_game,
                });
            }
            GameNow::Game(snapshot) => snapshot,
        };

        let cadence = self.intervals.for_state(snapshot.state);
        info!(
            "Score update: {} {}-{} {} ({}), next poll in {}s",
            snapshot.home.abbr.as_str(),
            snapshot.home.score,
            snapshot.away.score,
            snapshot.away.abbr.as_str(),
            snapshot.state.as_str(),
            cadence.as_secs()
        );

        if self.tracking.game_id != Some(snapshot.id) {
            info!("New game detected: {}", snapshot.id);
            self.tracking.reset();
            self.tracking.game_id = Some(snapshot.id);
        }

        let mut reactions = Vec::new();

        if self.tracking.emoji_shown_for_game != Some(snapshot.id) {
            self.tracking.emoji_shown_for_game = Some(snapshot.id);
            let _ = reactions.push(Reaction::StartMood(mood_for(&snapshot, &self.team)));
        }

        if snapshot.state.tracks_goals()
            && let Some(event) = self.detect_goal(feed, snapshot.id)
        {
            self.tracking.emoji_due_at = None;
            let _ = reactions.push(Reaction::Goal(event));
        } else if let Some(due) = self.tracking.emoji_due_at
            && now >= due
        {
            self.tracking.emoji_due_at = None;
            let _ = reactions.push(Reaction::ScheduledMood(mood_for(&snapshot, &self.team)));
        }

        Ok(CycleReport {
            outcome: CycleOutcome::Game(snapshot),
            reactions,
            cadence,
        })
    }

    fn detect_goal<F: ScoreFeed>(&mut self, feed: &mut F, game: GameId) -> Option<GoalEvent> {
        let goals = match feed.goals(game) {
            Ok(goals) => goals,
            Err(err) => {
                warn!("Goal query failed, skipping detection: {err}");
                return None;
            }
        };
        let count = goals.len();

        let Some(last) = self.tracking.last_goal_count else {
            debug!("Goal baseline: {count}");
            self.tracking.last_goal_count = Some(count);
            return None;
        };

        if count < last {
            info!("Goal count went down ({last} -> {count}), rebaselining");
            self.tracking.last_goal_count = Some(count);
            return None;
        }
        if count == last {
            return None;
        }

        self.tracking.last_goal_count = Some(count);
        let goal = goals.last()?.clone();
        let side = if goal.scorer.team.is_empty() || goal.scorer.team.eq_ignore_ascii_case(&self.team) {
            GoalSide::For
        } else {
            GoalSide::Against
        };
        info!(
            "GOAL DETECTED! scorer={} jersey={:?} team={}",
            goal.scorer.full_name.as_str(),
            goal.scorer.number,
            goal.scorer.team.as_str()
        );

        Some(GoalEvent {
            goal,
            side,
            skipped: count - last - 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::TeamScore;

    fn snapshot(home: u32, away: u32) -> GameSnapshot {
        GameSnapshot {
            id: 1,
            state: GameState::Live,
            home: TeamScore::new("MTL", home),
            away: TeamScore::new("WSH", away),
        }
    }

    #[test]
    fn mood_follows_scoreline() {
        let ahead = mood_for(&snapshot(3, 1), "MTL");
        assert_eq!(ahead.mood, Mood::Happy);
        assert_eq!(ahead.colors_of.as_str(), "MTL");

        let behind = mood_for(&snapshot(0, 2), "mtl");
        assert_eq!(behind.mood, Mood::Sad);
        assert_eq!(behind.colors_of.as_str(), "WSH");

        let tied = mood_for(&snapshot(1, 1), "WSH");
        assert_eq!(tied.mood, Mood::Stressed);
        assert_eq!(tied.colors_of.as_str(), "WSH");
    }

    #[test]
    fn cadence_by_state() {
        let intervals = PollIntervals::default();
        assert_eq!(intervals.for_state(GameState::Critical), Duration::from_secs(2));
        assert_eq!(intervals.for_state(GameState::PreGame), Duration::from_secs(60));
        assert_eq!(intervals.for_state(GameState::Final), Duration::from_secs(600));
        assert_eq!(intervals.for_state(GameState::Unknown), Duration::from_secs(600));
    }
}
