//! Two-line character status display

use core::fmt::Write;

use heapless::String;
use log::trace;

use crate::error::Error;
use crate::feed::GameSnapshot;

/// Widest line ever composed; longer text is cut to the display width anyway
const LINE_CAPACITY: usize = 40;

type Line = String<LINE_CAPACITY>;

/// Character display with two fixed-width lines
pub trait TextSink {
    /// Replace line `row` (0 or 1) with `text`, already cut to width
    fn write_line(&mut self, row: usize, text: &str);

    fn clear(&mut self);
}

/// Formats rig status onto a [`TextSink`]
///
/// Line 1 carries the headline. Line 2 normally holds the delay and can be
/// rewritten alone with [`show_delay`](Self::show_delay).
pub struct StatusDisplay<T> {
    sink: T,
    columns: usize,
}

impl<T: TextSink> StatusDisplay<T> {
    pub fn new(sink: T, columns: usize) -> Self {
        Self {
            sink,
            columns: columns.min(LINE_CAPACITY),
        }
    }

    pub const fn columns(&self) -> usize {
        self.columns
    }

    pub const fn sink(&self) -> &T {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut T {
        &mut self.sink
    }

    /// Cut `text` to the column count on a character boundary
    fn fit<'a>(&self, text: &'a str) -> &'a str {
        match text.char_indices().nth(self.columns) {
            Some((end, _)) => &text[..end],
            None => text,
        }
    }

    /// Clear, then write both lines
    pub fn show_text(&mut self, line1: &str, line2: &str) {
        trace!("LCD: {line1:?} / {line2:?}");
        self.sink.clear();
        let first = self.fit(line1);
        let second = self.fit(line2);
        self.sink.write_line(0, first);
        self.sink.write_line(1, second);
    }

    /// Rewrite line 2 as `Delay: NNNs`, padded to the full width
    pub fn show_delay(&mut self, seconds: u32) {
        let mut line = Line::new();
        let _ = write!(line, "Delay: {seconds:>3}s");
        while line.len() < self.columns && line.push(' ').is_ok() {}
        let text = self.fit(&line);
        self.sink.write_line(1, text);
    }

    pub fn show_startup(&mut self, delay_seconds: u32) {
        self.show_text("NHL SCORE", "Starting...");
        self.show_delay(delay_seconds);
    }

    /// `HOME h-a AWAY` with the delay underneath
    pub fn show_score(&mut self, snapshot: &GameSnapshot, delay_seconds: u32) {
        let mut line = Line::new();
        let _ = write!(
            line,
            "{} {}-{} {}",
            snapshot.home.abbr.as_str(),
            snapshot.home.score,
            snapshot.away.score,
            snapshot.away.abbr.as_str()
        );
        self.show_text(&line, "");
        self.show_delay(delay_seconds);
    }

    pub fn show_no_game(&mut self, message: &str, delay_seconds: u32) {
        self.show_text("NO GAME", message);
        self.show_delay(delay_seconds);
    }

    /// Countdown step before a goal reaction
    pub fn show_countdown(&mut self, remaining: u32) {
        let mut line = Line::new();
        let _ = write!(line, "Wait {remaining}s");
        self.show_text("GOAL DETECTED", &line);
    }

    /// Goal banner: `GOAL!!!` over `TEAM #NN`
    pub fn show_goal(&mut self, team: &str, jersey: Option<u16>) {
        let mut line = Line::new();
        let _ = match jersey {
            Some(number) => write!(line, "{team} #{number}"),
            None => write!(line, "{team}"),
        };
        self.show_text("GOAL!!!", &line);
    }

    pub fn show_goal_against(&mut self, team: &str) {
        self.show_text("GOAL AGAINST", team);
    }

    pub fn show_error(&mut self, error: &Error) {
        let mut line = Line::new();
        let _ = write!(line, "{error}");
        self.show_text("CYCLE ERROR", &line);
    }

    pub fn clear(&mut self) {
        self.sink.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Lines {
        rows: [Line; 2],
        clears: usize,
    }

    impl TextSink for Lines {
        fn write_line(&mut self, row: usize, text: &str) {
            self.rows[row] = Line::try_from(text).unwrap();
        }

        fn clear(&mut self) {
            self.clears += 1;
            self.rows = Default::default();
        }
    }

    #[test]
    fn lines_are_cut_to_width() {
        let mut display = StatusDisplay::new(Lines::default(), 8);
        display.show_text("GOAL DETECTED", "ok");
        assert_eq!(display.sink().rows[0].as_str(), "GOAL DET");
        assert_eq!(display.sink().rows[1].as_str(), "ok");
    }

    #[test]
    fn delay_keeps_first_line() {
        let mut display = StatusDisplay::new(Lines::default(), 16);
        display.show_text("MTL 1-1 WSH", "");
        display.show_delay(7);
        assert_eq!(display.sink().rows[0].as_str(), "MTL 1-1 WSH");
        assert_eq!(display.sink().rows[1].as_str(), "Delay:   7s     ");
        assert_eq!(display.sink().clears, 1);
    }
}
