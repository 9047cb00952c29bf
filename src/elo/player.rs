// One player's standing in the ladder: win/loss record, current rating and
// the per-event rating history used for the weekly delta column.

use chrono::NaiveDate;
use serde::Deserialize;

/// Everyone starts here.
pub const INITIAL_RATING: f64 = 1500.0;

// Bounds used to project a rating onto the 0-10 scale shown to players.
const SCALE_MIN: f64 = 1000.0;
const SCALE_MAX: f64 = 2000.0;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Win,
    Loss,
}

/// Rating snapshot taken at the end of an event. The first record has no
/// event date; it marks the starting rating.
#[derive(Debug, Clone)]
pub struct RatingRecord {
    pub rating: f64,
    pub event: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub name: String,
    pub gender: Option<Gender>,
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub rating: f64,
    pub rating_history: Vec<RatingRecord>,
}

impl Player {
    pub fn new(name: String, rating: f64, gender: Option<Gender>) -> Self {
        Player {
            name,
            gender,
            matches_played: 0,
            wins: 0,
            losses: 0,
            rating,
            rating_history: vec![RatingRecord {
                rating,
                event: None,
            }],
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.matches_played == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.matches_played)
        }
    }

    /// Rating projected onto a 0-10 scale for display, clamped at the ends.
    pub fn scaled_rating(&self) -> f64 {
        let scaled = (self.rating - SCALE_MIN) / (SCALE_MAX - SCALE_MIN) * 10.0;
        scaled.clamp(0.0, 10.0)
    }

    pub fn record_match(&mut self, outcome: MatchOutcome) {
        self.matches_played += 1;
        match outcome {
            MatchOutcome::Win => self.wins += 1,
            MatchOutcome::Loss => self.losses += 1,
        }
    }

    /// Snapshot the rating for `event`. Skipped when nothing changed since
    /// the last snapshot, except that the initial record is always followed
    /// up so every player gets a first real event entry.
    pub fn record_event_rating(&mut self, event: NaiveDate) {
        let last = self
            .rating_history
            .last()
            .expect("rating history always has the initial record");
        if last.rating != self.rating || last.event.is_none() {
            self.rating_history.push(RatingRecord {
                rating: self.rating,
                event: Some(event),
            });
        }
    }

    /// Difference between the two most recent snapshots; the "Weekly Δ"
    /// column. Zero until a second snapshot exists.
    pub fn last_event_change(&self) -> f64 {
        let n = self.rating_history.len();
        if n < 2 {
            return 0.0;
        }
        self.rating_history[n - 1].rating - self.rating_history[n - 2].rating
    }
}
