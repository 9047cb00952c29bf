// The roster and everything that moves ratings: doubles match resolution
// with a margin-of-victory factor, per-event JSON seeding, and the
// standings table.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::path::Path;

use super::player::{MatchOutcome, Player, INITIAL_RATING};
use super::{normalize_name, AvailabilityFile, EventFile, Gender};

/// Standard chess k-factor, which turned out to move club ratings at a
/// sensible pace too.
pub const K_FACTOR: f64 = 32.0;

/// Classic Elo expectation of `rating` scoring against `opponent`.
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / 400.0))
}

/// Winning 21-15 should count for more than winning 22-20. Games go to 21,
/// so the margin is scaled against that.
pub fn margin_factor(score_a: u32, score_b: u32) -> f64 {
    1.0 + f64::from(score_a.abs_diff(score_b)) / 21.0
}

/// A played match, kept for the event summary counts.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub team_a: Vec<String>,
    pub team_b: Vec<String>,
    pub score_a: u32,
    pub score_b: u32,
}

#[derive(Debug, Default)]
pub struct Tournament {
    pub players: Vec<Player>,
    pub matches: Vec<MatchRecord>,
    pub events_seeded: u32,
}

impl Tournament {
    pub fn new() -> Self {
        Tournament::default()
    }

    /// Register a player if the (normalized) name is new. An existing
    /// player keeps their rating; a missing gender is backfilled when the
    /// sign-up sheet finally provides one.
    pub fn add_player(&mut self, name: &str, rating: f64, gender: Option<Gender>) {
        let normalized = normalize_name(name);
        match self.player_index(&normalized) {
            Some(i) => {
                if self.players[i].gender.is_none() && gender.is_some() {
                    self.players[i].gender = gender;
                }
            }
            None => self.players.push(Player::new(normalized, rating, gender)),
        }
    }

    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.player_index(name).map(|i| &self.players[i])
    }

    fn player_index(&self, name: &str) -> Option<usize> {
        let wanted = normalize_name(name).to_lowercase();
        self.players
            .iter()
            .position(|p| normalize_name(&p.name).to_lowercase() == wanted)
    }

    /// Resolve a doubles match and move every participant's rating. Both
    /// members of a team get the same delta, computed from the team's mean
    /// rating. An unknown name is an error; skipping the match would leave
    /// the ladder quietly wrong.
    pub fn add_match(
        &mut self,
        team_a: &[String],
        team_b: &[String],
        score_a: u32,
        score_b: u32,
    ) -> Result<()> {
        let label = format!("{} vs {}", team_a.join(" & "), team_b.join(" & "));
        let idx_a = self.resolve_team(team_a, &label)?;
        let idx_b = self.resolve_team(team_b, &label)?;

        let rating_a = self.team_rating(&idx_a);
        let rating_b = self.team_rating(&idx_b);

        let margin = margin_factor(score_a, score_b);
        let expected_a = expected_score(rating_a, rating_b);
        let expected_b = expected_score(rating_b, rating_a);

        let a_wins = score_a > score_b;
        let (actual_a, actual_b) = if a_wins { (1.0, 0.0) } else { (0.0, 1.0) };

        let delta_a = K_FACTOR * margin * (actual_a - expected_a);
        let delta_b = K_FACTOR * margin * (actual_b - expected_b);

        for &i in &idx_a {
            self.players[i].rating += delta_a;
            self.players[i].record_match(if a_wins {
                MatchOutcome::Win
            } else {
                MatchOutcome::Loss
            });
        }
        for &i in &idx_b {
            self.players[i].rating += delta_b;
            self.players[i].record_match(if a_wins {
                MatchOutcome::Loss
            } else {
                MatchOutcome::Win
            });
        }

        self.matches.push(MatchRecord {
            team_a: idx_a.iter().map(|&i| self.players[i].name.clone()).collect(),
            team_b: idx_b.iter().map(|&i| self.players[i].name.clone()).collect(),
            score_a,
            score_b,
        });
        Ok(())
    }

    fn resolve_team(&self, team: &[String], match_label: &str) -> Result<Vec<usize>> {
        team.iter()
            .map(|name| {
                self.player_index(name).ok_or_else(|| {
                    anyhow::anyhow!("unknown player '{}' in match {}", name, match_label)
                })
            })
            .collect()
    }

    fn team_rating(&self, team: &[usize]) -> f64 {
        let sum: f64 = team.iter().map(|&i| self.players[i].rating).sum();
        sum / team.len() as f64
    }

    /// Seed one event file: register everyone on the team sheet, play the
    /// matches in sheet order, then snapshot ratings with the event date.
    pub fn seed_from_json_file(&mut self, path: &Path) -> Result<()> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let file: EventFile = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        let event_date = NaiveDate::parse_from_str(&file.event.date, "%Y-%m-%d")
            .with_context(|| format!("bad event date '{}' in {}", file.event.date, path.display()))?;

        for team in &file.teams {
            for player in &team.players {
                self.add_player(&player.name, INITIAL_RATING, player.gender);
            }
        }

        for m in &file.matches {
            self.add_match(&m.players_a, &m.players_b, m.score_a, m.score_b)
                .with_context(|| format!("in event file {}", path.display()))?;
        }

        for player in &mut self.players {
            player.record_event_rating(event_date);
        }
        self.events_seeded += 1;
        Ok(())
    }

    /// Render the standings table, optionally restricted to the players on
    /// a sign-up sheet.
    pub fn standings(&self, available: Option<&AvailabilityFile>) -> String {
        let mut players: Vec<&Player> = match available {
            Some(file) => {
                let names: Vec<String> = file
                    .available_players
                    .iter()
                    .map(|p| normalize_name(&p.name).to_lowercase())
                    .collect();
                self.players
                    .iter()
                    .filter(|p| names.contains(&normalize_name(&p.name).to_lowercase()))
                    .collect()
            }
            None => self.players.iter().collect(),
        };
        players.sort_by(|a, b| b.rating.total_cmp(&a.rating));

        let title = if available.is_some() {
            "Available Players Stats:"
        } else {
            "All Players Stats:"
        };
        let name_w = players
            .iter()
            .map(|p| p.name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Name".len());

        let mut out = String::new();
        let _ = writeln!(out, "\n{} (Total: {})", title, players.len());
        let _ = writeln!(
            out,
            "{:<4} | {:<name_w$} | Played | Win | Lose | Scaled Rating | Weekly Δ | Total Δ ",
            "Rank", "Name"
        );
        let _ = writeln!(out, "{}", "-".repeat(name_w + 78));

        for (rank, p) in players.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:<4} | {:<name_w$} | {:>6} | {:>3} | {:>4} | {:>13} | {:>8} | {:>8} ",
                rank + 1,
                p.name,
                p.matches_played,
                p.wins,
                p.losses,
                format!("{:.1}", p.scaled_rating()),
                signed(p.last_event_change()),
                signed(p.rating - INITIAL_RATING),
            );
        }
        out
    }
}

fn signed(delta: f64) -> String {
    if delta >= 0.0 {
        format!("+{:.0}", delta)
    } else {
        format!("{:.0}", delta)
    }
}
