// Elo ladder for club doubles nights. Ratings are seeded from per-event
// JSON files exported by the score sheet, and the standings table produced
// here is what usually ends up in the results file the uploader ships.
//
// Module responsibilities:
// - `player`: one player's record and rating history.
// - `tournament`: the roster, match resolution and the standings table.
// - `pairing`: next-week pair proposals grouped into houses.

pub mod pairing;
pub mod player;
pub mod tournament;

pub use pairing::House;
pub use player::{Gender, Player};
pub use tournament::Tournament;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// A per-event input file: who showed up and what was played, in order.
#[derive(Deserialize, Debug)]
pub struct EventFile {
    pub event: EventInfo,
    pub teams: Vec<TeamEntry>,
    pub matches: Vec<MatchEntry>,
}

#[derive(Deserialize, Debug)]
pub struct EventInfo {
    /// Event date as `YYYY-MM-DD`.
    pub date: String,
}

#[derive(Deserialize, Debug)]
pub struct TeamEntry {
    pub players: Vec<PlayerEntry>,
}

#[derive(Deserialize, Debug)]
pub struct PlayerEntry {
    pub name: String,
    #[serde(default)]
    pub gender: Option<Gender>,
}

#[derive(Deserialize, Debug)]
pub struct MatchEntry {
    pub players_a: Vec<String>,
    pub players_b: Vec<String>,
    pub score_a: u32,
    pub score_b: u32,
}

/// Sign-up list for a coming event, used to filter standings and to plan
/// pairings.
#[derive(Deserialize, Debug)]
pub struct AvailabilityFile {
    pub available_players: Vec<PlayerEntry>,
}

pub fn load_availability(path: &Path) -> Result<AvailabilityFile> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file: AvailabilityFile = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(file)
}

/// Names copied out of spreadsheets and chat apps arrive with zero-width
/// characters and stray whitespace; strip both before comparing anything.
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| !matches!(c, '\u{200B}'..='\u{200D}' | '\u{FEFF}'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_zero_width_and_trims() {
        assert_eq!(normalize_name("  Mirza \u{200B}"), "Mirza");
        assert_eq!(normalize_name("\u{FEFF}Sue"), "Sue");
        assert_eq!(normalize_name("A\u{200C}B\u{200D}C"), "ABC");
    }

    #[test]
    fn normalize_keeps_inner_spaces() {
        assert_eq!(normalize_name(" Li Wei "), "Li Wei");
    }

    #[test]
    fn availability_file_parses_optional_gender() {
        let file: AvailabilityFile = serde_json::from_str(
            r#"{"available_players": [
                {"name": "Mirza", "gender": "male"},
                {"name": "Sue"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(file.available_players.len(), 2);
        assert_eq!(file.available_players[0].gender, Some(Gender::Male));
        assert_eq!(file.available_players[1].gender, None);
    }

    #[test]
    fn event_file_parses() {
        let file: EventFile = serde_json::from_str(
            r#"{
                "event": {"date": "2024-03-07"},
                "teams": [{"players": [{"name": "A", "gender": "female"}]}],
                "matches": [{"players_a": ["A", "B"], "players_b": ["C", "D"],
                             "score_a": 21, "score_b": 15}]
            }"#,
        )
        .unwrap();
        assert_eq!(file.event.date, "2024-03-07");
        assert_eq!(file.matches[0].score_a, 21);
    }
}
