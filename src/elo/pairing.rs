// Next-week pair planning. Pairs are built to balance strength (top rated
// with bottom rated) and, when the sign-up sheet has genders, to spread
// men and women across pairs. Pairs are then dealt into houses so each
// court group ends up with a similar average rating.

use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

use super::player::INITIAL_RATING;
use super::{load_availability, Gender, Tournament};

/// One seat in a proposed pair, with everything the house report needs.
#[derive(Debug, Clone)]
pub struct Seat {
    pub name: String,
    pub rating: f64,
    pub scaled: f64,
    pub gender: Option<Gender>,
}

impl Seat {
    pub fn label(&self) -> String {
        format!("{} ({:.1})", self.name, self.scaled)
    }
}

/// A proposed pair; a lone leftover player makes a one-seat "pair".
pub type Pair = Vec<Seat>;

#[derive(Debug, Clone, Default)]
pub struct House {
    pub pairs: Vec<Pair>,
}

impl House {
    pub fn average_rating(&self) -> f64 {
        let seats: Vec<&Seat> = self.pairs.iter().flatten().collect();
        if seats.is_empty() {
            return 0.0;
        }
        seats.iter().map(|s| s.rating).sum::<f64>() / seats.len() as f64
    }

    pub fn gender_counts(&self) -> (usize, usize) {
        let mut males = 0;
        let mut females = 0;
        for seat in self.pairs.iter().flatten() {
            match seat.gender {
                Some(Gender::Male) => males += 1,
                Some(Gender::Female) => females += 1,
                None => {}
            }
        }
        (males, females)
    }
}

/// Simple variant used when no sign-up sheet is at hand: everyone in the
/// ladder, best paired with worst. With an odd roster the middle player is
/// left out (they get a bye).
pub fn top_bottom_pairs(tournament: &Tournament) -> Vec<Pair> {
    let mut sorted: Vec<Seat> = tournament.players.iter().map(seat_for).collect();
    sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    let mid = sorted.len() / 2;
    (0..mid)
        .map(|i| vec![sorted[i].clone(), sorted[sorted.len() - 1 - i].clone()])
        .collect()
}

/// Build pairings for the players on a sign-up sheet. Names not seen before
/// enter the ladder at the initial rating. While both lists are deep enough,
/// the two strongest available men are paired with the two weakest available
/// women (strongest man with weakest woman); everyone left over is paired
/// top-with-bottom, and a final odd player stands alone.
pub fn plan_from_available(tournament: &mut Tournament, path: &Path) -> Result<Vec<House>> {
    let file = load_availability(path)?;
    for entry in &file.available_players {
        tournament.add_player(&entry.name, INITIAL_RATING, entry.gender);
    }

    let mut available: Vec<Seat> = file
        .available_players
        .iter()
        .filter_map(|entry| tournament.player_by_name(&entry.name))
        .map(seat_for)
        .collect();
    available.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    // Both lists stay sorted strongest-first.
    let mut men: Vec<Seat> = available
        .iter()
        .filter(|s| s.gender == Some(Gender::Male))
        .cloned()
        .collect();
    let mut women: Vec<Seat> = available
        .iter()
        .filter(|s| s.gender == Some(Gender::Female))
        .cloned()
        .collect();
    let mut unknown: Vec<Seat> = available
        .iter()
        .filter(|s| s.gender.is_none())
        .cloned()
        .collect();

    let mut pairs: Vec<Pair> = Vec::new();
    while men.len() >= 2 && women.len() >= 2 {
        let top_man = men.remove(0);
        let second_man = men.remove(0);
        let bottom_woman = women.pop().expect("len checked");
        let second_bottom_woman = women.pop().expect("len checked");
        pairs.push(vec![top_man, bottom_woman]);
        pairs.push(vec![second_man, second_bottom_woman]);
    }

    // Whatever is left: strongest with weakest, regardless of gender.
    let mut rest: Vec<Seat> = Vec::new();
    rest.append(&mut men);
    rest.append(&mut women);
    rest.append(&mut unknown);
    while rest.len() >= 2 {
        let first = rest.remove(0);
        let last = rest.pop().expect("len checked");
        pairs.push(vec![first, last]);
    }
    if let Some(lone) = rest.pop() {
        pairs.push(vec![lone]);
    }

    Ok(deal_into_houses(pairs))
}

/// Deal pairs round-robin into ceil(pairs / 2) houses.
fn deal_into_houses(pairs: Vec<Pair>) -> Vec<House> {
    if pairs.is_empty() {
        return Vec::new();
    }
    let num_houses = pairs.len().div_ceil(2);
    let mut houses = vec![House::default(); num_houses];
    for (i, pair) in pairs.into_iter().enumerate() {
        houses[i % num_houses].pairs.push(pair);
    }
    houses
}

/// Render the house report shown on club night.
pub fn render_houses(houses: &[House]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Next pairings (grouped into houses):");
    for (i, house) in houses.iter().enumerate() {
        let (males, females) = house.gender_counts();
        let _ = writeln!(out, "House {}:", i + 1);
        let _ = writeln!(
            out,
            "Average Rating: {:.0}, Males: {}, Females: {}",
            house.average_rating(),
            males,
            females
        );
        for pair in &house.pairs {
            let labels: Vec<String> = pair.iter().map(Seat::label).collect();
            let _ = writeln!(out, "  {}", labels.join(" & "));
        }
        let _ = writeln!(out);
    }
    out
}

fn seat_for(player: &super::Player) -> Seat {
    Seat {
        name: player.name.clone(),
        rating: player.rating,
        scaled: player.scaled_rating(),
        gender: player.gender,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn tournament_with_ratings(players: &[(&str, f64, Option<Gender>)]) -> Tournament {
        let mut t = Tournament::new();
        for (name, rating, gender) in players {
            t.add_player(name, *rating, *gender);
        }
        t
    }

    fn availability_file(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", body).unwrap();
        file
    }

    #[test]
    fn top_bottom_pairs_best_with_worst() {
        let t = tournament_with_ratings(&[
            ("A", 1700.0, None),
            ("B", 1600.0, None),
            ("C", 1450.0, None),
            ("D", 1300.0, None),
        ]);
        let pairs = top_bottom_pairs(&t);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0][0].name, "A");
        assert_eq!(pairs[0][1].name, "D");
        assert_eq!(pairs[1][0].name, "B");
        assert_eq!(pairs[1][1].name, "C");
    }

    #[test]
    fn top_bottom_gives_middle_player_a_bye() {
        let t = tournament_with_ratings(&[
            ("A", 1700.0, None),
            ("B", 1500.0, None),
            ("C", 1300.0, None),
        ]);
        let pairs = top_bottom_pairs(&t);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0][0].name, "A");
        assert_eq!(pairs[0][1].name, "C");
    }

    #[test]
    fn mixed_pairs_cross_strong_men_with_weak_women() {
        let mut t = tournament_with_ratings(&[
            ("M1", 1700.0, Some(Gender::Male)),
            ("M2", 1600.0, Some(Gender::Male)),
            ("W1", 1550.0, Some(Gender::Female)),
            ("W2", 1450.0, Some(Gender::Female)),
        ]);
        let file = availability_file(
            r#"{"available_players": [
                {"name": "M1", "gender": "male"}, {"name": "M2", "gender": "male"},
                {"name": "W1", "gender": "female"}, {"name": "W2", "gender": "female"}
            ]}"#,
        );

        let houses = plan_from_available(&mut t, file.path()).unwrap();
        let pairs: Vec<&Pair> = houses.iter().flat_map(|h| h.pairs.iter()).collect();
        assert_eq!(pairs.len(), 2);

        // Strongest man with the weakest woman, second man with the other.
        let with_m1 = pairs.iter().find(|p| p[0].name == "M1").unwrap();
        assert_eq!(with_m1[1].name, "W2");
        let with_m2 = pairs.iter().find(|p| p[0].name == "M2").unwrap();
        assert_eq!(with_m2[1].name, "W1");
    }

    #[test]
    fn unregistered_names_enter_the_ladder_at_initial_rating() {
        let mut t = Tournament::new();
        let file = availability_file(
            r#"{"available_players": [{"name": "New One"}, {"name": "New Two"}]}"#,
        );

        let houses = plan_from_available(&mut t, file.path()).unwrap();
        assert_eq!(t.players.len(), 2);
        assert!(t.player_by_name("New One").is_some());
        assert_eq!(houses.len(), 1);
        assert_eq!(houses[0].pairs.len(), 1);
        assert_eq!(houses[0].pairs[0].len(), 2);
    }

    #[test]
    fn odd_player_out_stands_alone() {
        let mut t = tournament_with_ratings(&[
            ("A", 1600.0, None),
            ("B", 1500.0, None),
            ("C", 1400.0, None),
        ]);
        let file = availability_file(
            r#"{"available_players": [{"name": "A"}, {"name": "B"}, {"name": "C"}]}"#,
        );

        let houses = plan_from_available(&mut t, file.path()).unwrap();
        let pairs: Vec<&Pair> = houses.iter().flat_map(|h| h.pairs.iter()).collect();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].len(), 2);
        assert_eq!(pairs[1].len(), 1);
        assert_eq!(pairs[1][0].name, "B");
    }

    #[test]
    fn houses_are_dealt_round_robin() {
        let pairs: Vec<Pair> = (0..4)
            .map(|i| {
                vec![Seat {
                    name: format!("P{}", i),
                    rating: 1500.0,
                    scaled: 5.0,
                    gender: None,
                }]
            })
            .collect();
        let houses = deal_into_houses(pairs);
        assert_eq!(houses.len(), 2);
        assert_eq!(houses[0].pairs[0][0].name, "P0");
        assert_eq!(houses[1].pairs[0][0].name, "P1");
        assert_eq!(houses[0].pairs[1][0].name, "P2");
        assert_eq!(houses[1].pairs[1][0].name, "P3");
    }

    #[test]
    fn house_report_shows_stats_and_labels() {
        let house = House {
            pairs: vec![vec![
                Seat {
                    name: "Mirza".into(),
                    rating: 1710.0,
                    scaled: 7.1,
                    gender: Some(Gender::Male),
                },
                Seat {
                    name: "Sue".into(),
                    rating: 1490.0,
                    scaled: 4.9,
                    gender: Some(Gender::Female),
                },
            ]],
        };
        let report = render_houses(&[house]);
        assert!(report.contains("House 1:"));
        assert!(report.contains("Average Rating: 1600, Males: 1, Females: 1"));
        assert!(report.contains("Mirza (7.1) & Sue (4.9)"));
    }
}
