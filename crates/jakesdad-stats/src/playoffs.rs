// Playoff statistics for current owners: appearances, podium finishes, and
// per-owner playoff records.

use jakesdad_core::era::YearFilter;
use jakesdad_core::model::{LeagueData, OwnerId};
use serde::Serialize;

use crate::accumulate::ratio;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Appearances {
    pub name: String,
    pub appearances: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Podiums {
    pub name: String,
    pub first: u32,
    pub second: u32,
    pub third: u32,
}

impl Podiums {
    pub fn total(&self) -> u32 {
        self.first + self.second + self.third
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayoffRow {
    pub name: String,
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    /// Wins over games as a fraction in `[0, 1]`.
    pub win_fraction: f64,
    /// Championships over appearances as a fraction in `[0, 1]`.
    pub championship_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayoffReport {
    pub appearances: Vec<Appearances>,
    pub finishes: Vec<Podiums>,
    pub table: Vec<PlayoffRow>,
}

#[derive(Default)]
struct Acc {
    appearances: u32,
    first: u32,
    second: u32,
    third: u32,
    wins: u32,
    losses: u32,
}

/// Playoff report over seasons in `filter`, for owners active in
/// `current_year`. Owners appear in the order of their first playoff
/// season in the records; every sort below is stable on that order.
pub fn playoff_stats(data: &LeagueData, filter: &YearFilter, current_year: i32) -> PlayoffReport {
    let mut seen: Vec<(OwnerId, String, Acc)> = Vec::new();

    for r in data
        .records
        .iter()
        .filter(|r| filter.admits(r.year) && r.made_playoffs())
    {
        let Some(owner) = data.owner(r.owner_id).filter(|o| o.is_active_in(current_year)) else {
            continue;
        };
        let idx = match seen.iter().position(|(id, _, _)| *id == owner.id) {
            Some(i) => i,
            None => {
                seen.push((owner.id, owner.display_name(), Acc::default()));
                seen.len() - 1
            }
        };
        let acc = &mut seen[idx].2;
        acc.appearances += 1;
        match r.playoff_finish {
            Some(1) => acc.first += 1,
            Some(2) => acc.second += 1,
            Some(3) => acc.third += 1,
            _ => {}
        }
        acc.wins += r.playoff_wins.unwrap_or(0);
        acc.losses += r.playoff_losses.unwrap_or(0);
    }

    let mut appearances: Vec<Appearances> = seen
        .iter()
        .map(|(_, name, a)| Appearances {
            name: name.clone(),
            appearances: a.appearances,
        })
        .collect();
    appearances.sort_by(|a, b| b.appearances.cmp(&a.appearances));

    let mut finishes: Vec<Podiums> = seen
        .iter()
        .map(|(_, name, a)| Podiums {
            name: name.clone(),
            first: a.first,
            second: a.second,
            third: a.third,
        })
        .collect();
    finishes.sort_by(|a, b| b.total().cmp(&a.total()));

    let mut table: Vec<PlayoffRow> = seen
        .into_iter()
        .map(|(_, name, a)| {
            let games = a.wins + a.losses;
            PlayoffRow {
                name,
                games,
                wins: a.wins,
                losses: a.losses,
                win_fraction: ratio(a.wins as f64, games as f64),
                championship_rate: ratio(a.first as f64, a.appearances as f64),
            }
        })
        .collect();
    table.sort_by(|a, b| {
        b.win_fraction
            .partial_cmp(&a.win_fraction)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    PlayoffReport {
        appearances,
        finishes,
        table,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jakesdad_core::model::{Owner, SeasonRecord};

    fn rec(owner_id: OwnerId, year: i32, finish: Option<u32>, w: u32, l: u32) -> SeasonRecord {
        SeasonRecord {
            year,
            owner_id,
            playoff_wins: Some(w),
            playoff_losses: Some(l),
            playoff_finish: finish,
            ..Default::default()
        }
    }

    fn league() -> LeagueData {
        let owner = |id, name: &str, years: &[i32]| Owner {
            id,
            name: name.into(),
            years_active: years.to_vec(),
        };
        LeagueData {
            owners: vec![
                owner(1, "alice", &[2023, 2024, 2025]),
                owner(2, "bob", &[2023, 2024, 2025]),
                owner(3, "carl", &[2023, 2024]),
                owner(4, "dana", &[2023, 2024, 2025]),
            ],
            records: vec![
                rec(2, 2023, Some(3), 1, 1),
                rec(1, 2023, Some(1), 2, 0),
                rec(3, 2023, Some(2), 1, 1),
                rec(4, 2023, None, 0, 0),
                rec(1, 2024, Some(4), 0, 1),
                rec(2, 2024, Some(1), 2, 0),
                rec(4, 2024, Some(0), 0, 0),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn counts_current_owners_only() {
        let report = playoff_stats(&league(), &YearFilter::All, 2025);
        let names: Vec<_> = report.appearances.iter().map(|a| a.name.as_str()).collect();
        // Bob was seen first; equal counts keep that order.
        assert_eq!(names, vec!["Bob", "Alice"]);
        assert!(report.appearances.iter().all(|a| a.appearances == 2));

        let bob = &report.finishes[0];
        assert_eq!((bob.first, bob.second, bob.third), (1, 0, 1));
        let alice = &report.finishes[1];
        assert_eq!(alice.total(), 1);
    }

    #[test]
    fn table_sorted_by_win_fraction() {
        let report = playoff_stats(&league(), &YearFilter::All, 2025);
        let bob = &report.table[0];
        assert_eq!(bob.name, "Bob");
        assert_eq!((bob.games, bob.wins, bob.losses), (4, 3, 1));
        assert_eq!(bob.win_fraction, 0.75);
        assert_eq!(bob.championship_rate, 0.5);

        let alice = &report.table[1];
        assert!((alice.win_fraction - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(alice.championship_rate, 0.5);
    }

    #[test]
    fn filter_and_empty_input() {
        let report = playoff_stats(&league(), &YearFilter::years([2024]), 2025);
        assert_eq!(report.appearances.len(), 2);
        assert_eq!(report.table[0].name, "Bob");

        let empty = playoff_stats(&LeagueData::default(), &YearFilter::All, 2025);
        assert_eq!(empty, PlayoffReport::default());
    }
}
