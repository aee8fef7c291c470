// Head-to-head history between two owners.

use jakesdad_core::era::YearFilter;
use jakesdad_core::model::{LeagueData, Matchup, OwnerId};
use serde::Serialize;

use crate::accumulate::{average, percentage};

/// One owner's side of a rivalry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideRecord {
    pub owner_id: OwnerId,
    pub name: String,
    pub wins: u32,
    pub win_percentage: f64,
    pub avg_points: f64,
    /// Regular-season record as "W-L".
    pub regular_season: String,
    /// Playoff record as "W-L".
    pub playoffs: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHead {
    pub first: SideRecord,
    pub second: SideRecord,
    pub total_games: u32,
    pub regular_season_games: u32,
    pub playoff_games: u32,
}

#[derive(Default)]
struct Tally {
    wins: u32,
    reg_wins: u32,
    playoff_wins: u32,
    points: f64,
}

impl Tally {
    fn record(&mut self, m: &Matchup, owner: OwnerId) {
        let won = m.winner_owner_id == owner;
        self.points += if won { m.winner_score } else { m.loser_score };
        if won {
            self.wins += 1;
            if m.playoffs {
                self.playoff_wins += 1;
            } else {
                self.reg_wins += 1;
            }
        }
    }
}

/// Every game between `a` and `b` in the filtered seasons. `None` if the
/// two ids are the same or either owner is unknown.
pub fn head_to_head(
    data: &LeagueData,
    a: OwnerId,
    b: OwnerId,
    filter: &YearFilter,
) -> Option<HeadToHead> {
    if a == b {
        return None;
    }
    let owner_a = data.owner(a)?;
    let owner_b = data.owner(b)?;

    let games: Vec<&Matchup> = data
        .matchups
        .iter()
        .filter(|m| m.involves_pair(a, b) && filter.admits(m.year))
        .collect();

    let mut ta = Tally::default();
    let mut tb = Tally::default();
    for m in &games {
        ta.record(m, a);
        tb.record(m, b);
    }

    let total = games.len() as u32;
    let playoff_games = games.iter().filter(|m| m.playoffs).count() as u32;
    let regular_games = total - playoff_games;

    let first_pct = percentage(ta.wins as f64, total as f64);
    let second_pct = if total > 0 { 100.0 - first_pct } else { 0.0 };

    Some(HeadToHead {
        first: SideRecord {
            owner_id: a,
            name: owner_a.display_name(),
            wins: ta.wins,
            win_percentage: first_pct,
            avg_points: average(ta.points, games.len()),
            regular_season: format!("{}-{}", ta.reg_wins, tb.reg_wins),
            playoffs: format!("{}-{}", ta.playoff_wins, tb.playoff_wins),
        },
        second: SideRecord {
            owner_id: b,
            name: owner_b.display_name(),
            wins: tb.wins,
            win_percentage: second_pct,
            avg_points: average(tb.points, games.len()),
            regular_season: format!("{}-{}", tb.reg_wins, ta.reg_wins),
            playoffs: format!("{}-{}", tb.playoff_wins, ta.playoff_wins),
        },
        total_games: total,
        regular_season_games: regular_games,
        playoff_games,
    })
}
