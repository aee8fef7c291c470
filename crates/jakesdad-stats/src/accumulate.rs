// Statistic accumulation: fold each owner's season rows into totals, then
// derive the rates and averages that categories rank on.

use jakesdad_core::era::YearFilter;
use jakesdad_core::model::{LeagueData, Owner, OwnerId, SeasonTotal};
use serde::Serialize;

use crate::ranking::StatValue;

// ---------------------------------------------------------------------------
// Safe arithmetic
// ---------------------------------------------------------------------------

/// `part / total * 100`, or 0 when there is nothing to divide by.
pub fn percentage(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        part / total * 100.0
    }
}

/// `part / total`, or 0 when `total` is zero.
pub fn ratio(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        part / total
    }
}

/// Mean of `count` samples summing to `sum`; 0 for no samples.
pub fn average(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

// ---------------------------------------------------------------------------
// Per-owner totals
// ---------------------------------------------------------------------------

/// Everything one owner accumulated over the filtered seasons.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OwnerTotals {
    pub owner_id: OwnerId,
    /// Display name (capitalized).
    pub name: String,
    pub seasons: u32,
    pub wins: u32,
    pub losses: u32,
    pub championships: u32,
    pub reg_season_titles: u32,
    pub playoff_appearances: u32,
    pub playoff_wins: u32,
    pub playoff_losses: u32,
    pub points_scored: f64,
    pub scored_seasons: usize,
    pub points_against: f64,
    pub against_seasons: usize,
}

impl OwnerTotals {
    pub fn accumulate(owner: &Owner, data: &LeagueData, filter: &YearFilter) -> Self {
        let mut t = OwnerTotals {
            owner_id: owner.id,
            name: owner.display_name(),
            ..Default::default()
        };

        for r in data
            .records
            .iter()
            .filter(|r| r.owner_id == owner.id && filter.admits(r.year))
        {
            t.seasons += 1;
            t.wins += r.wins.unwrap_or(0);
            t.losses += r.losses.unwrap_or(0);
            t.playoff_wins += r.playoff_wins.unwrap_or(0);
            t.playoff_losses += r.playoff_losses.unwrap_or(0);
            if r.won_championship() {
                t.championships += 1;
            }
            if r.won_regular_season() {
                t.reg_season_titles += 1;
            }
            if r.made_playoffs() {
                t.playoff_appearances += 1;
            }
        }

        (t.points_scored, t.scored_seasons) = sum_totals(&data.points_scored, owner, filter);
        (t.points_against, t.against_seasons) = sum_totals(&data.points_against, owner, filter);
        t
    }

    pub fn games(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn playoff_games(&self) -> u32 {
        self.playoff_wins + self.playoff_losses
    }

    pub fn win_percentage(&self) -> f64 {
        percentage(self.wins as f64, self.games() as f64)
    }

    pub fn playoff_appearance_rate(&self) -> f64 {
        percentage(self.playoff_appearances as f64, self.seasons as f64)
    }

    pub fn playoff_win_percentage(&self) -> f64 {
        percentage(self.playoff_wins as f64, self.playoff_games() as f64)
    }

    pub fn avg_points_per_season(&self) -> f64 {
        average(self.points_scored, self.scored_seasons)
    }

    pub fn avg_points_against(&self) -> f64 {
        average(self.points_against, self.against_seasons)
    }
}

/// Point tables are keyed by owner name, not id.
fn sum_totals(rows: &[SeasonTotal], owner: &Owner, filter: &YearFilter) -> (f64, usize) {
    rows.iter()
        .filter(|p| filter.admits(p.year) && p.owner_name.trim().eq_ignore_ascii_case(&owner.name))
        .fold((0.0, 0), |(sum, n), p| (sum + p.total, n + 1))
}

/// Totals for each owner, in the order given.
pub fn accumulate_all(owners: &[&Owner], data: &LeagueData, filter: &YearFilter) -> Vec<OwnerTotals> {
    owners
        .iter()
        .map(|o| OwnerTotals::accumulate(o, data, filter))
        .collect()
}

// ---------------------------------------------------------------------------
// Qualification
// ---------------------------------------------------------------------------

/// Which owners take part in a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    /// Everyone, with missing samples counting as zero.
    Always,
    MinGames(u32),
    MinPlayoffGames(u32),
    MinSeasons(u32),
    MinPointSeasons(usize),
    MinAgainstSeasons(usize),
}

impl Qualifier {
    pub fn admits(&self, t: &OwnerTotals) -> bool {
        match *self {
            Qualifier::Always => true,
            Qualifier::MinGames(n) => t.games() >= n,
            Qualifier::MinPlayoffGames(n) => t.playoff_games() >= n,
            Qualifier::MinSeasons(n) => t.seasons >= n,
            Qualifier::MinPointSeasons(n) => t.scored_seasons >= n,
            Qualifier::MinAgainstSeasons(n) => t.against_seasons >= n,
        }
    }
}

/// One value per qualifying owner, in input order.
pub fn statistic(
    totals: &[OwnerTotals],
    extract: fn(&OwnerTotals) -> f64,
    qualifier: Qualifier,
) -> Vec<StatValue> {
    totals
        .iter()
        .filter(|t| qualifier.admits(t))
        .map(|t| StatValue::new(t.owner_id, t.name.clone(), extract(t)))
        .collect()
}
