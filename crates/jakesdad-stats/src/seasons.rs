// Season-by-season grid for current owners: win/loss line and
// regular-season finish for every season on record.

use jakesdad_core::era::YearFilter;
use jakesdad_core::model::{current_owners, LeagueData, OwnerId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonCell {
    pub year: i32,
    pub wins: u32,
    pub losses: u32,
    /// `None` when the owner has no record or no finish for the season.
    pub reg_season_finish: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    pub owner_id: OwnerId,
    pub name: String,
    /// One cell per entry of `SeasonGrid::years`.
    pub cells: Vec<SeasonCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeasonGrid {
    pub years: Vec<i32>,
    pub rows: Vec<GridRow>,
}

/// Grid over every season in the records admitted by `filter`, one row per
/// owner active in `current_year`, sorted by display name.
pub fn season_grid(data: &LeagueData, filter: &YearFilter, current_year: i32) -> SeasonGrid {
    let years: Vec<i32> = data
        .seasons()
        .into_iter()
        .filter(|y| filter.admits(*y))
        .collect();

    let mut rows: Vec<GridRow> = current_owners(&data.owners, current_year)
        .into_iter()
        .map(|owner| GridRow {
            owner_id: owner.id,
            name: owner.display_name(),
            cells: years
                .iter()
                .map(|&year| {
                    let record = data
                        .records
                        .iter()
                        .find(|r| r.owner_id == owner.id && r.year == year);
                    SeasonCell {
                        year,
                        wins: record.and_then(|r| r.wins).unwrap_or(0),
                        losses: record.and_then(|r| r.losses).unwrap_or(0),
                        reg_season_finish: record.and_then(|r| r.reg_season_finish),
                    }
                })
                .collect(),
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));

    SeasonGrid { years, rows }
}
