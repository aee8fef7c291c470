// Member summaries: career win/loss line and hardware for current owners.

use std::collections::BTreeMap;

use jakesdad_core::era::YearFilter;
use jakesdad_core::model::{LeagueData, OwnerId};
use serde::Serialize;

use crate::accumulate::percentage;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberStats {
    pub owner_id: OwnerId,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub win_percentage: f64,
    /// "62.50%"
    pub win_percentage_display: String,
    /// Championships won.
    pub hardware: u32,
}

/// One row per current owner with at least one record in `filter`, best
/// win percentage first. Equal percentages (at two decimals) fall back to
/// owner id order.
pub fn member_stats(data: &LeagueData, filter: &YearFilter, current_year: i32) -> Vec<MemberStats> {
    let mut by_owner: BTreeMap<OwnerId, MemberStats> = BTreeMap::new();

    for r in filter.apply(&data.records, |r| r.year) {
        let Some(owner) = data.owner(r.owner_id).filter(|o| o.is_active_in(current_year)) else {
            continue;
        };
        let row = by_owner.entry(owner.id).or_insert_with(|| MemberStats {
            owner_id: owner.id,
            name: owner.display_name(),
            wins: 0,
            losses: 0,
            win_percentage: 0.0,
            win_percentage_display: String::new(),
            hardware: 0,
        });
        row.wins += r.wins.unwrap_or(0);
        row.losses += r.losses.unwrap_or(0);
        if r.won_championship() {
            row.hardware += 1;
        }
    }

    let mut rows: Vec<MemberStats> = by_owner
        .into_values()
        .map(|mut m| {
            let pct = percentage(m.wins as f64, (m.wins + m.losses) as f64);
            m.win_percentage = (pct * 100.0).round() / 100.0;
            m.win_percentage_display = format!("{pct:.2}%");
            m
        })
        .collect();
    rows.sort_by(|a, b| {
        b.win_percentage
            .partial_cmp(&a.win_percentage)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows
}
