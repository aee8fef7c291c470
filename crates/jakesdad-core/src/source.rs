// Data-source seam. Anything that can produce league rows implements
// `LeagueSource`; analytics receive a `LeagueData` snapshot taken from one.

use anyhow::{Context, Result};
use tracing::debug;

use crate::model::{
    LeagueData, Matchup, Owner, PollVote, SeasonHardware, SeasonRecord, SeasonTotal, TotalKind,
    VoterType,
};

/// Which power-poll votes to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollFilter {
    /// Restrict to one season; `None` reads every season.
    pub year: Option<i32>,
    /// Include votes cast by the league's bot voter.
    pub include_bot: bool,
}

impl PollFilter {
    pub fn everything() -> Self {
        Self {
            year: None,
            include_bot: true,
        }
    }

    pub fn season(year: i32, include_bot: bool) -> Self {
        Self {
            year: Some(year),
            include_bot,
        }
    }

    pub fn admits(&self, vote: &PollVote) -> bool {
        self.year.map_or(true, |y| vote.year == y)
            && (self.include_bot || vote.voter_type == VoterType::Owner)
    }
}

/// A handle to the league's tables.
pub trait LeagueSource {
    fn owners(&self) -> Result<Vec<Owner>>;
    fn season_records(&self) -> Result<Vec<SeasonRecord>>;
    fn matchups(&self) -> Result<Vec<Matchup>>;
    fn season_totals(&self, kind: TotalKind) -> Result<Vec<SeasonTotal>>;
    fn poll_votes(&self, filter: PollFilter) -> Result<Vec<PollVote>>;
    /// Awards per season, ascending by year.
    fn season_hardware(&self) -> Result<Vec<SeasonHardware>>;
}

/// Read every table once into an immutable snapshot.
pub fn snapshot(source: &dyn LeagueSource) -> Result<LeagueData> {
    let data = LeagueData {
        owners: source.owners().context("failed to read owners")?,
        records: source
            .season_records()
            .context("failed to read season records")?,
        matchups: source.matchups().context("failed to read matchups")?,
        points_scored: source
            .season_totals(TotalKind::Scored)
            .context("failed to read points scored")?,
        points_against: source
            .season_totals(TotalKind::Against)
            .context("failed to read points against")?,
        poll_votes: source
            .poll_votes(PollFilter::everything())
            .context("failed to read poll votes")?,
        hardware: source
            .season_hardware()
            .context("failed to read hardware by season")?,
    };
    debug!(
        owners = data.owners.len(),
        records = data.records.len(),
        matchups = data.matchups.len(),
        votes = data.poll_votes.len(),
        hardware = data.hardware.len(),
        "league snapshot loaded"
    );
    Ok(data)
}

/// An in-memory snapshot is itself a source, which keeps analytics testable
/// without a database.
impl LeagueSource for LeagueData {
    fn owners(&self) -> Result<Vec<Owner>> {
        Ok(self.owners.clone())
    }

    fn season_records(&self) -> Result<Vec<SeasonRecord>> {
        Ok(self.records.clone())
    }

    fn matchups(&self) -> Result<Vec<Matchup>> {
        Ok(self.matchups.clone())
    }

    fn season_totals(&self, kind: TotalKind) -> Result<Vec<SeasonTotal>> {
        Ok(self.totals(kind).to_vec())
    }

    fn poll_votes(&self, filter: PollFilter) -> Result<Vec<PollVote>> {
        Ok(self
            .poll_votes
            .iter()
            .filter(|v| filter.admits(v))
            .cloned()
            .collect())
    }

    fn season_hardware(&self) -> Result<Vec<SeasonHardware>> {
        Ok(self.hardware.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(id: i64, year: i32, voter_type: VoterType) -> PollVote {
        PollVote {
            id,
            year,
            voter_owner_id: (voter_type == VoterType::Owner).then_some(1),
            voter_type,
            receiver_owner_id: 2,
            value: 3.0,
        }
    }

    #[test]
    fn poll_filter_by_year_and_voter() {
        let data = LeagueData {
            poll_votes: vec![
                vote(1, 2025, VoterType::Owner),
                vote(2, 2025, VoterType::Bot),
                vote(3, 2024, VoterType::Owner),
            ],
            ..Default::default()
        };

        let ids = |f: PollFilter| -> Vec<i64> {
            data.poll_votes(f).unwrap().iter().map(|v| v.id).collect()
        };

        assert_eq!(ids(PollFilter::season(2025, false)), vec![1]);
        assert_eq!(ids(PollFilter::season(2025, true)), vec![1, 2]);
        assert_eq!(ids(PollFilter::everything()), vec![1, 2, 3]);
    }

    #[test]
    fn snapshot_of_snapshot_is_identical() {
        let data = LeagueData {
            owners: vec![Owner {
                id: 1,
                name: "alice".into(),
                years_active: vec![2025],
            }],
            points_against: vec![SeasonTotal {
                owner_name: "alice".into(),
                year: 2025,
                total: 1400.5,
            }],
            poll_votes: vec![vote(1, 2025, VoterType::Bot)],
            hardware: vec![SeasonHardware {
                year: 2025,
                playoff_champ: Some("alice".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let copy = snapshot(&data).unwrap();
        assert_eq!(copy, data);
    }
}
