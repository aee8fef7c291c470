// League domain types: owners and the raw rows every statistic is derived from.

use serde::{Deserialize, Serialize};

/// Owner identifier as stored in the league tables.
pub type OwnerId = i64;

// ---------------------------------------------------------------------------
// Owners
// ---------------------------------------------------------------------------

/// A league member. Owners are the entities every leaderboard ranks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub id: OwnerId,
    /// Raw name as stored (usually lower-case, e.g. "jake smith").
    pub name: String,
    /// Seasons this owner was in the league.
    pub years_active: Vec<i32>,
}

impl Owner {
    /// Whether the owner played in the given season.
    pub fn is_active_in(&self, year: i32) -> bool {
        self.years_active.contains(&year)
    }

    /// Name with each word capitalized, used everywhere a name is shown.
    pub fn display_name(&self) -> String {
        capitalize_name(&self.name)
    }
}

/// Capitalize the first letter of each space-separated word and lower-case
/// the rest: `"jAKE smith"` -> `"Jake Smith"`.
pub fn capitalize_name(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Owners active in `year`, in input order.
pub fn current_owners(owners: &[Owner], year: i32) -> Vec<&Owner> {
    owners.iter().filter(|o| o.is_active_in(year)).collect()
}

// ---------------------------------------------------------------------------
// Metric samples
// ---------------------------------------------------------------------------

/// One owner's final line for one season. Nullable columns stay `None` and
/// are folded as zero by the accumulators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonRecord {
    pub year: i32,
    pub owner_id: OwnerId,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub reg_season_finish: Option<u32>,
    pub playoff_wins: Option<u32>,
    pub playoff_losses: Option<u32>,
    /// 1 = champion. `None` or 0 means the owner missed the playoffs.
    pub playoff_finish: Option<u32>,
}

impl SeasonRecord {
    pub fn made_playoffs(&self) -> bool {
        self.playoff_finish.is_some_and(|f| f > 0)
    }

    pub fn won_championship(&self) -> bool {
        self.playoff_finish == Some(1)
    }

    pub fn won_regular_season(&self) -> bool {
        self.reg_season_finish == Some(1)
    }
}

/// A season point total for one owner (points scored or points against).
/// These rows come from views keyed by owner name rather than id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonTotal {
    pub owner_name: String,
    pub year: i32,
    pub total: f64,
}

/// Which season-total table a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TotalKind {
    Scored,
    Against,
}

impl TotalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TotalKind::Scored => "scored",
            TotalKind::Against => "against",
        }
    }
}

/// A single game between two owners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub id: i64,
    pub year: i32,
    pub week: u32,
    pub winner_owner_id: OwnerId,
    pub loser_owner_id: OwnerId,
    pub winner_score: f64,
    pub loser_score: f64,
    pub playoffs: bool,
}

impl Matchup {
    /// True if the two owners met in this game, in either order.
    pub fn involves_pair(&self, a: OwnerId, b: OwnerId) -> bool {
        (self.winner_owner_id == a && self.loser_owner_id == b)
            || (self.winner_owner_id == b && self.loser_owner_id == a)
    }
}

/// Who cast a power-poll vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoterType {
    Owner,
    Bot,
}

impl VoterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoterType::Owner => "owner",
            VoterType::Bot => "bot",
        }
    }

    /// Anything other than "owner" is treated as a bot vote.
    pub fn from_str_type(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("owner") {
            VoterType::Owner
        } else {
            VoterType::Bot
        }
    }
}

/// One power-poll ranking vote: `voter` placed `receiver` at `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollVote {
    pub id: i64,
    pub year: i32,
    /// `None` for bot votes that have no owner row.
    pub voter_owner_id: Option<OwnerId>,
    pub voter_type: VoterType,
    pub receiver_owner_id: OwnerId,
    pub value: f64,
}

/// Who took home (or got stuck with) each piece of hardware in a season.
/// Like the point totals these are keyed by raw owner name; an empty cell
/// means the award was not decided.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonHardware {
    pub year: i32,
    pub playoff_champ: Option<String>,
    pub reg_season_champ: Option<String>,
    /// Last place after the playoffs.
    pub ultimate_loser: Option<String>,
    pub reg_season_loser: Option<String>,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Everything the analytics need, read once from a data source and then
/// treated as immutable for the duration of a computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueData {
    pub owners: Vec<Owner>,
    pub records: Vec<SeasonRecord>,
    pub matchups: Vec<Matchup>,
    pub points_scored: Vec<SeasonTotal>,
    pub points_against: Vec<SeasonTotal>,
    pub poll_votes: Vec<PollVote>,
    pub hardware: Vec<SeasonHardware>,
}

impl LeagueData {
    pub fn owner(&self, id: OwnerId) -> Option<&Owner> {
        self.owners.iter().find(|o| o.id == id)
    }

    /// Case-insensitive lookup by raw or display name.
    pub fn owner_by_name(&self, name: &str) -> Option<&Owner> {
        let needle = name.trim();
        self.owners
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(needle))
    }

    pub fn totals(&self, kind: TotalKind) -> &[SeasonTotal] {
        match kind {
            TotalKind::Scored => &self.points_scored,
            TotalKind::Against => &self.points_against,
        }
    }

    /// All distinct seasons that appear in the season records, ascending.
    pub fn seasons(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.records.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(id: OwnerId, name: &str, years: &[i32]) -> Owner {
        Owner {
            id,
            name: name.into(),
            years_active: years.to_vec(),
        }
    }

    #[test]
    fn capitalize_name_normalizes_each_word() {
        assert_eq!(capitalize_name("jake smith"), "Jake Smith");
        assert_eq!(capitalize_name("mcDONALD"), "Mcdonald");
        assert_eq!(capitalize_name(""), "");
    }

    #[test]
    fn capitalize_name_keeps_repeated_spaces() {
        assert_eq!(capitalize_name("a  b"), "A  B");
    }

    #[test]
    fn current_owners_filters_by_year() {
        let owners = vec![
            owner(1, "alice", &[2024, 2025]),
            owner(2, "bob", &[2012, 2013]),
            owner(3, "carol", &[2025]),
        ];
        let current: Vec<_> = current_owners(&owners, 2025).iter().map(|o| o.id).collect();
        assert_eq!(current, vec![1, 3]);
    }

    #[test]
    fn season_record_flags() {
        let rec = SeasonRecord {
            playoff_finish: Some(1),
            reg_season_finish: Some(3),
            ..Default::default()
        };
        assert!(rec.made_playoffs());
        assert!(rec.won_championship());
        assert!(!rec.won_regular_season());

        let missed = SeasonRecord {
            playoff_finish: Some(0),
            ..Default::default()
        };
        assert!(!missed.made_playoffs());
        assert!(!SeasonRecord::default().made_playoffs());
    }

    #[test]
    fn matchup_involves_pair_either_order() {
        let m = Matchup {
            id: 1,
            year: 2024,
            week: 3,
            winner_owner_id: 7,
            loser_owner_id: 9,
            winner_score: 120.5,
            loser_score: 99.0,
            playoffs: false,
        };
        assert!(m.involves_pair(7, 9));
        assert!(m.involves_pair(9, 7));
        assert!(!m.involves_pair(7, 8));
    }

    #[test]
    fn voter_type_parsing() {
        assert_eq!(VoterType::from_str_type("owner"), VoterType::Owner);
        assert_eq!(VoterType::from_str_type(" Owner "), VoterType::Owner);
        assert_eq!(VoterType::from_str_type("nfl_bot"), VoterType::Bot);
    }

    #[test]
    fn league_data_lookups() {
        let data = LeagueData {
            owners: vec![owner(1, "alice", &[2025]), owner(2, "bob", &[2025])],
            records: vec![
                SeasonRecord {
                    year: 2024,
                    owner_id: 1,
                    ..Default::default()
                },
                SeasonRecord {
                    year: 2022,
                    owner_id: 2,
                    ..Default::default()
                },
                SeasonRecord {
                    year: 2024,
                    owner_id: 2,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(data.owner(2).map(|o| o.name.as_str()), Some("bob"));
        assert_eq!(data.owner_by_name("ALICE").map(|o| o.id), Some(1));
        assert!(data.owner(99).is_none());
        assert_eq!(data.seasons(), vec![2022, 2024]);
    }
}
