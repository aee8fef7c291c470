// Tie-aware bounded leaderboards.
//
// Ranks use standard competition ranking: equal values share a rank and the
// next distinct value is ranked by its position (1, 1, 3, ...). The cut is on
// rank, so a tie at the boundary can return more than `k` entries.

use std::cmp::Ordering;
use std::collections::HashSet;

use jakesdad_core::model::OwnerId;
use serde::Serialize;

use crate::error::StatsError;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One owner's value for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatValue {
    pub owner_id: OwnerId,
    pub name: String,
    pub value: f64,
}

impl StatValue {
    pub fn new(owner_id: OwnerId, name: impl Into<String>, value: f64) -> Self {
        Self {
            owner_id,
            name: name.into(),
            value,
        }
    }
}

/// A ranked position on one side of a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub owner_id: OwnerId,
    pub name: String,
    pub value: f64,
    pub rank: usize,
}

/// Which end of the value range fills the GOATS side of a category.
///
/// This is chosen per category. "Worst Defense", for example, puts the
/// highest points-against in the GOATS slot even though a low number is
/// the better defense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    HighestIsGoat,
    LowestIsGoat,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::HighestIsGoat => Direction::LowestIsGoat,
            Direction::LowestIsGoat => Direction::HighestIsGoat,
        }
    }

    /// Ordering that puts the GOAT end first.
    fn goat_first(self, a: f64, b: f64) -> Ordering {
        let ascending = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        match self {
            Direction::HighestIsGoat => ascending.reverse(),
            Direction::LowestIsGoat => ascending,
        }
    }
}

/// Both sides of a leaderboard: GOATS best-first, WOATS worst-first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Extremes {
    pub goats: Vec<Standing>,
    pub woats: Vec<Standing>,
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Rank `values` from the end `cmp` sorts first and keep every entry whose
/// rank is at most `k`.
///
/// The sort is stable, so equal values keep their input order and the result
/// is deterministic for a given input.
pub fn rank_bounded<F>(values: &[StatValue], k: usize, cmp: F) -> Vec<Standing>
where
    F: Fn(f64, f64) -> Ordering,
{
    let mut order: Vec<&StatValue> = values.iter().collect();
    order.sort_by(|a, b| cmp(a.value, b.value));

    let mut out = Vec::new();
    let mut rank = 1;
    for (i, entry) in order.iter().enumerate() {
        if i > 0 && entry.value != order[i - 1].value {
            rank = i + 1;
        }
        if rank > k {
            break;
        }
        out.push(Standing {
            owner_id: entry.owner_id,
            name: entry.name.clone(),
            value: entry.value,
            rank,
        });
    }
    out
}

/// Select the top-`k` GOATS and bottom-`k` WOATS of a category.
///
/// Rejects non-finite values and owners listed twice. Empty input, or
/// `k == 0`, yields empty lists. With fewer owners than `k`, every owner
/// appears on both sides.
pub fn select_extremes(
    values: &[StatValue],
    direction: Direction,
    k: usize,
) -> Result<Extremes, StatsError> {
    validate(values)?;

    Ok(Extremes {
        goats: rank_bounded(values, k, |a, b| direction.goat_first(a, b)),
        woats: rank_bounded(values, k, |a, b| direction.flipped().goat_first(a, b)),
    })
}

fn validate(values: &[StatValue]) -> Result<(), StatsError> {
    let mut seen = HashSet::new();
    for v in values {
        if !v.value.is_finite() {
            return Err(StatsError::NonFiniteValue {
                name: v.name.clone(),
                value: v.value,
            });
        }
        if !seen.insert(v.owner_id) {
            return Err(StatsError::DuplicateEntity {
                owner_id: v.owner_id,
                name: v.name.clone(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, f64)]) -> Vec<StatValue> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, (name, v))| StatValue::new(i as OwnerId + 1, *name, *v))
            .collect()
    }

    fn ranks(side: &[Standing]) -> Vec<(&str, usize)> {
        side.iter().map(|s| (s.name.as_str(), s.rank)).collect()
    }

    #[test]
    fn tie_at_top_skips_ranks() {
        // A and B share rank 1; C sits at index 2 so it is rank 3, past k=2.
        let input = values(&[("A", 3.0), ("B", 3.0), ("C", 2.0), ("D", 1.0)]);
        let ex = select_extremes(&input, Direction::HighestIsGoat, 2).unwrap();
        assert_eq!(ranks(&ex.goats), vec![("A", 1), ("B", 1)]);
        assert_eq!(ranks(&ex.woats), vec![("D", 1), ("C", 2)]);
    }

    #[test]
    fn boundary_tie_includes_every_tied_entry() {
        let input = values(&[
            ("A", 10.0),
            ("B", 9.0),
            ("C", 8.0),
            ("D", 8.0),
            ("E", 8.0),
            ("F", 8.0),
            ("G", 1.0),
        ]);
        let ex = select_extremes(&input, Direction::HighestIsGoat, 3).unwrap();
        assert_eq!(
            ranks(&ex.goats),
            vec![("A", 1), ("B", 2), ("C", 3), ("D", 3), ("E", 3), ("F", 3)]
        );
    }

    #[test]
    fn tie_at_the_tail_excludes_the_next_value() {
        let input = values(&[
            ("A", 9.0),
            ("B", 1.0),
            ("C", 1.0),
            ("D", 1.0),
            ("E", 5.0),
            ("F", 7.0),
        ]);
        let ex = select_extremes(&input, Direction::HighestIsGoat, 2).unwrap();
        assert_eq!(ranks(&ex.goats), vec![("A", 1), ("F", 2)]);
        // E would be rank 4 behind the three-way tie, past the cutoff.
        assert_eq!(ranks(&ex.woats), vec![("B", 1), ("C", 1), ("D", 1)]);
    }

    #[test]
    fn all_tied_values_share_rank_one() {
        let input = values(&[("A", 7.0), ("B", 7.0), ("C", 7.0), ("D", 7.0), ("E", 7.0)]);
        let ex = select_extremes(&input, Direction::HighestIsGoat, 3).unwrap();
        assert_eq!(ex.goats.len(), 5);
        assert!(ex.goats.iter().all(|s| s.rank == 1));
        assert_eq!(ex.woats.len(), 5);
        assert!(ex.woats.iter().all(|s| s.rank == 1));
    }

    #[test]
    fn fewer_entities_than_k_appear_on_both_sides() {
        let input = values(&[("A", 2.0), ("B", 1.0)]);
        let ex = select_extremes(&input, Direction::HighestIsGoat, 3).unwrap();
        assert_eq!(ranks(&ex.goats), vec![("A", 1), ("B", 2)]);
        assert_eq!(ranks(&ex.woats), vec![("B", 1), ("A", 2)]);
    }

    #[test]
    fn empty_input_and_zero_k_give_empty_lists() {
        let ex = select_extremes(&[], Direction::HighestIsGoat, 3).unwrap();
        assert_eq!(ex, Extremes::default());

        let input = values(&[("A", 2.0)]);
        let ex = select_extremes(&input, Direction::LowestIsGoat, 0).unwrap();
        assert!(ex.goats.is_empty());
        assert!(ex.woats.is_empty());
    }

    #[test]
    fn lowest_is_goat_inverts_the_sides() {
        let input = values(&[("A", 1500.0), ("B", 1400.0), ("C", 1300.0), ("D", 1200.0)]);
        let ex = select_extremes(&input, Direction::LowestIsGoat, 1).unwrap();
        assert_eq!(ranks(&ex.goats), vec![("D", 1)]);
        assert_eq!(ranks(&ex.woats), vec![("A", 1)]);
    }

    #[test]
    fn equal_values_keep_input_order() {
        let input = values(&[("Z", 5.0), ("Y", 5.0), ("X", 5.0), ("W", 1.0)]);
        let ex = select_extremes(&input, Direction::HighestIsGoat, 1).unwrap();
        let names: Vec<_> = ex.goats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Z", "Y", "X"]);
    }

    #[test]
    fn rank_multiplicity_matches_value_multiplicity() {
        let input = values(&[
            ("A", 4.0),
            ("B", 6.0),
            ("C", 4.0),
            ("D", 2.0),
            ("E", 6.0),
            ("F", 4.0),
            ("G", 1.0),
        ]);
        let ex = select_extremes(&input, Direction::HighestIsGoat, 100).unwrap();
        for s in &ex.goats {
            let same_value = input.iter().filter(|v| v.value == s.value).count();
            let same_rank = ex.goats.iter().filter(|o| o.rank == s.rank).count();
            assert_eq!(same_value, same_rank, "rank {} for value {}", s.rank, s.value);
            // Different values never share a rank.
            assert!(ex
                .goats
                .iter()
                .filter(|o| o.rank == s.rank)
                .all(|o| o.value == s.value));
        }
    }

    #[test]
    fn k_at_least_distinct_values_covers_everyone_once() {
        let input = values(&[("A", 3.0), ("B", 3.0), ("C", 2.0), ("D", 1.0), ("E", 2.0)]);
        // Three distinct values, but the last distinct rank is 5.
        let ex = select_extremes(&input, Direction::HighestIsGoat, 5).unwrap();
        let mut ids: Vec<_> = ex.goats.iter().map(|s| s.owner_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn selection_is_idempotent() {
        let input = values(&[("A", 0.5), ("B", 0.25), ("C", 0.5), ("D", 0.75)]);
        let first = select_extremes(&input, Direction::HighestIsGoat, 2).unwrap();
        let second = select_extremes(&input, Direction::HighestIsGoat, 2).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn negating_values_swaps_goats_and_woats() {
        let input = values(&[("A", 3.0), ("B", 1.0), ("C", 3.0), ("D", 2.0), ("E", 1.0)]);
        let negated: Vec<_> = input
            .iter()
            .map(|v| StatValue::new(v.owner_id, v.name.clone(), -v.value))
            .collect();

        let original = select_extremes(&input, Direction::HighestIsGoat, 2).unwrap();
        let mirrored = select_extremes(&negated, Direction::HighestIsGoat, 2).unwrap();

        let key = |s: &Standing| (s.owner_id, s.rank);
        assert_eq!(
            mirrored.goats.iter().map(key).collect::<Vec<_>>(),
            original.woats.iter().map(key).collect::<Vec<_>>()
        );
    }

    #[test]
    fn flipping_direction_swaps_goats_and_woats() {
        let input = values(&[("A", 3.0), ("B", 1.0), ("C", 3.0), ("D", 2.0), ("E", 1.0)]);
        let original = select_extremes(&input, Direction::HighestIsGoat, 2).unwrap();
        let flipped = select_extremes(&input, Direction::LowestIsGoat, 2).unwrap();
        assert_eq!(flipped.goats, original.woats);
        assert_eq!(flipped.woats, original.goats);
    }

    #[test]
    fn rejects_non_finite_values() {
        let input = values(&[("A", 1.0), ("B", f64::NAN)]);
        match select_extremes(&input, Direction::HighestIsGoat, 3).unwrap_err() {
            StatsError::NonFiniteValue { name, .. } => assert_eq!(name, "B"),
            other => panic!("expected NonFiniteValue, got: {other}"),
        }

        let input = values(&[("A", f64::INFINITY)]);
        assert!(select_extremes(&input, Direction::HighestIsGoat, 3).is_err());
    }

    #[test]
    fn rejects_duplicate_owner() {
        let input = vec![StatValue::new(1, "A", 1.0), StatValue::new(1, "A", 2.0)];
        assert_eq!(
            select_extremes(&input, Direction::HighestIsGoat, 3).unwrap_err(),
            StatsError::DuplicateEntity {
                owner_id: 1,
                name: "A".into()
            }
        );
    }
}
