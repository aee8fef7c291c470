// League eras and the year filters built from them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EraError {
    #[error("unknown era `{key}` (known: {known})")]
    UnknownEra { key: String, known: String },
}

/// A named, contiguous run of seasons (inclusive on both ends).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Era {
    pub key: String,
    pub label: String,
    pub start: i32,
    pub end: i32,
}

impl Era {
    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }

    /// `"2016-2021"`.
    pub fn range_label(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }
}

/// Find an era by key.
pub fn find_era<'a>(eras: &'a [Era], key: &str) -> Result<&'a Era, EraError> {
    eras.iter().find(|e| e.key == key).ok_or_else(|| EraError::UnknownEra {
        key: key.to_string(),
        known: eras
            .iter()
            .map(|e| e.key.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// The listed years that fall in each era, ascending, in era order. Eras
/// with none of the years are left out, as are years outside every era.
pub fn group_years_by_era<'a>(eras: &'a [Era], years: &[i32]) -> Vec<(&'a Era, Vec<i32>)> {
    eras.iter()
        .filter_map(|era| {
            let mut inside: Vec<i32> = years.iter().copied().filter(|y| era.contains(*y)).collect();
            inside.sort_unstable();
            (!inside.is_empty()).then_some((era, inside))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Year filter
// ---------------------------------------------------------------------------

/// The set of admissible seasons for a computation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum YearFilter {
    /// No filtering.
    #[default]
    All,
    /// Only these seasons. An empty set admits nothing.
    Years(BTreeSet<i32>),
}

impl YearFilter {
    pub fn years<I: IntoIterator<Item = i32>>(years: I) -> Self {
        YearFilter::Years(years.into_iter().collect())
    }

    /// Union of the seasons of every selected era.
    pub fn from_eras<S: AsRef<str>>(eras: &[Era], keys: &[S]) -> Result<Self, EraError> {
        let mut years = BTreeSet::new();
        for key in keys {
            years.extend(find_era(eras, key.as_ref())?.years());
        }
        Ok(YearFilter::Years(years))
    }

    pub fn admits(&self, year: i32) -> bool {
        match self {
            YearFilter::All => true,
            YearFilter::Years(set) => set.contains(&year),
        }
    }

    /// Keep the rows whose year passes the filter.
    pub fn apply<'a, T, F>(&self, rows: &'a [T], year_of: F) -> Vec<&'a T>
    where
        F: Fn(&T) -> i32,
    {
        rows.iter().filter(|r| self.admits(year_of(*r))).collect()
    }
}

/// Sorted, comma-joined year ranges of the selected eras, e.g.
/// `"2016-2021, 2022-2025"`.
pub fn selected_ranges_label<S: AsRef<str>>(eras: &[Era], keys: &[S]) -> Result<String, EraError> {
    let mut ranges = keys
        .iter()
        .map(|k| find_era(eras, k.as_ref()).map(Era::range_label))
        .collect::<Result<Vec<_>, _>>()?;
    ranges.sort();
    Ok(ranges.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn league_eras() -> Vec<Era> {
        vec![
            Era {
                key: "pre-modern".into(),
                label: "Pre-Modern".into(),
                start: 2012,
                end: 2015,
            },
            Era {
                key: "modern".into(),
                label: "Modern".into(),
                start: 2016,
                end: 2021,
            },
            Era {
                key: "hppr".into(),
                label: "HPPR".into(),
                start: 2022,
                end: 2025,
            },
        ]
    }

    #[test]
    fn era_bounds_are_inclusive() {
        let eras = league_eras();
        let modern = &eras[1];
        assert!(modern.contains(2016));
        assert!(modern.contains(2021));
        assert!(!modern.contains(2015));
        assert_eq!(modern.years().count(), 6);
        assert_eq!(modern.range_label(), "2016-2021");
    }

    #[test]
    fn years_group_under_their_era() {
        let eras = league_eras();
        let groups = group_years_by_era(&eras, &[2024, 2013, 2022, 2030]);
        let keys: Vec<_> = groups.iter().map(|(e, ys)| (e.key.as_str(), ys.clone())).collect();
        assert_eq!(keys, vec![("pre-modern", vec![2013]), ("hppr", vec![2022, 2024])]);
        assert!(group_years_by_era(&eras, &[]).is_empty());
    }

    #[test]
    fn filter_from_multiple_eras_is_a_union() {
        let filter = YearFilter::from_eras(&league_eras(), &["hppr", "pre-modern"]).unwrap();
        assert!(filter.admits(2012));
        assert!(filter.admits(2025));
        assert!(!filter.admits(2018));
    }

    #[test]
    fn unknown_era_is_an_error() {
        let err = YearFilter::from_eras(&league_eras(), &["golden"]).unwrap_err();
        match err {
            EraError::UnknownEra { key, known } => {
                assert_eq!(key, "golden");
                assert_eq!(known, "pre-modern, modern, hppr");
            }
        }
    }

    #[test]
    fn empty_selection_admits_nothing() {
        let keys: [&str; 0] = [];
        let filter = YearFilter::from_eras(&league_eras(), &keys).unwrap();
        assert!(!filter.admits(2020));
        assert!(YearFilter::All.admits(1999));
    }

    #[test]
    fn apply_keeps_matching_rows() {
        let rows = vec![(2015, "a"), (2016, "b"), (2023, "c")];
        let filter = YearFilter::years([2016, 2023]);
        let kept: Vec<_> = filter.apply(&rows, |r| r.0).iter().map(|r| r.1).collect();
        assert_eq!(kept, vec!["b", "c"]);
    }

    #[test]
    fn ranges_label_is_sorted() {
        let label = selected_ranges_label(&league_eras(), &["hppr", "modern"]).unwrap();
        assert_eq!(label, "2016-2021, 2022-2025");
    }
}
