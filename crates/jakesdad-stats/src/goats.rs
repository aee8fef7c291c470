// GOATS and WOATS: the category catalog and the per-category leaderboards.
//
// Each category pairs a value extracted from `OwnerTotals` with an explicit
// direction, a qualification policy, and a display format. Only owners
// active in the current season are ranked.

use jakesdad_core::era::YearFilter;
use jakesdad_core::model::{current_owners, LeagueData};
use serde::Serialize;
use tracing::debug;

use crate::accumulate::{accumulate_all, statistic, OwnerTotals, Qualifier};
use crate::error::StatsError;
use crate::format::Format;
use crate::ranking::{select_extremes, Direction, Standing};

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct Category {
    pub label: &'static str,
    pub extract: fn(&OwnerTotals) -> f64,
    pub format: Format,
    pub direction: Direction,
    pub qualifier: Qualifier,
}

/// The seven leaderboard categories, in display order.
pub fn catalog() -> Vec<Category> {
    vec![
        Category {
            label: "Ring Gawd",
            extract: |t| t.championships as f64,
            format: Format::Count {
                singular: "Ring",
                plural: "Rings",
            },
            direction: Direction::HighestIsGoat,
            qualifier: Qualifier::Always,
        },
        Category {
            label: "Reg Szn Titles",
            extract: |t| t.reg_season_titles as f64,
            format: Format::Count {
                singular: "Title",
                plural: "Titles",
            },
            direction: Direction::HighestIsGoat,
            qualifier: Qualifier::Always,
        },
        Category {
            label: "Win Percentage",
            extract: OwnerTotals::win_percentage,
            format: Format::Percent { decimals: 1 },
            direction: Direction::HighestIsGoat,
            qualifier: Qualifier::MinGames(1),
        },
        Category {
            label: "Playoff Appearance Rate",
            extract: OwnerTotals::playoff_appearance_rate,
            format: Format::Percent { decimals: 1 },
            direction: Direction::HighestIsGoat,
            qualifier: Qualifier::MinSeasons(1),
        },
        Category {
            label: "Playoff Win Pct",
            extract: OwnerTotals::playoff_win_percentage,
            format: Format::Percent { decimals: 1 },
            direction: Direction::HighestIsGoat,
            qualifier: Qualifier::MinPlayoffGames(1),
        },
        Category {
            label: "Avg Points Per Season",
            extract: OwnerTotals::avg_points_per_season,
            format: Format::Decimal {
                decimals: 1,
                suffix: "pts",
            },
            direction: Direction::HighestIsGoat,
            qualifier: Qualifier::MinPointSeasons(1),
        },
        // Highest points-against leads: this board celebrates the worst luck.
        Category {
            label: "Worst Defense",
            extract: OwnerTotals::avg_points_against,
            format: Format::Decimal {
                decimals: 1,
                suffix: "avg pts against",
            },
            direction: Direction::HighestIsGoat,
            qualifier: Qualifier::MinAgainstSeasons(1),
        },
    ]
}

/// Look up a category by label, ignoring case.
pub fn find_category(label: &str) -> Result<Category, StatsError> {
    let all = catalog();
    all.iter()
        .find(|c| c.label.eq_ignore_ascii_case(label.trim()))
        .copied()
        .ok_or_else(|| StatsError::InvalidArgument {
            field: "category".into(),
            message: format!(
                "unknown category `{label}` (known: {})",
                all.iter().map(|c| c.label).collect::<Vec<_>>().join(", ")
            ),
        })
}

// ---------------------------------------------------------------------------
// Leaderboards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub name: String,
    pub value: f64,
    pub display: String,
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    pub category: String,
    pub direction: Direction,
    pub goats: Vec<RankedEntry>,
    pub woats: Vec<RankedEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoatsOptions {
    pub filter: YearFilter,
    pub rank_cutoff: usize,
    pub current_year: i32,
    /// Rank only the category with this label; `None` ranks the whole catalog.
    pub category: Option<String>,
}

/// Rank one category over precomputed owner totals.
pub fn leaderboard(
    category: &Category,
    totals: &[OwnerTotals],
    k: usize,
) -> Result<Leaderboard, StatsError> {
    let values = statistic(totals, category.extract, category.qualifier);
    let extremes = select_extremes(&values, category.direction, k)?;

    let entries = |side: Vec<Standing>| -> Vec<RankedEntry> {
        side.into_iter()
            .map(|s| RankedEntry {
                display: category.format.render(s.value),
                name: s.name,
                value: s.value,
                rank: s.rank,
            })
            .collect()
    };

    let board = Leaderboard {
        category: category.label.to_string(),
        direction: category.direction,
        goats: entries(extremes.goats),
        woats: entries(extremes.woats),
    };
    debug!(
        category = category.label,
        ranked = values.len(),
        goats = board.goats.len(),
        woats = board.woats.len(),
        "leaderboard computed"
    );
    Ok(board)
}

/// Every catalog category (or the one named in `options`) for the owners
/// active in `current_year`.
pub fn goats_and_woats(
    data: &LeagueData,
    options: &GoatsOptions,
) -> Result<Vec<Leaderboard>, StatsError> {
    let categories = match &options.category {
        Some(label) => vec![find_category(label)?],
        None => catalog(),
    };
    let owners = current_owners(&data.owners, options.current_year);
    let totals = accumulate_all(&owners, data, &options.filter);

    categories
        .iter()
        .map(|c| leaderboard(c, &totals, options.rank_cutoff))
        .collect()
}
