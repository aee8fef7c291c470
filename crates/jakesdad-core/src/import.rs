// CSV import of league tables.
//
// Each table is exported from the hosted league database as one CSV file.
// Malformed rows are skipped with a warning; only unreadable files and an
// empty owner list abort an import.

use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::config::DataPaths;
use crate::model::{
    LeagueData, Matchup, Owner, OwnerId, PollVote, SeasonHardware, SeasonRecord, SeasonTotal,
    VoterType,
};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawOwner {
    id: OwnerId,
    name: String,
    /// `;`-separated seasons, e.g. `2016;2017;2018`.
    #[serde(default)]
    years_active: String,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    year: i32,
    owner_id: OwnerId,
    wins: Option<u32>,
    losses: Option<u32>,
    #[serde(alias = "reg_szn_finish")]
    reg_season_finish: Option<u32>,
    playoff_wins: Option<u32>,
    playoff_losses: Option<u32>,
    playoff_finish: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawMatchup {
    id: i64,
    year: i32,
    week: u32,
    winner_owner_id: OwnerId,
    loser_owner_id: OwnerId,
    winner_score: f64,
    loser_score: f64,
    #[serde(default)]
    playoffs: String,
}

#[derive(Debug, Deserialize)]
struct RawTotal {
    owner_name: String,
    year: i32,
    #[serde(alias = "total_points_scored", alias = "total_points_against")]
    total: f64,
}

#[derive(Debug, Deserialize)]
struct RawVote {
    id: i64,
    year: i32,
    voter_owner_id: Option<OwnerId>,
    voter_type: String,
    #[serde(alias = "vote_receiver_owner_id")]
    receiver_owner_id: OwnerId,
    value: f64,
}

#[derive(Debug, Deserialize)]
struct RawHardware {
    year: i32,
    #[serde(default)]
    playoff_champ: String,
    #[serde(default, alias = "reg_szn_champ", alias = "reg_szn_champion")]
    reg_season_champ: String,
    #[serde(default)]
    ultimate_loser: String,
    #[serde(default, alias = "reg_szn_loser")]
    reg_season_loser: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_years(raw: &str) -> Result<Vec<i32>, std::num::ParseIntError> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "f" | "0" | "no" => Some(false),
        "true" | "t" | "1" | "yes" => Some(true),
        _ => None,
    }
}

fn non_empty(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Deserialize every row of `rdr`, skipping malformed rows with a warning.
fn read_rows<R: Read, T: for<'de> Deserialize<'de>>(rdr: R, what: &str) -> Result<Vec<T>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut rows = Vec::new();
    for result in reader.deserialize::<T>() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => warn!("skipping malformed {} row: {}", what, e),
        }
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_owners_from_reader<R: Read>(rdr: R) -> Result<Vec<Owner>, csv::Error> {
    let mut owners = Vec::new();
    let mut seen = HashSet::new();
    for raw in read_rows::<_, RawOwner>(rdr, "owner")? {
        let name = raw.name.trim().to_string();
        if name.is_empty() {
            warn!("skipping owner {}: empty name", raw.id);
            continue;
        }
        let years_active = match parse_years(&raw.years_active) {
            Ok(years) => years,
            Err(e) => {
                warn!("skipping owner '{}': bad years_active '{}': {}", name, raw.years_active, e);
                continue;
            }
        };
        if !seen.insert(raw.id) {
            warn!("duplicate owner id {}, keeping the first row", raw.id);
            continue;
        }
        owners.push(Owner {
            id: raw.id,
            name,
            years_active,
        });
    }
    Ok(owners)
}

fn load_records_from_reader<R: Read>(rdr: R) -> Result<Vec<SeasonRecord>, csv::Error> {
    let mut records = Vec::new();
    let mut seen = HashSet::new();
    for raw in read_rows::<_, RawRecord>(rdr, "season record")? {
        if !seen.insert((raw.year, raw.owner_id)) {
            warn!(
                "duplicate {} record for owner {}, keeping the first row",
                raw.year, raw.owner_id
            );
            continue;
        }
        records.push(SeasonRecord {
            year: raw.year,
            owner_id: raw.owner_id,
            wins: raw.wins,
            losses: raw.losses,
            reg_season_finish: raw.reg_season_finish,
            playoff_wins: raw.playoff_wins,
            playoff_losses: raw.playoff_losses,
            playoff_finish: raw.playoff_finish,
        });
    }
    Ok(records)
}

fn load_matchups_from_reader<R: Read>(rdr: R) -> Result<Vec<Matchup>, csv::Error> {
    let mut matchups = Vec::new();
    let mut seen = HashSet::new();
    for raw in read_rows::<_, RawMatchup>(rdr, "matchup")? {
        if !raw.winner_score.is_finite() || !raw.loser_score.is_finite() {
            warn!("skipping matchup {}: non-finite score", raw.id);
            continue;
        }
        let Some(playoffs) = parse_flag(&raw.playoffs) else {
            warn!("skipping matchup {}: unrecognized playoffs flag '{}'", raw.id, raw.playoffs);
            continue;
        };
        if !seen.insert(raw.id) {
            warn!("duplicate matchup id {}, keeping the first row", raw.id);
            continue;
        }
        matchups.push(Matchup {
            id: raw.id,
            year: raw.year,
            week: raw.week,
            winner_owner_id: raw.winner_owner_id,
            loser_owner_id: raw.loser_owner_id,
            winner_score: raw.winner_score,
            loser_score: raw.loser_score,
            playoffs,
        });
    }
    Ok(matchups)
}

fn load_totals_from_reader<R: Read>(rdr: R) -> Result<Vec<SeasonTotal>, csv::Error> {
    let mut totals = Vec::new();
    let mut seen = HashSet::new();
    for raw in read_rows::<_, RawTotal>(rdr, "season total")? {
        if !raw.total.is_finite() {
            warn!("skipping {} total for '{}': non-finite value", raw.year, raw.owner_name);
            continue;
        }
        // Totals are matched to owners by name, ignoring case.
        if !seen.insert((raw.owner_name.to_lowercase(), raw.year)) {
            warn!(
                "duplicate {} total for '{}', keeping the first row",
                raw.year, raw.owner_name
            );
            continue;
        }
        totals.push(SeasonTotal {
            owner_name: raw.owner_name,
            year: raw.year,
            total: raw.total,
        });
    }
    Ok(totals)
}

fn load_votes_from_reader<R: Read>(rdr: R) -> Result<Vec<PollVote>, csv::Error> {
    let mut votes = Vec::new();
    let mut seen = HashSet::new();
    for raw in read_rows::<_, RawVote>(rdr, "poll vote")? {
        if !raw.value.is_finite() {
            warn!("skipping poll vote {}: non-finite value", raw.id);
            continue;
        }
        if !seen.insert(raw.id) {
            warn!("duplicate poll vote id {}, keeping the first row", raw.id);
            continue;
        }
        votes.push(PollVote {
            id: raw.id,
            year: raw.year,
            voter_owner_id: raw.voter_owner_id,
            voter_type: VoterType::from_str_type(&raw.voter_type),
            receiver_owner_id: raw.receiver_owner_id,
            value: raw.value,
        });
    }
    Ok(votes)
}

fn load_hardware_from_reader<R: Read>(rdr: R) -> Result<Vec<SeasonHardware>, csv::Error> {
    let mut seasons = Vec::new();
    let mut seen = HashSet::new();
    for raw in read_rows::<_, RawHardware>(rdr, "hardware")? {
        if !seen.insert(raw.year) {
            warn!("duplicate hardware row for {}, keeping the first row", raw.year);
            continue;
        }
        seasons.push(SeasonHardware {
            year: raw.year,
            playoff_champ: non_empty(raw.playoff_champ),
            reg_season_champ: non_empty(raw.reg_season_champ),
            ultimate_loser: non_empty(raw.ultimate_loser),
            reg_season_loser: non_empty(raw.reg_season_loser),
        });
    }
    Ok(seasons)
}

/// Drop rows that reference owners missing from the owner table.
fn drop_orphans(data: &mut LeagueData) {
    let ids: HashSet<OwnerId> = data.owners.iter().map(|o| o.id).collect();

    data.records.retain(|r| {
        let keep = ids.contains(&r.owner_id);
        if !keep {
            warn!("dropping {} record for unknown owner {}", r.year, r.owner_id);
        }
        keep
    });
    data.matchups.retain(|m| {
        let keep = ids.contains(&m.winner_owner_id) && ids.contains(&m.loser_owner_id);
        if !keep {
            warn!("dropping matchup {}: unknown owner", m.id);
        }
        keep
    });
    data.poll_votes.retain(|v| {
        let keep = ids.contains(&v.receiver_owner_id);
        if !keep {
            warn!("dropping poll vote {}: unknown receiver {}", v.id, v.receiver_owner_id);
        }
        keep
    });
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn open_and_load<T>(
    path: &Path,
    load: impl FnOnce(std::fs::File) -> Result<Vec<T>, csv::Error>,
) -> Result<Vec<T>, ImportError> {
    let file = std::fs::File::open(path).map_err(|e| ImportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load(file).map_err(|e| ImportError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load every league table from the CSV files named in `paths`, resolved
/// against `base_dir`.
pub fn load_league(base_dir: &Path, paths: &DataPaths) -> Result<LeagueData, ImportError> {
    let mut data = LeagueData {
        owners: open_and_load(&base_dir.join(&paths.owners), load_owners_from_reader)?,
        records: open_and_load(&base_dir.join(&paths.records), load_records_from_reader)?,
        matchups: open_and_load(&base_dir.join(&paths.matchups), load_matchups_from_reader)?,
        points_scored: open_and_load(&base_dir.join(&paths.points_scored), load_totals_from_reader)?,
        points_against: open_and_load(
            &base_dir.join(&paths.points_against),
            load_totals_from_reader,
        )?,
        poll_votes: open_and_load(&base_dir.join(&paths.poll_votes), load_votes_from_reader)?,
        hardware: open_and_load(&base_dir.join(&paths.hardware), load_hardware_from_reader)?,
    };

    if data.owners.is_empty() {
        return Err(ImportError::Validation(
            "owner CSV produced zero valid rows".into(),
        ));
    }

    drop_orphans(&mut data);

    info!(
        "Loaded {} owners, {} season records, {} matchups, {} poll votes, {} hardware seasons",
        data.owners.len(),
        data.records.len(),
        data.matchups.len(),
        data.poll_votes.len(),
        data.hardware.len()
    );

    Ok(data)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
