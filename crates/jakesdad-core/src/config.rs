// Configuration loading and parsing (config/league.toml).

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::era::Era;

const LEAGUE_FILE: &str = "league.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub leaderboard: LeaderboardConfig,
    pub polls: PollConfig,
    pub db_path: String,
    pub data_paths: DataPaths,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire league.toml file.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
    leaderboard: LeaderboardConfig,
    polls: PollConfig,
    database: DatabaseSection,
    data_paths: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    /// Season that defines the "current" owners; reports rank only owners
    /// active in this year.
    pub current_year: i32,
    pub eras: Vec<Era>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardConfig {
    /// Highest rank shown on each side of a GOATS/WOATS card.
    pub rank_cutoff: usize,
    /// Era keys selected when no `--era` flag is given. Empty means all years.
    #[serde(default)]
    pub default_eras: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    pub year: i32,
    pub include_bot: bool,
    /// Voter name shown for votes that have no owner row.
    pub bot_label: String,
}

#[derive(Debug, Clone, Deserialize)]
struct DatabaseSection {
    path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub owners: String,
    pub records: String,
    pub matchups: String,
    pub points_scored: String,
    pub points_against: String,
    pub poll_votes: String,
    /// Older league files predate this table.
    #[serde(default = "default_hardware_path")]
    pub hardware: String,
}

fn default_hardware_path() -> String {
    "data/hardware_by_season.csv".into()
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` relative to
/// `base_dir`.
///
/// Does not create the file; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let league_path = base_dir.join("config").join(LEAGUE_FILE);
    let text = read_file(&league_path)?;
    let file: LeagueFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: league_path.clone(),
        source: e,
    })?;

    let config = Config {
        league: file.league,
        leaderboard: file.leaderboard,
        polls: file.polls,
        db_path: file.database.path,
        data_paths: file.data_paths,
    };

    validate(&config)?;

    Ok(config)
}

/// Create `config/league.toml` from the `defaults/league.toml` template when
/// it does not exist yet. Returns the path of the new file, or `None` when a
/// league file was already in place (local edits are never overwritten).
pub fn init_league_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(LEAGUE_FILE);
    if target.exists() {
        return Ok(None);
    }

    let template = base_dir.join("defaults").join(LEAGUE_FILE);
    if !template.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no config/{LEAGUE_FILE} and no defaults/{LEAGUE_FILE} template under {}",
                base_dir.display()
            ),
        });
    }

    let copy_err = |what: &str, e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("failed to {what} {}: {e}", target.display()),
    };
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| copy_err("create the directory for", e))?;
    }
    std::fs::copy(&template, &target).map_err(|e| copy_err("write", e))?;
    Ok(Some(target))
}

/// Load `config/league.toml`, creating it from the template on first run.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    if let Some(created) = init_league_file(base_dir)? {
        tracing::info!("created {} from defaults", created.display());
    }
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.current_year <= 0 {
        return Err(invalid(
            "league.current_year",
            format!("must be a positive year, got {}", config.league.current_year),
        ));
    }

    if config.league.eras.is_empty() {
        return Err(invalid("league.eras", "at least one era is required"));
    }

    let mut seen = HashSet::new();
    for era in &config.league.eras {
        if era.key.trim().is_empty() {
            return Err(invalid("league.eras.key", "must not be empty"));
        }
        if !seen.insert(era.key.as_str()) {
            return Err(invalid(
                "league.eras.key",
                format!("duplicate era key `{}`", era.key),
            ));
        }
        if era.start > era.end {
            return Err(invalid(
                format!("league.eras.{}", era.key),
                format!("start {} is after end {}", era.start, era.end),
            ));
        }
    }

    if config.leaderboard.rank_cutoff == 0 {
        return Err(invalid("leaderboard.rank_cutoff", "must be > 0"));
    }

    for key in &config.leaderboard.default_eras {
        if !seen.contains(key.as_str()) {
            return Err(invalid(
                "leaderboard.default_eras",
                format!("unknown era `{key}`"),
            ));
        }
    }

    if config.polls.bot_label.trim().is_empty() {
        return Err(invalid("polls.bot_label", "must not be empty"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
