// SQLite persistence layer for league tables.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::model::{
    LeagueData, Matchup, Owner, PollVote, SeasonHardware, SeasonRecord, SeasonTotal, TotalKind,
    VoterType,
};
use crate::source::{LeagueSource, PollFilter};

/// SQLite-backed store for owners, season records, matchups, season point
/// totals, power-poll votes and the per-season hardware table.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS owners (
                id           INTEGER PRIMARY KEY,
                name         TEXT NOT NULL,
                years_active TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS season_records (
                year              INTEGER NOT NULL,
                owner_id          INTEGER NOT NULL REFERENCES owners(id),
                wins              INTEGER,
                losses            INTEGER,
                reg_season_finish INTEGER,
                playoff_wins      INTEGER,
                playoff_losses    INTEGER,
                playoff_finish    INTEGER,
                PRIMARY KEY (year, owner_id)
            );

            CREATE TABLE IF NOT EXISTS matchups (
                id              INTEGER PRIMARY KEY,
                year            INTEGER NOT NULL,
                week            INTEGER NOT NULL,
                winner_owner_id INTEGER NOT NULL REFERENCES owners(id),
                loser_owner_id  INTEGER NOT NULL REFERENCES owners(id),
                winner_score    REAL NOT NULL,
                loser_score     REAL NOT NULL,
                playoffs        INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS season_points (
                kind       TEXT NOT NULL,
                owner_name TEXT NOT NULL,
                year       INTEGER NOT NULL,
                total      REAL NOT NULL,
                PRIMARY KEY (kind, owner_name, year)
            );

            CREATE TABLE IF NOT EXISTS poll_votes (
                id                INTEGER PRIMARY KEY,
                year              INTEGER NOT NULL,
                voter_owner_id    INTEGER,
                voter_type        TEXT NOT NULL,
                receiver_owner_id INTEGER NOT NULL REFERENCES owners(id),
                value             REAL NOT NULL
            );

            CREATE TABLE IF NOT EXISTS hardware_by_season (
                year             INTEGER PRIMARY KEY,
                playoff_champ    TEXT,
                reg_season_champ TEXT,
                ultimate_loser   TEXT,
                reg_season_loser TEXT
            );

            CREATE TABLE IF NOT EXISTS league_meta (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )
        .context("failed to create database schema")?;

        conn.execute_batch(
            "CREATE INDEX IF NOT EXISTS idx_matchups_year ON matchups(year);
             CREATE INDEX IF NOT EXISTS idx_poll_votes_year ON poll_votes(year);",
        )
        .context("failed to create indexes")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Replace every league table with the contents of `data` in a single
    /// transaction, then stamp `imported_at`. A failure leaves the previous
    /// contents untouched.
    pub fn replace_league(&self, data: &LeagueData) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin import transaction")?;

        for table in [
            "hardware_by_season",
            "poll_votes",
            "season_points",
            "matchups",
            "season_records",
            "owners",
        ] {
            tx.execute(&format!("DELETE FROM {table}"), [])
                .with_context(|| format!("failed to clear {table}"))?;
        }

        for owner in &data.owners {
            let years = serde_json::to_string(&owner.years_active)
                .context("failed to serialize years_active")?;
            tx.execute(
                "INSERT INTO owners (id, name, years_active) VALUES (?1, ?2, ?3)",
                params![owner.id, owner.name, years],
            )
            .with_context(|| format!("failed to insert owner {}", owner.id))?;
        }

        for r in &data.records {
            tx.execute(
                "INSERT OR REPLACE INTO season_records
                    (year, owner_id, wins, losses, reg_season_finish,
                     playoff_wins, playoff_losses, playoff_finish)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    r.year,
                    r.owner_id,
                    r.wins,
                    r.losses,
                    r.reg_season_finish,
                    r.playoff_wins,
                    r.playoff_losses,
                    r.playoff_finish,
                ],
            )
            .with_context(|| format!("failed to insert record {}/{}", r.year, r.owner_id))?;
        }

        for m in &data.matchups {
            tx.execute(
                "INSERT INTO matchups
                    (id, year, week, winner_owner_id, loser_owner_id,
                     winner_score, loser_score, playoffs)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    m.id,
                    m.year,
                    m.week,
                    m.winner_owner_id,
                    m.loser_owner_id,
                    m.winner_score,
                    m.loser_score,
                    m.playoffs,
                ],
            )
            .with_context(|| format!("failed to insert matchup {}", m.id))?;
        }

        for kind in [TotalKind::Scored, TotalKind::Against] {
            for t in data.totals(kind) {
                tx.execute(
                    "INSERT OR REPLACE INTO season_points (kind, owner_name, year, total)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![kind.as_str(), t.owner_name, t.year, t.total],
                )
                .context("failed to insert season total")?;
            }
        }

        for v in &data.poll_votes {
            tx.execute(
                "INSERT INTO poll_votes
                    (id, year, voter_owner_id, voter_type, receiver_owner_id, value)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    v.id,
                    v.year,
                    v.voter_owner_id,
                    v.voter_type.as_str(),
                    v.receiver_owner_id,
                    v.value,
                ],
            )
            .with_context(|| format!("failed to insert poll vote {}", v.id))?;
        }

        for h in &data.hardware {
            tx.execute(
                "INSERT INTO hardware_by_season
                    (year, playoff_champ, reg_season_champ, ultimate_loser, reg_season_loser)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    h.year,
                    h.playoff_champ,
                    h.reg_season_champ,
                    h.ultimate_loser,
                    h.reg_season_loser,
                ],
            )
            .with_context(|| format!("failed to insert {} hardware", h.year))?;
        }

        tx.execute(
            "INSERT OR REPLACE INTO league_meta (key, value) VALUES ('imported_at', ?1)",
            params![chrono::Utc::now().to_rfc3339()],
        )
        .context("failed to stamp import time")?;

        tx.commit().context("failed to commit import")?;
        Ok(())
    }

    /// RFC 3339 timestamp of the last successful `replace_league`, if any.
    pub fn imported_at(&self) -> Result<Option<chrono::DateTime<chrono::Utc>>> {
        let conn = self.conn();
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM league_meta WHERE key = 'imported_at'",
                [],
                |row| row.get(0),
            )
            .optional()
            .context("failed to read imported_at")?;

        raw.map(|s| {
            chrono::DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .with_context(|| format!("malformed imported_at value `{s}`"))
        })
        .transpose()
    }

    /// Row count of a league table, used for import summaries.
    pub fn count(&self, table: &str) -> Result<usize> {
        const TABLES: &[&str] = &[
            "owners",
            "season_records",
            "matchups",
            "season_points",
            "poll_votes",
            "hardware_by_season",
        ];
        anyhow::ensure!(TABLES.contains(&table), "unknown table `{table}`");

        let conn = self.conn();
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .with_context(|| format!("failed to count {table}"))?;
        Ok(count as usize)
    }

    fn query_all<T, F>(&self, sql: &str, what: &str, map: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(sql)
            .with_context(|| format!("failed to prepare {what} query"))?;
        let rows = stmt
            .query_map([], map)
            .with_context(|| format!("failed to query {what}"))?
            .collect::<rusqlite::Result<Vec<T>>>()
            .with_context(|| format!("failed to read {what} row"))?;
        Ok(rows)
    }
}

impl LeagueSource for Database {
    fn owners(&self) -> Result<Vec<Owner>> {
        let raw = self.query_all(
            "SELECT id, name, years_active FROM owners ORDER BY id",
            "owners",
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)),
        )?;

        raw.into_iter()
            .map(|(id, name, years)| {
                let years_active: Vec<i32> = serde_json::from_str(&years)
                    .with_context(|| format!("malformed years_active for owner {id}"))?;
                Ok(Owner {
                    id,
                    name,
                    years_active,
                })
            })
            .collect()
    }

    fn season_records(&self) -> Result<Vec<SeasonRecord>> {
        self.query_all(
            "SELECT year, owner_id, wins, losses, reg_season_finish,
                    playoff_wins, playoff_losses, playoff_finish
             FROM season_records ORDER BY year, owner_id",
            "season records",
            |row| {
                Ok(SeasonRecord {
                    year: row.get(0)?,
                    owner_id: row.get(1)?,
                    wins: row.get(2)?,
                    losses: row.get(3)?,
                    reg_season_finish: row.get(4)?,
                    playoff_wins: row.get(5)?,
                    playoff_losses: row.get(6)?,
                    playoff_finish: row.get(7)?,
                })
            },
        )
    }

    fn matchups(&self) -> Result<Vec<Matchup>> {
        self.query_all(
            "SELECT id, year, week, winner_owner_id, loser_owner_id,
                    winner_score, loser_score, playoffs
             FROM matchups ORDER BY year, week, id",
            "matchups",
            |row| {
                Ok(Matchup {
                    id: row.get(0)?,
                    year: row.get(1)?,
                    week: row.get(2)?,
                    winner_owner_id: row.get(3)?,
                    loser_owner_id: row.get(4)?,
                    winner_score: row.get(5)?,
                    loser_score: row.get(6)?,
                    playoffs: row.get(7)?,
                })
            },
        )
    }

    fn season_totals(&self, kind: TotalKind) -> Result<Vec<SeasonTotal>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT owner_name, year, total FROM season_points
                 WHERE kind = ?1 ORDER BY year, owner_name",
            )
            .context("failed to prepare season_totals query")?;
        let totals = stmt
            .query_map(params![kind.as_str()], |row| {
                Ok(SeasonTotal {
                    owner_name: row.get(0)?,
                    year: row.get(1)?,
                    total: row.get(2)?,
                })
            })
            .context("failed to query season totals")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("failed to read season total row")?;
        Ok(totals)
    }

    fn poll_votes(&self, filter: PollFilter) -> Result<Vec<PollVote>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT id, year, voter_owner_id, voter_type, receiver_owner_id, value
                 FROM poll_votes
                 WHERE (?1 IS NULL OR year = ?1)
                   AND (?2 OR voter_type = 'owner')
                 ORDER BY id",
            )
            .context("failed to prepare poll_votes query")?;
        let votes = stmt
            .query_map(params![filter.year, filter.include_bot], |row| {
                let voter_type: String = row.get(3)?;
                Ok(PollVote {
                    id: row.get(0)?,
                    year: row.get(1)?,
                    voter_owner_id: row.get(2)?,
                    voter_type: VoterType::from_str_type(&voter_type),
                    receiver_owner_id: row.get(4)?,
                    value: row.get(5)?,
                })
            })
            .context("failed to query poll votes")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("failed to read poll vote row")?;
        Ok(votes)
    }

    fn season_hardware(&self) -> Result<Vec<SeasonHardware>> {
        self.query_all(
            "SELECT year, playoff_champ, reg_season_champ, ultimate_loser, reg_season_loser
             FROM hardware_by_season ORDER BY year",
            "hardware",
            |row| {
                Ok(SeasonHardware {
                    year: row.get(0)?,
                    playoff_champ: row.get(1)?,
                    reg_season_champ: row.get(2)?,
                    ultimate_loser: row.get(3)?,
                    reg_season_loser: row.get(4)?,
                })
            },
        )
    }
}
