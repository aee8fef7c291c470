// jakesdad command-line entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, stdout is reserved for reports)
// 2. Load config
// 3. Open database
// 4. Run the requested subcommand and print its report

mod report;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use jakesdad_core::config::{self, Config};
use jakesdad_core::db::Database;
use jakesdad_core::era::{selected_ranges_label, YearFilter};
use jakesdad_core::import::load_league;
use jakesdad_core::model::{LeagueData, Owner};
use jakesdad_core::source::{snapshot, LeagueSource, PollFilter};
use jakesdad_stats::goats::{goats_and_woats, GoatsOptions};
use jakesdad_stats::hardware::{current_champions, hardware_report};
use jakesdad_stats::head_to_head::head_to_head;
use jakesdad_stats::members::member_stats;
use jakesdad_stats::playoffs::playoff_stats;
use jakesdad_stats::polls::poll_stats;
use jakesdad_stats::seasons::season_grid;

#[derive(Parser)]
#[command(name = "jakesdad")]
#[command(about = "Jake's Dad fantasy league records: GOATS, WOATS, rivalries and polls")]
#[command(version)]
struct Cli {
    /// Project directory holding config/, defaults/ and data/
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    /// Print reports as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Era selection shared by the report subcommands.
#[derive(clap::Args)]
struct EraArgs {
    /// Era key to include (repeatable); defaults to `leaderboard.default_eras`
    #[arg(long = "era")]
    eras: Vec<String>,

    /// Ignore eras and use every season
    #[arg(long, conflicts_with = "eras")]
    all_eras: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Import the league CSV exports into the database
    Import {
        /// Directory the `data_paths` entries are resolved against
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// GOATS and WOATS leaderboards for every category
    Goats {
        #[command(flatten)]
        eras: EraArgs,

        /// Highest rank shown on each side (overrides `leaderboard.rank_cutoff`)
        #[arg(short = 'k', long)]
        rank_cutoff: Option<usize>,

        /// Show only this category, e.g. "Worst Defense"
        #[arg(long)]
        category: Option<String>,
    },
    /// Head-to-head record between two owners (name or id)
    H2h {
        first: String,
        second: String,

        #[command(flatten)]
        eras: EraArgs,
    },
    /// Playoff appearances, podium finishes and playoff records
    Playoffs {
        #[command(flatten)]
        eras: EraArgs,
    },
    /// Power-poll vote statistics for one season
    Polls {
        /// Season (defaults to `polls.year`)
        #[arg(long)]
        year: Option<i32>,

        /// Count votes cast by the league bot (overrides `polls.include_bot`)
        #[arg(long, overrides_with = "no_bot")]
        include_bot: bool,

        /// Leave out votes cast by the league bot (overrides `polls.include_bot`)
        #[arg(long, overrides_with = "include_bot")]
        no_bot: bool,
    },
    /// Career win/loss summaries for current owners
    Members {
        #[command(flatten)]
        eras: EraArgs,
    },
    /// Champions and last places by season, and who has the most of each
    Hardware {
        #[command(flatten)]
        eras: EraArgs,
    },
    /// Reigning champion and ultimate loser
    Champions {
        /// Season (defaults to `league.current_year`)
        #[arg(long)]
        year: Option<i32>,
    },
    /// Season-by-season records and regular-season finishes, grouped by era
    Seasons {
        #[command(flatten)]
        eras: EraArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.base_dir)?;
    info!("jakesdad starting up");

    let config = config::load_config(&cli.base_dir).context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, current year {}, {} eras",
        config.league.name,
        config.league.current_year,
        config.league.eras.len()
    );

    let db_path = cli.base_dir.join(&config.db_path);
    let db = Database::open(&db_path.to_string_lossy()).context("failed to open database")?;
    info!("Database opened at {}", db_path.display());

    match cli.command {
        Commands::Import { dir } => {
            let data_dir = dir.unwrap_or_else(|| cli.base_dir.clone());
            let data = load_league(&data_dir, &config.data_paths)
                .with_context(|| format!("failed to import CSVs from {}", data_dir.display()))?;
            db.replace_league(&data).context("failed to store imported league")?;
            println!(
                "Imported {} owners, {} season records, {} matchups, {} poll votes, {} hardware seasons",
                data.owners.len(),
                data.records.len(),
                data.matchups.len(),
                data.poll_votes.len(),
                data.hardware.len()
            );
        }
        Commands::Goats {
            eras,
            rank_cutoff,
            category,
        } => {
            let data = load_snapshot(&db)?;
            let (filter, label) = year_filter(&config, &eras)?;
            let options = GoatsOptions {
                filter,
                rank_cutoff: rank_cutoff.unwrap_or(config.leaderboard.rank_cutoff),
                current_year: config.league.current_year,
                category,
            };
            let boards = goats_and_woats(&data, &options).context("failed to rank categories")?;
            emit(cli.json, &boards, || report::goats(&boards, &label))?;
        }
        Commands::H2h {
            first,
            second,
            eras,
        } => {
            let data = load_snapshot(&db)?;
            let (filter, _) = year_filter(&config, &eras)?;
            let a = resolve_owner(&data, &first)?;
            let b = resolve_owner(&data, &second)?;
            let Some(h2h) = head_to_head(&data, a.id, b.id, &filter) else {
                bail!("pick two different owners");
            };
            emit(cli.json, &h2h, || report::head_to_head(&h2h))?;
        }
        Commands::Playoffs { eras } => {
            let data = load_snapshot(&db)?;
            let (filter, label) = year_filter(&config, &eras)?;
            let stats = playoff_stats(&data, &filter, config.league.current_year);
            emit(cli.json, &stats, || report::playoffs(&stats, &label))?;
        }
        Commands::Polls {
            year,
            include_bot,
            no_bot,
        } => {
            let year = year.unwrap_or(config.polls.year);
            let include_bot = bot_votes(include_bot, no_bot, config.polls.include_bot);
            let owners = db.owners()?;
            let votes = db.poll_votes(PollFilter::season(year, include_bot))?;
            let stats = poll_stats(&votes, &owners, &config.polls.bot_label);
            emit(cli.json, &stats, || report::polls(&stats, year))?;
        }
        Commands::Members { eras } => {
            let data = load_snapshot(&db)?;
            let (filter, label) = year_filter(&config, &eras)?;
            let rows = member_stats(&data, &filter, config.league.current_year);
            emit(cli.json, &rows, || report::members(&rows, &label))?;
        }
        Commands::Hardware { eras } => {
            let data = load_snapshot(&db)?;
            let (filter, label) = year_filter(&config, &eras)?;
            let hardware = hardware_report(&data, &filter);
            emit(cli.json, &hardware, || report::hardware(&hardware, &label))?;
        }
        Commands::Champions { year } => {
            let data = load_snapshot(&db)?;
            let current = current_champions(&data, year.unwrap_or(config.league.current_year));
            emit(cli.json, &current, || report::champions(&current))?;
        }
        Commands::Seasons { eras } => {
            let data = load_snapshot(&db)?;
            let (filter, _) = year_filter(&config, &eras)?;
            let grid = season_grid(&data, &filter, config.league.current_year);
            emit(cli.json, &grid, || report::seasons(&grid, &config.league.eras))?;
        }
    }

    info!("jakesdad finished");
    Ok(())
}

fn load_snapshot(db: &Database) -> Result<LeagueData> {
    if db.imported_at()?.is_none() {
        bail!("database is empty; run `jakesdad import` first");
    }
    snapshot(db)
}

/// Resolve the era flags into a filter plus a label for report headers.
fn year_filter(config: &Config, args: &EraArgs) -> Result<(YearFilter, String)> {
    if args.all_eras {
        return Ok((YearFilter::All, "All seasons".into()));
    }
    let keys = if args.eras.is_empty() {
        &config.leaderboard.default_eras
    } else {
        &args.eras
    };
    if keys.is_empty() {
        return Ok((YearFilter::All, "All seasons".into()));
    }
    let eras = &config.league.eras;
    let filter = YearFilter::from_eras(eras, keys)?;
    let label = selected_ranges_label(eras, keys)?;
    Ok((filter, label))
}

/// Whether bot votes count: an explicit flag wins over `polls.include_bot`.
fn bot_votes(include_bot: bool, no_bot: bool, configured: bool) -> bool {
    if include_bot {
        true
    } else if no_bot {
        false
    } else {
        configured
    }
}

/// Accept either a numeric owner id or a (case-insensitive) owner name.
fn resolve_owner<'a>(data: &'a LeagueData, key: &str) -> Result<&'a Owner> {
    let found = match key.trim().parse::<i64>() {
        Ok(id) => data.owner(id),
        Err(_) => data.owner_by_name(key),
    };
    found.with_context(|| format!("unknown owner `{key}`"))
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(value).context("failed to serialize report")?
        );
    } else {
        print!("{}", text());
    }
    Ok(())
}

/// Initialize tracing to log to a file, leaving stdout to the reports.
fn init_tracing(base_dir: &Path) -> Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = base_dir.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("jakesdad.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("jakesdad=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_goats_with_eras() {
        let cli = Cli::parse_from(["jakesdad", "goats", "--era", "modern", "--era", "hppr", "-k", "2"]);
        match cli.command {
            Commands::Goats {
                eras,
                rank_cutoff,
                category,
            } => {
                assert_eq!(eras.eras, vec!["modern", "hppr"]);
                assert!(!eras.all_eras);
                assert_eq!(rank_cutoff, Some(2));
                assert_eq!(category, None);
            }
            _ => panic!("expected goats"),
        }
    }

    #[test]
    fn json_flag_is_global() {
        let cli = Cli::parse_from(["jakesdad", "polls", "--json", "--year", "2024"]);
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Polls {
                year: Some(2024),
                include_bot: false,
                no_bot: false,
            }
        ));
    }

    fn poll_flags(args: &[&str]) -> (bool, bool) {
        let argv = ["jakesdad", "polls"].iter().chain(args).copied();
        match Cli::parse_from(argv).command {
            Commands::Polls {
                include_bot,
                no_bot,
                ..
            } => (include_bot, no_bot),
            _ => panic!("expected polls"),
        }
    }

    #[test]
    fn bot_flags_override_config_both_ways() {
        let (inc, no) = poll_flags(&["--no-bot"]);
        assert!(!bot_votes(inc, no, true));

        let (inc, no) = poll_flags(&["--include-bot"]);
        assert!(bot_votes(inc, no, false));

        // No flag keeps the configured default.
        let (inc, no) = poll_flags(&[]);
        assert!(bot_votes(inc, no, true));
        assert!(!bot_votes(inc, no, false));

        // The last flag given wins.
        assert_eq!(poll_flags(&["--include-bot", "--no-bot"]), (false, true));
        assert_eq!(poll_flags(&["--no-bot", "--include-bot"]), (true, false));
    }

    #[test]
    fn parses_goats_category_and_new_reports() {
        let cli = Cli::parse_from(["jakesdad", "goats", "--category", "Worst Defense"]);
        assert!(matches!(
            cli.command,
            Commands::Goats { category: Some(ref c), .. } if c == "Worst Defense"
        ));

        let cli = Cli::parse_from(["jakesdad", "champions", "--year", "2024"]);
        assert!(matches!(cli.command, Commands::Champions { year: Some(2024) }));

        let cli = Cli::parse_from(["jakesdad", "seasons", "--all-eras"]);
        assert!(matches!(cli.command, Commands::Seasons { ref eras } if eras.all_eras));

        let cli = Cli::parse_from(["jakesdad", "hardware", "--era", "hppr"]);
        assert!(matches!(cli.command, Commands::Hardware { ref eras } if eras.eras == ["hppr"]));
    }

    #[test]
    fn all_eras_conflicts_with_era() {
        assert!(Cli::try_parse_from(["jakesdad", "members", "--all-eras", "--era", "modern"]).is_err());
    }

    #[test]
    fn resolve_owner_by_id_or_name() {
        let data = LeagueData {
            owners: vec![Owner {
                id: 7,
                name: "jake smith".into(),
                years_active: vec![2025],
            }],
            ..Default::default()
        };
        assert_eq!(resolve_owner(&data, "7").unwrap().id, 7);
        assert_eq!(resolve_owner(&data, "Jake Smith").unwrap().id, 7);
        assert!(resolve_owner(&data, "nobody").is_err());
    }
}
