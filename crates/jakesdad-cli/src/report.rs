// Plain-text rendering of the reports.

use std::fmt::Write;

use jakesdad_core::era::{group_years_by_era, Era};
use jakesdad_stats::goats::{Leaderboard, RankedEntry};
use jakesdad_stats::hardware::{CurrentChampions, HardwareReport};
use jakesdad_stats::head_to_head::HeadToHead;
use jakesdad_stats::members::MemberStats;
use jakesdad_stats::playoffs::PlayoffReport;
use jakesdad_stats::polls::PollReport;
use jakesdad_stats::seasons::SeasonGrid;

fn side(out: &mut String, title: &str, entries: &[RankedEntry]) {
    let _ = writeln!(out, "  {title}");
    if entries.is_empty() {
        let _ = writeln!(out, "    (no qualifying owners)");
    }
    for e in entries {
        let _ = writeln!(out, "    {:>2}. {:<20} {}", e.rank, e.name, e.display);
    }
}

pub fn goats(boards: &[Leaderboard], label: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "GOATS and WOATS ({label})\n");
    for b in boards {
        let _ = writeln!(out, "{}", b.category);
        side(&mut out, "GOATS", &b.goats);
        side(&mut out, "WOATS", &b.woats);
        out.push('\n');
    }
    out
}

pub fn head_to_head(h: &HeadToHead) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} vs {}: {} games ({} regular season, {} playoffs)\n",
        h.first.name, h.second.name, h.total_games, h.regular_season_games, h.playoff_games
    );
    let _ = writeln!(
        out,
        "  {:<20} {:>5} {:>7} {:>8} {:>7} {:>8}",
        "Owner", "Wins", "Win %", "Avg Pts", "Reg", "Playoffs"
    );
    for s in [&h.first, &h.second] {
        let _ = writeln!(
            out,
            "  {:<20} {:>5} {:>6.1}% {:>8.1} {:>7} {:>8}",
            s.name, s.wins, s.win_percentage, s.avg_points, s.regular_season, s.playoffs
        );
    }
    out
}

pub fn playoffs(r: &PlayoffReport, label: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Playoffs ({label})\n\nAppearances");
    for a in &r.appearances {
        let _ = writeln!(out, "  {:<20} {:>3}", a.name, a.appearances);
    }

    let _ = writeln!(out, "\nFinishes            1st 2nd 3rd");
    for f in &r.finishes {
        let _ = writeln!(out, "  {:<18} {:>3} {:>3} {:>3}", f.name, f.first, f.second, f.third);
    }

    let _ = writeln!(out, "\nRecord               G   W   L   Win%  Champ%");
    for row in &r.table {
        let _ = writeln!(
            out,
            "  {:<16} {:>3} {:>3} {:>3} {:>6.1} {:>7.1}",
            row.name,
            row.games,
            row.wins,
            row.losses,
            row.win_fraction * 100.0,
            row.championship_rate * 100.0
        );
    }
    out
}

pub fn polls(r: &PollReport, year: i32) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Power polls {year}\n");
    if r.summaries.is_empty() {
        let _ = writeln!(out, "  (no votes)");
        return out;
    }
    let _ = writeln!(
        out,
        "  {:<20} {:>6} {:>6} {:>6} {:>4} {:>4} {:>5}",
        "Owner", "Median", "Avg", "StdDev", "Min", "Max", "Votes"
    );
    for s in &r.summaries {
        let _ = writeln!(
            out,
            "  {:<20} {:>6.2} {:>6.2} {:>6.2} {:>4} {:>4} {:>5}",
            s.name, s.median, s.average, s.std_dev, s.min, s.max, s.count
        );
    }
    out
}

pub fn members(rows: &[MemberStats], label: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Members ({label})\n");
    for m in rows {
        let _ = writeln!(
            out,
            "  {:<20} {:>3}-{:<3} {:>7}  hardware: {}",
            m.name, m.wins, m.losses, m.win_percentage_display, m.hardware
        );
    }
    out
}

fn or_dash(name: &Option<String>) -> &str {
    name.as_deref().unwrap_or("-")
}

pub fn hardware(r: &HardwareReport, label: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Hardware ({label})\n");
    if r.seasons.is_empty() {
        let _ = writeln!(out, "  (no seasons)");
        return out;
    }
    let _ = writeln!(
        out,
        "  {:<6} {:<18} {:<18} {:<18} {:<18}",
        "Year", "Champion", "Reg Szn Champ", "Ultimate Loser", "Reg Szn Loser"
    );
    for h in &r.seasons {
        let _ = writeln!(
            out,
            "  {:<6} {:<18} {:<18} {:<18} {:<18}",
            h.year,
            or_dash(&h.playoff_champ),
            or_dash(&h.reg_season_champ),
            or_dash(&h.ultimate_loser),
            or_dash(&h.reg_season_loser)
        );
    }

    let _ = writeln!(out, "\nTrophy case          Rings  Titles");
    for t in &r.winners {
        let _ = writeln!(
            out,
            "  {:<18} {:>5} {:>7}",
            t.name, t.playoff_championships, t.reg_season_championships
        );
    }

    let _ = writeln!(out, "\nLast places          Ultimate  Reg Szn");
    for l in &r.losers {
        let _ = writeln!(
            out,
            "  {:<18} {:>8} {:>8}",
            l.name, l.ultimate_losses, l.reg_season_losses
        );
    }
    out
}

pub fn champions(c: &CurrentChampions) -> String {
    format!(
        "{} champion:       {}\n{} ultimate loser: {}\n",
        c.year,
        or_dash(&c.champion),
        c.year,
        or_dash(&c.ultimate_loser)
    )
}

/// One table per era; seasons outside every era go in a trailing table.
pub fn seasons(grid: &SeasonGrid, eras: &[Era]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Seasons\n");
    if grid.years.is_empty() {
        let _ = writeln!(out, "  (no seasons)");
        return out;
    }

    let mut groups: Vec<(String, Vec<i32>)> = group_years_by_era(eras, &grid.years)
        .into_iter()
        .map(|(era, years)| (format!("{} ({})", era.label, era.range_label()), years))
        .collect();
    let other: Vec<i32> = grid
        .years
        .iter()
        .copied()
        .filter(|y| !eras.iter().any(|e| e.contains(*y)))
        .collect();
    if !other.is_empty() {
        groups.push(("Other seasons".into(), other));
    }

    for (title, years) in groups {
        let _ = writeln!(out, "{title}");
        let _ = write!(out, "  {:<20}", "Owner");
        for y in &years {
            let _ = write!(out, " {y:>10}");
        }
        out.push('\n');
        for row in &grid.rows {
            let _ = write!(out, "  {:<20}", row.name);
            for cell in row.cells.iter().filter(|c| years.contains(&c.year)) {
                let finish = cell
                    .reg_season_finish
                    .map_or_else(|| "-".to_string(), |f| format!("#{f}"));
                let _ = write!(out, " {:>10}", format!("{}-{} {}", cell.wins, cell.losses, finish));
            }
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use jakesdad_core::model::SeasonHardware;
    use jakesdad_stats::hardware::Trophies;
    use jakesdad_stats::ranking::Direction;
    use jakesdad_stats::seasons::{GridRow, SeasonCell};

    #[test]
    fn goats_text_lists_both_sides() {
        let board = Leaderboard {
            category: "Ring Gawd".into(),
            direction: Direction::HighestIsGoat,
            goats: vec![RankedEntry {
                name: "Alice".into(),
                value: 2.0,
                display: "2 Rings".into(),
                rank: 1,
            }],
            woats: vec![],
        };
        let text = goats(&[board], "2016-2021");
        assert!(text.starts_with("GOATS and WOATS (2016-2021)"));
        assert!(text.contains("Alice"));
        assert!(text.contains("2 Rings"));
        assert!(text.contains("(no qualifying owners)"));
    }

    #[test]
    fn empty_poll_report() {
        assert!(polls(&PollReport::default(), 2025).contains("(no votes)"));
    }

    #[test]
    fn hardware_text_marks_undecided_awards() {
        let r = HardwareReport {
            seasons: vec![SeasonHardware {
                year: 2025,
                playoff_champ: Some("Bob Jones".into()),
                ..Default::default()
            }],
            winners: vec![Trophies {
                name: "Bob Jones".into(),
                playoff_championships: 1,
                reg_season_championships: 0,
            }],
            losers: vec![],
        };
        let text = hardware(&r, "All seasons");
        assert!(text.starts_with("Hardware (All seasons)"));
        assert!(text.contains("2025   Bob Jones          -"));
        assert!(text.contains("Trophy case"));
        assert!(hardware(&HardwareReport::default(), "x").contains("(no seasons)"));
    }

    #[test]
    fn champions_text_shows_dash_for_unknown() {
        let text = champions(&CurrentChampions {
            year: 2025,
            champion: Some("Bob Jones".into()),
            ultimate_loser: None,
        });
        assert_eq!(text, "2025 champion:       Bob Jones\n2025 ultimate loser: -\n");
    }

    #[test]
    fn seasons_text_groups_years_by_era() {
        let eras = vec![Era {
            key: "hppr".into(),
            label: "HPPR".into(),
            start: 2022,
            end: 2025,
        }];
        let cell = |year, wins, losses, finish| SeasonCell {
            year,
            wins,
            losses,
            reg_season_finish: finish,
        };
        let grid = SeasonGrid {
            years: vec![2021, 2024],
            rows: vec![GridRow {
                owner_id: 1,
                name: "Alice Smith".into(),
                cells: vec![cell(2021, 0, 0, None), cell(2024, 10, 4, Some(1))],
            }],
        };
        let text = seasons(&grid, &eras);
        let hppr = text.find("HPPR (2022-2025)").unwrap();
        let other = text.find("Other seasons").unwrap();
        assert!(hppr < other);
        assert!(text.contains("10-4 #1"));
        assert!(text.contains("0-0 -"));
    }
}
