// Hardware: the awards handed out each season, career tallies of the
// winners and the losers, and the reigning champion.

use jakesdad_core::era::YearFilter;
use jakesdad_core::model::{capitalize_name, LeagueData, SeasonHardware};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trophies {
    pub name: String,
    pub playoff_championships: u32,
    pub reg_season_championships: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LastPlaces {
    pub name: String,
    pub ultimate_losses: u32,
    pub reg_season_losses: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HardwareReport {
    /// Newest season first, names capitalized.
    pub seasons: Vec<SeasonHardware>,
    pub winners: Vec<Trophies>,
    pub losers: Vec<LastPlaces>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentChampions {
    pub year: i32,
    pub champion: Option<String>,
    pub ultimate_loser: Option<String>,
}

/// Count two awards per name over `seasons`. Names match ignoring case and
/// keep the order they first appear in; the result is sorted by the first
/// count, then the second, both descending.
fn tally<'a, F>(seasons: &[&'a SeasonHardware], awards: F) -> Vec<(String, [u32; 2])>
where
    F: Fn(&'a SeasonHardware) -> [Option<&'a str>; 2],
{
    let mut counts: Vec<(String, [u32; 2])> = Vec::new();
    for &season in seasons {
        for (slot, name) in awards(season).into_iter().enumerate() {
            let Some(name) = name else {
                continue;
            };
            let idx = match counts.iter().position(|(n, _)| n.eq_ignore_ascii_case(name)) {
                Some(i) => i,
                None => {
                    counts.push((name.to_string(), [0, 0]));
                    counts.len() - 1
                }
            };
            counts[idx].1[slot] += 1;
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn display(name: &Option<String>) -> Option<String> {
    name.as_deref().map(capitalize_name)
}

/// Awards for every season in `filter`, plus who has collected the most of
/// them.
pub fn hardware_report(data: &LeagueData, filter: &YearFilter) -> HardwareReport {
    let mut seasons = filter.apply(&data.hardware, |h| h.year);
    seasons.sort_by(|a, b| b.year.cmp(&a.year));

    let winners = tally(&seasons, |h| {
        [h.playoff_champ.as_deref(), h.reg_season_champ.as_deref()]
    })
    .into_iter()
    .map(|(name, [playoff, reg])| Trophies {
        name: capitalize_name(&name),
        playoff_championships: playoff,
        reg_season_championships: reg,
    })
    .collect();

    let losers = tally(&seasons, |h| {
        [h.ultimate_loser.as_deref(), h.reg_season_loser.as_deref()]
    })
    .into_iter()
    .map(|(name, [ultimate, reg])| LastPlaces {
        name: capitalize_name(&name),
        ultimate_losses: ultimate,
        reg_season_losses: reg,
    })
    .collect();

    HardwareReport {
        seasons: seasons
            .into_iter()
            .map(|h| SeasonHardware {
                year: h.year,
                playoff_champ: display(&h.playoff_champ),
                reg_season_champ: display(&h.reg_season_champ),
                ultimate_loser: display(&h.ultimate_loser),
                reg_season_loser: display(&h.reg_season_loser),
            })
            .collect(),
        winners,
        losers,
    }
}

/// Champion and ultimate loser of `year`. A name that does not match a
/// league owner is reported as `None`.
pub fn current_champions(data: &LeagueData, year: i32) -> CurrentChampions {
    let season = data.hardware.iter().find(|h| h.year == year);
    let owner_named = |name: Option<&String>| {
        name.and_then(|n| data.owner_by_name(n))
            .map(|o| o.display_name())
    };
    CurrentChampions {
        year,
        champion: owner_named(season.and_then(|h| h.playoff_champ.as_ref())),
        ultimate_loser: owner_named(season.and_then(|h| h.ultimate_loser.as_ref())),
    }
}
