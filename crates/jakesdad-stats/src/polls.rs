// Power-poll statistics. Callers pre-filter votes (by season and voter type)
// through `PollFilter`; this module only summarizes what it is given.

use jakesdad_core::model::{Owner, OwnerId, PollVote};
use serde::Serialize;
use std::cmp::Ordering;

/// Summary of every vote one owner received.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollSummary {
    pub name: String,
    pub median: f64,
    pub average: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Individual votes one owner received, keyed by voter name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawVotes {
    pub name: String,
    /// `(voter, value)`, highest value first.
    pub votes: Vec<(String, f64)>,
}

impl RawVotes {
    pub fn total(&self) -> f64 {
        self.votes.iter().map(|(_, v)| v).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PollReport {
    /// Best (lowest median) first.
    pub summaries: Vec<PollSummary>,
    /// Lowest vote total first.
    pub raw: Vec<RawVotes>,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Summarize `votes` per receiving owner. Votes whose receiver is not a
/// known owner are dropped; voters without an owner row are shown as
/// `bot_label`. A voter who voted twice for the same owner keeps the last
/// value in the raw view.
pub fn poll_stats(votes: &[PollVote], owners: &[Owner], bot_label: &str) -> PollReport {
    let mut by_receiver: Vec<(OwnerId, Vec<f64>, Vec<(String, f64)>)> = Vec::new();

    for v in votes {
        let idx = match by_receiver.iter().position(|(id, _, _)| *id == v.receiver_owner_id) {
            Some(i) => i,
            None => {
                by_receiver.push((v.receiver_owner_id, Vec::new(), Vec::new()));
                by_receiver.len() - 1
            }
        };
        let voter = v
            .voter_owner_id
            .and_then(|id| owners.iter().find(|o| o.id == id))
            .map(Owner::display_name)
            .unwrap_or_else(|| bot_label.to_string());

        let (_, values, raw) = &mut by_receiver[idx];
        values.push(v.value);
        match raw.iter_mut().find(|(name, _)| *name == voter) {
            Some(slot) => slot.1 = v.value,
            None => raw.push((voter, v.value)),
        }
    }

    let mut report = PollReport::default();
    for (receiver, values, mut raw) in by_receiver {
        let Some(owner) = owners.iter().find(|o| o.id == receiver) else {
            continue;
        };
        let name = owner.display_name();

        let mut sorted = values.clone();
        sorted.sort_by(|a, b| cmp_f64(*a, *b));
        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        report.summaries.push(PollSummary {
            name: name.clone(),
            median: round2(median(&sorted)),
            average: round2(mean),
            std_dev: round2(variance.sqrt()),
            min: sorted[0],
            max: sorted[count - 1],
            count,
        });

        raw.sort_by(|a, b| cmp_f64(b.1, a.1));
        report.raw.push(RawVotes { name, votes: raw });
    }

    report
        .summaries
        .sort_by(|a, b| cmp_f64(a.median, b.median).then(cmp_f64(a.average, b.average)));
    report.raw.sort_by(|a, b| cmp_f64(a.total(), b.total()));
    report
}
