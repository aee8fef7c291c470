// League analytics: statistic accumulation, tie-aware leaderboards, and the
// derived reports (GOATS/WOATS, head-to-head, playoffs, power polls, members,
// hardware and the season grid).

pub mod accumulate;
pub mod error;
pub mod format;
pub mod goats;
pub mod hardware;
pub mod head_to_head;
pub mod members;
pub mod playoffs;
pub mod polls;
pub mod ranking;
pub mod seasons;

pub use error::StatsError;
