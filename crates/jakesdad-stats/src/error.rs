use jakesdad_core::model::OwnerId;
use thiserror::Error;

/// Caller contract violations. Well-formed input, including empty input,
/// never produces an error.
#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("statistic for `{name}` is not a finite number: {value}")]
    NonFiniteValue { name: String, value: f64 },

    #[error("owner {owner_id} (`{name}`) appears more than once in one category")]
    DuplicateEntity { owner_id: OwnerId, name: String },

    #[error("invalid argument `{field}`: {message}")]
    InvalidArgument { field: String, message: String },
}
