// League data layer: domain types, configuration, eras, and the data sources
// (SQLite database, CSV import, in-memory snapshot) the analytics read from.

pub mod config;
pub mod db;
pub mod era;
pub mod import;
pub mod model;
pub mod source;
