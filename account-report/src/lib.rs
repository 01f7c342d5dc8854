pub mod classifier;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod machines;
pub mod overview;
pub mod render;
pub mod report;
pub mod request;
pub mod rewards;
pub mod store;

#[cfg(test)]
mod testing;

pub use classifier::{Snapshot, StatusThresholds};
pub use error::ReportError;
pub use hierarchy::{walk_main_account, MainAccountReport, SubAccountOutcome};
pub use report::{compose, SubAccountReport};
pub use store::{AccountStore, PgStore};
