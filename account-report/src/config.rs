use chrono::FixedOffset;
use dotenv::dotenv;
use shared::db_pg::PoolSettings;
use std::env;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::classifier::{StatusThresholds, DEFAULT_ACTIVE_THRESHOLD_SECS, DEFAULT_INACTIVE_THRESHOLD_SECS};

/// Asia/Shanghai, which has no daylight saving.
pub const DEFAULT_UTC_OFFSET_SECS: i32 = 8 * 60 * 60;
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
  #[error("{0} must be set")]
  Missing(&'static str),
  #[error("{key} has an invalid value `{value}`")]
  Invalid { key: &'static str, value: String },
  #[error("ACTIVE_THRESHOLD_SECS ({active}) must be positive and below INACTIVE_THRESHOLD_SECS ({inactive})")]
  Thresholds { active: i64, inactive: i64 },
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
  pub database_url: String,
  /// Secondary (zkrush) store. Connected lazily and never queried.
  pub secondary_database_url: Option<String>,
  pub pool: PoolSettings,
  pub thresholds: StatusThresholds,
  pub display_offset: FixedOffset,
  pub address: IpAddr,
  pub port: u16,
}

impl ReportConfig {
  /// Reads `.env` (if present) and then the process environment.
  pub fn from_env() -> Result<Self, ConfigError> {
    dotenv().ok();
    ReportConfig::from_lookup(|key| env::var(key).ok())
  }

  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let database_url = get("PG_DATABASE_URL").ok_or(ConfigError::Missing("PG_DATABASE_URL"))?;
    let secondary_database_url = get("ZKRUSH_DATABASE_URL");

    let statement_timeout_secs: u64 = parse_or(&get, "PG_STATEMENT_TIMEOUT_SECS", 30)?;
    let pool = PoolSettings {
      max_size: parse_or(&get, "PG_POOL_MAX_SIZE", 20)?,
      connection_timeout: Duration::from_secs(parse_or(&get, "PG_CONNECTION_TIMEOUT_SECS", 30)?),
      statement_timeout: if statement_timeout_secs == 0 {
        None
      } else {
        Some(Duration::from_secs(statement_timeout_secs))
      },
    };
    if pool.max_size == 0 {
      return Err(ConfigError::Invalid {
        key: "PG_POOL_MAX_SIZE",
        value: "0".to_string(),
      });
    }

    let active = parse_or(&get, "ACTIVE_THRESHOLD_SECS", DEFAULT_ACTIVE_THRESHOLD_SECS)?;
    let inactive = parse_or(&get, "INACTIVE_THRESHOLD_SECS", DEFAULT_INACTIVE_THRESHOLD_SECS)?;
    let thresholds =
      StatusThresholds::new(active, inactive).ok_or(ConfigError::Thresholds { active, inactive })?;

    let offset_secs = parse_or(&get, "REPORT_UTC_OFFSET_SECS", DEFAULT_UTC_OFFSET_SECS)?;
    let display_offset = FixedOffset::east_opt(offset_secs).ok_or(ConfigError::Invalid {
      key: "REPORT_UTC_OFFSET_SECS",
      value: offset_secs.to_string(),
    })?;

    Ok(ReportConfig {
      database_url,
      secondary_database_url,
      pool,
      thresholds,
      display_offset,
      address: parse_or(&get, "REPORT_ADDRESS", IpAddr::from([0, 0, 0, 0]))?,
      port: parse_or(&get, "REPORT_PORT", DEFAULT_PORT)?,
    })
  }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
  T: FromStr,
  G: Fn(&str) -> Option<String>,
{
  match get(key) {
    None => Ok(default),
    Some(value) => value
      .trim()
      .parse::<T>()
      .map_err(|_| ConfigError::Invalid { key, value }),
  }
}
