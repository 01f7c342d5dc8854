use chrono::{DateTime, TimeZone, Utc};

/// Converts a unix timestamp (seconds) into a UTC instant.
/// Returns `None` for values chrono cannot represent.
pub fn epoch_to_utc(secs: i64) -> Option<DateTime<Utc>> {
  Utc.timestamp_opt(secs, 0).single()
}
