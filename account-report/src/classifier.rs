use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use shared::enums::MachineStatus;
use shared::util::epoch_to_utc;

pub const DEFAULT_ACTIVE_THRESHOLD_SECS: i64 = 600; // 10 minutes
pub const DEFAULT_INACTIVE_THRESHOLD_SECS: i64 = 86400; // 24 hours

/// Heartbeat age limits. A machine is active up to and including
/// `active_secs`, inactive up to and including `inactive_secs`, failed after.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct StatusThresholds {
  pub active_secs: i64,
  pub inactive_secs: i64,
}

impl Default for StatusThresholds {
  fn default() -> Self {
    StatusThresholds {
      active_secs: DEFAULT_ACTIVE_THRESHOLD_SECS,
      inactive_secs: DEFAULT_INACTIVE_THRESHOLD_SECS,
    }
  }
}

impl StatusThresholds {
  pub fn new(active_secs: i64, inactive_secs: i64) -> Option<Self> {
    if active_secs > 0 && active_secs < inactive_secs {
      Some(StatusThresholds {
        active_secs,
        inactive_secs,
      })
    } else {
      None
    }
  }

  pub fn status_for_age(&self, age_secs: i64) -> MachineStatus {
    if age_secs <= self.active_secs {
      MachineStatus::Active
    } else if age_secs <= self.inactive_secs {
      MachineStatus::Inactive
    } else {
      MachineStatus::Failed
    }
  }

  /// Heartbeats at or after this epoch second count as active.
  pub fn active_cutoff(&self, now_secs: i64) -> i64 {
    now_secs - self.active_secs
  }

  /// Heartbeats before this epoch second count as failed.
  pub fn inactive_cutoff(&self, now_secs: i64) -> i64 {
    now_secs - self.inactive_secs
  }
}

/// The instant and thresholds every classification of one request is made
/// against. Captured once per request, whole seconds only, so that the SQL
/// buckets and the per-machine rows agree.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Snapshot {
  pub now: DateTime<Utc>,
  pub thresholds: StatusThresholds,
}

impl Snapshot {
  pub fn capture(thresholds: StatusThresholds) -> Self {
    Snapshot {
      now: Utc::now().trunc_subsecs(0),
      thresholds,
    }
  }

  /// Snapshot at a fixed epoch second; `None` if chrono cannot represent it.
  pub fn at(now_secs: i64, thresholds: StatusThresholds) -> Option<Self> {
    epoch_to_utc(now_secs).map(|now| Snapshot { now, thresholds })
  }

  pub fn now_secs(&self) -> i64 {
    self.now.timestamp()
  }

  pub fn classify(&self, heartbeat: Option<i64>) -> Classification {
    classify(heartbeat, self.now, &self.thresholds)
  }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Classification {
  /// Heartbeat as an instant; `None` when absent or out of range.
  pub heartbeat_at: Option<DateTime<Utc>>,
  /// Seconds since the heartbeat; `None` when the machine never reported.
  pub age_secs: Option<i64>,
  pub status: MachineStatus,
}

pub fn classify(
  heartbeat: Option<i64>,
  now: DateTime<Utc>,
  thresholds: &StatusThresholds,
) -> Classification {
  match heartbeat {
    None => Classification {
      heartbeat_at: None,
      age_secs: None,
      status: MachineStatus::Invalid,
    },
    Some(secs) => {
      let age_secs = now.timestamp().saturating_sub(secs);
      Classification {
        heartbeat_at: epoch_to_utc(secs),
        age_secs: Some(age_secs),
        status: thresholds.status_for_age(age_secs),
      }
    }
  }
}
