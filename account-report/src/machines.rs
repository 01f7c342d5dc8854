use chrono::{DateTime, Utc};
use log::warn;
use serde::Serialize;
use shared::db_pg::models::MachinePg;
use shared::enums::MachineStatus;

use crate::classifier::Snapshot;
use crate::error::ReportError;
use crate::store::AccountStore;

/// One machine of a sub-account, classified at the snapshot instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineDetail {
  pub created_at: DateTime<Utc>,
  pub name: String,
  pub project: String,
  pub last_commit_solution: Option<i64>,
  pub heartbeat_at: Option<DateTime<Utc>>,
  pub age_secs: Option<i64>,
  pub status: MachineStatus,
}

impl MachineDetail {
  fn from_row(row: MachinePg, snapshot: &Snapshot) -> Result<Self, String> {
    let id = row.id;
    let created_at = row
      .created_at
      .ok_or_else(|| format!("machine {} has no created_at", id))?;
    let name = row.name.ok_or_else(|| format!("machine {} has no name", id))?;
    let project = row
      .project
      .ok_or_else(|| format!("machine {} has no project", id))?;
    let classification = snapshot.classify(row.last_commit_solution);
    Ok(MachineDetail {
      created_at,
      name,
      project,
      last_commit_solution: row.last_commit_solution,
      heartbeat_at: classification.heartbeat_at,
      age_secs: classification.age_secs,
      status: classification.status,
    })
  }
}

/// Lists the sub-account's machines with their status. Rows that cannot be
/// read are logged and left out.
pub fn list_details<S: AccountStore + ?Sized>(
  store: &mut S,
  sub_account_name: &str,
  snapshot: &Snapshot,
) -> Result<Vec<MachineDetail>, ReportError> {
  let rows = store.machines(sub_account_name)?;
  let details = rows
    .into_iter()
    .filter_map(|row| match MachineDetail::from_row(row, snapshot) {
      Ok(detail) => Some(detail),
      Err(reason) => {
        warn!("skipping machine row for {}: {}", sub_account_name, reason);
        None
      }
    })
    .collect();
  Ok(details)
}
