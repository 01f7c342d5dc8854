use log::{debug, warn};
use serde::Serialize;
use shared::db_pg::models::MachineStatusCountsPg;

use crate::classifier::Snapshot;
use crate::error::ReportError;
use crate::store::AccountStore;

/// Machine counts of one sub-account at the snapshot instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Overview {
  pub main_account_name: Option<String>,
  pub total_machines: i64,
  pub active_machines: i64,
  pub inactive_machines: i64,
  pub failed_machines: i64,
  pub invalid_machines: i64,
}

impl Overview {
  fn from_counts(main_account_name: Option<String>, counts: MachineStatusCountsPg) -> Self {
    if counts.total_machines == 0 {
      return Overview {
        main_account_name,
        ..Overview::default()
      };
    }
    Overview {
      main_account_name,
      total_machines: counts.total_machines,
      active_machines: counts.active_machines,
      inactive_machines: counts.inactive_machines,
      failed_machines: counts.failed_machines,
      invalid_machines: counts.invalid_machines,
    }
  }

  pub fn classified(&self) -> i64 {
    self.active_machines + self.inactive_machines + self.failed_machines + self.invalid_machines
  }
}

/// Counts the sub-account's machines by status.
///
/// Fails with `NotFound` only when the sub-account itself is unknown. A
/// sub-account without machines, or without an owning main account, gets
/// all-zero counts.
pub fn aggregate<S: AccountStore + ?Sized>(
  store: &mut S,
  sub_account_name: &str,
  snapshot: &Snapshot,
) -> Result<Overview, ReportError> {
  let sub_account = store
    .find_sub_account(sub_account_name)?
    .ok_or_else(|| ReportError::sub_account_not_found(sub_account_name))?;

  let main_account_name = match sub_account.main_account_name {
    Some(name) => name,
    None => {
      warn!(
        "sub-account {} (id {}) has no main account {}, reporting zero machines",
        sub_account.name, sub_account.id, sub_account.main_user_id
      );
      return Ok(Overview::default());
    }
  };

  let counts = store.count_machines_by_status(sub_account_name, snapshot)?;
  let overview = Overview::from_counts(Some(main_account_name), counts);
  if overview.classified() != overview.total_machines {
    warn!(
      "machine buckets for {} do not add up: {} classified of {}",
      sub_account_name,
      overview.classified(),
      overview.total_machines
    );
  }
  debug!("overview for {}: {:?}", sub_account_name, overview);
  Ok(overview)
}
