use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;

use crate::classifier::Snapshot;
use crate::error::ReportError;
use crate::report::{compose, SubAccountReport};
use crate::store::AccountStore;

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubAccountOutcome {
  Reported(SubAccountReport),
  Failed {
    sub_account_name: String,
    error: String,
  },
}

#[derive(Debug, Serialize)]
pub struct MainAccountReport {
  pub main_account_name: String,
  pub generated_at: DateTime<Utc>,
  /// In sub-account id order.
  pub sub_accounts: Vec<SubAccountOutcome>,
}

impl MainAccountReport {
  pub fn reports(&self) -> impl Iterator<Item = &SubAccountReport> {
    self.sub_accounts.iter().filter_map(|o| match o {
      SubAccountOutcome::Reported(report) => Some(report),
      SubAccountOutcome::Failed { .. } => None,
    })
  }

  pub fn failure_count(&self) -> usize {
    self.sub_accounts.len() - self.reports().count()
  }
}

/// Reports every sub-account of a main account against one snapshot.
///
/// A sub-account whose report fails is recorded as `Failed` and the walk
/// goes on. The walk itself fails when the sub-accounts cannot be listed
/// or the main account does not exist.
pub fn walk_main_account<S: AccountStore + ?Sized>(
  store: &mut S,
  main_account_name: &str,
  snapshot: &Snapshot,
  include_details: bool,
) -> Result<MainAccountReport, ReportError> {
  let names = store.sub_account_names(main_account_name)?;
  if names.is_empty() && !store.main_account_exists(main_account_name)? {
    return Err(ReportError::main_account_not_found(main_account_name));
  }

  let mut sub_accounts = Vec::with_capacity(names.len());
  for name in names {
    match compose(store, &name, snapshot, include_details) {
      Ok(report) => sub_accounts.push(SubAccountOutcome::Reported(report)),
      Err(e) => {
        warn!("report for sub-account {} of {} failed: {}", name, main_account_name, e);
        sub_accounts.push(SubAccountOutcome::Failed {
          sub_account_name: name,
          error: e.to_string(),
        });
      }
    }
  }

  let report = MainAccountReport {
    main_account_name: main_account_name.to_string(),
    generated_at: snapshot.now,
    sub_accounts,
  };
  info!(
    "walked {} sub-accounts of {}, {} failed",
    report.sub_accounts.len(),
    main_account_name,
    report.failure_count()
  );
  Ok(report)
}
