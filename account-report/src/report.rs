use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;

use crate::classifier::Snapshot;
use crate::error::ReportError;
use crate::machines::{list_details, MachineDetail};
use crate::overview::{aggregate, Overview};
use crate::rewards::{summarize, RewardSummary};
use crate::store::AccountStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountRef {
  pub id: i32,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubAccountReport {
  pub sub_account: AccountRef,
  pub main_account: AccountRef,
  pub generated_at: DateTime<Utc>,
  pub overview: Overview,
  pub rewards: RewardSummary,
  /// Present only when details were requested.
  pub machines: Option<Vec<MachineDetail>>,
}

/// Builds the report of one sub-account.
pub fn compose<S: AccountStore + ?Sized>(
  store: &mut S,
  sub_account_name: &str,
  snapshot: &Snapshot,
  include_details: bool,
) -> Result<SubAccountReport, ReportError> {
  let mut overview = aggregate(store, sub_account_name, snapshot)?;

  let identity = store
    .resolve_identity(sub_account_name)?
    .ok_or_else(|| ReportError::Resolution(sub_account_name.to_string()))?;
  overview.main_account_name = Some(identity.main_account_name.clone());

  let rewards = summarize(store, sub_account_name)?;

  let machines = if include_details {
    Some(list_details(store, sub_account_name, snapshot)?)
  } else {
    None
  };

  debug!(
    "composed report for {} ({} rewards, details: {})",
    sub_account_name,
    rewards.history.len(),
    include_details
  );

  Ok(SubAccountReport {
    sub_account: AccountRef {
      id: identity.sub_account_id,
      name: sub_account_name.to_string(),
    },
    main_account: AccountRef {
      id: identity.main_account_id,
      name: identity.main_account_name,
    },
    generated_at: snapshot.now,
    overview,
    rewards,
    machines,
  })
}
