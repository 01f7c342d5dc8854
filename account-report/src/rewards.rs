use chrono::{DateTime, Utc};
use log::warn;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::db_pg::models::RewardPg;
use std::convert::TryFrom;

use crate::error::ReportError;
use crate::store::AccountStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardEntry {
  pub created_at: DateTime<Utc>,
  pub reward: Decimal,
  pub pay_status: String,
}

impl TryFrom<RewardPg> for RewardEntry {
  type Error = String;

  fn try_from(row: RewardPg) -> Result<Self, Self::Error> {
    match (row.created_at, row.reward, row.pay_status) {
      (Some(created_at), Some(reward), Some(pay_status)) => Ok(RewardEntry {
        created_at,
        reward,
        pay_status,
      }),
      (None, _, _) => Err(format!("reward {} has no created_at", row.id)),
      (_, None, _) => Err(format!("reward {} has no amount", row.id)),
      (_, _, None) => Err(format!("reward {} has no pay_status", row.id)),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RewardSummary {
  /// Sum of rewards whose ledger status is `verified`.
  pub total_verified: Decimal,
  /// Newest first.
  pub history: Vec<RewardEntry>,
}

pub fn summarize<S: AccountStore + ?Sized>(
  store: &mut S,
  sub_account_name: &str,
) -> Result<RewardSummary, ReportError> {
  let total_verified = store.verified_reward_total(sub_account_name)?;

  let mut history: Vec<RewardEntry> = store
    .reward_history(sub_account_name)?
    .into_iter()
    .filter_map(|row| match RewardEntry::try_from(row) {
      Ok(entry) => Some(entry),
      Err(reason) => {
        warn!("skipping reward row for {}: {}", sub_account_name, reason);
        None
      }
    })
    .collect();
  // stable, keeps the store's order for equal timestamps
  history.sort_by(|a, b| b.created_at.cmp(&a.created_at));

  Ok(RewardSummary {
    total_verified,
    history,
  })
}
