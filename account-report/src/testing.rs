//! In-memory `AccountStore` for unit tests.

use chrono::{DateTime, TimeZone, Utc};
use diesel::result::Error;
use rust_decimal::Decimal;
use shared::db_pg::models::{AccountIdentityPg, MachinePg, MachineStatusCountsPg, RewardPg, SubAccountPg};
use shared::enums::MachineStatus;
use std::str::FromStr;

use crate::classifier::Snapshot;
use crate::store::AccountStore;

pub const NOW: i64 = 1_700_000_000;

pub fn at(secs: i64) -> DateTime<Utc> {
  Utc.timestamp_opt(secs, 0).unwrap()
}

struct LedgerRow {
  account_id: i32,
  row: RewardPg,
  status: Option<String>,
}

#[derive(Default)]
pub struct MemoryStore {
  users: Vec<(i32, String)>,
  accounts: Vec<(i32, String, i32)>,
  machines: Vec<(i32, MachinePg)>,
  ledger: Vec<LedgerRow>,
  broken_ledgers: Vec<String>,
  /// Every `now` the store was asked to count against.
  pub seen_now: Vec<i64>,
}

impl MemoryStore {
  pub fn new() -> Self {
    MemoryStore::default()
  }

  pub fn user(mut self, id: i32, email: &str) -> Self {
    self.users.push((id, email.to_string()));
    self
  }

  pub fn sub_account(mut self, id: i32, name: &str, main_user_id: i32) -> Self {
    self.accounts.push((id, name.to_string(), main_user_id));
    self
  }

  pub fn machine(self, account_id: i32, heartbeat: Option<i64>) -> Self {
    let id = self.machines.len() as i32 + 1;
    self.machine_row(
      account_id,
      MachinePg {
        id,
        created_at: Some(at(NOW - 30 * 86400)),
        name: Some(format!("rig-{}", id)),
        project: Some("aleo".to_string()),
        last_commit_solution: heartbeat,
      },
    )
  }

  pub fn machine_row(mut self, account_id: i32, row: MachinePg) -> Self {
    self.machines.push((account_id, row));
    self
  }

  pub fn reward(self, account_id: i32, created_at: i64, amount: &str, status: &str) -> Self {
    let id = self.ledger.len() as i32 + 1;
    self.reward_row(
      account_id,
      RewardPg {
        id,
        created_at: Some(at(created_at)),
        reward: Decimal::from_str(amount).ok(),
        pay_status: Some(format!("{}-paid", status)),
      },
      Some(status),
    )
  }

  pub fn reward_row(mut self, account_id: i32, row: RewardPg, status: Option<&str>) -> Self {
    self.ledger.push(LedgerRow {
      account_id,
      row,
      status: status.map(str::to_string),
    });
    self
  }

  /// Reward queries for this sub-account fail with a database error.
  pub fn broken_ledger(mut self, sub_account_name: &str) -> Self {
    self.broken_ledgers.push(sub_account_name.to_string());
    self
  }

  fn account_id(&self, name: &str) -> Option<i32> {
    self.accounts.iter().find(|(_, n, _)| n == name).map(|(id, _, _)| *id)
  }

  fn email(&self, user_id: i32) -> Option<String> {
    self.users.iter().find(|(id, _)| *id == user_id).map(|(_, e)| e.clone())
  }

  fn check_ledger(&self, name: &str) -> Result<(), Error> {
    if self.broken_ledgers.iter().any(|n| n == name) {
      Err(Error::QueryBuilderError("ledger unavailable".into()))
    } else {
      Ok(())
    }
  }

  fn ledger_rows(&self, name: &str) -> impl Iterator<Item = &LedgerRow> {
    let id = self.account_id(name);
    self.ledger.iter().filter(move |l| Some(l.account_id) == id)
  }
}

impl AccountStore for MemoryStore {
  fn find_sub_account(&mut self, name: &str) -> Result<Option<SubAccountPg>, Error> {
    Ok(
      self
        .accounts
        .iter()
        .find(|(_, n, _)| n == name)
        .map(|(id, n, main)| SubAccountPg {
          id: *id,
          name: n.clone(),
          main_user_id: *main,
          main_account_name: self.email(*main),
        }),
    )
  }

  fn resolve_identity(&mut self, name: &str) -> Result<Option<AccountIdentityPg>, Error> {
    Ok(self.find_sub_account(name)?.and_then(|sub| {
      let SubAccountPg {
        id,
        main_user_id,
        main_account_name,
        ..
      } = sub;
      main_account_name.map(|email| AccountIdentityPg {
        main_account_id: main_user_id,
        main_account_name: email,
        sub_account_id: id,
      })
    }))
  }

  fn count_machines_by_status(
    &mut self,
    name: &str,
    snapshot: &Snapshot,
  ) -> Result<MachineStatusCountsPg, Error> {
    self.seen_now.push(snapshot.now_secs());
    let id = self.account_id(name);
    let mut counts = MachineStatusCountsPg::default();
    for (_, m) in self.machines.iter().filter(|(a, _)| Some(*a) == id) {
      counts.total_machines += 1;
      match snapshot.classify(m.last_commit_solution).status {
        MachineStatus::Active => counts.active_machines += 1,
        MachineStatus::Inactive => counts.inactive_machines += 1,
        MachineStatus::Failed => counts.failed_machines += 1,
        MachineStatus::Invalid => counts.invalid_machines += 1,
      }
    }
    Ok(counts)
  }

  fn machines(&mut self, name: &str) -> Result<Vec<MachinePg>, Error> {
    let id = self.account_id(name);
    Ok(
      self
        .machines
        .iter()
        .filter(|(a, _)| Some(*a) == id)
        .map(|(_, m)| m.clone())
        .collect(),
    )
  }

  fn verified_reward_total(&mut self, name: &str) -> Result<Decimal, Error> {
    self.check_ledger(name)?;
    Ok(
      self
        .ledger_rows(name)
        .filter(|l| l.status.as_deref() == Some("verified"))
        .filter_map(|l| l.row.reward)
        .sum(),
    )
  }

  fn reward_history(&mut self, name: &str) -> Result<Vec<RewardPg>, Error> {
    self.check_ledger(name)?;
    // insertion order, unsorted
    Ok(self.ledger_rows(name).map(|l| l.row.clone()).collect())
  }

  fn main_account_exists(&mut self, email: &str) -> Result<bool, Error> {
    Ok(self.users.iter().any(|(_, e)| e == email))
  }

  fn sub_account_names(&mut self, email: &str) -> Result<Vec<String>, Error> {
    let user = self.users.iter().find(|(_, e)| e == email).map(|(id, _)| *id);
    let mut owned: Vec<&(i32, String, i32)> = self
      .accounts
      .iter()
      .filter(|(_, _, main)| Some(*main) == user)
      .collect();
    owned.sort_by_key(|(id, _, _)| *id);
    Ok(owned.into_iter().map(|(_, n, _)| n.clone()).collect())
  }
}
