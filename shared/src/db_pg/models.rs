use chrono::{DateTime, Utc};
use diesel::sql_types::BigInt;
use rust_decimal::Decimal;

/// Sub-account row joined (outer) with the owning main account.
#[derive(Debug, Clone, PartialEq, Queryable)]
pub struct SubAccountPg {
  pub id: i32,
  pub name: String,
  pub main_user_id: i32,
  pub main_account_name: Option<String>,
}

/// Identifiers shown in a report header. Only exists when the
/// sub-account joins to a main account.
#[derive(Debug, Clone, PartialEq, Queryable)]
pub struct AccountIdentityPg {
  pub main_account_id: i32,
  pub main_account_name: String,
  pub sub_account_id: i32,
}

/// Machine row as read from the database. Everything but the id is
/// nullable here and validated by the caller.
#[derive(Debug, Clone, PartialEq, Queryable)]
pub struct MachinePg {
  pub id: i32,
  pub created_at: Option<DateTime<Utc>>,
  pub name: Option<String>,
  pub project: Option<String>,
  pub last_commit_solution: Option<i64>,
}

/// Reward ledger row (`distributor` table).
#[derive(Debug, Clone, PartialEq, Queryable)]
pub struct RewardPg {
  pub id: i32,
  pub created_at: Option<DateTime<Utc>>,
  pub reward: Option<Decimal>,
  pub pay_status: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, QueryableByName)]
pub struct MachineStatusCountsPg {
  #[diesel(sql_type = BigInt)]
  pub total_machines: i64,
  #[diesel(sql_type = BigInt)]
  pub active_machines: i64,
  #[diesel(sql_type = BigInt)]
  pub inactive_machines: i64,
  #[diesel(sql_type = BigInt)]
  pub failed_machines: i64,
  #[diesel(sql_type = BigInt)]
  pub invalid_machines: i64,
}
