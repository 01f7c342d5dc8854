use diesel::r2d2::PoolError;
use diesel::result::Error;
use log::info;
use rust_decimal::Decimal;
use shared::db_pg::{
  helpers::{accounts, machines, rewards},
  init_lazy_postgres_pool, init_postgres_pool,
  models::{AccountIdentityPg, MachinePg, MachineStatusCountsPg, RewardPg, SubAccountPg},
  PgPool, PgPooledConnection,
};

use crate::classifier::Snapshot;
use crate::config::ReportConfig;

/// Read-only access to the account, machine and reward records.
///
/// All lookups are keyed by name. Unknown names yield `None`, empty
/// collections or zero, never an error.
pub trait AccountStore {
  fn find_sub_account(&mut self, sub_account_name: &str) -> Result<Option<SubAccountPg>, Error>;

  fn resolve_identity(&mut self, sub_account_name: &str) -> Result<Option<AccountIdentityPg>, Error>;

  /// Machine counts bucketed against the snapshot's `now` and thresholds.
  fn count_machines_by_status(
    &mut self,
    sub_account_name: &str,
    snapshot: &Snapshot,
  ) -> Result<MachineStatusCountsPg, Error>;

  fn machines(&mut self, sub_account_name: &str) -> Result<Vec<MachinePg>, Error>;

  fn verified_reward_total(&mut self, sub_account_name: &str) -> Result<Decimal, Error>;

  /// Newest first.
  fn reward_history(&mut self, sub_account_name: &str) -> Result<Vec<RewardPg>, Error>;

  fn main_account_exists(&mut self, main_account_name: &str) -> Result<bool, Error>;

  /// Ordered by sub-account id.
  fn sub_account_names(&mut self, main_account_name: &str) -> Result<Vec<String>, Error>;
}

/// Store backed by one pooled Postgres connection. The connection goes
/// back to the pool when the store is dropped.
pub struct PgStore {
  conn: PgPooledConnection,
}

impl PgStore {
  pub fn checkout(pool: &PgPool) -> Result<Self, PoolError> {
    pool.get().map(PgStore::from)
  }
}

impl From<PgPooledConnection> for PgStore {
  fn from(conn: PgPooledConnection) -> Self {
    PgStore { conn }
  }
}

impl AccountStore for PgStore {
  fn find_sub_account(&mut self, sub_account_name: &str) -> Result<Option<SubAccountPg>, Error> {
    accounts::get_sub_account_by_name_pg(&mut self.conn, sub_account_name)
  }

  fn resolve_identity(&mut self, sub_account_name: &str) -> Result<Option<AccountIdentityPg>, Error> {
    accounts::get_account_identity_pg(&mut self.conn, sub_account_name)
  }

  fn count_machines_by_status(
    &mut self,
    sub_account_name: &str,
    snapshot: &Snapshot,
  ) -> Result<MachineStatusCountsPg, Error> {
    let now = snapshot.now_secs();
    machines::count_machines_by_status_pg(
      &mut self.conn,
      sub_account_name,
      snapshot.thresholds.active_cutoff(now),
      snapshot.thresholds.inactive_cutoff(now),
    )
  }

  fn machines(&mut self, sub_account_name: &str) -> Result<Vec<MachinePg>, Error> {
    machines::select_machines_by_sub_account_pg(&mut self.conn, sub_account_name)
  }

  fn verified_reward_total(&mut self, sub_account_name: &str) -> Result<Decimal, Error> {
    rewards::sum_verified_rewards_pg(&mut self.conn, sub_account_name)
  }

  fn reward_history(&mut self, sub_account_name: &str) -> Result<Vec<RewardPg>, Error> {
    rewards::select_rewards_by_sub_account_pg(&mut self.conn, sub_account_name)
  }

  fn main_account_exists(&mut self, main_account_name: &str) -> Result<bool, Error> {
    accounts::main_account_exists_pg(&mut self.conn, main_account_name)
  }

  fn sub_account_names(&mut self, main_account_name: &str) -> Result<Vec<String>, Error> {
    accounts::select_sub_account_names_pg(&mut self.conn, main_account_name)
  }
}

/// Connection pools held for the lifetime of the service.
#[derive(Clone)]
pub struct Databases {
  pub primary: PgPool,
  /// Reserved for ledger cross-checks; nothing reads from it yet.
  pub secondary: Option<PgPool>,
}

impl Databases {
  pub fn connect(config: &ReportConfig) -> Result<Self, PoolError> {
    let primary = init_postgres_pool(&config.database_url, &config.pool)?;
    let secondary = config.secondary_database_url.as_ref().map(|url| {
      info!("secondary store configured, connecting lazily");
      init_lazy_postgres_pool(url, &config.pool)
    });
    Ok(Databases { primary, secondary })
  }
}
