pub mod accounts {
  use diesel::pg::PgConnection;
  use diesel::prelude::*;
  use diesel::result::Error;

  use super::super::models::{AccountIdentityPg, SubAccountPg};
  use super::super::schema::{miner_account, users};

  /// Looks up a sub-account by name together with its main account email.
  pub fn get_sub_account_by_name_pg(
    conn: &mut PgConnection,
    sub_account_name: &str,
  ) -> Result<Option<SubAccountPg>, Error> {
    miner_account::table
      .left_join(users::table)
      .filter(miner_account::name.eq(sub_account_name))
      .select((
        miner_account::id,
        miner_account::name,
        miner_account::main_user_id,
        users::email.nullable(),
      ))
      .first::<SubAccountPg>(conn)
      .optional()
  }

  pub fn get_account_identity_pg(
    conn: &mut PgConnection,
    sub_account_name: &str,
  ) -> Result<Option<AccountIdentityPg>, Error> {
    miner_account::table
      .inner_join(users::table)
      .filter(miner_account::name.eq(sub_account_name))
      .select((users::id, users::email, miner_account::id))
      .first::<AccountIdentityPg>(conn)
      .optional()
  }

  /// Names of every sub-account owned by the main account, oldest id first.
  pub fn select_sub_account_names_pg(
    conn: &mut PgConnection,
    main_account_name: &str,
  ) -> Result<Vec<String>, Error> {
    miner_account::table
      .inner_join(users::table)
      .filter(users::email.eq(main_account_name))
      .order(miner_account::id.asc())
      .select(miner_account::name)
      .load::<String>(conn)
  }

  pub fn main_account_exists_pg(
    conn: &mut PgConnection,
    main_account_name: &str,
  ) -> Result<bool, Error> {
    diesel::select(diesel::dsl::exists(
      users::table.filter(users::email.eq(main_account_name)),
    ))
    .get_result::<bool>(conn)
  }
}

pub mod machines {
  use diesel::pg::PgConnection;
  use diesel::prelude::*;
  use diesel::result::Error;
  use diesel::sql_query;
  use diesel::sql_types::{BigInt, Text};

  use super::super::models::{MachinePg, MachineStatusCountsPg};
  use super::super::schema::{machine, miner_account};

  // $2 is the active cutoff (now - active threshold), $3 the inactive cutoff.
  // `m.id IS NOT NULL` keeps the outer join's null row out of the invalid bucket.
  const STATUS_COUNTS_SQL: &str = "
    SELECT
      COUNT(m.id) AS total_machines,
      COALESCE(SUM(CASE WHEN m.last_commit_solution >= $2 THEN 1 ELSE 0 END), 0) AS active_machines,
      COALESCE(SUM(CASE WHEN m.last_commit_solution < $2
        AND m.last_commit_solution >= $3 THEN 1 ELSE 0 END), 0) AS inactive_machines,
      COALESCE(SUM(CASE WHEN m.last_commit_solution < $3 THEN 1 ELSE 0 END), 0) AS failed_machines,
      COALESCE(SUM(CASE WHEN m.id IS NOT NULL
        AND m.last_commit_solution IS NULL THEN 1 ELSE 0 END), 0) AS invalid_machines
    FROM miner_account ma
    LEFT JOIN machine m ON m.miner_account_id = ma.id
    WHERE ma.name = $1";

  /// Buckets the sub-account's machines by heartbeat age in a single query.
  pub fn count_machines_by_status_pg(
    conn: &mut PgConnection,
    sub_account_name: &str,
    active_cutoff: i64,
    inactive_cutoff: i64,
  ) -> Result<MachineStatusCountsPg, Error> {
    sql_query(STATUS_COUNTS_SQL)
      .bind::<Text, _>(sub_account_name)
      .bind::<BigInt, _>(active_cutoff)
      .bind::<BigInt, _>(inactive_cutoff)
      .get_result::<MachineStatusCountsPg>(conn)
  }

  pub fn select_machines_by_sub_account_pg(
    conn: &mut PgConnection,
    sub_account_name: &str,
  ) -> Result<Vec<MachinePg>, Error> {
    machine::table
      .inner_join(miner_account::table)
      .filter(miner_account::name.eq(sub_account_name))
      .order(machine::id.asc())
      .select((
        machine::id,
        machine::created_at,
        machine::name,
        machine::project,
        machine::last_commit_solution,
      ))
      .load::<MachinePg>(conn)
  }
}

pub mod rewards {
  use diesel::dsl::sum;
  use diesel::pg::PgConnection;
  use diesel::prelude::*;
  use diesel::result::Error;
  use rust_decimal::Decimal;

  use super::super::models::RewardPg;
  use super::super::schema::{distributor, miner_account};

  pub const VERIFIED_STATUS: &str = "verified";

  /// Sum of verified rewards; zero when there are none.
  pub fn sum_verified_rewards_pg(
    conn: &mut PgConnection,
    sub_account_name: &str,
  ) -> Result<Decimal, Error> {
    let total = distributor::table
      .inner_join(miner_account::table)
      .filter(miner_account::name.eq(sub_account_name))
      .filter(distributor::status.eq(VERIFIED_STATUS))
      .select(sum(distributor::reward))
      .get_result::<Option<Decimal>>(conn)?;
    Ok(total.unwrap_or(Decimal::ZERO))
  }

  /// Reward history, newest first.
  pub fn select_rewards_by_sub_account_pg(
    conn: &mut PgConnection,
    sub_account_name: &str,
  ) -> Result<Vec<RewardPg>, Error> {
    distributor::table
      .inner_join(miner_account::table)
      .filter(miner_account::name.eq(sub_account_name))
      .order((distributor::created_at.desc(), distributor::id.asc()))
      .select((
        distributor::id,
        distributor::created_at,
        distributor::reward,
        distributor::pay_status,
      ))
      .load::<RewardPg>(conn)
  }
}
