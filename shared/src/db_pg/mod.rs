pub mod helpers;
pub mod models;
pub mod schema;

use diesel::{
  pg::PgConnection,
  r2d2::{self, ConnectionManager, CustomizeConnection, Pool, PoolError, PooledConnection},
  RunQueryDsl,
};
use log::debug;
use std::time::Duration;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;
pub type PgPooledConnection = PooledConnection<ConnectionManager<PgConnection>>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolSettings {
  pub max_size: u32,
  pub connection_timeout: Duration,
  /// Applied to every checked out connection; `None` leaves the server default.
  pub statement_timeout: Option<Duration>,
}

impl Default for PoolSettings {
  fn default() -> Self {
    PoolSettings {
      max_size: 20,
      connection_timeout: Duration::from_secs(30),
      statement_timeout: Some(Duration::from_secs(30)),
    }
  }
}

#[derive(Debug)]
struct StatementTimeout(Option<Duration>);

impl CustomizeConnection<PgConnection, r2d2::Error> for StatementTimeout {
  fn on_acquire(&self, conn: &mut PgConnection) -> Result<(), r2d2::Error> {
    if let Some(timeout) = self.0 {
      debug!("setting statement_timeout to {}ms", timeout.as_millis());
      diesel::sql_query(format!("SET statement_timeout = {}", timeout.as_millis()))
        .execute(conn)
        .map_err(r2d2::Error::QueryError)?;
    }
    Ok(())
  }
}

fn pool_builder(settings: &PoolSettings) -> r2d2::Builder<ConnectionManager<PgConnection>> {
  Pool::builder()
    .max_size(settings.max_size)
    .connection_timeout(settings.connection_timeout)
    .test_on_check_out(true)
    .connection_customizer(Box::new(StatementTimeout(settings.statement_timeout)))
}

/// Builds the pool and waits for its initial connections.
pub fn init_postgres_pool(database_url: &str, settings: &PoolSettings) -> Result<PgPool, PoolError> {
  let manager = ConnectionManager::<PgConnection>::new(database_url);
  pool_builder(settings).build(manager)
}

/// Builds the pool without opening any connection up front.
pub fn init_lazy_postgres_pool(database_url: &str, settings: &PoolSettings) -> PgPool {
  let manager = ConnectionManager::<PgConnection>::new(database_url);
  pool_builder(settings).build_unchecked(manager)
}
