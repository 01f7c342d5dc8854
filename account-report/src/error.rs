use diesel::r2d2::PoolError;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AccountKind {
  Main,
  Sub,
}

impl fmt::Display for AccountKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      AccountKind::Main => write!(f, "main account"),
      AccountKind::Sub => write!(f, "sub-account"),
    }
  }
}

/// Failures that end a report (or one sub-account of a walk).
///
/// An account without machines or rewards is not an error, neither is a
/// detail row that fails validation. Those are absorbed where they occur.
#[derive(Debug, Error)]
pub enum ReportError {
  #[error("{kind} `{name}` not found")]
  NotFound { kind: AccountKind, name: String },
  #[error("could not resolve account ids for sub-account `{0}`")]
  Resolution(String),
  #[error("invalid input: {0}")]
  InvalidInput(String),
  #[error("database error: {0}")]
  Store(#[from] diesel::result::Error),
  #[error("connection pool error: {0}")]
  Pool(#[from] PoolError),
  #[error("report worker failed: {0}")]
  Task(String),
}

impl ReportError {
  pub fn sub_account_not_found(name: &str) -> Self {
    ReportError::NotFound {
      kind: AccountKind::Sub,
      name: name.to_string(),
    }
  }

  pub fn main_account_not_found(name: &str) -> Self {
    ReportError::NotFound {
      kind: AccountKind::Main,
      name: name.to_string(),
    }
  }

  /// HTTP status code used in the response envelope.
  pub fn status_code(&self) -> u16 {
    match self {
      ReportError::InvalidInput(_) => 400,
      ReportError::NotFound { .. } => 404,
      ReportError::Resolution(_) => 422,
      ReportError::Pool(_) => 503,
      ReportError::Store(_) | ReportError::Task(_) => 500,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_messages_and_codes() {
    let err = ReportError::sub_account_not_found("alice");
    assert_eq!(err.to_string(), "sub-account `alice` not found");
    assert_eq!(err.status_code(), 404);

    let err = ReportError::main_account_not_found("m@x.com");
    assert_eq!(err.to_string(), "main account `m@x.com` not found");

    assert_eq!(ReportError::Resolution("bob".into()).status_code(), 422);
    assert_eq!(ReportError::InvalidInput("empty".into()).status_code(), 400);
    assert_eq!(ReportError::from(diesel::result::Error::NotFound).status_code(), 500);
  }
}
