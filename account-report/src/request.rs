use std::fmt;

use crate::error::ReportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
  MainAccount,
  SubAccount,
}

impl fmt::Display for Scope {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Scope::MainAccount => write!(f, "Main account"),
      Scope::SubAccount => write!(f, "Sub-account"),
    }
  }
}

/// A validated report request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
  pub scope: Scope,
  pub account_name: String,
  pub show_details: bool,
}

impl ReportRequest {
  /// Builds a request from raw form values. The name must be non-blank;
  /// details are shown only for the literal value `"true"`.
  pub fn parse(
    scope: Scope,
    account_name: Option<&str>,
    show_details: Option<&str>,
  ) -> Result<Self, ReportError> {
    let account_name = account_name.map(str::trim).unwrap_or_default();
    if account_name.is_empty() {
      return Err(ReportError::InvalidInput(match scope {
        Scope::MainAccount => "Invalid main account".to_string(),
        Scope::SubAccount => "Invalid sub-account".to_string(),
      }));
    }
    Ok(ReportRequest {
      scope,
      account_name: account_name.to_string(),
      show_details: show_details == Some("true"),
    })
  }

  pub fn processed_message(&self) -> String {
    format!("{} {} processed", self.scope, self.account_name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse() {
    let req = ReportRequest::parse(Scope::SubAccount, Some(" alice "), Some("true")).unwrap();
    assert_eq!(req.account_name, "alice");
    assert!(req.show_details);
    assert_eq!(req.processed_message(), "Sub-account alice processed");

    let req = ReportRequest::parse(Scope::MainAccount, Some("m@x.com"), Some("TRUE")).unwrap();
    assert!(!req.show_details);
    assert_eq!(req.processed_message(), "Main account m@x.com processed");

    let req = ReportRequest::parse(Scope::MainAccount, Some("m@x.com"), None).unwrap();
    assert!(!req.show_details);
  }

  #[test]
  fn test_blank_names_are_rejected() {
    for name in [None, Some(""), Some("   ")].iter() {
      let err = ReportRequest::parse(Scope::MainAccount, *name, Some("true")).unwrap_err();
      assert_eq!(err.to_string(), "invalid input: Invalid main account");
    }
    let err = ReportRequest::parse(Scope::SubAccount, Some(""), None).unwrap_err();
    assert_eq!(err.status_code(), 400);
  }
}
