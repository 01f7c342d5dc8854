use serde::Serialize;

/// Operational status of a machine, derived from the age of its last
/// committed solution. Never stored.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineStatus {
  Active,
  Inactive,
  Failed,
  Invalid,
}

impl MachineStatus {
  /// Label shown in the machine table.
  pub fn label(&self) -> &'static str {
    match self {
      MachineStatus::Active => "Active (活跃)",
      MachineStatus::Inactive => "Inactive (不活跃)",
      MachineStatus::Failed => "Failed (失效)",
      MachineStatus::Invalid => "Invalid (无效)",
    }
  }
}
