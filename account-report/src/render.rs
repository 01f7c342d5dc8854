//! HTML fragments for the report pages.

use chrono::{DateTime, FixedOffset, Utc};

use crate::hierarchy::{MainAccountReport, SubAccountOutcome};
use crate::machines::MachineDetail;
use crate::report::SubAccountReport;
use crate::rewards::RewardSummary;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TABLE_OPEN: &str = r#"<table border="1" cellpadding="5" cellspacing="0">"#;

pub fn escape(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for c in text.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      _ => out.push(c),
    }
  }
  out
}

fn local_time(t: &DateTime<Utc>, offset: &FixedOffset) -> String {
  t.with_timezone(offset).format(TIME_FORMAT).to_string()
}

pub fn render_main_account(report: &MainAccountReport, offset: &FixedOffset) -> String {
  let mut html = String::new();
  for outcome in &report.sub_accounts {
    match outcome {
      SubAccountOutcome::Reported(sub) => html.push_str(&render_sub_account(sub, offset)),
      SubAccountOutcome::Failed {
        sub_account_name,
        error,
      } => html.push_str(&format!(
        r#"<p class="error">Error fetching report for {}: {}</p>"#,
        escape(sub_account_name),
        escape(error)
      )),
    }
  }
  html
}

pub fn render_sub_account(report: &SubAccountReport, offset: &FixedOffset) -> String {
  let overview = &report.overview;
  let mut html = format!(
    "<h2>子账户总览信息 - Sub-account Overview for {}({})</h2>",
    escape(&report.sub_account.name),
    report.sub_account.id
  );
  html.push_str(&format!(
    "<p>主账户名称 - Main Account: {}({})</p>",
    escape(&report.main_account.name),
    report.main_account.id
  ));
  let counts = [
    ("总机器数 - Total Machines", overview.total_machines),
    ("活跃机器数 - Active Machines", overview.active_machines),
    ("不活跃机器数 - Inactive Machines", overview.inactive_machines),
    ("失效机器数 - Failed Machines", overview.failed_machines),
    ("无效机器数 - Invalid Machines", overview.invalid_machines),
  ];
  for (label, count) in counts.iter() {
    html.push_str(&format!("<p>{}: {}</p>", label, count));
  }
  html.push_str(&render_rewards(&report.rewards, offset));
  if let Some(machines) = &report.machines {
    html.push_str(&render_machines(&report.sub_account.name, machines, offset));
  }
  html
}

fn render_rewards(rewards: &RewardSummary, offset: &FixedOffset) -> String {
  let mut html = String::from("<h3>收益明细 - Reward Records</h3>");
  html.push_str(&format!(
    "<p><strong>总收益 (已验证) - Total Verified Reward: {:.2}</strong></p>",
    rewards.total_verified
  ));
  html.push_str(TABLE_OPEN);
  html.push_str("<tr><th>日期 (Created At)</th><th>奖励 (Reward)</th><th>支付状态 (Pay Status)</th></tr>");
  for entry in &rewards.history {
    html.push_str(&format!(
      "<tr><td>{}</td><td>{:.2}</td><td>{}</td></tr>",
      local_time(&entry.created_at, offset),
      entry.reward,
      escape(&entry.pay_status)
    ));
  }
  html.push_str("</table>");
  html
}

fn render_machines(sub_account_name: &str, machines: &[MachineDetail], offset: &FixedOffset) -> String {
  let mut html = String::from("<h3>机器详细信息 - Machine Details</h3>");
  html.push_str(TABLE_OPEN);
  html.push_str(
    "<tr><th>子账户</th><th>创建时间</th><th>机器名称</th><th>项目</th>\
     <th>最近提交时间</th><th>时间差(秒)</th><th>状态</th></tr>",
  );
  let sub_account_name = escape(sub_account_name);
  for machine in machines {
    let (last_commit, age) = match (machine.heartbeat_at, machine.age_secs) {
      (Some(t), Some(age)) => (local_time(&t, offset), age.to_string()),
      (None, Some(age)) => ("无效".to_string(), age.to_string()),
      _ => ("无效".to_string(), "-".to_string()),
    };
    html.push_str(&format!(
      "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
      sub_account_name,
      local_time(&machine.created_at, offset),
      escape(&machine.name),
      escape(&machine.project),
      last_commit,
      age,
      machine.status.label()
    ));
  }
  html.push_str("</table>");
  html
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::classifier::{Snapshot, StatusThresholds};
  use crate::hierarchy::walk_main_account;
  use crate::report::compose;
  use crate::testing::{MemoryStore, NOW};

  fn shanghai() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap()
  }

  fn store() -> MemoryStore {
    MemoryStore::new()
      .user(1, "m@x.com")
      .sub_account(10, "alice<script>", 1)
      .sub_account(11, "bob", 1)
      .machine(10, Some(NOW - 100))
      .machine(10, None)
      .reward(10, NOW, "10", "verified")
      .reward(10, NOW - 3600, "5.5", "pending")
      .broken_ledger("bob")
  }

  #[test]
  fn test_escape() {
    assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
  }

  #[test]
  fn test_sub_account_fragment() {
    let snapshot = Snapshot::at(NOW, StatusThresholds::default()).unwrap();
    let report = compose(&mut store(), "alice<script>", &snapshot, true).unwrap();
    let html = render_sub_account(&report, &shanghai());

    assert!(html.starts_with("<h2>子账户总览信息 - Sub-account Overview for alice&lt;script&gt;(10)</h2>"));
    assert!(html.contains("<p>主账户名称 - Main Account: m@x.com(1)</p>"));
    assert!(html.contains("<p>总机器数 - Total Machines: 2</p>"));
    assert!(html.contains("<p>无效机器数 - Invalid Machines: 1</p>"));
    assert!(html.contains("Total Verified Reward: 10.00"));
    // 1_700_000_000 is 2023-11-14 22:13:20 UTC
    assert!(html.contains("<tr><td>2023-11-15 06:13:20</td><td>10.00</td><td>verified-paid</td></tr>"));
    assert!(html.contains("<td>5.50</td>"));
    assert!(html.contains("<td>2023-11-15 06:11:40</td><td>100</td><td>Active (活跃)</td>"));
    assert!(html.contains("<td>无效</td><td>-</td><td>Invalid (无效)</td>"));
    assert!(!html.contains("<script>"));
  }

  #[test]
  fn test_details_table_only_when_requested() {
    let snapshot = Snapshot::at(NOW, StatusThresholds::default()).unwrap();
    let report = compose(&mut store(), "alice<script>", &snapshot, false).unwrap();
    let html = render_sub_account(&report, &shanghai());
    assert!(html.contains("收益明细 - Reward Records"));
    assert!(!html.contains("机器详细信息 - Machine Details"));
  }

  #[test]
  fn test_main_account_fragment_includes_failures() {
    let snapshot = Snapshot::at(NOW, StatusThresholds::default()).unwrap();
    let report = walk_main_account(&mut store(), "m@x.com", &snapshot, false).unwrap();
    let html = render_main_account(&report, &shanghai());
    let alice = html.find("Sub-account Overview for alice").unwrap();
    let bob = html.find(r#"<p class="error">Error fetching report for bob"#).unwrap();
    assert!(alice < bob);
  }
}
