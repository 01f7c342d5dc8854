#[macro_use]
extern crate rocket;

use account_report::classifier::{Snapshot, StatusThresholds};
use account_report::config::ReportConfig;
use account_report::error::ReportError;
use account_report::hierarchy::walk_main_account;
use account_report::render::{render_main_account, render_sub_account};
use account_report::report::compose;
use account_report::request::{ReportRequest, Scope};
use account_report::store::{Databases, PgStore};
use chrono::FixedOffset;
use log::{error, info};
use rocket::form::Form;
use rocket::http::Status;
use rocket::response::content::RawHtml;
use rocket::serde::json::Json;
use rocket::tokio::task;
use rocket::{Build, Rocket, State};
use serde::Serialize;
use serde_json::{json, Value};
use std::error::Error;

type Envelope = (Status, Json<Value>);

struct AppState {
  databases: Databases,
  thresholds: StatusThresholds,
  display_offset: FixedOffset,
}

#[derive(FromForm)]
struct MainAccountForm {
  #[field(name = "mainAccountName")]
  main_account_name: Option<String>,
  #[field(name = "showDetails")]
  show_details: Option<String>,
}

#[derive(FromForm)]
struct SubAccountForm {
  #[field(name = "subAccountName")]
  sub_account_name: Option<String>,
  #[field(name = "showDetails")]
  show_details: Option<String>,
}

fn failure(err: &ReportError) -> Envelope {
  let code = err.status_code();
  (
    Status::from_code(code).unwrap_or(Status::InternalServerError),
    Json(json!({ "code": code, "error": err.to_string() })),
  )
}

fn to_json<T: Serialize>(report: &T) -> Result<Value, ReportError> {
  serde_json::to_value(report).map_err(|e| ReportError::Task(e.to_string()))
}

/// Runs one report on the blocking pool: checks out a connection, takes
/// the snapshot and renders the result.
async fn run_report(state: &AppState, request: ReportRequest) -> Envelope {
  info!(
    "{} report for {} (details: {})",
    request.scope, request.account_name, request.show_details
  );
  let pool = state.databases.primary.clone();
  let thresholds = state.thresholds;
  let offset = state.display_offset;
  let message = request.processed_message();

  let outcome = task::spawn_blocking(move || -> Result<(String, Value), ReportError> {
    let mut store = PgStore::checkout(&pool)?;
    let snapshot = Snapshot::capture(thresholds);
    match request.scope {
      Scope::MainAccount => {
        let report =
          walk_main_account(&mut store, &request.account_name, &snapshot, request.show_details)?;
        Ok((render_main_account(&report, &offset), to_json(&report)?))
      }
      Scope::SubAccount => {
        let report = compose(&mut store, &request.account_name, &snapshot, request.show_details)?;
        Ok((render_sub_account(&report, &offset), to_json(&report)?))
      }
    }
  })
  .await;

  match outcome {
    Ok(Ok((html, report))) => (
      Status::Ok,
      Json(json!({ "code": 200, "message": message, "result": html, "report": report })),
    ),
    Ok(Err(e)) => {
      error!("{} failed: {}", message, e);
      failure(&e)
    }
    Err(e) => failure(&ReportError::Task(e.to_string())),
  }
}

#[get("/")]
fn index() -> RawHtml<&'static str> {
  RawHtml(include_str!("../static/index.html"))
}

#[post("/main-account", data = "<form>")]
async fn main_account(state: &State<AppState>, form: Form<MainAccountForm>) -> Envelope {
  match ReportRequest::parse(
    Scope::MainAccount,
    form.main_account_name.as_deref(),
    form.show_details.as_deref(),
  ) {
    Ok(request) => run_report(state, request).await,
    Err(e) => failure(&e),
  }
}

#[post("/sub-account", data = "<form>")]
async fn sub_account(state: &State<AppState>, form: Form<SubAccountForm>) -> Envelope {
  match ReportRequest::parse(
    Scope::SubAccount,
    form.sub_account_name.as_deref(),
    form.show_details.as_deref(),
  ) {
    Ok(request) => run_report(state, request).await,
    Err(e) => failure(&e),
  }
}

fn build_rocket(config: &ReportConfig, databases: Databases) -> Rocket<Build> {
  let figment = rocket::Config::figment()
    .merge(("address", config.address))
    .merge(("port", config.port));
  rocket::custom(figment)
    .manage(AppState {
      databases,
      thresholds: config.thresholds,
      display_offset: config.display_offset,
    })
    .mount("/", routes![index, main_account, sub_account])
}

fn main() -> Result<(), Box<dyn Error>> {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

  let config = ReportConfig::from_env()?;
  info!(
    "thresholds: active <= {}s, inactive <= {}s; pool size {}; secondary store: {}",
    config.thresholds.active_secs,
    config.thresholds.inactive_secs,
    config.pool.max_size,
    if config.secondary_database_url.is_some() { "configured" } else { "none" }
  );

  let databases = Databases::connect(&config)?;
  rocket::execute(build_rocket(&config, databases).launch())?;
  Ok(())
}
