use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    action::PollControl,
    form::{RiskLimitForm, SeedForm},
    format,
    model::ReportFormat,
    selector::{county as county_sel, dos as dos_sel},
    state::{CountyState, DosState},
    view::{self, CountyDashboardView},
    AppState, AuditClient, LoginRole, NoticeLevel,
};
use serde_json::Value;
use shared::domain::CountyId;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    /// Overrides `server_url` from rla-client.toml and the environment.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long, value_enum, default_value_t = Role::County)]
    role: Role,
    #[arg(long)]
    username: String,
    /// Falls back to `RLA_PASSWORD` when the flag is absent.
    #[arg(long, env = "RLA_PASSWORD", hide_env_values = true)]
    password: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Role {
    County,
    State,
}

impl From<Role> for LoginRole {
    fn from(role: Role) -> Self {
        match role {
            Role::County => LoginRole::County,
            Role::State => LoginRole::State,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current dashboard once.
    Dashboard,
    /// Keep polling and print notices until interrupted.
    Watch,
    UploadManifest {
        path: PathBuf,
    },
    UploadCvr {
        path: PathBuf,
    },
    /// Risk limit as a percentage, e.g. `5` for 5%.
    RiskLimit {
        percent: String,
    },
    Seed {
        seed: String,
    },
    Publish,
    Reset,
    /// Download a generated report and write it to disk.
    Report {
        #[arg(value_enum)]
        kind: ReportKind,
        /// Defaults to the report name in the current directory.
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[arg(long)]
        pdf: bool,
        /// County to report on; state sessions only.
        #[arg(long)]
        county: Option<i64>,
        /// Round for the ballot list; defaults to the current round.
        #[arg(long)]
        round: Option<u32>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportKind {
    County,
    State,
    CvrsToAudit,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let mut settings = client_core::load_settings();
    if let Some(server_url) = &args.server_url {
        settings.server_url = client_core::config::normalize_server_url(server_url);
    }
    let client = AuditClient::new(settings)?;
    let role = LoginRole::from(args.role);

    match args.command {
        Command::Watch => watch(&client, role, &args.username, &args.password).await,
        command => {
            client
                .login(role, &args.username, &args.password)
                .await
                .context("login failed")?;
            refresh(&client, role).await?;
            run(&client, role, command).await?;
            client.logout().await?;
            Ok(())
        }
    }
}

async fn run(client: &AuditClient, role: LoginRole, command: Command) -> Result<()> {
    match command {
        Command::Dashboard | Command::Watch => print_dashboard(&client.state()),
        Command::UploadManifest { path } => {
            require_role(role, LoginRole::County)?;
            let file = client.stage_file(&path).await?;
            let received = client.upload_ballot_manifest(&file).await?;
            println!("uploaded {} (hash {})", file.filename, file.hash);
            print_json(&received.body)?;
        }
        Command::UploadCvr { path } => {
            require_role(role, LoginRole::County)?;
            let file = client.stage_file(&path).await?;
            let received = client.upload_cvr_export(&file).await?;
            println!("uploaded {} (hash {})", file.filename, file.hash);
            print_json(&received.body)?;
        }
        Command::RiskLimit { percent } => {
            require_role(role, LoginRole::State)?;
            let form = RiskLimitForm { percent };
            let risk_limit = form
                .value()
                .context("risk limit must be a percentage between 0 and 100")?;
            print_json(&client.set_risk_limit(risk_limit).await?)?;
        }
        Command::Seed { seed } => {
            require_role(role, LoginRole::State)?;
            let form = SeedForm { seed };
            if !form.is_valid() {
                bail!("seed must be at least 20 digits");
            }
            print_json(&client.upload_random_seed(&form.seed).await?)?;
        }
        Command::Publish => {
            require_role(role, LoginRole::State)?;
            print_json(&client.publish_ballots_to_audit().await?)?;
        }
        Command::Reset => {
            require_role(role, LoginRole::State)?;
            print_json(&client.reset_database().await?)?;
        }
        Command::Report {
            kind,
            output,
            pdf,
            county,
            round,
        } => {
            let format = if pdf {
                ReportFormat::Pdf
            } else {
                ReportFormat::Xlsx
            };
            let (bytes, name) = download_report(client, role, kind, format, county, round).await?;
            let output = output.unwrap_or_else(|| PathBuf::from(name));
            tokio::fs::write(&output, &bytes)
                .await
                .with_context(|| format!("writing {}", output.display()))?;
            println!("wrote {} bytes to {}", bytes.len(), output.display());
        }
    }
    Ok(())
}

async fn download_report(
    client: &AuditClient,
    role: LoginRole,
    kind: ReportKind,
    format: ReportFormat,
    county: Option<i64>,
    round: Option<u32>,
) -> Result<(Vec<u8>, String)> {
    match kind {
        ReportKind::State => {
            require_role(role, LoginRole::State)?;
            let bytes = client.download_state_report(format).await?;
            Ok((bytes, format!("state-report.{}", format.extension())))
        }
        ReportKind::County => {
            let county_id = match role {
                LoginRole::County => {
                    let state = client.state();
                    let can_render = match state.as_ref() {
                        AppState::County(county) => county_sel::can_render_report(county),
                        _ => false,
                    };
                    if !can_render {
                        bail!("the county report is available once the audit has started");
                    }
                    None
                }
                LoginRole::State => Some(CountyId(
                    county.context("a state session needs --county for a county report")?,
                )),
            };
            let bytes = client.download_county_report(county_id, format).await?;
            Ok((bytes, format!("county-report.{}", format.extension())))
        }
        ReportKind::CvrsToAudit => {
            require_role(role, LoginRole::County)?;
            let county_id = client
                .county_id()
                .context("county dashboard has not been loaded yet")?;
            let round = match round {
                Some(round) => round,
                None => match client.state().as_ref() {
                    AppState::County(county) => county_sel::current_round_number(county),
                    _ => None,
                }
                .context("no round is in progress; pass --round")?,
            };
            let bytes = client.download_cvrs_to_audit_csv(county_id, round).await?;
            Ok((bytes, format!("ballots-to-audit-round-{round}.csv")))
        }
    }
}

async fn refresh(client: &AuditClient, role: LoginRole) -> Result<()> {
    match role {
        LoginRole::County => {
            client.county_dashboard_refresh().await?;
        }
        LoginRole::State => {
            client.dos_dashboard_refresh().await?;
            client.fetch_dos_asm_state().await?;
        }
    }
    client.store().flush().await;
    Ok(())
}

fn require_role(role: LoginRole, expected: LoginRole) -> Result<()> {
    if role != expected {
        bail!("this command needs --role {}", role_flag(expected));
    }
    Ok(())
}

fn role_flag(role: LoginRole) -> &'static str {
    match role {
        LoginRole::County => "county",
        LoginRole::State => "state",
    }
}

async fn watch(
    client: &Arc<AuditClient>,
    role: LoginRole,
    username: &str,
    password: &str,
) -> Result<()> {
    let mut notices = BroadcastStream::new(client.subscribe_notices());
    let mut state = client.store().watch_state();
    let sagas = client.start_sagas();

    client
        .login(role, username, password)
        .await
        .context("login failed")?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            notice = notices.next() => match notice {
                Some(Ok(notice)) => {
                    let tag = match notice.level {
                        NoticeLevel::Ok => "ok",
                        NoticeLevel::Warning => "warning",
                        NoticeLevel::Danger => "error",
                    };
                    println!("[{tag}] {}", notice.message);
                }
                Some(Err(lagged)) => info!(error = %lagged, "console: notices skipped"),
                None => break,
            },
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = state.borrow_and_update().clone();
                print_dashboard(&current);
            }
        }
    }

    match role {
        LoginRole::County => {
            client.county_dashboard_poll(PollControl::Stop);
            client.county_audit_poll(PollControl::Stop);
        }
        LoginRole::State => client.dos_dashboard_poll(PollControl::Stop),
    }
    client.logout().await?;
    client.store().flush().await;
    sagas.abort();
    Ok(())
}

fn print_dashboard(state: &AppState) {
    match state {
        AppState::County(county) => print_county(county),
        AppState::Dos(dos) => print_dos(dos),
        AppState::Login(_) => println!("not logged in"),
    }
}

fn print_county(county: &CountyState) {
    match view::county_dashboard_view(county) {
        CountyDashboardView::Loading => println!("county dashboard loading"),
        CountyDashboardView::MissedDeadline => {
            println!("county missed the upload deadline")
        }
        CountyDashboardView::Dashboard { .. } => {
            let status = county
                .asm
                .county
                .map(|asm| format::county_and_board_asm_state(asm, county.asm.audit_board))
                .unwrap_or("Unknown");
            let id = county
                .id()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "?".into());
            println!("county {id}: {status}");
            if let Some(round) = county_sel::current_round_number(county) {
                println!("  round {round}");
            }
            if county_sel::cvr_export_uploading(county) {
                println!("  CVR export is being imported");
            }
            println!(
                "  audit board signed in: {}",
                county_sel::audit_board_signed_in(county)
            );
        }
    }
}

fn print_dos(dos: &DosState) {
    let status = dos.asm.map(format::dos_asm_state).unwrap_or("Unknown");
    println!("department of state: {status}");
    if let Some(risk_limit) = dos.dashboard.risk_limit {
        println!("  risk limit: {}%", risk_limit * 100.0);
    }
    if let Some(seed) = &dos.dashboard.seed {
        println!("  seed: {seed}");
    }
    for county_id in dos.dashboard.county_status.keys() {
        println!(
            "  county {county_id}: {} discrepancies",
            dos_sel::county_discrepancy_total(dos, *county_id)
        );
    }
    println!(
        "  next round can start: {}",
        dos_sel::can_start_next_round(dos)
    );
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
