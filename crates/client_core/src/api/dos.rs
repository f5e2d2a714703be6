use serde_json::Value;
use shared::{
    domain::{ContestId, DosAsmState},
    protocol::{
        AsmStateResponse, AuditInfoJson, ContestJson, ContestToAuditJson, DosDashboardJson,
        EmptyJson, HandCountJson,
    },
};

use crate::{
    action::Action,
    adapter::{dos, risk_limit},
    error::RequestError,
    model::ReportFormat,
    request::{Dispatch, FetchAction, FileFetchAction, SubmitAction},
    transport::Transport,
};

pub async fn dashboard_refresh(
    transport: &Transport,
    dispatch: &dyn Dispatch,
) -> Result<DosDashboardJson, RequestError> {
    FetchAction::new("dos-dashboard", Action::DosDashboardRefresh)
        .run(transport, dispatch)
        .await
}

pub async fn fetch_contests(
    transport: &Transport,
    dispatch: &dyn Dispatch,
) -> Result<Vec<ContestJson>, RequestError> {
    FetchAction::new("contest", Action::DosFetchContests)
        .run(transport, dispatch)
        .await
}

pub async fn fetch_asm_state(
    transport: &Transport,
    dispatch: &dyn Dispatch,
) -> Result<AsmStateResponse<DosAsmState>, RequestError> {
    FetchAction::new("dos-asm-state", Action::FetchDosAsmState)
        .run(transport, dispatch)
        .await
}

pub async fn download_state_report(
    transport: &Transport,
    dispatch: &dyn Dispatch,
    format: ReportFormat,
) -> Result<Vec<u8>, RequestError> {
    FileFetchAction::new(
        format!("state-report?file_type={}", format.file_type()),
        Action::DownloadStateReport,
    )
    .run(transport, dispatch)
    .await
}

pub async fn select_contests_for_audit(
    transport: &Transport,
    dispatch: &dyn Dispatch,
    contests: Vec<ContestToAuditJson>,
) -> Result<Value, RequestError> {
    SubmitAction::new("select-contests", Action::SelectContestsForAudit)
        .run(contests, transport, dispatch)
        .await
}

pub async fn set_risk_limit(
    transport: &Transport,
    dispatch: &dyn Dispatch,
    risk_limit: f64,
) -> Result<Value, RequestError> {
    SubmitAction::new("risk-limit-comp-audits", Action::SetRiskLimit)
        .run(risk_limit::format(risk_limit), transport, dispatch)
        .await
}

pub async fn upload_random_seed(
    transport: &Transport,
    dispatch: &dyn Dispatch,
    seed: &str,
) -> Result<Value, RequestError> {
    SubmitAction::new("random-seed", Action::UploadRandomSeed)
        .run(dos::format_seed(seed), transport, dispatch)
        .await
}

pub async fn set_audit_info(
    transport: &Transport,
    dispatch: &dyn Dispatch,
    info: AuditInfoJson,
) -> Result<Value, RequestError> {
    SubmitAction::new("update-audit-info", Action::SetAuditInfo)
        .run(info, transport, dispatch)
        .await
}

pub async fn set_hand_count(
    transport: &Transport,
    dispatch: &dyn Dispatch,
    contest: ContestId,
) -> Result<Value, RequestError> {
    SubmitAction::new("hand-count", Action::SetHandCount)
        .run(HandCountJson { contest }, transport, dispatch)
        .await
}

pub async fn publish_ballots_to_audit(
    transport: &Transport,
    dispatch: &dyn Dispatch,
) -> Result<Value, RequestError> {
    SubmitAction::new("ballots-to-audit/publish", Action::PublishBallotsToAudit)
        .run(EmptyJson {}, transport, dispatch)
        .await
}

pub async fn start_next_round(
    transport: &Transport,
    dispatch: &dyn Dispatch,
) -> Result<Value, RequestError> {
    SubmitAction::new("start-audit-round", Action::DosStartNextRound)
        .run(EmptyJson {}, transport, dispatch)
        .await
}

pub async fn reset_database(
    transport: &Transport,
    dispatch: &dyn Dispatch,
) -> Result<Value, RequestError> {
    SubmitAction::new("reset-database", Action::ResetDatabase)
        .run(EmptyJson {}, transport, dispatch)
        .await
}
