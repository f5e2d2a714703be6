use serde_json::Value;
use shared::{
    domain::{AuditBoardAsmState, CountyAsmState, CountyId, CvrId},
    protocol::{
        AsmStateResponse, ContestJson, CountyDashboardJson, CvrJson, CvrToAuditJson, EmptyJson,
    },
};

use crate::{
    action::{Action, Received},
    adapter::{county, cvr},
    error::RequestError,
    model::{Acvr, AuditBoardMember, CurrentBallot, Elector, ReportFormat},
    request::{Dispatch, FetchAction, FileFetchAction, FileUploadAction, SubmitAction},
    transport::Transport,
    upload::{self, FileUpload},
};

pub async fn dashboard_refresh(
    transport: &Transport,
    dispatch: &dyn Dispatch,
) -> Result<CountyDashboardJson, RequestError> {
    FetchAction::new("county-dashboard", Action::CountyDashboardRefresh)
        .run(transport, dispatch)
        .await
}

pub async fn fetch_county_asm_state(
    transport: &Transport,
    dispatch: &dyn Dispatch,
) -> Result<AsmStateResponse<CountyAsmState>, RequestError> {
    FetchAction::new("county-asm-state", Action::FetchCountyAsmState)
        .run(transport, dispatch)
        .await
}

pub async fn fetch_audit_board_asm_state(
    transport: &Transport,
    dispatch: &dyn Dispatch,
) -> Result<AsmStateResponse<AuditBoardAsmState>, RequestError> {
    FetchAction::new("audit-board-asm-state", Action::FetchAuditBoardAsmState)
        .run(transport, dispatch)
        .await
}

pub async fn fetch_contests(
    transport: &Transport,
    dispatch: &dyn Dispatch,
    county_id: CountyId,
) -> Result<Vec<ContestJson>, RequestError> {
    FetchAction::new(format!("contest/county?{county_id}"), Action::CountyFetchContests)
        .run(transport, dispatch)
        .await
}

pub async fn fetch_cvr(
    transport: &Transport,
    dispatch: &dyn Dispatch,
    cvr_id: CvrId,
) -> Result<CvrJson, RequestError> {
    FetchAction::new(format!("cvr/id/{cvr_id}"), Action::CountyFetchCvr)
        .run(transport, dispatch)
        .await
}

pub async fn fetch_cvrs_to_audit(
    transport: &Transport,
    dispatch: &dyn Dispatch,
    county_id: CountyId,
    round: u32,
) -> Result<Vec<CvrToAuditJson>, RequestError> {
    FetchAction::new(
        format!("cvr-to-audit-list?county={county_id}&round={round}"),
        Action::FetchCvrsToAudit,
    )
    .run(transport, dispatch)
    .await
}

/// A county session needs no `county_id`; the state uses it to pick one.
pub async fn download_county_report(
    transport: &Transport,
    dispatch: &dyn Dispatch,
    county_id: Option<CountyId>,
    format: ReportFormat,
) -> Result<Vec<u8>, RequestError> {
    let path = match county_id {
        Some(id) => format!("county-report?county={id}&file_type={}", format.file_type()),
        None => format!("county-report?file_type={}", format.file_type()),
    };
    FileFetchAction::new(path, Action::DownloadCountyReport)
        .run(transport, dispatch)
        .await
}

pub async fn download_cvrs_to_audit_csv(
    transport: &Transport,
    dispatch: &dyn Dispatch,
    county_id: CountyId,
    round: u32,
) -> Result<Vec<u8>, RequestError> {
    FileFetchAction::new(
        format!("cvr-to-audit-download?county={county_id}&round={round}"),
        Action::DownloadCvrsToAuditCsv,
    )
    .run(transport, dispatch)
    .await
}

pub async fn upload_ballot_manifest(
    transport: &Transport,
    dispatch: &dyn Dispatch,
    file: &FileUpload,
) -> Result<Received, RequestError> {
    FileUploadAction::new(
        "upload-ballot-manifest",
        Action::UploadBallotManifest,
        upload::ballot_manifest_form,
        upload::upload_sent,
    )
    .run(file, transport, dispatch)
    .await
}

pub async fn upload_cvr_export(
    transport: &Transport,
    dispatch: &dyn Dispatch,
    file: &FileUpload,
) -> Result<Received, RequestError> {
    FileUploadAction::new(
        "upload-cvr-export",
        Action::UploadCvrExport,
        upload::cvr_export_form,
        upload::upload_sent,
    )
    .run(file, transport, dispatch)
    .await
}

pub async fn upload_acvr(
    transport: &Transport,
    dispatch: &dyn Dispatch,
    ballot: &CurrentBallot,
    acvr: &Acvr,
) -> Result<Value, RequestError> {
    SubmitAction::new("upload-audit-cvr", Action::UploadAcvr)
        .run(cvr::format_acvr(ballot, acvr), transport, dispatch)
        .await
}

pub async fn ballot_not_found(
    transport: &Transport,
    dispatch: &dyn Dispatch,
    ballot: &CurrentBallot,
) -> Result<Value, RequestError> {
    SubmitAction::new("ballot-not-found", Action::BallotNotFound)
        .run(cvr::format_ballot_not_found(ballot), transport, dispatch)
        .await
}

pub async fn audit_board_sign_in(
    transport: &Transport,
    dispatch: &dyn Dispatch,
    board: &[AuditBoardMember],
) -> Result<Value, RequestError> {
    SubmitAction::new("audit-board", Action::AuditBoardSignIn)
        .run(county::format_audit_board(board), transport, dispatch)
        .await
}

pub async fn audit_board_sign_out(
    transport: &Transport,
    dispatch: &dyn Dispatch,
) -> Result<Value, RequestError> {
    SubmitAction::new("audit-board-sign-out", Action::AuditBoardSignOut)
        .run(EmptyJson {}, transport, dispatch)
        .await
}

pub async fn round_sign_off(
    transport: &Transport,
    dispatch: &dyn Dispatch,
    electors: &[Elector],
) -> Result<Value, RequestError> {
    SubmitAction::new("sign-off-audit-round", Action::RoundSignOff)
        .run(county::format_electors(electors), transport, dispatch)
        .await
}
