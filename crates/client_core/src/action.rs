use serde_json::Value;
use shared::{
    domain::{AuditBoardAsmState, ContestId, CountyAsmState, CvrId, DosAsmState},
    protocol::{
        AcvrSubmissionJson, AsmStateResponse, AuditBoardMemberJson, AuditInfoJson,
        BallotNotFoundJson, ContestJson, ContestToAuditJson, CountyDashboardJson,
        CredentialsJson, CvrJson, CvrToAuditJson, DosDashboardJson, ElectorJson, EmptyJson,
        FileUploadJson, HandCountJson, RandomSeedJson, RiskLimitJson,
    },
};

use crate::model::AcvrContestMarks;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Send,
    Ok,
    Fail,
    NetworkFail,
}

impl Phase {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Send => "_SEND",
            Self::Ok => "_OK",
            Self::Fail => "_FAIL",
            Self::NetworkFail => "_NETWORK_FAIL",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Send)
    }
}

pub trait Lifecycle {
    fn phase(&self) -> Phase;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub status: u16,
    pub body: Value,
}

/// GET round-trip.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<R> {
    Send,
    Ok(R),
    Fail(Failure),
    NetworkFail,
}

impl<R> Fetched<R> {
    pub fn ok(&self) -> Option<&R> {
        match self {
            Self::Ok(data) => Some(data),
            _ => None,
        }
    }
}

impl<R> Lifecycle for Fetched<R> {
    fn phase(&self) -> Phase {
        match self {
            Self::Send => Phase::Send,
            Self::Ok(_) => Phase::Ok,
            Self::Fail(_) => Phase::Fail,
            Self::NetworkFail => Phase::NetworkFail,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitData<S> {
    pub sent: S,
    pub received: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitFailure<S> {
    pub sent: S,
    pub status: u16,
    pub error: Value,
}

/// JSON POST round-trip.
#[derive(Debug, Clone, PartialEq)]
pub enum Submitted<S> {
    Send,
    Ok(SubmitData<S>),
    Fail(SubmitFailure<S>),
    NetworkFail,
}

impl<S> Submitted<S> {
    pub fn ok(&self) -> Option<&SubmitData<S>> {
        match self {
            Self::Ok(data) => Some(data),
            _ => None,
        }
    }
}

impl<S> Lifecycle for Submitted<S> {
    fn phase(&self) -> Phase {
        match self {
            Self::Send => Phase::Send,
            Self::Ok(_) => Phase::Ok,
            Self::Fail(_) => Phase::Fail,
            Self::NetworkFail => Phase::NetworkFail,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Received {
    pub status: u16,
    pub body: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadEnvelope<S> {
    pub sent: S,
    pub received: Received,
}

/// Multipart POST round-trip. Ok and Fail carry the same envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Uploaded<S> {
    Send,
    Ok(UploadEnvelope<S>),
    Fail(UploadEnvelope<S>),
    NetworkFail,
}

impl<S> Lifecycle for Uploaded<S> {
    fn phase(&self) -> Phase {
        match self {
            Self::Send => Phase::Send,
            Self::Ok(_) => Phase::Ok,
            Self::Fail(_) => Phase::Fail,
            Self::NetworkFail => Phase::NetworkFail,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollControl {
    Start,
    Stop,
}

impl PollControl {
    fn suffix(self) -> &'static str {
        match self {
            Self::Start => "_START",
            Self::Stop => "_STOP",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CountyLogin(Submitted<CredentialsJson>),
    DosLogin(Submitted<CredentialsJson>),
    Login1F(Submitted<CredentialsJson>),
    Login2F(Submitted<CredentialsJson>),
    Logout(Submitted<EmptyJson>),

    CountyDashboardRefresh(Fetched<CountyDashboardJson>),
    FetchCountyAsmState(Fetched<AsmStateResponse<CountyAsmState>>),
    FetchAuditBoardAsmState(Fetched<AsmStateResponse<AuditBoardAsmState>>),
    CountyFetchContests(Fetched<Vec<ContestJson>>),
    CountyFetchCvr(Fetched<CvrJson>),
    FetchCvrsToAudit(Fetched<Vec<CvrToAuditJson>>),
    DownloadCountyReport(Fetched<Vec<u8>>),
    DownloadCvrsToAuditCsv(Fetched<Vec<u8>>),
    UploadBallotManifest(Uploaded<FileUploadJson>),
    UploadCvrExport(Uploaded<FileUploadJson>),
    UploadAcvr(Submitted<AcvrSubmissionJson>),
    BallotNotFound(Submitted<BallotNotFoundJson>),
    AuditBoardSignIn(Submitted<Vec<AuditBoardMemberJson>>),
    AuditBoardSignOut(Submitted<EmptyJson>),
    RoundSignOff(Submitted<Vec<ElectorJson>>),

    DosDashboardRefresh(Fetched<DosDashboardJson>),
    DosFetchContests(Fetched<Vec<ContestJson>>),
    FetchDosAsmState(Fetched<AsmStateResponse<DosAsmState>>),
    SelectContestsForAudit(Submitted<Vec<ContestToAuditJson>>),
    SetRiskLimit(Submitted<RiskLimitJson>),
    UploadRandomSeed(Submitted<RandomSeedJson>),
    SetAuditInfo(Submitted<AuditInfoJson>),
    SetHandCount(Submitted<HandCountJson>),
    PublishBallotsToAudit(Submitted<EmptyJson>),
    DosStartNextRound(Submitted<EmptyJson>),
    ResetDatabase(Submitted<EmptyJson>),
    DownloadStateReport(Fetched<Vec<u8>>),

    NotAuthorized,
    InternalError(String),
    UpdateAcvrForm {
        cvr_id: CvrId,
        contest_id: ContestId,
        marks: AcvrContestMarks,
    },
    UploadingBallotManifest(bool),
    UploadingCvrExport(bool),
    CountyDashboardPoll(PollControl),
    CountyAuditPoll(PollControl),
    DosDashboardPoll(PollControl),
    CountyBoardSignInSync,
}

impl Action {
    /// Request prefix and lifecycle phase, for actions produced by a request.
    pub fn endpoint(&self) -> Option<(&'static str, Phase)> {
        let pair = match self {
            Self::CountyLogin(l) => ("COUNTY_LOGIN", l.phase()),
            Self::DosLogin(l) => ("DOS_LOGIN", l.phase()),
            Self::Login1F(l) => ("LOGIN_1F", l.phase()),
            Self::Login2F(l) => ("LOGIN_2F", l.phase()),
            Self::Logout(l) => ("LOGOUT", l.phase()),
            Self::CountyDashboardRefresh(l) => ("COUNTY_DASHBOARD_REFRESH", l.phase()),
            Self::FetchCountyAsmState(l) => ("FETCH_COUNTY_ASM_STATE", l.phase()),
            Self::FetchAuditBoardAsmState(l) => ("FETCH_AUDIT_BOARD_ASM_STATE", l.phase()),
            Self::CountyFetchContests(l) => ("COUNTY_FETCH_CONTESTS", l.phase()),
            Self::CountyFetchCvr(l) => ("COUNTY_FETCH_CVR", l.phase()),
            Self::FetchCvrsToAudit(l) => ("FETCH_CVRS_TO_AUDIT", l.phase()),
            Self::DownloadCountyReport(l) => ("DOWNLOAD_COUNTY_REPORT", l.phase()),
            Self::DownloadCvrsToAuditCsv(l) => ("DOWNLOAD_CVRS_TO_AUDIT_CSV", l.phase()),
            Self::UploadBallotManifest(l) => ("UPLOAD_BALLOT_MANIFEST", l.phase()),
            Self::UploadCvrExport(l) => ("UPLOAD_CVR_EXPORT", l.phase()),
            Self::UploadAcvr(l) => ("UPLOAD_ACVR", l.phase()),
            Self::BallotNotFound(l) => ("BALLOT_NOT_FOUND", l.phase()),
            Self::AuditBoardSignIn(l) => ("AUDIT_BOARD_SIGN_IN", l.phase()),
            Self::AuditBoardSignOut(l) => ("AUDIT_BOARD_SIGN_OUT", l.phase()),
            Self::RoundSignOff(l) => ("SUBMIT_ROUND_SIGN_OFF", l.phase()),
            Self::DosDashboardRefresh(l) => ("DOS_DASHBOARD_REFRESH", l.phase()),
            Self::DosFetchContests(l) => ("DOS_FETCH_CONTESTS", l.phase()),
            Self::FetchDosAsmState(l) => ("FETCH_DOS_ASM_STATE", l.phase()),
            Self::SelectContestsForAudit(l) => ("SELECT_CONTESTS_FOR_AUDIT", l.phase()),
            Self::SetRiskLimit(l) => ("SET_RISK_LIMIT", l.phase()),
            Self::UploadRandomSeed(l) => ("UPLOAD_RANDOM_SEED", l.phase()),
            Self::SetAuditInfo(l) => ("SET_AUDIT_INFO", l.phase()),
            Self::SetHandCount(l) => ("SET_HAND_COUNT", l.phase()),
            Self::PublishBallotsToAudit(l) => ("PUBLISH_BALLOTS_TO_AUDIT", l.phase()),
            Self::DosStartNextRound(l) => ("DOS_START_NEXT_ROUND", l.phase()),
            Self::ResetDatabase(l) => ("RESET_DATABASE", l.phase()),
            Self::DownloadStateReport(l) => ("DOWNLOAD_STATE_REPORT", l.phase()),
            _ => return None,
        };
        Some(pair)
    }

    /// The historical action type string, e.g. `COUNTY_LOGIN_SEND`.
    pub fn name(&self) -> String {
        if let Some((prefix, phase)) = self.endpoint() {
            return format!("{prefix}{}", phase.suffix());
        }
        match self {
            Self::NotAuthorized => "NOT_AUTHORIZED".into(),
            Self::InternalError(_) => "INTERNAL_ERROR".into(),
            Self::UpdateAcvrForm { .. } => "UPDATE_ACVR_FORM".into(),
            Self::UploadingBallotManifest(_) => "UPLOADING_BALLOT_MANIFEST".into(),
            Self::UploadingCvrExport(_) => "UPLOADING_CVR_EXPORT".into(),
            Self::CountyDashboardPoll(c) => format!("COUNTY_DASHBOARD_POLL{}", c.suffix()),
            Self::CountyAuditPoll(c) => format!("COUNTY_AUDIT_POLL{}", c.suffix()),
            Self::DosDashboardPoll(c) => format!("DOS_DASHBOARD_POLL{}", c.suffix()),
            Self::CountyBoardSignInSync => "COUNTY_BOARD_SIGN_IN_SYNC".into(),
            _ => "UNKNOWN".into(),
        }
    }

    pub fn phase(&self) -> Option<Phase> {
        self.endpoint().map(|(_, phase)| phase)
    }

    pub fn is_terminal(&self) -> bool {
        self.phase().is_some_and(Phase::is_terminal)
    }
}
