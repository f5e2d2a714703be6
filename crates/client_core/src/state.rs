use std::collections::BTreeMap;

use shared::domain::{
    AuditBoardAsmState, AuthStage, ContestId, CountyAsmState, CountyId, CvrId, DosAsmState,
};

use crate::{
    model::{Acvr, Contest, CountyDashboard, CurrentBallot, CvrToAudit, DosDashboard},
    session::SessionKind,
};

/// Exactly one variant is populated; login and logout swap it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    County(CountyState),
    Dos(DosState),
    Login(LoginState),
}

impl Default for AppState {
    fn default() -> Self {
        Self::Login(LoginState::default())
    }
}

impl AppState {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::County(_) => "County",
            Self::Dos(_) => "DOS",
            Self::Login(_) => "Login",
        }
    }

    pub fn as_county(&self) -> Option<&CountyState> {
        match self {
            Self::County(county) => Some(county),
            _ => None,
        }
    }

    pub fn as_dos(&self) -> Option<&DosState> {
        match self {
            Self::Dos(dos) => Some(dos),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountyAsm {
    pub county: Option<CountyAsmState>,
    pub audit_board: Option<AuditBoardAsmState>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountyState {
    pub asm: CountyAsm,
    pub dashboard: CountyDashboard,
    pub contest_defs: BTreeMap<ContestId, Contest>,
    pub acvrs: BTreeMap<CvrId, Acvr>,
    pub current_ballot: Option<CurrentBallot>,
    pub cvrs_to_audit: Vec<CvrToAudit>,
    pub uploading_ballot_manifest: bool,
    pub uploading_cvr_export: bool,
}

impl CountyState {
    pub fn id(&self) -> Option<CountyId> {
        self.dashboard.id
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DosState {
    pub asm: Option<DosAsmState>,
    pub dashboard: DosDashboard,
    pub contests: BTreeMap<ContestId, Contest>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginState {
    pub dashboard: Option<SessionKind>,
    pub username: Option<String>,
    pub stage: Option<AuthStage>,
}
