use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(CountyId);
id_newtype!(ContestId);
id_newtype!(CvrId);
id_newtype!(FileId);

/// County workflow state as reported by the server. The client never
/// validates transitions; unrecognised values land in `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CountyAsmState {
    CountyInitialState,
    CountyAuthenticated,
    BallotManifestOk,
    CvrsImporting,
    CvrsOk,
    BallotManifestOkAndCvrsImporting,
    BallotManifestAndCvrsOk,
    CountyAuditUnderway,
    CountyAuditComplete,
    DeadlineMissed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditBoardAsmState {
    AuditInitialState,
    WaitingForRoundStart,
    WaitingForRoundStartNoAuditBoard,
    RoundInProgress,
    RoundInProgressNoAuditBoard,
    WaitingForRoundSignOff,
    WaitingForRoundSignOffNoAuditBoard,
    AuditComplete,
    UnableToAudit,
    AuditAborted,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DosAsmState {
    DosInitialState,
    DosAuthenticated,
    RiskLimitsSet,
    ContestsToAuditIdentified,
    DataToAuditPublished,
    RandomSeedPublished,
    BallotOrderDefined,
    AuditReadyToStart,
    DosAuditOngoing,
    DosRoundComplete,
    DosAuditComplete,
    AuditResultsPublished,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditReason {
    StateWideContest,
    CountyWideContest,
    CloseContest,
    TiedContest,
    GeographicalScope,
    ConcernRegardingAccuracy,
    OpportunisticBenefits,
    CountyClerkAbility,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditType {
    Comparison,
    HandCount,
    NotAuditable,
    #[serde(rename = "NONE")]
    NoAudit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordType {
    Uploaded,
    PhantomRecord,
    AuditorEntered,
    PhantomBallot,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElectionType {
    Coordinated,
    Primary,
    General,
    Recall,
}

impl ElectionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Coordinated => "coordinated",
            Self::Primary => "primary",
            Self::General => "general",
            Self::Recall => "recall",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdministratorRole {
    State,
    County,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthStage {
    NotAuthenticated,
    TraditionallyAuthenticated,
    SecondFactorAuthenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CvrImportState {
    NotAttempted,
    InProgress,
    Successful,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HashStatus {
    Verified,
    Mismatch,
    NotChecked,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CountyDashboardStatus {
    NoData,
    CvrsUploadedSuccessfully,
    ErrorInUploadedData,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Consensus {
    Yes,
    No,
}
