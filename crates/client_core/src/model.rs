//! Client-side view models produced by the adapters.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use shared::{
    domain::{
        AuditBoardAsmState, AuditReason, AuditType, ContestId, CountyAsmState,
        CountyDashboardStatus, CountyId, CvrId, CvrImportState, DosAsmState, ElectionType, FileId,
        HashStatus, RecordType,
    },
    protocol::ContestInfoJson,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadedFile {
    pub id: Option<FileId>,
    pub county_id: Option<CountyId>,
    pub name: String,
    pub size: Option<u64>,
    pub timestamp: Option<DateTime<Utc>>,
    pub hash: String,
    pub hash_status: Option<HashStatus>,
    pub status: Option<String>,
    pub approximate_record_count: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditBoardMember {
    pub first_name: String,
    pub last_name: String,
    pub party: String,
}

pub type AuditBoard = Vec<AuditBoardMember>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Elector {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Round {
    pub number: Option<u32>,
    pub actual_count: Option<u64>,
    pub expected_count: Option<u64>,
    pub disagreements: i64,
    pub discrepancies: i64,
    pub signatories: Vec<Elector>,
    pub start_audit_prefix_length: Option<u64>,
    pub start_index: Option<u64>,
    pub start_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContestChoice {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contest {
    pub id: ContestId,
    pub county_id: Option<CountyId>,
    pub name: String,
    pub description: String,
    pub choices: Vec<ContestChoice>,
    pub votes_allowed: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestUnderAudit {
    pub contest: Contest,
    pub reason: AuditReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Election {
    pub date: Option<DateTime<Utc>>,
    pub kind: Option<ElectionType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CvrImportStatus {
    pub state: CvrImportState,
    pub error: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Everything a county dashboard refresh carries, in client shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountyDashboard {
    pub id: Option<CountyId>,
    pub asm_state: Option<CountyAsmState>,
    pub audit_board_asm_state: Option<AuditBoardAsmState>,
    pub audit_board: AuditBoard,
    pub audit_time: Option<DateTime<Utc>>,
    pub audited_ballot_count: Option<u64>,
    pub audited_prefix_length: Option<u64>,
    pub ballot_manifest: Option<UploadedFile>,
    pub ballot_manifest_count: Option<u64>,
    pub ballot_under_audit_id: Option<CvrId>,
    pub ballots_remaining_in_round: Option<u64>,
    pub contests: Vec<Contest>,
    pub contests_under_audit: Vec<ContestUnderAudit>,
    pub current_round: Option<Round>,
    pub cvr_export: Option<UploadedFile>,
    pub cvr_export_count: Option<u64>,
    pub cvr_import_status: Option<CvrImportStatus>,
    pub disagreement_count: i64,
    pub discrepancy_count: i64,
    pub election: Option<Election>,
    pub estimated_ballots_to_audit: Option<u64>,
    pub general_information: BTreeMap<String, String>,
    pub risk_limit: Option<f64>,
    pub rounds: Vec<Round>,
    pub status: Option<CountyDashboardStatus>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DosDashboard {
    pub asm_state: Option<DosAsmState>,
    pub audited_contests: BTreeMap<ContestId, AuditReason>,
    pub audit_types: BTreeMap<ContestId, AuditType>,
    pub county_status: BTreeMap<CountyId, CountyDashboard>,
    pub discrepancy_counts: BTreeMap<CountyId, BTreeMap<String, i64>>,
    pub estimated_ballots_to_audit: BTreeMap<CountyId, i64>,
    pub hand_count_contests: Vec<ContestId>,
    pub election: Option<Election>,
    pub public_meeting_date: Option<DateTime<Utc>>,
    pub risk_limit: Option<f64>,
    pub seed: Option<String>,
}

/// The ballot the audit board is currently examining.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentBallot {
    pub id: CvrId,
    pub county_id: Option<CountyId>,
    pub scanner_id: Option<i64>,
    pub batch_id: String,
    pub record_id: Option<i64>,
    pub imprinted_id: String,
    pub cvr_number: Option<i64>,
    pub ballot_type: String,
    pub record_type: Option<RecordType>,
    pub contest_info: Vec<ContestInfoJson>,
    pub submitted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CvrToAudit {
    pub db_id: Option<CvrId>,
    pub audit_sequence_number: Option<u64>,
    pub scanner_id: Option<i64>,
    pub batch_id: String,
    pub record_id: Option<i64>,
    pub imprinted_id: String,
    pub cvr_number: Option<i64>,
    pub ballot_type: String,
    pub storage_location: String,
    pub audit_board_index: Option<u32>,
    pub audited: bool,
}

/// Marks the audit board entered for one contest on one ballot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcvrContestMarks {
    pub choices: BTreeMap<String, bool>,
    pub comments: String,
    pub no_consensus: bool,
    pub no_mark: bool,
}

impl AcvrContestMarks {
    pub fn marked_choices(&self) -> Vec<String> {
        self.choices
            .iter()
            .filter(|(_, checked)| **checked)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

pub type Acvr = BTreeMap<ContestId, AcvrContestMarks>;

/// One row of the contest selection form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContestSelection {
    pub audit: bool,
    pub hand_count: bool,
    pub reason: AuditReason,
}

/// File type of a generated audit report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    Pdf,
    #[default]
    Xlsx,
}

impl ReportFormat {
    pub fn file_type(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn extension(self) -> &'static str {
        self.file_type()
    }
}
