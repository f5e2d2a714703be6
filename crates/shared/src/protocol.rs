use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{
    AdministratorRole, AuditBoardAsmState, AuditReason, AuditType, AuthStage, Consensus,
    ContestId, CountyAsmState, CountyDashboardStatus, CountyId, CvrId, CvrImportState,
    DosAsmState, ElectionType, FileId, HashStatus, RecordType,
};

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Batch ids arrive as strings from newer servers and numbers from older ones.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyJson {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadedFileJson {
    pub file_id: Option<FileId>,
    pub county_id: Option<CountyId>,
    pub filename: Option<String>,
    pub size: Option<u64>,
    pub timestamp: Option<String>,
    pub hash: Option<String>,
    pub hash_status: Option<HashStatus>,
    pub status: Option<String>,
    pub approximate_record_count: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectorJson {
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditBoardMemberJson {
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub political_party: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditBoardJson {
    #[serde(deserialize_with = "null_as_default")]
    pub members: Vec<AuditBoardMemberJson>,
    pub sign_in_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundJson {
    pub number: Option<u32>,
    pub actual_count: Option<u64>,
    pub expected_count: Option<u64>,
    pub disagreements: Value,
    pub discrepancies: Value,
    #[serde(deserialize_with = "null_as_default")]
    pub signatories: Vec<ElectorJson>,
    pub start_audit_prefix_length: Option<u64>,
    pub start_index: Option<u64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditInfoJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub election_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub election_type: Option<ElectionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_meeting_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_limit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvrImportStatusJson {
    pub import_state: Option<CvrImportState>,
    pub error_message: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountyDashboardJson {
    pub id: Option<CountyId>,
    pub asm_state: Option<CountyAsmState>,
    pub audit_board_asm_state: Option<AuditBoardAsmState>,
    #[serde(deserialize_with = "null_as_default")]
    pub general_information: BTreeMap<String, String>,
    pub audit_board: Option<AuditBoardJson>,
    pub ballot_manifest_file: Option<UploadedFileJson>,
    pub cvr_export_file: Option<UploadedFileJson>,
    #[serde(deserialize_with = "null_as_default")]
    pub contests: Vec<ContestId>,
    #[serde(deserialize_with = "null_as_default")]
    pub contests_under_audit: BTreeMap<ContestId, AuditReason>,
    pub audit_time: Option<String>,
    pub estimated_ballots_to_audit: Option<u64>,
    pub optimistic_ballots_to_audit: Option<u64>,
    pub ballots_remaining_in_round: Option<u64>,
    pub ballot_manifest_count: Option<u64>,
    pub cvr_export_count: Option<u64>,
    pub cvr_import_status: Option<CvrImportStatusJson>,
    pub audited_ballot_count: Option<u64>,
    pub discrepancy_count: Value,
    pub disagreement_count: Value,
    pub ballot_under_audit_id: Option<CvrId>,
    pub audited_prefix_length: Option<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub rounds: Vec<RoundJson>,
    pub current_round: Option<RoundJson>,
    pub audit_info: Option<AuditInfoJson>,
    pub status: Option<CountyDashboardStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DosDashboardJson {
    pub asm_state: Option<DosAsmState>,
    #[serde(deserialize_with = "null_as_default")]
    pub audited_contests: BTreeMap<ContestId, AuditReason>,
    #[serde(deserialize_with = "null_as_default")]
    pub estimated_ballots_to_audit: BTreeMap<CountyId, i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub optimistic_ballots_to_audit: BTreeMap<CountyId, i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub discrepancy_count: BTreeMap<CountyId, BTreeMap<String, i64>>,
    #[serde(deserialize_with = "null_as_default")]
    pub county_status: BTreeMap<CountyId, CountyDashboardJson>,
    #[serde(deserialize_with = "null_as_default")]
    pub hand_count_contests: Vec<ContestId>,
    pub audit_info: Option<AuditInfoJson>,
    #[serde(deserialize_with = "null_as_default")]
    pub audit_reasons: BTreeMap<ContestId, AuditReason>,
    #[serde(deserialize_with = "null_as_default")]
    pub audit_types: BTreeMap<ContestId, AuditType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestChoiceJson {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestJson {
    pub id: ContestId,
    #[serde(default)]
    pub county_id: Option<CountyId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub choices: Vec<ContestChoiceJson>,
    #[serde(default)]
    pub votes_allowed: Option<u32>,
    #[serde(default)]
    pub winners_allowed: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestInfoJson {
    pub contest: ContestId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub choices: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus: Option<Consensus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvrJson {
    pub id: CvrId,
    #[serde(default)]
    pub county_id: Option<CountyId>,
    #[serde(default)]
    pub scanner_id: Option<i64>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub batch_id: String,
    #[serde(default)]
    pub record_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub imprinted_id: String,
    #[serde(default)]
    pub cvr_number: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ballot_type: String,
    #[serde(default)]
    pub record_type: Option<RecordType>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contest_info: Vec<ContestInfoJson>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub timestamp: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvrToAuditJson {
    pub audit_sequence_number: Option<u64>,
    pub scanner_id: Option<i64>,
    #[serde(deserialize_with = "string_or_number")]
    pub batch_id: String,
    pub record_id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub imprinted_id: String,
    pub cvr_number: Option<i64>,
    pub db_id: Option<CvrId>,
    #[serde(deserialize_with = "null_as_default")]
    pub ballot_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub storage_location: String,
    pub audit_board_index: Option<u32>,
    pub audited: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "S: serde::de::DeserializeOwned"))]
pub struct AsmStateResponse<S> {
    #[serde(default)]
    pub current_state: Option<S>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub enabled_ui_events: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthenticationResponse {
    pub role: Option<AdministratorRole>,
    pub stage: Option<AuthStage>,
    pub county_id: Option<CountyId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsJson {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_factor: Option<String>,
}

impl CredentialsJson {
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Some(password.into()),
            second_factor: None,
        }
    }

    pub fn second_factor(username: impl Into<String>, second_factor: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: None,
            second_factor: Some(second_factor.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcvrSubmissionJson {
    pub cvr_id: CvrId,
    pub audit_cvr: CvrJson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotNotFoundJson {
    pub id: CvrId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestToAuditJson {
    pub contest: ContestId,
    pub reason: AuditReason,
    pub audit: AuditType,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskLimitJson {
    pub risk_limit: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomSeedJson {
    pub seed: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandCountJson {
    pub contest: ContestId,
}

/// What an upload request carried, minus the file bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUploadJson {
    pub county_id: CountyId,
    pub filename: String,
    pub hash: String,
}
