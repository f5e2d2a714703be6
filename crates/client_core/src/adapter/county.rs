use std::collections::BTreeMap;

use shared::{
    domain::{ContestId, CvrImportState},
    protocol::{
        AuditBoardMemberJson, AuditInfoJson, CountyDashboardJson, CvrImportStatusJson,
        ElectorJson, RoundJson, UploadedFileJson,
    },
};

use super::{parse_timestamp, sum_counts};
use crate::model::{
    AuditBoard, AuditBoardMember, Contest, ContestUnderAudit, CountyDashboard, CvrImportStatus,
    Election, Elector, Round, UploadedFile,
};

pub fn parse_uploaded_file(json: &UploadedFileJson) -> UploadedFile {
    UploadedFile {
        id: json.file_id,
        county_id: json.county_id,
        name: json.filename.clone().unwrap_or_default(),
        size: json.size,
        timestamp: parse_timestamp(json.timestamp.as_deref()),
        hash: json.hash.clone().unwrap_or_default(),
        hash_status: json.hash_status,
        status: json.status.clone(),
        approximate_record_count: json.approximate_record_count,
    }
}

pub fn parse_board_member(json: &AuditBoardMemberJson) -> AuditBoardMember {
    AuditBoardMember {
        first_name: json.first_name.clone(),
        last_name: json.last_name.clone(),
        party: json.political_party.clone(),
    }
}

pub fn format_board_member(member: &AuditBoardMember) -> AuditBoardMemberJson {
    AuditBoardMemberJson {
        first_name: member.first_name.trim().to_string(),
        last_name: member.last_name.trim().to_string(),
        political_party: member.party.clone(),
    }
}

pub fn format_audit_board(board: &[AuditBoardMember]) -> Vec<AuditBoardMemberJson> {
    board.iter().map(format_board_member).collect()
}

pub fn parse_signatories(electors: &[ElectorJson]) -> Vec<Elector> {
    electors
        .iter()
        .map(|e| Elector {
            first_name: e.first_name.clone(),
            last_name: e.last_name.clone(),
        })
        .collect()
}

pub fn format_electors(electors: &[Elector]) -> Vec<ElectorJson> {
    electors
        .iter()
        .map(|e| ElectorJson {
            first_name: e.first_name.trim().to_string(),
            last_name: e.last_name.trim().to_string(),
        })
        .collect()
}

pub fn parse_round(json: &RoundJson) -> Round {
    Round {
        number: json.number,
        actual_count: json.actual_count,
        expected_count: json.expected_count,
        disagreements: sum_counts(&json.disagreements),
        discrepancies: sum_counts(&json.discrepancies),
        signatories: parse_signatories(&json.signatories),
        start_audit_prefix_length: json.start_audit_prefix_length,
        start_index: json.start_index,
        start_time: parse_timestamp(json.start_time.as_deref()),
    }
}

pub fn parse_rounds(rounds: &[RoundJson]) -> Vec<Round> {
    rounds.iter().map(parse_round).collect()
}

pub fn parse_election(info: &AuditInfoJson) -> Election {
    Election {
        date: parse_timestamp(info.election_date.as_deref()),
        kind: info.election_type,
    }
}

fn parse_import_status(json: &CvrImportStatusJson) -> CvrImportStatus {
    CvrImportStatus {
        state: json.import_state.unwrap_or(CvrImportState::NotAttempted),
        error: json.error_message.clone(),
        timestamp: parse_timestamp(json.timestamp.as_deref()),
    }
}

/// Resolves contest ids against known definitions. Until definitions have
/// been fetched there is nothing to resolve against, so the list is empty.
fn resolve_contests(ids: &[ContestId], defs: &BTreeMap<ContestId, Contest>) -> Vec<Contest> {
    if defs.is_empty() {
        return Vec::new();
    }
    ids.iter().filter_map(|id| defs.get(id).cloned()).collect()
}

fn resolve_contests_under_audit(
    json: &CountyDashboardJson,
    defs: &BTreeMap<ContestId, Contest>,
) -> Vec<ContestUnderAudit> {
    json.contests_under_audit
        .iter()
        .filter_map(|(id, reason)| {
            defs.get(id).map(|contest| ContestUnderAudit {
                contest: contest.clone(),
                reason: *reason,
            })
        })
        .collect()
}

pub fn parse_dashboard(
    json: &CountyDashboardJson,
    contest_defs: &BTreeMap<ContestId, Contest>,
) -> CountyDashboard {
    CountyDashboard {
        id: json.id,
        asm_state: json.asm_state,
        audit_board_asm_state: json.audit_board_asm_state,
        audit_board: json
            .audit_board
            .as_ref()
            .map(|board| board.members.iter().map(parse_board_member).collect())
            .unwrap_or_else(AuditBoard::new),
        audit_time: parse_timestamp(json.audit_time.as_deref()),
        audited_ballot_count: json.audited_ballot_count,
        audited_prefix_length: json.audited_prefix_length,
        ballot_manifest: json.ballot_manifest_file.as_ref().map(parse_uploaded_file),
        ballot_manifest_count: json.ballot_manifest_count,
        ballot_under_audit_id: json.ballot_under_audit_id,
        ballots_remaining_in_round: json.ballots_remaining_in_round,
        contests: resolve_contests(&json.contests, contest_defs),
        contests_under_audit: resolve_contests_under_audit(json, contest_defs),
        current_round: json.current_round.as_ref().map(parse_round),
        cvr_export: json.cvr_export_file.as_ref().map(parse_uploaded_file),
        cvr_export_count: json.cvr_export_count,
        cvr_import_status: json.cvr_import_status.as_ref().map(parse_import_status),
        disagreement_count: sum_counts(&json.disagreement_count),
        discrepancy_count: sum_counts(&json.discrepancy_count),
        election: json.audit_info.as_ref().map(parse_election),
        estimated_ballots_to_audit: json.estimated_ballots_to_audit,
        general_information: json.general_information.clone(),
        risk_limit: json.audit_info.as_ref().and_then(|info| info.risk_limit),
        rounds: parse_rounds(&json.rounds),
        status: json.status,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared::domain::{AuditReason, CountyAsmState, CountyId, ElectionType, HashStatus};

    use super::*;

    fn contest(id: i64, name: &str) -> Contest {
        Contest {
            id: ContestId(id),
            county_id: Some(CountyId(1)),
            name: name.into(),
            description: String::new(),
            choices: vec![],
            votes_allowed: Some(1),
        }
    }

    #[test]
    fn empty_dashboard_parses_to_safe_defaults() {
        let dashboard = parse_dashboard(&CountyDashboardJson::default(), &BTreeMap::new());
        assert_eq!(dashboard, CountyDashboard::default());
        assert!(dashboard.audit_board.is_empty());
        assert!(dashboard.rounds.is_empty());
        assert!(dashboard.current_round.is_none());
        assert_eq!(dashboard.discrepancy_count, 0);
    }

    #[test]
    fn full_dashboard_parses_files_rounds_and_contests() {
        let raw = json!({
            "id": 1,
            "asm_state": "COUNTY_AUDIT_UNDERWAY",
            "audit_board": {
                "members": [
                    {"first_name": "Ann", "last_name": "Lee", "political_party": "Democratic"},
                    {"first_name": "Bo", "last_name": "Ng", "political_party": "Republican"}
                ],
                "sign_in_time": "2017-11-20T10:00:00Z"
            },
            "ballot_manifest_file": {
                "file_id": 10, "filename": "manifest.csv", "hash": "abc",
                "hash_status": "VERIFIED", "approximate_record_count": 12
            },
            "contests": [1, 2, 3],
            "contests_under_audit": {"2": "COUNTY_WIDE_CONTEST"},
            "current_round": {
                "number": 1, "expected_count": 10, "actual_count": 4,
                "signatories": [{"first_name": "Ann", "last_name": "Lee"}]
            },
            "rounds": [{"number": 1}],
            "disagreement_count": {"COMPARISON": 1},
            "discrepancy_count": {"COMPARISON": 2, "OPPORTUNISTIC": 1},
            "audit_info": {
                "election_date": "2017-11-07T00:00:00Z",
                "election_type": "general",
                "risk_limit": 0.05
            }
        });
        let json: CountyDashboardJson = serde_json::from_value(raw).expect("decode");
        let defs: BTreeMap<_, _> = [contest(1, "Mayor"), contest(2, "Sheriff")]
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let dashboard = parse_dashboard(&json, &defs);
        assert_eq!(dashboard.asm_state, Some(CountyAsmState::CountyAuditUnderway));
        assert_eq!(dashboard.audit_board.len(), 2);
        assert_eq!(dashboard.audit_board[1].party, "Republican");
        let manifest = dashboard.ballot_manifest.expect("manifest");
        assert_eq!(manifest.name, "manifest.csv");
        assert_eq!(manifest.hash_status, Some(HashStatus::Verified));
        assert_eq!(
            dashboard.contests.iter().map(|c| c.id.0).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(dashboard.contests_under_audit.len(), 1);
        assert_eq!(
            dashboard.contests_under_audit[0].reason,
            AuditReason::CountyWideContest
        );
        assert_eq!(dashboard.current_round.expect("round").signatories.len(), 1);
        assert_eq!(dashboard.disagreement_count, 1);
        assert_eq!(dashboard.discrepancy_count, 3);
        assert_eq!(dashboard.risk_limit, Some(0.05));
        assert_eq!(
            dashboard.election.expect("election").kind,
            Some(ElectionType::General)
        );
    }

    #[test]
    fn contests_are_empty_until_definitions_arrive() {
        let json = CountyDashboardJson {
            contests: vec![ContestId(1)],
            ..Default::default()
        };
        assert!(parse_dashboard(&json, &BTreeMap::new()).contests.is_empty());
    }

    #[test]
    fn board_format_trims_names() {
        let json = format_audit_board(&[AuditBoardMember {
            first_name: " Ann ".into(),
            last_name: "Lee ".into(),
            party: "Unaffiliated".into(),
        }]);
        assert_eq!(json[0].first_name, "Ann");
        assert_eq!(json[0].last_name, "Lee");
    }
}
