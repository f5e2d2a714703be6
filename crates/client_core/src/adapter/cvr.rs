use serde_json::Value;
use shared::{
    domain::{Consensus, RecordType},
    protocol::{AcvrSubmissionJson, BallotNotFoundJson, ContestInfoJson, CvrJson, CvrToAuditJson},
};

use crate::model::{Acvr, AcvrContestMarks, CurrentBallot, CvrToAudit};

pub fn parse_current_ballot(json: &CvrJson) -> CurrentBallot {
    CurrentBallot {
        id: json.id,
        county_id: json.county_id,
        scanner_id: json.scanner_id,
        batch_id: json.batch_id.clone(),
        record_id: json.record_id,
        imprinted_id: json.imprinted_id.clone(),
        cvr_number: json.cvr_number,
        ballot_type: json.ballot_type.clone(),
        record_type: json.record_type,
        contest_info: json.contest_info.clone(),
        submitted: false,
    }
}

pub fn parse_cvr_to_audit(json: &CvrToAuditJson) -> CvrToAudit {
    CvrToAudit {
        db_id: json.db_id,
        audit_sequence_number: json.audit_sequence_number,
        scanner_id: json.scanner_id,
        batch_id: json.batch_id.clone(),
        record_id: json.record_id,
        imprinted_id: json.imprinted_id.clone(),
        cvr_number: json.cvr_number,
        ballot_type: json.ballot_type.clone(),
        storage_location: json.storage_location.clone(),
        audit_board_index: json.audit_board_index,
        audited: json.audited,
    }
}

pub fn parse_cvrs_to_audit(list: &[CvrToAuditJson]) -> Vec<CvrToAudit> {
    list.iter().map(parse_cvr_to_audit).collect()
}

/// One blank mark set per contest on the ballot.
pub fn empty_acvr(ballot: &CurrentBallot) -> Acvr {
    ballot
        .contest_info
        .iter()
        .map(|info| (info.contest, AcvrContestMarks::default()))
        .collect()
}

fn format_contest_info(
    info: &ContestInfoJson,
    marks: Option<&AcvrContestMarks>,
) -> ContestInfoJson {
    let marks = marks.cloned().unwrap_or_default();
    let choices = if marks.no_consensus {
        Vec::new()
    } else {
        marks.marked_choices()
    };
    ContestInfoJson {
        contest: info.contest,
        choices,
        comment: Some(marks.comments.clone()),
        consensus: Some(if marks.no_consensus {
            Consensus::No
        } else {
            Consensus::Yes
        }),
    }
}

/// Builds the `upload-audit-cvr` body from the ballot and the board's marks.
pub fn format_acvr(ballot: &CurrentBallot, acvr: &Acvr) -> AcvrSubmissionJson {
    let audit_cvr = CvrJson {
        id: ballot.id,
        county_id: ballot.county_id,
        scanner_id: ballot.scanner_id,
        batch_id: ballot.batch_id.clone(),
        record_id: ballot.record_id,
        imprinted_id: ballot.imprinted_id.clone(),
        cvr_number: ballot.cvr_number,
        ballot_type: ballot.ballot_type.clone(),
        record_type: Some(RecordType::AuditorEntered),
        contest_info: ballot
            .contest_info
            .iter()
            .map(|info| format_contest_info(info, acvr.get(&info.contest)))
            .collect(),
        timestamp: Value::Null,
    };
    AcvrSubmissionJson {
        cvr_id: ballot.id,
        audit_cvr,
    }
}

pub fn format_ballot_not_found(ballot: &CurrentBallot) -> BallotNotFoundJson {
    BallotNotFoundJson { id: ballot.id }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared::domain::{ContestId, CvrId};

    use super::*;

    fn ballot() -> CurrentBallot {
        let json: CvrJson = serde_json::from_value(json!({
            "id": 77,
            "scanner_id": 1,
            "batch_id": 4,
            "record_id": 9,
            "imprinted_id": "1-4-9",
            "ballot_type": "12",
            "record_type": "UPLOADED",
            "contest_info": [
                {"contest": 1, "choices": ["Alice"]},
                {"contest": 2, "choices": ["Yes"]}
            ]
        }))
        .expect("decode");
        parse_current_ballot(&json)
    }

    #[test]
    fn parsed_ballot_starts_unsubmitted() {
        let ballot = ballot();
        assert_eq!(ballot.id, CvrId(77));
        assert_eq!(ballot.batch_id, "4");
        assert!(!ballot.submitted);
        assert_eq!(empty_acvr(&ballot).len(), 2);
    }

    #[test]
    fn acvr_format_marks_consensus_and_auditor_entry() {
        let ballot = ballot();
        let mut acvr = empty_acvr(&ballot);
        if let Some(marks) = acvr.get_mut(&ContestId(1)) {
            marks.choices.insert("Bob".into(), true);
            marks.choices.insert("Alice".into(), false);
            marks.comments = "smudged".into();
        }
        if let Some(marks) = acvr.get_mut(&ContestId(2)) {
            marks.choices.insert("Yes".into(), true);
            marks.no_consensus = true;
        }

        let body = format_acvr(&ballot, &acvr);
        assert_eq!(body.cvr_id, CvrId(77));
        assert_eq!(body.audit_cvr.record_type, Some(RecordType::AuditorEntered));
        let first = &body.audit_cvr.contest_info[0];
        assert_eq!(first.choices, vec!["Bob".to_string()]);
        assert_eq!(first.comment.as_deref(), Some("smudged"));
        assert_eq!(first.consensus, Some(Consensus::Yes));
        let second = &body.audit_cvr.contest_info[1];
        assert!(second.choices.is_empty());
        assert_eq!(second.consensus, Some(Consensus::No));

        let wire = serde_json::to_value(&body).expect("encode");
        assert_eq!(wire["audit_cvr"]["record_type"], "AUDITOR_ENTERED");
        assert!(wire["audit_cvr"].get("timestamp").is_none());
    }
}
