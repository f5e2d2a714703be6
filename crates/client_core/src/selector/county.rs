use shared::domain::{AuditBoardAsmState, CountyAsmState, CvrImportState};

use crate::{
    model::{Acvr, AuditBoardMember, Round},
    state::CountyState,
};

const BOARD_SIZE: usize = 2;
const SIGN_OFF_SIGNATURES: usize = 2;

pub fn is_valid_audit_board(board: &[AuditBoardMember]) -> bool {
    board.len() == BOARD_SIZE
        && board.iter().all(|member| {
            !member.first_name.trim().is_empty()
                && !member.last_name.trim().is_empty()
                && !member.party.is_empty()
        })
}

fn board_state(state: &CountyState) -> Option<AuditBoardAsmState> {
    state.asm.audit_board
}

fn county_state(state: &CountyState) -> Option<CountyAsmState> {
    state.asm.county
}

pub fn audit_board_signed_in(state: &CountyState) -> bool {
    matches!(
        board_state(state),
        Some(
            AuditBoardAsmState::WaitingForRoundStart
                | AuditBoardAsmState::RoundInProgress
                | AuditBoardAsmState::WaitingForRoundSignOff
        )
    )
}

pub fn can_sign_in(state: &CountyState) -> bool {
    matches!(
        board_state(state),
        Some(
            AuditBoardAsmState::WaitingForRoundStartNoAuditBoard
                | AuditBoardAsmState::RoundInProgressNoAuditBoard
                | AuditBoardAsmState::WaitingForRoundSignOffNoAuditBoard
        )
    )
}

pub fn can_audit(state: &CountyState) -> bool {
    board_state(state) == Some(AuditBoardAsmState::RoundInProgress)
}

pub fn round_in_progress(state: &CountyState) -> bool {
    matches!(
        board_state(state),
        Some(AuditBoardAsmState::RoundInProgress | AuditBoardAsmState::RoundInProgressNoAuditBoard)
    )
}

pub fn audit_started(state: &CountyState) -> bool {
    matches!(
        county_state(state),
        Some(CountyAsmState::CountyAuditUnderway | CountyAsmState::CountyAuditComplete)
    )
}

pub fn audit_complete(state: &CountyState) -> bool {
    county_state(state) == Some(CountyAsmState::CountyAuditComplete)
}

/// True once at least one round ran and every round met its expected count,
/// with no round currently open.
pub fn all_rounds_complete(state: &CountyState) -> bool {
    let rounds = &state.dashboard.rounds;
    !rounds.is_empty()
        && !round_in_progress(state)
        && rounds.iter().all(|round| {
            matches!(
                (round.actual_count, round.expected_count),
                (Some(actual), Some(expected)) if actual >= expected
            )
        })
}

pub fn is_audit_board_done(state: &CountyState) -> bool {
    round_in_progress(state) && state.dashboard.ballots_remaining_in_round == Some(0)
}

pub fn current_round_number(state: &CountyState) -> Option<u32> {
    state.dashboard.current_round.as_ref()?.number
}

/// The most recent round that is not the one currently open.
pub fn previous_round(state: &CountyState) -> Option<&Round> {
    let rounds = &state.dashboard.rounds;
    match current_round_number(state) {
        Some(current) if round_in_progress(state) => rounds
            .iter()
            .rev()
            .find(|round| round.number.is_some_and(|n| n < current)),
        _ => rounds.last(),
    }
}

pub fn round_signed_off(round: &Round) -> bool {
    round.signatories.len() >= SIGN_OFF_SIGNATURES
}

pub fn has_audited_any_ballot(state: &CountyState) -> bool {
    state.dashboard.audited_ballot_count.unwrap_or(0) > 0
        || state
            .dashboard
            .rounds
            .iter()
            .any(|round| round.actual_count.unwrap_or(0) > 0)
}

pub fn missed_deadline(state: &CountyState) -> bool {
    county_state(state) == Some(CountyAsmState::DeadlineMissed)
}

pub fn can_render_report(state: &CountyState) -> bool {
    audit_started(state)
}

/// Covers the upload itself and the server-side import that follows it.
pub fn cvr_export_uploading(state: &CountyState) -> bool {
    state.uploading_cvr_export
        || matches!(
            county_state(state),
            Some(CountyAsmState::CvrsImporting | CountyAsmState::BallotManifestOkAndCvrsImporting)
        )
        || state
            .dashboard
            .cvr_import_status
            .as_ref()
            .is_some_and(|status| status.state == CvrImportState::InProgress)
}

pub fn ballot_manifest_uploading(state: &CountyState) -> bool {
    state.uploading_ballot_manifest
}

/// Every contest on the ballot has a choice, or is explicitly marked as
/// having no consensus or no mark.
pub fn acvr_is_complete(acvr: &Acvr) -> bool {
    !acvr.is_empty()
        && acvr.values().all(|marks| {
            marks.no_consensus || marks.no_mark || marks.choices.values().any(|checked| *checked)
        })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use shared::domain::ContestId;

    use super::*;
    use crate::{
        model::{AcvrContestMarks, CvrImportStatus, Elector},
        state::CountyAsm,
    };

    fn member(first: &str, last: &str, party: &str) -> AuditBoardMember {
        AuditBoardMember {
            first_name: first.into(),
            last_name: last.into(),
            party: party.into(),
        }
    }

    fn with_asm(county: CountyAsmState, board: AuditBoardAsmState) -> CountyState {
        CountyState {
            asm: CountyAsm {
                county: Some(county),
                audit_board: Some(board),
            },
            ..Default::default()
        }
    }

    #[test]
    fn audit_board_needs_two_complete_members() {
        let full = vec![
            member("Ada", "Lovelace", "Democratic Party"),
            member("Alan", "Turing", "Unaffiliated"),
        ];
        assert!(is_valid_audit_board(&full));

        let blank_name = vec![full[0].clone(), member("   ", "Turing", "Unaffiliated")];
        assert!(!is_valid_audit_board(&blank_name));

        let no_party = vec![full[0].clone(), member("Alan", "Turing", "")];
        assert!(!is_valid_audit_board(&no_party));

        assert!(!is_valid_audit_board(&full[..1]));
        assert!(!is_valid_audit_board(&[]));
    }

    #[test]
    fn empty_state_is_safe() {
        let state = CountyState::default();
        assert!(!audit_board_signed_in(&state));
        assert!(!can_sign_in(&state));
        assert!(!can_audit(&state));
        assert!(!audit_started(&state));
        assert!(!all_rounds_complete(&state));
        assert!(!has_audited_any_ballot(&state));
        assert!(!cvr_export_uploading(&state));
        assert_eq!(current_round_number(&state), None);
        assert!(previous_round(&state).is_none());
    }

    #[test]
    fn board_states_drive_sign_in_and_audit() {
        let waiting = with_asm(
            CountyAsmState::CountyAuditUnderway,
            AuditBoardAsmState::RoundInProgressNoAuditBoard,
        );
        assert!(can_sign_in(&waiting));
        assert!(!audit_board_signed_in(&waiting));
        assert!(round_in_progress(&waiting));
        assert!(!can_audit(&waiting));

        let auditing = with_asm(
            CountyAsmState::CountyAuditUnderway,
            AuditBoardAsmState::RoundInProgress,
        );
        assert!(can_audit(&auditing));
        assert!(audit_board_signed_in(&auditing));
        assert!(audit_started(&auditing));
        assert!(can_render_report(&auditing));
    }

    #[test]
    fn board_is_done_when_no_ballots_remain() {
        let mut state = with_asm(
            CountyAsmState::CountyAuditUnderway,
            AuditBoardAsmState::RoundInProgress,
        );
        state.dashboard.ballots_remaining_in_round = Some(2);
        assert!(!is_audit_board_done(&state));
        state.dashboard.ballots_remaining_in_round = Some(0);
        assert!(is_audit_board_done(&state));
    }

    #[test]
    fn rounds_complete_and_previous_round() {
        let mut state = with_asm(
            CountyAsmState::CountyAuditUnderway,
            AuditBoardAsmState::WaitingForRoundStart,
        );
        state.dashboard.rounds = vec![
            Round {
                number: Some(1),
                actual_count: Some(10),
                expected_count: Some(10),
                signatories: vec![Elector::default(), Elector::default()],
                ..Default::default()
            },
            Round {
                number: Some(2),
                actual_count: Some(4),
                expected_count: Some(4),
                ..Default::default()
            },
        ];
        assert!(all_rounds_complete(&state));
        assert!(has_audited_any_ballot(&state));
        assert_eq!(previous_round(&state).and_then(|r| r.number), Some(2));
        assert!(round_signed_off(&state.dashboard.rounds[0]));
        assert!(!round_signed_off(&state.dashboard.rounds[1]));

        state.asm.audit_board = Some(AuditBoardAsmState::RoundInProgress);
        state.dashboard.current_round = Some(state.dashboard.rounds[1].clone());
        assert!(!all_rounds_complete(&state));
        assert_eq!(current_round_number(&state), Some(2));
        assert_eq!(previous_round(&state).and_then(|r| r.number), Some(1));
    }

    #[test]
    fn cvr_import_counts_as_uploading() {
        let mut state = CountyState::default();
        state.dashboard.cvr_import_status = Some(CvrImportStatus {
            state: CvrImportState::InProgress,
            error: None,
            timestamp: None,
        });
        assert!(cvr_export_uploading(&state));
        assert!(!ballot_manifest_uploading(&state));
    }

    #[test]
    fn acvr_completeness() {
        let mut acvr: Acvr = BTreeMap::new();
        assert!(!acvr_is_complete(&acvr));

        let mut marks = AcvrContestMarks::default();
        marks.choices.insert("Yes".into(), false);
        acvr.insert(ContestId(1), marks.clone());
        assert!(!acvr_is_complete(&acvr));

        marks.no_mark = true;
        acvr.insert(ContestId(1), marks);
        assert!(acvr_is_complete(&acvr));

        let mut chosen = AcvrContestMarks::default();
        chosen.choices.insert("No".into(), true);
        acvr.insert(ContestId(2), chosen);
        assert!(acvr_is_complete(&acvr));
    }
}
