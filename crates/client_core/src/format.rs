//! Human-readable labels for opaque server states.

use shared::domain::{AuditBoardAsmState, CountyAsmState, DosAsmState, ElectionType};

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn election_type(kind: ElectionType) -> String {
    format!("{} Election", capitalize(kind.as_str()))
}

pub fn county_asm_state(state: CountyAsmState) -> &'static str {
    match state {
        CountyAsmState::CountyInitialState => "Not started",
        CountyAsmState::CountyAuthenticated => "Logged in",
        CountyAsmState::BallotManifestOk => "Ballot manifest uploaded",
        CountyAsmState::CvrsImporting => "Importing CVR export",
        CountyAsmState::CvrsOk => "CVR export uploaded",
        CountyAsmState::BallotManifestOkAndCvrsImporting => {
            "Ballot manifest uploaded, importing CVR export"
        }
        CountyAsmState::BallotManifestAndCvrsOk => "Ballot manifest and CVR export uploaded",
        CountyAsmState::CountyAuditUnderway => "Audit underway",
        CountyAsmState::CountyAuditComplete => "Audit complete",
        CountyAsmState::DeadlineMissed => "File upload deadline missed",
        CountyAsmState::Unknown => "",
    }
}

/// While the audit is underway the board state says more than the county
/// state does.
pub fn county_and_board_asm_state(
    county: CountyAsmState,
    board: Option<AuditBoardAsmState>,
) -> &'static str {
    if county != CountyAsmState::CountyAuditUnderway {
        return county_asm_state(county);
    }
    match board {
        Some(
            AuditBoardAsmState::WaitingForRoundStart
            | AuditBoardAsmState::WaitingForRoundStartNoAuditBoard,
        ) => "Waiting for round start",
        Some(
            AuditBoardAsmState::RoundInProgress | AuditBoardAsmState::RoundInProgressNoAuditBoard,
        ) => "Round in progress",
        Some(
            AuditBoardAsmState::WaitingForRoundSignOff
            | AuditBoardAsmState::WaitingForRoundSignOffNoAuditBoard,
        ) => "Waiting for round sign-off",
        Some(AuditBoardAsmState::AuditComplete) => "Audit complete",
        Some(AuditBoardAsmState::UnableToAudit) => "Unable to audit",
        _ => "—",
    }
}

pub fn dos_asm_state(state: DosAsmState) -> &'static str {
    match state {
        DosAsmState::DosInitialState => "Not started",
        DosAsmState::DosAuthenticated => "Logged in",
        DosAsmState::RiskLimitsSet => "Risk limit set",
        DosAsmState::ContestsToAuditIdentified => "Contests to audit selected",
        DosAsmState::DataToAuditPublished => "Data to audit published",
        DosAsmState::RandomSeedPublished => "Random seed published",
        DosAsmState::BallotOrderDefined => "Ballot order defined",
        DosAsmState::AuditReadyToStart => "Ready to start",
        DosAsmState::DosAuditOngoing => "Audit ongoing",
        DosAsmState::DosRoundComplete => "Round complete",
        DosAsmState::DosAuditComplete => "Audit complete",
        DosAsmState::AuditResultsPublished => "Results published",
        DosAsmState::Unknown => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn election_types_are_title_cased() {
        assert_eq!(election_type(ElectionType::General), "General Election");
        assert_eq!(election_type(ElectionType::Recall), "Recall Election");
    }

    #[test]
    fn board_state_refines_audit_underway() {
        assert_eq!(
            county_and_board_asm_state(
                CountyAsmState::CountyAuditUnderway,
                Some(AuditBoardAsmState::WaitingForRoundSignOffNoAuditBoard)
            ),
            "Waiting for round sign-off"
        );
        assert_eq!(
            county_and_board_asm_state(CountyAsmState::CountyAuditUnderway, None),
            "—"
        );
        assert_eq!(
            county_and_board_asm_state(
                CountyAsmState::DeadlineMissed,
                Some(AuditBoardAsmState::RoundInProgress)
            ),
            "File upload deadline missed"
        );
    }
}
