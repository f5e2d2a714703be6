use std::collections::BTreeMap;

use shared::domain::{AuditReason, ContestId, CountyId, DosAsmState};

use crate::{model::ContestSelection, state::DosState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionWarning {
    NoStateWideContest,
    NoCountyWideContest,
}

impl SelectionWarning {
    pub fn message(self) -> &'static str {
        match self {
            Self::NoStateWideContest => "No state-wide contest has been selected for audit.",
            Self::NoCountyWideContest => "No county-wide contest has been selected for audit.",
        }
    }
}

pub fn audit_started(state: &DosState) -> bool {
    matches!(
        state.asm,
        Some(
            DosAsmState::DosAuditOngoing
                | DosAsmState::DosRoundComplete
                | DosAsmState::DosAuditComplete
                | DosAsmState::AuditResultsPublished
        )
    )
}

pub fn can_start_next_round(state: &DosState) -> bool {
    state.asm == Some(DosAsmState::DosRoundComplete)
}

/// Everything the state needs before ballots to audit can be published.
pub fn audit_defined(state: &DosState) -> bool {
    let dashboard = &state.dashboard;
    dashboard.risk_limit.is_some()
        && dashboard.seed.as_deref().is_some_and(|seed| !seed.is_empty())
        && dashboard.election.is_some()
        && !dashboard.audited_contests.is_empty()
}

pub fn county_discrepancy_total(state: &DosState, county_id: CountyId) -> i64 {
    state
        .dashboard
        .discrepancy_counts
        .get(&county_id)
        .map(|counts| counts.values().sum())
        .unwrap_or(0)
}

pub fn contest_selection_warnings(
    selections: &BTreeMap<ContestId, ContestSelection>,
) -> Vec<SelectionWarning> {
    let selected = |reason: AuditReason| {
        selections
            .values()
            .any(|selection| selection.audit && selection.reason == reason)
    };

    let mut warnings = Vec::new();
    if !selected(AuditReason::StateWideContest) {
        warnings.push(SelectionWarning::NoStateWideContest);
    }
    if !selected(AuditReason::CountyWideContest) {
        warnings.push(SelectionWarning::NoCountyWideContest);
    }
    warnings
}
