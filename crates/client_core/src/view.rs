//! Which screen to show for a given state. These are the routing decisions
//! a front end makes on every render.

use shared::domain::DosAsmState;

use crate::{
    selector::county as county_sel,
    state::{CountyState, DosState},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountyDashboardView {
    Loading,
    MissedDeadline,
    Dashboard {
        can_sign_in: bool,
        can_audit: bool,
        can_render_report: bool,
        audit_started: bool,
        all_rounds_complete: bool,
    },
}

pub fn county_dashboard_view(state: &CountyState) -> CountyDashboardView {
    if county_sel::missed_deadline(state) {
        return CountyDashboardView::MissedDeadline;
    }
    if state.id().is_none() {
        return CountyDashboardView::Loading;
    }
    CountyDashboardView::Dashboard {
        can_sign_in: county_sel::can_sign_in(state),
        can_audit: county_sel::can_audit(state),
        can_render_report: county_sel::can_render_report(state),
        audit_started: county_sel::audit_started(state),
        all_rounds_complete: county_sel::all_rounds_complete(state),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountyAuditView {
    /// Show "The audit is complete." and return to the dashboard.
    AuditComplete,
    BackToDashboard,
    EndOfRound { audit_board_done: bool },
    Wizard,
}

pub fn county_audit_view(state: &CountyState) -> CountyAuditView {
    if county_sel::audit_complete(state) {
        return CountyAuditView::AuditComplete;
    }
    if !county_sel::can_audit(state) {
        return CountyAuditView::BackToDashboard;
    }
    let audit_board_done = county_sel::is_audit_board_done(state);
    if county_sel::all_rounds_complete(state)
        || !county_sel::round_in_progress(state)
        || audit_board_done
    {
        return CountyAuditView::EndOfRound { audit_board_done };
    }
    CountyAuditView::Wizard
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditBoardView {
    SignIn,
    SignedIn { has_audited_any_ballot: bool },
}

pub fn audit_board_view(state: &CountyState) -> AuditBoardView {
    if county_sel::audit_board_signed_in(state) {
        AuditBoardView::SignedIn {
            has_audited_any_ballot: county_sel::has_audited_any_ballot(state),
        }
    } else {
        AuditBoardView::SignIn
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DosDefineAuditView {
    Loading,
    AuditOngoing,
    Define,
}

pub fn dos_define_audit_view(state: &DosState) -> DosDefineAuditView {
    match state.asm {
        None => DosDefineAuditView::Loading,
        Some(DosAsmState::DosAuditOngoing) => DosDefineAuditView::AuditOngoing,
        Some(_) => DosDefineAuditView::Define,
    }
}
