//! Start/stop polling loops. A start action begins a loop that runs one
//! tick immediately and then waits a state-dependent delay; the matching
//! stop action aborts it.

use std::time::Duration;

use shared::domain::AuditBoardAsmState;

use super::{Effect, RefreshTarget, Saga, Take};
use crate::{
    action::{Action, PollControl},
    config::ClientSettings,
    selector,
    state::AppState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollDelays {
    pub poll: Duration,
    pub uploading: Duration,
}

impl From<&ClientSettings> for PollDelays {
    fn from(settings: &ClientSettings) -> Self {
        Self {
            poll: settings.poll_delay,
            uploading: settings.uploading_poll_delay,
        }
    }
}

impl Default for PollDelays {
    fn default() -> Self {
        Self::from(&ClientSettings::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollKind {
    CountyDashboard,
    CountyAudit,
    DosDashboard,
}

impl PollKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::CountyDashboard => "county-dashboard",
            Self::CountyAudit => "county-audit",
            Self::DosDashboard => "dos-dashboard",
        }
    }

    fn control(self, action: &Action) -> Option<PollControl> {
        match (self, action) {
            (Self::CountyDashboard, Action::CountyDashboardPoll(c))
            | (Self::CountyAudit, Action::CountyAuditPoll(c))
            | (Self::DosDashboard, Action::DosDashboardPoll(c)) => Some(*c),
            _ => None,
        }
    }
}

pub struct PollSaga {
    kind: PollKind,
}

impl PollSaga {
    pub fn new(kind: PollKind) -> Self {
        Self { kind }
    }
}

impl Saga for PollSaga {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn take(&self) -> Take {
        Take::Latest
    }

    fn react(&self, action: &Action, _state: &AppState) -> Option<Vec<Effect>> {
        match self.kind.control(action)? {
            PollControl::Start => Some(vec![Effect::Poll(self.kind)]),
            PollControl::Stop => Some(Vec::new()),
        }
    }
}

/// Effects of one poll iteration against the current state.
pub fn tick(kind: PollKind, state: &AppState) -> Vec<Effect> {
    match kind {
        PollKind::CountyDashboard => {
            let Some(county) = state.as_county() else {
                return Vec::new();
            };
            let mut effects = vec![Effect::Refresh(RefreshTarget::County)];
            if let Some(id) = county.id() {
                effects.push(Effect::FetchCountyContests(id));
            }
            effects
        }
        PollKind::CountyAudit => {
            let waiting = state.as_county().is_some_and(|county| {
                matches!(
                    county.asm.audit_board,
                    Some(
                        AuditBoardAsmState::WaitingForRoundStart
                            | AuditBoardAsmState::WaitingForRoundStartNoAuditBoard
                    )
                )
            });
            if waiting {
                vec![Effect::Refresh(RefreshTarget::County)]
            } else {
                Vec::new()
            }
        }
        PollKind::DosDashboard => {
            if state.as_dos().is_some() {
                vec![Effect::Refresh(RefreshTarget::Dos)]
            } else {
                Vec::new()
            }
        }
    }
}

pub fn delay(kind: PollKind, state: &AppState, delays: &PollDelays) -> Duration {
    let uploading = kind == PollKind::CountyDashboard
        && state
            .as_county()
            .is_some_and(selector::county::cvr_export_uploading);
    if uploading {
        delays.uploading
    } else {
        delays.poll
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::{CountyAsmState, CountyId};

    use super::*;
    use crate::state::{CountyState, DosState};

    fn county_with_id() -> CountyState {
        let mut county = CountyState::default();
        county.dashboard.id = Some(CountyId(4));
        county
    }

    #[test]
    fn start_and_stop_are_reactions() {
        let saga = PollSaga::new(PollKind::DosDashboard);
        let state = AppState::default();
        assert_eq!(
            saga.react(&Action::DosDashboardPoll(PollControl::Start), &state),
            Some(vec![Effect::Poll(PollKind::DosDashboard)])
        );
        assert_eq!(
            saga.react(&Action::DosDashboardPoll(PollControl::Stop), &state),
            Some(vec![])
        );
        assert_eq!(
            saga.react(&Action::CountyAuditPoll(PollControl::Start), &state),
            None
        );
    }

    #[test]
    fn county_dashboard_tick_fetches_contests_once_id_is_known() {
        let state = AppState::County(CountyState::default());
        assert_eq!(
            tick(PollKind::CountyDashboard, &state),
            vec![Effect::Refresh(RefreshTarget::County)]
        );

        let state = AppState::County(county_with_id());
        assert_eq!(
            tick(PollKind::CountyDashboard, &state),
            vec![
                Effect::Refresh(RefreshTarget::County),
                Effect::FetchCountyContests(CountyId(4))
            ]
        );
    }

    #[test]
    fn audit_tick_only_while_waiting_for_round() {
        let mut county = county_with_id();
        county.asm.audit_board = Some(AuditBoardAsmState::RoundInProgress);
        assert!(tick(PollKind::CountyAudit, &AppState::County(county.clone())).is_empty());

        county.asm.audit_board = Some(AuditBoardAsmState::WaitingForRoundStartNoAuditBoard);
        assert_eq!(
            tick(PollKind::CountyAudit, &AppState::County(county)),
            vec![Effect::Refresh(RefreshTarget::County)]
        );
    }

    #[test]
    fn ticks_do_nothing_for_the_wrong_dashboard() {
        assert!(tick(PollKind::DosDashboard, &AppState::default()).is_empty());
        assert!(tick(PollKind::CountyDashboard, &AppState::Dos(DosState::default())).is_empty());
    }

    #[test]
    fn delay_shortens_while_cvrs_import() {
        let delays = PollDelays {
            poll: Duration::from_secs(5),
            uploading: Duration::from_secs(1),
        };
        let mut county = county_with_id();
        let idle = AppState::County(county.clone());
        assert_eq!(delay(PollKind::CountyDashboard, &idle, &delays), delays.poll);

        county.asm.county = Some(CountyAsmState::CvrsImporting);
        let importing = AppState::County(county);
        assert_eq!(
            delay(PollKind::CountyDashboard, &importing, &delays),
            delays.uploading
        );
        assert_eq!(delay(PollKind::CountyAudit, &importing, &delays), delays.poll);
    }
}
