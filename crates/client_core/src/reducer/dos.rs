use crate::{
    action::{Action, Fetched, Submitted},
    adapter::{contest, dos, parse_timestamp, risk_limit},
    state::DosState,
};

pub(super) fn reduce(state: &DosState, action: &Action) -> Option<DosState> {
    match action {
        Action::DosDashboardRefresh(Fetched::Ok(json)) => {
            let mut next = state.clone();
            next.dashboard = dos::parse_dashboard(json);
            if let Some(asm) = json.asm_state {
                next.asm = Some(asm);
            }
            Some(next)
        }
        Action::DosFetchContests(Fetched::Ok(list)) => {
            let mut next = state.clone();
            next.contests = contest::pivot(list);
            Some(next)
        }
        Action::FetchDosAsmState(Fetched::Ok(response)) => {
            let current = response.current_state?;
            let mut next = state.clone();
            next.asm = Some(current);
            Some(next)
        }
        Action::SetRiskLimit(Submitted::Ok(data)) => {
            let mut next = state.clone();
            next.dashboard.risk_limit = Some(risk_limit::parse(&data.sent));
            Some(next)
        }
        Action::UploadRandomSeed(Submitted::Ok(data)) => {
            let mut next = state.clone();
            next.dashboard.seed = Some(data.sent.seed.clone());
            Some(next)
        }
        Action::SetAuditInfo(Submitted::Ok(data)) => {
            let sent = &data.sent;
            let mut next = state.clone();
            let election = next.dashboard.election.get_or_insert_with(Default::default);
            if let Some(date) = parse_timestamp(sent.election_date.as_deref()) {
                election.date = Some(date);
            }
            if let Some(kind) = sent.election_type {
                election.kind = Some(kind);
            }
            if let Some(date) = parse_timestamp(sent.public_meeting_date.as_deref()) {
                next.dashboard.public_meeting_date = Some(date);
            }
            if let Some(limit) = sent.risk_limit {
                next.dashboard.risk_limit = Some(limit);
            }
            Some(next)
        }
        _ => None,
    }
}
