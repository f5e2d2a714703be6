use shared::domain::{AdministratorRole, AuthStage};

use super::{Effect, Saga};
use crate::{
    action::{Action, PollControl, Submitted},
    adapter::auth,
    notice::Notice,
    session::SessionKind,
    state::AppState,
};

pub struct LoginSaga;

impl Saga for LoginSaga {
    fn name(&self) -> &'static str {
        "login"
    }

    fn react(&self, action: &Action, _state: &AppState) -> Option<Vec<Effect>> {
        let effects = match action {
            Action::Login1F(Submitted::Ok(data)) => {
                match auth::parse_login(&data.received).stage {
                    Some(AuthStage::SecondFactorAuthenticated) => {
                        vec![Effect::Put(Action::Login2F(Submitted::Ok(data.clone())))]
                    }
                    _ => Vec::new(),
                }
            }
            Action::Login2F(Submitted::Ok(data)) => match auth::role(&data.received) {
                Some(AdministratorRole::State) => {
                    vec![Effect::Put(Action::DosLogin(Submitted::Ok(data.clone())))]
                }
                _ => vec![Effect::Put(Action::CountyLogin(Submitted::Ok(data.clone())))],
            },
            Action::Login1F(Submitted::Fail(_))
            | Action::Login2F(Submitted::Fail(_))
            | Action::CountyLogin(Submitted::Fail(_))
            | Action::DosLogin(Submitted::Fail(_)) => {
                vec![Effect::Notify(Notice::danger("Invalid credentials."))]
            }
            Action::Login1F(Submitted::NetworkFail)
            | Action::Login2F(Submitted::NetworkFail)
            | Action::CountyLogin(Submitted::NetworkFail)
            | Action::DosLogin(Submitted::NetworkFail) => vec![Effect::Notify(Notice::danger(
                "Unable to log in due to network error.",
            ))],
            Action::CountyLogin(Submitted::Ok(_)) => vec![
                Effect::SaveSession(SessionKind::County),
                Effect::Put(Action::CountyDashboardPoll(PollControl::Start)),
            ],
            Action::DosLogin(Submitted::Ok(_)) => vec![
                Effect::SaveSession(SessionKind::Dos),
                Effect::Put(Action::DosDashboardPoll(PollControl::Start)),
            ],
            Action::Logout(Submitted::Ok(_)) | Action::NotAuthorized => vec![
                Effect::ClearSession,
                Effect::Put(Action::CountyDashboardPoll(PollControl::Stop)),
                Effect::Put(Action::CountyAuditPoll(PollControl::Stop)),
                Effect::Put(Action::DosDashboardPoll(PollControl::Stop)),
            ],
            _ => return None,
        };
        Some(effects)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared::protocol::CredentialsJson;

    use super::*;
    use crate::action::{SubmitData, SubmitFailure};

    fn ok(received: serde_json::Value) -> SubmitData<CredentialsJson> {
        SubmitData {
            sent: CredentialsJson::password("admin", "pw"),
            received,
        }
    }

    fn react(action: Action) -> Option<Vec<Effect>> {
        LoginSaga.react(&action, &AppState::default())
    }

    #[test]
    fn first_factor_escalates_only_when_second_factor_passed() {
        let data = ok(json!({"stage": "SECOND_FACTOR_AUTHENTICATED", "role": "COUNTY"}));
        assert_eq!(
            react(Action::Login1F(Submitted::Ok(data.clone()))),
            Some(vec![Effect::Put(Action::Login2F(Submitted::Ok(data)))])
        );

        let partial = ok(json!({"stage": "TRADITIONALLY_AUTHENTICATED"}));
        assert_eq!(react(Action::Login1F(Submitted::Ok(partial))), Some(vec![]));
    }

    #[test]
    fn second_factor_routes_by_role() {
        let state = ok(json!({"role": "STATE"}));
        assert_eq!(
            react(Action::Login2F(Submitted::Ok(state.clone()))),
            Some(vec![Effect::Put(Action::DosLogin(Submitted::Ok(state)))])
        );

        let county = ok(json!({"role": "COUNTY"}));
        assert_eq!(
            react(Action::Login2F(Submitted::Ok(county.clone()))),
            Some(vec![Effect::Put(Action::CountyLogin(Submitted::Ok(county)))])
        );
    }

    #[test]
    fn dashboard_login_saves_session_and_starts_polling() {
        assert_eq!(
            react(Action::DosLogin(Submitted::Ok(ok(json!({}))))),
            Some(vec![
                Effect::SaveSession(SessionKind::Dos),
                Effect::Put(Action::DosDashboardPoll(PollControl::Start)),
            ])
        );
    }

    #[test]
    fn failures_notify() {
        let fail = Action::Login2F(Submitted::Fail(SubmitFailure {
            sent: CredentialsJson::second_factor("admin", "s3cret"),
            status: 401,
            error: json!({"result": "bad"}),
        }));
        assert_eq!(
            react(fail),
            Some(vec![Effect::Notify(Notice::danger("Invalid credentials."))])
        );
        assert_eq!(
            react(Action::Login1F(Submitted::NetworkFail)),
            Some(vec![Effect::Notify(Notice::danger(
                "Unable to log in due to network error."
            ))])
        );
    }

    #[test]
    fn not_authorized_clears_session() {
        let effects = react(Action::NotAuthorized).expect("reacts");
        assert_eq!(effects[0], Effect::ClearSession);
        assert_eq!(effects.len(), 4);
        assert_eq!(react(Action::Login1F(Submitted::Send)), None);
    }
}
