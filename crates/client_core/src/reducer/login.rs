use crate::{
    action::{Action, Submitted},
    adapter::auth,
    state::LoginState,
};

pub(super) fn reduce(state: &LoginState, action: &Action) -> Option<LoginState> {
    match action {
        Action::Login1F(Submitted::Ok(data)) | Action::Login2F(Submitted::Ok(data)) => {
            let mut next = state.clone();
            next.username = Some(data.sent.username.clone());
            next.stage = auth::parse_login(&data.received).stage;
            Some(next)
        }
        _ => None,
    }
}
