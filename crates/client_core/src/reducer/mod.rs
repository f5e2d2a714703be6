//! Folds applied actions into [`AppState`].
//!
//! Reducers never mutate their input. An action that does not apply to the
//! current state returns the very same `Arc`, so callers can detect no-ops
//! with `Arc::ptr_eq`.

use std::sync::Arc;

use crate::{
    action::{Action, Submitted},
    state::{AppState, CountyState, DosState, LoginState},
};

mod county;
mod dos;
mod login;

pub fn reduce(state: Arc<AppState>, action: &Action) -> Arc<AppState> {
    match action {
        Action::CountyLogin(Submitted::Ok(_)) => {
            return Arc::new(AppState::County(CountyState::default()))
        }
        Action::DosLogin(Submitted::Ok(_)) => return Arc::new(AppState::Dos(DosState::default())),
        Action::Logout(Submitted::Ok(_)) => {
            return Arc::new(AppState::Login(LoginState::default()))
        }
        Action::NotAuthorized => {
            if matches!(*state, AppState::Login(_)) {
                return state;
            }
            return Arc::new(AppState::Login(LoginState::default()));
        }
        _ => {}
    }

    let next = match &*state {
        AppState::County(slice) => county::reduce(slice, action).map(AppState::County),
        AppState::Dos(slice) => dos::reduce(slice, action).map(AppState::Dos),
        AppState::Login(slice) => login::reduce(slice, action).map(AppState::Login),
    };

    match next {
        Some(next) => Arc::new(next),
        None => state,
    }
}
