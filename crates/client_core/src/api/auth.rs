use serde_json::Value;
use shared::protocol::{CredentialsJson, EmptyJson};

use crate::{
    action::Action,
    error::RequestError,
    request::{Dispatch, SubmitAction},
    transport::Transport,
};

pub async fn county_login(
    transport: &Transport,
    dispatch: &dyn Dispatch,
    username: &str,
    password: &str,
) -> Result<Value, RequestError> {
    SubmitAction::new("auth-county-admin", Action::CountyLogin)
        .run(CredentialsJson::password(username, password), transport, dispatch)
        .await
}

pub async fn dos_login(
    transport: &Transport,
    dispatch: &dyn Dispatch,
    username: &str,
    password: &str,
) -> Result<Value, RequestError> {
    SubmitAction::new("auth-state-admin", Action::DosLogin)
        .run(CredentialsJson::password(username, password), transport, dispatch)
        .await
}

/// First factor of the two-step admin login.
pub async fn login_1f(
    transport: &Transport,
    dispatch: &dyn Dispatch,
    username: &str,
    password: &str,
) -> Result<Value, RequestError> {
    SubmitAction::new("auth-admin", Action::Login1F)
        .run(CredentialsJson::password(username, password), transport, dispatch)
        .await
}

pub async fn login_2f(
    transport: &Transport,
    dispatch: &dyn Dispatch,
    username: &str,
    second_factor: &str,
) -> Result<Value, RequestError> {
    SubmitAction::new("auth-admin", Action::Login2F)
        .run(
            CredentialsJson::second_factor(username, second_factor),
            transport,
            dispatch,
        )
        .await
}

pub async fn logout(
    transport: &Transport,
    dispatch: &dyn Dispatch,
) -> Result<Value, RequestError> {
    SubmitAction::new("unauthenticate", Action::Logout)
        .run(EmptyJson {}, transport, dispatch)
        .await
}
