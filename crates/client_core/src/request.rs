//! The request factories every endpoint is built from.
//!
//! Each invocation dispatches the `Send` action, issues at most one HTTP
//! request, and then dispatches exactly one terminal action. A 401 also
//! dispatches `NotAuthorized` right after the terminal action. Failures are
//! returned to the caller after they have been dispatched.

use std::sync::{Arc, Mutex};

use reqwest::{
    header::{HeaderValue, CONTENT_TYPE},
    multipart::Form,
    RequestBuilder,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::{
    action::{
        Action, Failure, Fetched, Phase, Received, SubmitData, SubmitFailure, Submitted,
        UploadEnvelope, Uploaded,
    },
    error::RequestError,
    transport::Transport,
};

pub trait Dispatch: Send + Sync {
    fn dispatch(&self, action: Action);
}

impl<T: Dispatch + ?Sized> Dispatch for Arc<T> {
    fn dispatch(&self, action: Action) {
        (**self).dispatch(action)
    }
}

/// Keeps every dispatched action in order instead of reducing it.
#[derive(Debug, Default)]
pub struct RecordingDispatch {
    actions: Mutex<Vec<Action>>,
}

impl RecordingDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> Vec<Action> {
        self.actions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.actions().iter().map(Action::name).collect()
    }
}

impl Dispatch for RecordingDispatch {
    fn dispatch(&self, action: Action) {
        self.actions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(action);
    }
}

fn emit(dispatch: &dyn Dispatch, action: Action) {
    match action.phase() {
        Some(Phase::Send) => debug!(action = %action.name(), "request: sent"),
        Some(Phase::Ok) => info!(action = %action.name(), "request: ok"),
        Some(Phase::Fail) | Some(Phase::NetworkFail) => {
            warn!(action = %action.name(), "request: failed")
        }
        None => {}
    }
    dispatch.dispatch(action);
}

fn internal_error(dispatch: &dyn Dispatch, err: RequestError) -> RequestError {
    error!(error = %err, "request: could not be prepared");
    dispatch.dispatch(Action::InternalError(err.to_string()));
    err
}

async fn execute(request: RequestBuilder) -> Result<(u16, Vec<u8>), reqwest::Error> {
    let response = request.send().await?;
    let status = response.status().as_u16();
    let bytes = response.bytes().await?;
    Ok((status, bytes.to_vec()))
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn json_or_null(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap_or(Value::Null)
}

fn json_or_empty_object(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap_or_else(|_| Value::Object(Default::default()))
}

fn not_authorized(dispatch: &dyn Dispatch, status: u16) {
    if status == 401 {
        warn!("request: session not authorized");
        dispatch.dispatch(Action::NotAuthorized);
    }
}

pub struct FetchAction<R> {
    path: String,
    wrap: fn(Fetched<R>) -> Action,
}

impl<R> FetchAction<R>
where
    R: DeserializeOwned + Clone + Send,
{
    pub fn new(path: impl Into<String>, wrap: fn(Fetched<R>) -> Action) -> Self {
        Self {
            path: path.into(),
            wrap,
        }
    }

    pub async fn run(
        &self,
        transport: &Transport,
        dispatch: &dyn Dispatch,
    ) -> Result<R, RequestError> {
        let url = transport
            .endpoint(&self.path)
            .map_err(|err| internal_error(dispatch, err))?;

        emit(dispatch, (self.wrap)(Fetched::Send));

        let (status, bytes) = match execute(transport.http().get(url)).await {
            Ok(pair) => pair,
            Err(err) => {
                emit(dispatch, (self.wrap)(Fetched::NetworkFail));
                return Err(err.into());
            }
        };

        if !is_success(status) {
            let body = json_or_null(&bytes);
            emit(dispatch, (self.wrap)(Fetched::Fail(Failure { status, body })));
            not_authorized(dispatch, status);
            return Err(RequestError::from_status(status));
        }

        match serde_json::from_slice::<R>(&bytes) {
            Ok(data) => {
                emit(dispatch, (self.wrap)(Fetched::Ok(data.clone())));
                Ok(data)
            }
            Err(err) => {
                let body = json_or_null(&bytes);
                emit(dispatch, (self.wrap)(Fetched::Fail(Failure { status, body })));
                Err(RequestError::Decode(err.to_string()))
            }
        }
    }
}

/// GET of a generated file. The body is handed back untouched.
pub struct FileFetchAction {
    path: String,
    wrap: fn(Fetched<Vec<u8>>) -> Action,
}

impl FileFetchAction {
    pub fn new(path: impl Into<String>, wrap: fn(Fetched<Vec<u8>>) -> Action) -> Self {
        Self {
            path: path.into(),
            wrap,
        }
    }

    pub async fn run(
        &self,
        transport: &Transport,
        dispatch: &dyn Dispatch,
    ) -> Result<Vec<u8>, RequestError> {
        let url = transport
            .endpoint(&self.path)
            .map_err(|err| internal_error(dispatch, err))?;

        emit(dispatch, (self.wrap)(Fetched::Send));

        let (status, bytes) = match execute(transport.http().get(url)).await {
            Ok(pair) => pair,
            Err(err) => {
                emit(dispatch, (self.wrap)(Fetched::NetworkFail));
                return Err(err.into());
            }
        };

        if !is_success(status) {
            let body = json_or_null(&bytes);
            emit(dispatch, (self.wrap)(Fetched::Fail(Failure { status, body })));
            not_authorized(dispatch, status);
            return Err(RequestError::from_status(status));
        }

        debug!(len = bytes.len(), "request: file received");
        emit(dispatch, (self.wrap)(Fetched::Ok(bytes.clone())));
        Ok(bytes)
    }
}

pub struct SubmitAction<S> {
    path: String,
    wrap: fn(Submitted<S>) -> Action,
}

impl<S> SubmitAction<S>
where
    S: Serialize + Clone + Send + Sync,
{
    pub fn new(path: impl Into<String>, wrap: fn(Submitted<S>) -> Action) -> Self {
        Self {
            path: path.into(),
            wrap,
        }
    }

    pub async fn run(
        &self,
        sent: S,
        transport: &Transport,
        dispatch: &dyn Dispatch,
    ) -> Result<Value, RequestError> {
        let url = transport
            .endpoint(&self.path)
            .map_err(|err| internal_error(dispatch, err))?;
        let body = serde_json::to_vec(&sent).map_err(|err| {
            internal_error(
                dispatch,
                RequestError::Internal(format!("could not encode request: {err}")),
            )
        })?;

        emit(dispatch, (self.wrap)(Submitted::Send));

        let request = transport
            .http()
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body);
        let (status, bytes) = match execute(request).await {
            Ok(pair) => pair,
            Err(err) => {
                emit(dispatch, (self.wrap)(Submitted::NetworkFail));
                return Err(err.into());
            }
        };

        if !is_success(status) {
            let error = json_or_null(&bytes);
            emit(
                dispatch,
                (self.wrap)(Submitted::Fail(SubmitFailure {
                    sent,
                    status,
                    error,
                })),
            );
            not_authorized(dispatch, status);
            return Err(RequestError::from_status(status));
        }

        let received = json_or_empty_object(&bytes);
        emit(
            dispatch,
            (self.wrap)(Submitted::Ok(SubmitData {
                sent,
                received: received.clone(),
            })),
        );
        Ok(received)
    }
}

pub type CreateFormData<A> = fn(&A) -> anyhow::Result<Form>;

pub struct FileUploadAction<A, S> {
    path: String,
    wrap: fn(Uploaded<S>) -> Action,
    create_form_data: CreateFormData<A>,
    create_sent: fn(&A) -> S,
}

impl<A, S> FileUploadAction<A, S>
where
    A: Sync,
    S: Clone + Send,
{
    pub fn new(
        path: impl Into<String>,
        wrap: fn(Uploaded<S>) -> Action,
        create_form_data: CreateFormData<A>,
        create_sent: fn(&A) -> S,
    ) -> Self {
        Self {
            path: path.into(),
            wrap,
            create_form_data,
            create_sent,
        }
    }

    /// Form construction runs before anything is dispatched; if it fails
    /// only `InternalError` is dispatched and no request is made.
    pub async fn run(
        &self,
        args: &A,
        transport: &Transport,
        dispatch: &dyn Dispatch,
    ) -> Result<Received, RequestError> {
        let url = transport
            .endpoint(&self.path)
            .map_err(|err| internal_error(dispatch, err))?;
        let form = (self.create_form_data)(args).map_err(|err| {
            internal_error(
                dispatch,
                RequestError::Internal(format!("could not build upload form: {err:#}")),
            )
        })?;
        let sent = (self.create_sent)(args);

        emit(dispatch, (self.wrap)(Uploaded::Send));

        let (status, bytes) = match execute(transport.http().post(url).multipart(form)).await {
            Ok(pair) => pair,
            Err(err) => {
                emit(dispatch, (self.wrap)(Uploaded::NetworkFail));
                return Err(err.into());
            }
        };

        let received = Received {
            status,
            body: json_or_null(&bytes),
        };
        let envelope = UploadEnvelope {
            sent,
            received: received.clone(),
        };

        if !is_success(status) {
            emit(dispatch, (self.wrap)(Uploaded::Fail(envelope)));
            not_authorized(dispatch, status);
            return Err(RequestError::from_status(status));
        }

        emit(dispatch, (self.wrap)(Uploaded::Ok(envelope)));
        Ok(received)
    }
}
