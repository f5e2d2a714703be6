//! Reactions to applied actions.
//!
//! A saga looks at each applied action and the state it produced and
//! returns the effects to run. The runtime runs each reaction on its own
//! task. For `Take::Latest` sagas a new reaction aborts the previous one;
//! HTTP requests already issued still finish and dispatch their outcome.

use std::{collections::HashMap, future::Future, sync::Arc};

use async_trait::async_trait;
use shared::domain::CountyId;
use tokio::{
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    action::Action,
    error::RequestError,
    notice::Notice,
    request::Dispatch,
    session::{SessionKind, SessionStore},
    state::AppState,
    store::{Applied, Store},
};

pub mod county;
pub mod dos;
pub mod login;
pub mod poll;
pub mod sync;

pub use poll::{PollDelays, PollKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Take {
    Every,
    Latest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTarget {
    County,
    Dos,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Notify(Notice),
    Put(Action),
    Refresh(RefreshTarget),
    FetchCountyContests(CountyId),
    SaveSession(SessionKind),
    ClearSession,
    /// Runs until the reaction is aborted by the next one.
    Poll(PollKind),
}

pub trait Saga: Send + Sync {
    fn name(&self) -> &'static str;

    fn take(&self) -> Take {
        Take::Every
    }

    /// `None` when the saga does not take this action at all. `Some` with
    /// an empty list still counts as a reaction, so it cancels the previous
    /// one under `Take::Latest`.
    fn react(&self, action: &Action, state: &AppState) -> Option<Vec<Effect>>;
}

/// The requests sagas are allowed to issue.
#[async_trait]
pub trait SyncApi: Send + Sync {
    async fn county_refresh(&self) -> Result<(), RequestError>;
    async fn dos_refresh(&self) -> Result<(), RequestError>;
    async fn county_fetch_contests(&self, county_id: CountyId) -> Result<(), RequestError>;
}

pub fn default_sagas() -> Vec<Arc<dyn Saga>> {
    vec![
        Arc::new(login::LoginSaga),
        Arc::new(sync::SyncSaga::county()),
        Arc::new(sync::SyncSaga::dos()),
        Arc::new(poll::PollSaga::new(PollKind::CountyDashboard)),
        Arc::new(poll::PollSaga::new(PollKind::CountyAudit)),
        Arc::new(poll::PollSaga::new(PollKind::DosDashboard)),
        Arc::new(county::UploadSaga),
        Arc::new(county::AuditSaga),
        Arc::new(dos::AuditSaga),
    ]
}

/// In-flight `Take::Latest` reactions by saga name. Dropping the map aborts
/// every entry.
#[derive(Default)]
struct LatestReactions(HashMap<&'static str, JoinHandle<()>>);

impl LatestReactions {
    fn cancel(&mut self, name: &str) {
        if let Some(previous) = self.0.remove(name) {
            previous.abort();
        }
    }
}

impl Drop for LatestReactions {
    fn drop(&mut self) {
        for (_, handle) in self.0.drain() {
            handle.abort();
        }
    }
}

pub struct SagaRuntime {
    store: Store,
    api: Arc<dyn SyncApi>,
    notices: broadcast::Sender<Notice>,
    sessions: SessionStore,
    delays: PollDelays,
    sagas: Vec<Arc<dyn Saga>>,
}

impl SagaRuntime {
    pub fn new(
        store: Store,
        api: Arc<dyn SyncApi>,
        notices: broadcast::Sender<Notice>,
        sessions: SessionStore,
        delays: PollDelays,
    ) -> Self {
        Self {
            store,
            api,
            notices,
            sessions,
            delays,
            sagas: default_sagas(),
        }
    }

    pub fn with_sagas(mut self, sagas: Vec<Arc<dyn Saga>>) -> Self {
        self.sagas = sagas;
        self
    }

    /// Subscribes before returning, so every action dispatched after this
    /// call is seen.
    pub fn spawn(self) -> JoinHandle<()> {
        let mut applied = self.store.subscribe();
        let runtime = Arc::new(self);

        tokio::spawn(async move {
            let mut latest = LatestReactions::default();
            loop {
                match applied.recv().await {
                    Ok(applied) => runtime.react(&applied, &mut latest),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "saga: fell behind the store, actions skipped")
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            info!("saga: store closed, runtime stopping");
        })
    }

    fn react(
        self: &Arc<Self>,
        applied: &Applied,
        latest: &mut LatestReactions,
    ) {
        for saga in &self.sagas {
            let Some(effects) = saga.react(&applied.action, &applied.state) else {
                continue;
            };
            let take = saga.take();
            if take == Take::Latest {
                latest.cancel(saga.name());
            }
            if effects.is_empty() {
                continue;
            }
            debug!(
                saga = saga.name(),
                action = %applied.action.name(),
                effects = effects.len(),
                "saga: reacting"
            );
            let runtime = Arc::clone(self);
            let handle = tokio::spawn(async move { runtime.run_effects(effects).await });
            if take == Take::Latest {
                latest.0.insert(saga.name(), handle);
            }
        }
    }

    async fn run_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Poll(kind) => self.poll(kind).await,
                other => self.apply(other).await,
            }
        }
    }

    async fn poll(&self, kind: PollKind) {
        info!(poll = kind.name(), "poll: started");
        loop {
            let state = self.store.snapshot();
            for effect in poll::tick(kind, &state) {
                self.apply(effect).await;
            }
            let delay = poll::delay(kind, &self.store.snapshot(), &self.delays);
            tokio::time::sleep(delay).await;
        }
    }

    async fn apply(&self, effect: Effect) {
        match effect {
            Effect::Notify(notice) => {
                notice.log();
                let _ = self.notices.send(notice);
            }
            Effect::Put(action) => self.store.dispatch(action),
            Effect::Refresh(RefreshTarget::County) => {
                let api = Arc::clone(&self.api);
                if let Err(err) = detached(async move { api.county_refresh().await }).await {
                    debug!(error = %err, "saga: county refresh failed");
                }
            }
            Effect::Refresh(RefreshTarget::Dos) => {
                let api = Arc::clone(&self.api);
                if let Err(err) = detached(async move { api.dos_refresh().await }).await {
                    debug!(error = %err, "saga: dos refresh failed");
                }
            }
            Effect::FetchCountyContests(county_id) => {
                let api = Arc::clone(&self.api);
                let fetch = async move { api.county_fetch_contests(county_id).await };
                if let Err(err) = detached(fetch).await {
                    debug!(county_id = %county_id, error = %err, "saga: contest fetch failed");
                }
            }
            Effect::SaveSession(kind) => {
                if let Err(err) = self.sessions.save(kind) {
                    warn!(error = %format!("{err:#}"), "session: save failed");
                }
            }
            Effect::ClearSession => {
                if let Err(err) = self.sessions.clear() {
                    warn!(error = %format!("{err:#}"), "session: clear failed");
                }
            }
            Effect::Poll(kind) => {
                warn!(poll = kind.name(), "saga: nested poll ignored");
            }
        }
    }
}

/// Runs a request on its own task. Aborting the reaction only stops the
/// wait; the request still dispatches its terminal action.
async fn detached<F>(request: F) -> Result<(), RequestError>
where
    F: Future<Output = Result<(), RequestError>> + Send + 'static,
{
    tokio::spawn(request)
        .await
        .unwrap_or_else(|err| Err(RequestError::Internal(format!("request task failed: {err}"))))
}
