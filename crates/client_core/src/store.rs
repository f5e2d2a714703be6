//! Single-writer application store.
//!
//! One task owns the state and applies dispatched actions in arrival order.
//! Readers get consistent snapshots through a `watch` channel; sagas follow
//! the applied actions through a `broadcast` channel.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, warn};

use crate::{action::Action, reducer, request::Dispatch, state::AppState};

const APPLIED_CAPACITY: usize = 1024;

/// An action together with the state it produced.
#[derive(Debug, Clone)]
pub struct Applied {
    pub action: Arc<Action>,
    pub state: Arc<AppState>,
}

enum Command {
    Dispatch(Action),
    Flush(oneshot::Sender<()>),
}

#[derive(Clone)]
pub struct Store {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<Arc<AppState>>,
    applied: broadcast::Sender<Applied>,
}

impl Store {
    /// Must be called from within a tokio runtime.
    pub fn spawn(initial: AppState) -> Self {
        let (commands, mut inbox) = mpsc::unbounded_channel::<Command>();
        let mut current = Arc::new(initial);
        let (state_tx, state) = watch::channel(current.clone());
        let (applied, _) = broadcast::channel(APPLIED_CAPACITY);
        let applied_tx = applied.clone();

        tokio::spawn(async move {
            while let Some(command) = inbox.recv().await {
                match command {
                    Command::Dispatch(action) => {
                        let next = reducer::reduce(current.clone(), &action);
                        let changed = !Arc::ptr_eq(&current, &next);
                        current = next;
                        if changed {
                            state_tx.send_replace(current.clone());
                        }
                        debug!(action = %action.name(), changed, "store: applied");
                        // No subscribers is fine; nothing is listening yet.
                        let _ = applied_tx.send(Applied {
                            action: Arc::new(action),
                            state: current.clone(),
                        });
                    }
                    Command::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            debug!("store: all handles dropped, stopping");
        });

        Self {
            commands,
            state,
            applied,
        }
    }

    pub fn snapshot(&self) -> Arc<AppState> {
        self.state.borrow().clone()
    }

    /// Resolves once every action dispatched before the call is applied.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.commands.send(Command::Flush(done)).is_err() {
            return;
        }
        let _ = wait.await;
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Applied> {
        self.applied.subscribe()
    }

    pub fn watch_state(&self) -> watch::Receiver<Arc<AppState>> {
        self.state.clone()
    }
}

impl Dispatch for Store {
    fn dispatch(&self, action: Action) {
        if let Err(err) = self.commands.send(Command::Dispatch(action)) {
            if let Command::Dispatch(action) = err.0 {
                warn!(action = %action.name(), "store: dropped action after shutdown");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared::protocol::{CountyDashboardJson, CredentialsJson};

    use super::*;
    use crate::action::{Fetched, SubmitData, Submitted};

    fn county_login_ok() -> Action {
        Action::CountyLogin(Submitted::Ok(SubmitData {
            sent: CredentialsJson::password("clerk", "pw"),
            received: json!({}),
        }))
    }

    #[tokio::test]
    async fn applies_actions_in_dispatch_order() {
        let store = Store::spawn(AppState::default());
        let mut applied = store.subscribe();

        store.dispatch(county_login_ok());
        store.dispatch(Action::CountyDashboardRefresh(Fetched::Ok(
            CountyDashboardJson {
                id: Some(shared::domain::CountyId(3)),
                ..Default::default()
            },
        )));
        store.flush().await;

        let snapshot = store.snapshot();
        let county = snapshot.as_county().expect("county state");
        assert_eq!(county.id(), Some(shared::domain::CountyId(3)));

        let first = applied.recv().await.expect("first");
        assert_eq!(first.action.name(), "COUNTY_LOGIN_OK");
        assert_eq!(first.state.kind(), "County");
        let second = applied.recv().await.expect("second");
        assert_eq!(second.action.name(), "COUNTY_DASHBOARD_REFRESH_OK");
    }

    #[tokio::test]
    async fn ignored_actions_keep_the_same_snapshot() {
        let store = Store::spawn(AppState::default());
        let before = store.snapshot();
        store.dispatch(Action::DosDashboardRefresh(Fetched::Send));
        store.flush().await;
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[tokio::test]
    async fn watchers_see_changes() {
        let store = Store::spawn(AppState::default());
        let mut state = store.watch_state();
        store.dispatch(county_login_ok());
        state.changed().await.expect("changed");
        assert_eq!(state.borrow().kind(), "County");
    }
}
