use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use shared::{
    domain::{AuditBoardAsmState, ContestId, CountyAsmState, CountyId, CvrId, DosAsmState},
    protocol::{
        AsmStateResponse, AuditInfoJson, ContestJson, ContestToAuditJson, CountyDashboardJson,
        CvrJson, CvrToAuditJson, DosDashboardJson,
    },
};
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{info, warn};

pub mod action;
pub mod adapter;
pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod format;
pub mod hash;
pub mod model;
pub mod notice;
pub mod reducer;
pub mod request;
pub mod saga;
pub mod selector;
pub mod session;
pub mod state;
pub mod store;
pub mod transport;
pub mod upload;
pub mod view;
pub mod wizard;

pub use config::{load_settings, ClientSettings};
pub use error::RequestError;
pub use notice::{Notice, NoticeLevel};
pub use state::AppState;
pub use store::Store;

use action::{Action, PollControl, Received};
use model::{Acvr, AcvrContestMarks, AuditBoardMember, CurrentBallot, Elector, ReportFormat};
use request::Dispatch;
use saga::{PollDelays, SagaRuntime, SyncApi};
use session::{initial_state, SessionStore};
use transport::Transport;
use upload::FileUpload;

const NOTICE_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginRole {
    County,
    State,
}

/// Everything a front end needs: the store, the per-endpoint requests, the
/// sagas, and the toast stream.
pub struct AuditClient {
    transport: Transport,
    store: Store,
    notices: broadcast::Sender<Notice>,
    settings: ClientSettings,
    sessions: SessionStore,
}

impl AuditClient {
    /// Builds the HTTP transport from `settings` and restores the dashboard
    /// kind from the session file. Must be called inside a tokio runtime.
    pub fn new(settings: ClientSettings) -> Result<Arc<Self>> {
        let transport = Transport::new(&settings.server_url, settings.request_timeout)
            .context("failed to set up server transport")?;
        Ok(Self::with_transport(settings, transport))
    }

    pub fn with_transport(settings: ClientSettings, transport: Transport) -> Arc<Self> {
        let sessions = SessionStore::new(&settings.session_path);
        let session = sessions.load().unwrap_or_else(|err| {
            warn!(error = %format!("{err:#}"), "session: could not be restored");
            None
        });
        let initial = initial_state(session.as_ref());
        info!(
            server_url = %transport.base(),
            dashboard = initial.kind(),
            "client: starting"
        );
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Arc::new(Self {
            transport,
            store: Store::spawn(initial),
            notices,
            settings,
            sessions,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn state(&self) -> Arc<AppState> {
        self.store.snapshot()
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    pub fn dispatch(&self, action: Action) {
        self.store.dispatch(action);
    }

    /// The runtime holds a reference to the client, so it runs until the
    /// returned handle is aborted.
    pub fn start_sagas(self: &Arc<Self>) -> JoinHandle<()> {
        let api: Arc<dyn SyncApi> = Arc::clone(self) as Arc<dyn SyncApi>;
        SagaRuntime::new(
            self.store.clone(),
            api,
            self.notices.clone(),
            self.sessions.clone(),
            PollDelays::from(&self.settings),
        )
        .spawn()
    }

    pub fn county_id(&self) -> Option<CountyId> {
        self.state().as_county().and_then(|county| county.id())
    }

    // Authentication.

    pub async fn login(
        &self,
        role: LoginRole,
        username: &str,
        password: &str,
    ) -> Result<Value, RequestError> {
        info!(username, role = ?role, "client: logging in");
        match role {
            LoginRole::County => self.county_login(username, password).await,
            LoginRole::State => self.dos_login(username, password).await,
        }
    }

    pub async fn county_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Value, RequestError> {
        api::auth::county_login(&self.transport, &self.store, username, password).await
    }

    pub async fn dos_login(&self, username: &str, password: &str) -> Result<Value, RequestError> {
        api::auth::dos_login(&self.transport, &self.store, username, password).await
    }

    pub async fn login_1f(&self, username: &str, password: &str) -> Result<Value, RequestError> {
        api::auth::login_1f(&self.transport, &self.store, username, password).await
    }

    pub async fn login_2f(
        &self,
        username: &str,
        second_factor: &str,
    ) -> Result<Value, RequestError> {
        api::auth::login_2f(&self.transport, &self.store, username, second_factor).await
    }

    pub async fn logout(&self) -> Result<Value, RequestError> {
        api::auth::logout(&self.transport, &self.store).await
    }

    // County.

    pub async fn county_dashboard_refresh(&self) -> Result<CountyDashboardJson, RequestError> {
        api::county::dashboard_refresh(&self.transport, &self.store).await
    }

    pub async fn fetch_county_asm_state(
        &self,
    ) -> Result<AsmStateResponse<CountyAsmState>, RequestError> {
        api::county::fetch_county_asm_state(&self.transport, &self.store).await
    }

    pub async fn fetch_audit_board_asm_state(
        &self,
    ) -> Result<AsmStateResponse<AuditBoardAsmState>, RequestError> {
        api::county::fetch_audit_board_asm_state(&self.transport, &self.store).await
    }

    pub async fn county_fetch_contests(
        &self,
        county_id: CountyId,
    ) -> Result<Vec<ContestJson>, RequestError> {
        api::county::fetch_contests(&self.transport, &self.store, county_id).await
    }

    pub async fn fetch_cvr(&self, cvr_id: CvrId) -> Result<CvrJson, RequestError> {
        api::county::fetch_cvr(&self.transport, &self.store, cvr_id).await
    }

    pub async fn fetch_cvrs_to_audit(
        &self,
        county_id: CountyId,
        round: u32,
    ) -> Result<Vec<CvrToAuditJson>, RequestError> {
        api::county::fetch_cvrs_to_audit(&self.transport, &self.store, county_id, round).await
    }

    pub async fn download_county_report(
        &self,
        county_id: Option<CountyId>,
        format: ReportFormat,
    ) -> Result<Vec<u8>, RequestError> {
        api::county::download_county_report(&self.transport, &self.store, county_id, format)
            .await
    }

    pub async fn download_cvrs_to_audit_csv(
        &self,
        county_id: CountyId,
        round: u32,
    ) -> Result<Vec<u8>, RequestError> {
        api::county::download_cvrs_to_audit_csv(&self.transport, &self.store, county_id, round)
            .await
    }

    pub async fn upload_ballot_manifest(
        &self,
        file: &FileUpload,
    ) -> Result<Received, RequestError> {
        api::county::upload_ballot_manifest(&self.transport, &self.store, file).await
    }

    pub async fn upload_cvr_export(&self, file: &FileUpload) -> Result<Received, RequestError> {
        api::county::upload_cvr_export(&self.transport, &self.store, file).await
    }

    /// Reads `path` and stages it for the county currently logged in.
    pub async fn stage_file(&self, path: impl AsRef<Path>) -> Result<FileUpload> {
        let county_id = self
            .county_id()
            .context("county dashboard has not been loaded yet")?;
        FileUpload::from_path(county_id, path, None).await
    }

    pub fn update_acvr_form(&self, cvr_id: CvrId, contest_id: ContestId, marks: AcvrContestMarks) {
        self.store.dispatch(Action::UpdateAcvrForm {
            cvr_id,
            contest_id,
            marks,
        });
    }

    pub async fn upload_acvr(
        &self,
        ballot: &CurrentBallot,
        acvr: &Acvr,
    ) -> Result<Value, RequestError> {
        api::county::upload_acvr(&self.transport, &self.store, ballot, acvr).await
    }

    pub async fn ballot_not_found(&self, ballot: &CurrentBallot) -> Result<Value, RequestError> {
        api::county::ballot_not_found(&self.transport, &self.store, ballot).await
    }

    pub async fn audit_board_sign_in(
        &self,
        board: &[AuditBoardMember],
    ) -> Result<Value, RequestError> {
        api::county::audit_board_sign_in(&self.transport, &self.store, board).await
    }

    pub async fn audit_board_sign_out(&self) -> Result<Value, RequestError> {
        api::county::audit_board_sign_out(&self.transport, &self.store).await
    }

    pub async fn round_sign_off(&self, electors: &[Elector]) -> Result<Value, RequestError> {
        api::county::round_sign_off(&self.transport, &self.store, electors).await
    }

    pub fn county_board_sign_in_sync(&self) {
        self.store.dispatch(Action::CountyBoardSignInSync);
    }

    pub fn county_dashboard_poll(&self, control: PollControl) {
        self.store.dispatch(Action::CountyDashboardPoll(control));
    }

    pub fn county_audit_poll(&self, control: PollControl) {
        self.store.dispatch(Action::CountyAuditPoll(control));
    }

    // Department of State.

    pub async fn dos_dashboard_refresh(&self) -> Result<DosDashboardJson, RequestError> {
        api::dos::dashboard_refresh(&self.transport, &self.store).await
    }

    pub async fn dos_fetch_contests(&self) -> Result<Vec<ContestJson>, RequestError> {
        api::dos::fetch_contests(&self.transport, &self.store).await
    }

    pub async fn fetch_dos_asm_state(&self) -> Result<AsmStateResponse<DosAsmState>, RequestError> {
        api::dos::fetch_asm_state(&self.transport, &self.store).await
    }

    pub async fn download_state_report(
        &self,
        format: ReportFormat,
    ) -> Result<Vec<u8>, RequestError> {
        api::dos::download_state_report(&self.transport, &self.store, format).await
    }

    pub async fn select_contests_for_audit(
        &self,
        contests: Vec<ContestToAuditJson>,
    ) -> Result<Value, RequestError> {
        api::dos::select_contests_for_audit(&self.transport, &self.store, contests).await
    }

    pub async fn set_risk_limit(&self, risk_limit: f64) -> Result<Value, RequestError> {
        api::dos::set_risk_limit(&self.transport, &self.store, risk_limit).await
    }

    pub async fn upload_random_seed(&self, seed: &str) -> Result<Value, RequestError> {
        api::dos::upload_random_seed(&self.transport, &self.store, seed).await
    }

    pub async fn set_audit_info(&self, info: AuditInfoJson) -> Result<Value, RequestError> {
        api::dos::set_audit_info(&self.transport, &self.store, info).await
    }

    pub async fn set_hand_count(&self, contest: ContestId) -> Result<Value, RequestError> {
        api::dos::set_hand_count(&self.transport, &self.store, contest).await
    }

    pub async fn publish_ballots_to_audit(&self) -> Result<Value, RequestError> {
        api::dos::publish_ballots_to_audit(&self.transport, &self.store).await
    }

    pub async fn start_next_round(&self) -> Result<Value, RequestError> {
        api::dos::start_next_round(&self.transport, &self.store).await
    }

    pub async fn reset_database(&self) -> Result<Value, RequestError> {
        api::dos::reset_database(&self.transport, &self.store).await
    }

    pub fn dos_dashboard_poll(&self, control: PollControl) {
        self.store.dispatch(Action::DosDashboardPoll(control));
    }
}

#[async_trait]
impl SyncApi for AuditClient {
    /// Dashboard plus both state machines, issued concurrently. Each request
    /// dispatches its own outcome; the first failure is returned.
    async fn county_refresh(&self) -> Result<(), RequestError> {
        let (dashboard, board, county) = futures::join!(
            self.county_dashboard_refresh(),
            self.fetch_audit_board_asm_state(),
            self.fetch_county_asm_state(),
        );
        dashboard?;
        board?;
        county?;
        Ok(())
    }

    async fn dos_refresh(&self) -> Result<(), RequestError> {
        let (dashboard, asm, contests) = futures::join!(
            self.dos_dashboard_refresh(),
            self.fetch_dos_asm_state(),
            self.dos_fetch_contests(),
        );
        dashboard?;
        asm?;
        contests?;
        Ok(())
    }

    async fn county_fetch_contests(&self, county_id: CountyId) -> Result<(), RequestError> {
        AuditClient::county_fetch_contests(self, county_id)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
