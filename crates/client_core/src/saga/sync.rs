use super::{Effect, RefreshTarget, Saga, Take};
use crate::{action::Action, state::AppState};

const COUNTY_REFRESH: &[&str] = &[
    "AUDIT_BOARD_SIGN_IN_OK",
    "AUDIT_BOARD_SIGN_OUT_OK",
    "BALLOT_NOT_FOUND_FAIL",
    "BALLOT_NOT_FOUND_NETWORK_FAIL",
    "BALLOT_NOT_FOUND_OK",
    "SUBMIT_ROUND_SIGN_OFF_OK",
    "UPLOAD_ACVR_FAIL",
    "UPLOAD_ACVR_NETWORK_FAIL",
    "UPLOAD_ACVR_OK",
    "UPLOAD_BALLOT_MANIFEST_OK",
    "UPLOAD_CVR_EXPORT_OK",
    "COUNTY_BOARD_SIGN_IN_SYNC",
];

const DOS_REFRESH: &[&str] = &[
    "DOS_START_NEXT_ROUND_OK",
    "PUBLISH_BALLOTS_TO_AUDIT_OK",
    "SELECT_CONTESTS_FOR_AUDIT_OK",
    "SET_AUDIT_INFO_OK",
    "SET_HAND_COUNT_OK",
    "SET_RISK_LIMIT_OK",
    "UPLOAD_RANDOM_SEED_OK",
];

/// Re-reads the dashboard after anything that changes it server-side.
pub struct SyncSaga {
    name: &'static str,
    target: RefreshTarget,
    triggers: &'static [&'static str],
}

impl SyncSaga {
    pub fn county() -> Self {
        Self {
            name: "county-sync",
            target: RefreshTarget::County,
            triggers: COUNTY_REFRESH,
        }
    }

    pub fn dos() -> Self {
        Self {
            name: "dos-sync",
            target: RefreshTarget::Dos,
            triggers: DOS_REFRESH,
        }
    }
}

impl Saga for SyncSaga {
    fn name(&self) -> &'static str {
        self.name
    }

    fn take(&self) -> Take {
        Take::Latest
    }

    fn react(&self, action: &Action, _state: &AppState) -> Option<Vec<Effect>> {
        let name = action.name();
        self.triggers
            .contains(&name.as_str())
            .then(|| vec![Effect::Refresh(self.target)])
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared::protocol::EmptyJson;

    use super::*;
    use crate::action::{SubmitData, Submitted, Uploaded};

    #[test]
    fn county_mutations_trigger_county_refresh() {
        let saga = SyncSaga::county();
        let state = AppState::default();
        assert_eq!(
            saga.react(&Action::UploadAcvr(Submitted::NetworkFail), &state),
            Some(vec![Effect::Refresh(RefreshTarget::County)])
        );
        assert_eq!(
            saga.react(&Action::CountyBoardSignInSync, &state),
            Some(vec![Effect::Refresh(RefreshTarget::County)])
        );
        assert_eq!(
            saga.react(&Action::UploadBallotManifest(Uploaded::Send), &state),
            None
        );
        assert_eq!(
            saga.react(&Action::DosStartNextRound(Submitted::NetworkFail), &state),
            None
        );
    }

    #[test]
    fn dos_mutations_trigger_dos_refresh() {
        let saga = SyncSaga::dos();
        let state = AppState::default();
        let published = Action::PublishBallotsToAudit(Submitted::Ok(SubmitData {
            sent: EmptyJson {},
            received: json!({}),
        }));
        assert_eq!(
            saga.react(&published, &state),
            Some(vec![Effect::Refresh(RefreshTarget::Dos)])
        );
        assert_eq!(
            saga.react(&Action::ResetDatabase(Submitted::Send), &state),
            None
        );
    }
}
