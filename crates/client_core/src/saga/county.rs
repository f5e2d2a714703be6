use std::time::Duration;

use shared::{domain::HashStatus, error::ServerMessage, protocol::FileUploadJson};

use super::{Effect, Saga};
use crate::{
    action::{Action, Submitted, UploadEnvelope, Uploaded},
    notice::Notice,
    state::AppState,
};

const COUNTING_GROUP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UploadKind {
    BallotManifest,
    CvrExport,
}

impl UploadKind {
    fn label(self) -> &'static str {
        match self {
            Self::BallotManifest => "ballot manifest",
            Self::CvrExport => "CVR export",
        }
    }
}

fn uploaded_filename(envelope: &UploadEnvelope<FileUploadJson>) -> String {
    envelope
        .received
        .body
        .get("filename")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| envelope.sent.filename.clone())
}

fn hash_mismatch(envelope: &UploadEnvelope<FileUploadJson>) -> bool {
    envelope
        .received
        .body
        .get("hash_status")
        .and_then(|v| serde_json::from_value::<HashStatus>(v.clone()).ok())
        == Some(HashStatus::Mismatch)
}

fn upload_notices(kind: UploadKind, upload: &Uploaded<FileUploadJson>) -> Option<Vec<Effect>> {
    let label = kind.label();
    let effects = match upload {
        Uploaded::Send => return None,
        Uploaded::Ok(envelope) => vec![Effect::Notify(Notice::ok(format!(
            "Uploaded {label} \"{}\".",
            uploaded_filename(envelope)
        )))],
        Uploaded::Fail(envelope) => {
            let result = ServerMessage::from_body(&envelope.received.body).result;
            let counting_group = kind == UploadKind::CvrExport
                && result
                    .as_deref()
                    .is_some_and(|r| r.contains("prohibited header CountingGroup"));

            let detail = if hash_mismatch(envelope) {
                Notice::warning("Please verify that the hash matches the file to be uploaded.")
            } else if counting_group {
                Notice::danger("The CVR export contained the prohibited \"CountingGroup\" column.")
                    .with_timeout(COUNTING_GROUP_TIMEOUT)
            } else {
                Notice::warning(format!(
                    "Please verify that the uploaded file is a valid {label}."
                ))
            };
            vec![
                Effect::Notify(Notice::danger(format!("Failed to upload {label}."))),
                Effect::Notify(detail),
            ]
        }
        Uploaded::NetworkFail => vec![Effect::Notify(Notice::danger(format!(
            "Network error: failed to upload {label}."
        )))],
    };
    Some(effects)
}

/// Reports upload outcomes. The uploading flags follow the upload actions
/// in the county reducer.
pub struct UploadSaga;

impl Saga for UploadSaga {
    fn name(&self) -> &'static str {
        "county-upload"
    }

    fn react(&self, action: &Action, _state: &AppState) -> Option<Vec<Effect>> {
        match action {
            Action::UploadBallotManifest(upload) => {
                upload_notices(UploadKind::BallotManifest, upload)
            }
            Action::UploadCvrExport(upload) => upload_notices(UploadKind::CvrExport, upload),
            _ => None,
        }
    }
}

fn failed<S>(submitted: &Submitted<S>, what: &str) -> Option<Vec<Effect>> {
    let notice = match submitted {
        Submitted::Fail(_) => Notice::danger(format!("Unable to {what}.")),
        Submitted::NetworkFail => Notice::danger(format!("Unable to {what}: network failure.")),
        _ => return None,
    };
    Some(vec![Effect::Notify(notice)])
}

/// Audit board interactions: sign-in, ballot submission, round sign-off.
pub struct AuditSaga;

impl Saga for AuditSaga {
    fn name(&self) -> &'static str {
        "county-audit"
    }

    fn react(&self, action: &Action, _state: &AppState) -> Option<Vec<Effect>> {
        match action {
            Action::AuditBoardSignIn(Submitted::Ok(_)) => {
                Some(vec![Effect::Notify(Notice::ok("Audit board signed in."))])
            }
            Action::AuditBoardSignIn(s) => failed(s, "sign in audit board"),
            Action::AuditBoardSignOut(Submitted::Ok(_)) => {
                Some(vec![Effect::Notify(Notice::ok("Audit board signed out."))])
            }
            Action::AuditBoardSignOut(s) => failed(s, "sign out audit board"),
            Action::UploadAcvr(s) => failed(s, "submit audited ballot"),
            Action::BallotNotFound(s) => failed(s, "mark ballot as not found"),
            Action::RoundSignOff(Submitted::Ok(_)) => {
                Some(vec![Effect::Notify(Notice::ok("Round is now signed off."))])
            }
            Action::RoundSignOff(s) => failed(s, "sign off round"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared::domain::CountyId;

    use super::*;
    use crate::action::Received;

    fn envelope(body: serde_json::Value, status: u16) -> UploadEnvelope<FileUploadJson> {
        UploadEnvelope {
            sent: FileUploadJson {
                county_id: CountyId(2),
                filename: "local.csv".into(),
                hash: "abc".into(),
            },
            received: Received { status, body },
        }
    }

    fn messages(effects: &[Effect]) -> Vec<String> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Notify(notice) => Some(notice.message.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn send_is_not_reported() {
        assert_eq!(
            UploadSaga.react(
                &Action::UploadCvrExport(Uploaded::Send),
                &AppState::default()
            ),
            None
        );
    }

    #[test]
    fn ok_names_the_uploaded_file() {
        let effects = upload_notices(
            UploadKind::BallotManifest,
            &Uploaded::Ok(envelope(json!({"filename": "manifest.csv"}), 200)),
        )
        .expect("reported");
        assert_eq!(
            messages(&effects),
            vec!["Uploaded ballot manifest \"manifest.csv\"."]
        );
    }

    #[test]
    fn mismatched_hash_is_explained() {
        let effects = upload_notices(
            UploadKind::BallotManifest,
            &Uploaded::Fail(envelope(json!({"hash_status": "MISMATCH"}), 400)),
        )
        .expect("reported");
        assert_eq!(
            messages(&effects),
            vec![
                "Failed to upload ballot manifest.",
                "Please verify that the hash matches the file to be uploaded."
            ]
        );
    }

    #[test]
    fn counting_group_header_gets_long_notice() {
        let effects = upload_notices(
            UploadKind::CvrExport,
            &Uploaded::Fail(envelope(
                json!({"result": "CVR import failed: prohibited header CountingGroup"}),
                400,
            )),
        )
        .expect("reported");
        let Some(Effect::Notify(notice)) = effects.last() else {
            panic!("expected a notice");
        };
        assert_eq!(
            notice.message,
            "The CVR export contained the prohibited \"CountingGroup\" column."
        );
        assert_eq!(notice.timeout, Some(COUNTING_GROUP_TIMEOUT));
    }

    #[test]
    fn generic_failure_and_network_failure() {
        let effects = upload_notices(
            UploadKind::CvrExport,
            &Uploaded::Fail(envelope(json!(null), 500)),
        )
        .expect("reported");
        assert_eq!(
            messages(&effects)[1],
            "Please verify that the uploaded file is a valid CVR export."
        );

        let effects =
            upload_notices(UploadKind::CvrExport, &Uploaded::NetworkFail).expect("reported");
        assert_eq!(
            messages(&effects),
            vec!["Network error: failed to upload CVR export."]
        );
    }

    #[test]
    fn audit_failures_notify() {
        let effects = AuditSaga
            .react(
                &Action::UploadAcvr(Submitted::NetworkFail),
                &AppState::default(),
            )
            .expect("reacts");
        assert_eq!(
            messages(&effects),
            vec!["Unable to submit audited ballot: network failure."]
        );
        assert_eq!(
            AuditSaga.react(&Action::UploadAcvr(Submitted::Send), &AppState::default()),
            None
        );
    }
}
