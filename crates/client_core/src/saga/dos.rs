use shared::error::ServerRejection;

use super::{Effect, Saga};
use crate::{
    action::{Action, SubmitFailure, Submitted},
    notice::Notice,
    state::AppState,
};

fn notify(notices: Vec<Notice>) -> Option<Vec<Effect>> {
    Some(notices.into_iter().map(Effect::Notify).collect())
}

fn server_result<S>(failure: &SubmitFailure<S>) -> String {
    ServerRejection::new(failure.status, &failure.error)
        .message
        .unwrap_or_else(|| format!("server responded with status {}", failure.status))
}

/// Toasts for every state-administrator audit step.
pub struct AuditSaga;

impl Saga for AuditSaga {
    fn name(&self) -> &'static str {
        "dos-audit"
    }

    fn react(&self, action: &Action, _state: &AppState) -> Option<Vec<Effect>> {
        match action {
            Action::SelectContestsForAudit(s) => match s {
                Submitted::Ok(_) => {
                    notify(vec![Notice::ok("Contests for audit are now selected.")])
                }
                Submitted::Fail(_) => notify(vec![
                    Notice::danger("Unable to select contests for audit."),
                    Notice::danger(
                        "Please verify that you selected at least one contest for audit.",
                    ),
                ]),
                Submitted::NetworkFail => notify(vec![Notice::danger(
                    "Unable to select contests for audit: network failure.",
                )]),
                Submitted::Send => None,
            },
            Action::SetAuditInfo(s) => match s {
                Submitted::Ok(_) => notify(vec![Notice::ok("Audit info is now set.")]),
                Submitted::Fail(failure) => notify(vec![Notice::danger(format!(
                    "Unable to set audit info: {}",
                    server_result(failure)
                ))]),
                Submitted::NetworkFail => notify(vec![Notice::danger(
                    "Unable to set audit info: network failure.",
                )]),
                Submitted::Send => None,
            },
            Action::SetHandCount(s) => match s {
                Submitted::Ok(_) => notify(vec![Notice::ok("Contest selected for hand count.")]),
                Submitted::Fail(failure) => notify(vec![Notice::danger(format!(
                    "Unable to set contest for hand count: {}",
                    server_result(failure)
                ))]),
                Submitted::NetworkFail => notify(vec![Notice::danger(
                    "Unable to set contest for hand count: network failure.",
                )]),
                Submitted::Send => None,
            },
            Action::UploadRandomSeed(s) => match s {
                Submitted::Ok(_) => {
                    notify(vec![Notice::ok("Random number generator seed is now set.")])
                }
                Submitted::Fail(_) => notify(vec![
                    Notice::danger("Unable to set random number generator seed."),
                    Notice::danger(
                        "Please verify that the seed is a numeral at least 20 digits long.",
                    ),
                ]),
                Submitted::NetworkFail => notify(vec![Notice::danger(
                    "Unable to set random number generator seed: network failure.",
                )]),
                Submitted::Send => None,
            },
            Action::PublishBallotsToAudit(s) => match s {
                Submitted::Ok(_) => notify(vec![
                    Notice::ok("Ballots to audit are now published."),
                    Notice::ok("The audit has started!"),
                ]),
                Submitted::Fail(_) => {
                    notify(vec![Notice::danger("Unable to publish ballots to audit.")])
                }
                Submitted::NetworkFail => notify(vec![Notice::danger(
                    "Unable to publish ballots to audit: network failure.",
                )]),
                Submitted::Send => None,
            },
            Action::SetRiskLimit(s) => match s {
                Submitted::Ok(_) => {
                    notify(vec![Notice::ok("Comparison audit risk limit is now set.")])
                }
                Submitted::Fail(_) => notify(vec![Notice::danger("Unable to set risk limit.")]),
                Submitted::NetworkFail => notify(vec![Notice::danger(
                    "Unable to set risk limit: network failure.",
                )]),
                Submitted::Send => None,
            },
            Action::DosStartNextRound(s) => match s {
                Submitted::Ok(_) => notify(vec![Notice::ok("Next audit round started.")]),
                Submitted::Fail(_) => notify(vec![Notice::danger("Unable to start next round.")]),
                Submitted::NetworkFail => notify(vec![Notice::danger(
                    "Unable to start next round: network failure.",
                )]),
                Submitted::Send => None,
            },
            Action::ResetDatabase(s) => match s {
                Submitted::Ok(_) => notify(vec![Notice::ok("Database reset.")]),
                Submitted::Fail(_) => notify(vec![Notice::danger("Unable to reset database.")]),
                Submitted::NetworkFail => notify(vec![Notice::danger(
                    "Unable to reset database: network failure.",
                )]),
                Submitted::Send => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared::{
        domain::ContestId,
        protocol::{EmptyJson, HandCountJson, RandomSeedJson},
    };

    use super::*;
    use crate::{action::SubmitData, notice::NoticeLevel};

    fn notices(action: Action) -> Vec<Notice> {
        AuditSaga
            .react(&action, &AppState::default())
            .unwrap_or_default()
            .into_iter()
            .filter_map(|effect| match effect {
                Effect::Notify(notice) => Some(notice),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn publish_ok_announces_audit_start() {
        let messages: Vec<_> = notices(Action::PublishBallotsToAudit(Submitted::Ok(SubmitData {
            sent: EmptyJson {},
            received: json!({}),
        })))
        .into_iter()
        .map(|n| n.message)
        .collect();
        assert_eq!(
            messages,
            vec!["Ballots to audit are now published.", "The audit has started!"]
        );
    }

    #[test]
    fn hand_count_failure_quotes_server_result() {
        let out = notices(Action::SetHandCount(Submitted::Fail(SubmitFailure {
            sent: HandCountJson {
                contest: ContestId(3),
            },
            status: 400,
            error: json!({"result": "contest is not auditable"}),
        })));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].level, NoticeLevel::Danger);
        assert_eq!(
            out[0].message,
            "Unable to set contest for hand count: contest is not auditable"
        );
    }

    #[test]
    fn seed_failure_explains_format() {
        let out = notices(Action::UploadRandomSeed(Submitted::Fail(SubmitFailure {
            sent: RandomSeedJson {
                seed: "123".into(),
            },
            status: 400,
            error: json!(null),
        })));
        assert_eq!(
            out[1].message,
            "Please verify that the seed is a numeral at least 20 digits long."
        );
    }

    #[test]
    fn send_is_not_taken() {
        assert!(AuditSaga
            .react(&Action::SetRiskLimit(Submitted::Send), &AppState::default())
            .is_none());
    }
}
