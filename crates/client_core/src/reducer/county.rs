use crate::{
    action::{Action, Fetched, Submitted, Uploaded},
    adapter::{contest, county, cvr},
    state::CountyState,
};

pub(super) fn reduce(state: &CountyState, action: &Action) -> Option<CountyState> {
    match action {
        Action::CountyDashboardRefresh(Fetched::Ok(json)) => {
            let mut next = state.clone();
            next.dashboard = county::parse_dashboard(json, &state.contest_defs);
            if let Some(asm) = json.asm_state {
                next.asm.county = Some(asm);
            }
            if let Some(asm) = json.audit_board_asm_state {
                next.asm.audit_board = Some(asm);
            }
            Some(next)
        }
        Action::FetchCountyAsmState(Fetched::Ok(response)) => {
            let current = response.current_state?;
            let mut next = state.clone();
            next.asm.county = Some(current);
            Some(next)
        }
        Action::FetchAuditBoardAsmState(Fetched::Ok(response)) => {
            let current = response.current_state?;
            let mut next = state.clone();
            next.asm.audit_board = Some(current);
            Some(next)
        }
        Action::CountyFetchContests(Fetched::Ok(list)) => {
            let mut next = state.clone();
            next.contest_defs = contest::pivot(list);
            Some(next)
        }
        Action::CountyFetchCvr(Fetched::Ok(json)) => {
            let mut next = state.clone();
            let ballot = cvr::parse_current_ballot(json);
            next.acvrs
                .entry(ballot.id)
                .or_insert_with(|| cvr::empty_acvr(&ballot));
            next.current_ballot = Some(ballot);
            Some(next)
        }
        Action::FetchCvrsToAudit(Fetched::Ok(list)) => {
            let mut next = state.clone();
            next.cvrs_to_audit = cvr::parse_cvrs_to_audit(list);
            Some(next)
        }
        Action::UpdateAcvrForm {
            cvr_id,
            contest_id,
            marks,
        } => {
            let mut next = state.clone();
            next.acvrs
                .entry(*cvr_id)
                .or_default()
                .insert(*contest_id, marks.clone());
            Some(next)
        }
        Action::UploadAcvr(Submitted::Ok(data)) => mark_submitted(state, data.sent.cvr_id),
        Action::BallotNotFound(Submitted::Ok(data)) => mark_submitted(state, data.sent.id),
        Action::UploadBallotManifest(upload) => {
            let uploading = matches!(upload, Uploaded::Send);
            (state.uploading_ballot_manifest != uploading).then(|| CountyState {
                uploading_ballot_manifest: uploading,
                ..state.clone()
            })
        }
        Action::UploadCvrExport(upload) => {
            let uploading = matches!(upload, Uploaded::Send);
            (state.uploading_cvr_export != uploading).then(|| CountyState {
                uploading_cvr_export: uploading,
                ..state.clone()
            })
        }
        Action::UploadingBallotManifest(uploading) => {
            let mut next = state.clone();
            next.uploading_ballot_manifest = *uploading;
            Some(next)
        }
        Action::UploadingCvrExport(uploading) => {
            let mut next = state.clone();
            next.uploading_cvr_export = *uploading;
            Some(next)
        }
        _ => None,
    }
}

fn mark_submitted(state: &CountyState, cvr_id: shared::domain::CvrId) -> Option<CountyState> {
    let ballot = state.current_ballot.as_ref()?;
    if ballot.id != cvr_id {
        return None;
    }
    let mut next = state.clone();
    if let Some(ballot) = next.current_ballot.as_mut() {
        ballot.submitted = true;
    }
    Some(next)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared::{
        domain::{AuditBoardAsmState, ContestId, CountyAsmState, CountyId, CvrId},
        protocol::{AsmStateResponse, BallotNotFoundJson, CountyDashboardJson, CvrJson},
    };

    use super::*;
    use crate::{action::SubmitData, model::AcvrContestMarks};

    fn cvr_json() -> CvrJson {
        serde_json::from_value(json!({
            "id": 5,
            "contest_info": [{"contest": 1, "choices": []}]
        }))
        .expect("decode")
    }

    #[test]
    fn dashboard_refresh_keeps_local_fields() {
        let mut state = CountyState::default();
        state.uploading_cvr_export = true;
        state.acvrs.insert(CvrId(1), Default::default());

        let json = CountyDashboardJson {
            id: Some(CountyId(8)),
            asm_state: Some(CountyAsmState::CvrsImporting),
            ..Default::default()
        };
        let next = reduce(&state, &Action::CountyDashboardRefresh(Fetched::Ok(json)))
            .expect("applies");

        assert_eq!(next.id(), Some(CountyId(8)));
        assert_eq!(next.asm.county, Some(CountyAsmState::CvrsImporting));
        assert!(next.uploading_cvr_export);
        assert_eq!(next.acvrs.len(), 1);
    }

    #[test]
    fn asm_fetch_without_state_is_a_no_op() {
        let state = CountyState::default();
        let empty = AsmStateResponse::<AuditBoardAsmState> {
            current_state: None,
            enabled_ui_events: vec![],
        };
        assert!(reduce(&state, &Action::FetchAuditBoardAsmState(Fetched::Ok(empty))).is_none());

        let set = AsmStateResponse {
            current_state: Some(AuditBoardAsmState::RoundInProgress),
            enabled_ui_events: vec![],
        };
        let next =
            reduce(&state, &Action::FetchAuditBoardAsmState(Fetched::Ok(set))).expect("applies");
        assert_eq!(next.asm.audit_board, Some(AuditBoardAsmState::RoundInProgress));
    }

    #[test]
    fn fetching_a_cvr_seeds_the_acvr_once() {
        let state = CountyState::default();
        let next = reduce(&state, &Action::CountyFetchCvr(Fetched::Ok(cvr_json()))).expect("cvr");
        assert_eq!(next.acvrs[&CvrId(5)].len(), 1);

        let marks = AcvrContestMarks {
            comments: "torn".into(),
            ..Default::default()
        };
        let edited = reduce(
            &next,
            &Action::UpdateAcvrForm {
                cvr_id: CvrId(5),
                contest_id: ContestId(1),
                marks: marks.clone(),
            },
        )
        .expect("edit");

        let refetched =
            reduce(&edited, &Action::CountyFetchCvr(Fetched::Ok(cvr_json()))).expect("cvr");
        assert_eq!(refetched.acvrs[&CvrId(5)][&ContestId(1)], marks);
    }

    #[test]
    fn ballot_not_found_marks_current_ballot_submitted() {
        let state = reduce(
            &CountyState::default(),
            &Action::CountyFetchCvr(Fetched::Ok(cvr_json())),
        )
        .expect("cvr");

        let other = Action::BallotNotFound(Submitted::Ok(SubmitData {
            sent: BallotNotFoundJson { id: CvrId(6) },
            received: json!({}),
        }));
        assert!(reduce(&state, &other).is_none());

        let same = Action::BallotNotFound(Submitted::Ok(SubmitData {
            sent: BallotNotFoundJson { id: CvrId(5) },
            received: json!({}),
        }));
        let next = reduce(&state, &same).expect("applies");
        assert!(next.current_ballot.expect("ballot").submitted);
    }

    #[test]
    fn upload_lifecycle_drives_uploading_flag() {
        let sending = reduce(
            &CountyState::default(),
            &Action::UploadCvrExport(Uploaded::Send),
        )
        .expect("flag raised");
        assert!(sending.uploading_cvr_export);
        assert!(!sending.uploading_ballot_manifest);

        let done = reduce(&sending, &Action::UploadCvrExport(Uploaded::NetworkFail))
            .expect("flag cleared");
        assert!(!done.uploading_cvr_export);
        assert!(reduce(&done, &Action::UploadCvrExport(Uploaded::NetworkFail)).is_none());
    }
}
