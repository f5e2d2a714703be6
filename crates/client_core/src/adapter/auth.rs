use serde_json::Value;
use shared::{
    domain::{AdministratorRole, AuthStage},
    protocol::{AsmStateResponse, AuthenticationResponse},
};

/// Reads the role and stage from a login response body. Unknown shapes
/// yield an empty response rather than an error.
pub fn parse_login(received: &Value) -> AuthenticationResponse {
    serde_json::from_value(received.clone()).unwrap_or_default()
}

pub fn is_second_factor_authenticated(received: &Value) -> bool {
    parse_login(received).stage == Some(AuthStage::SecondFactorAuthenticated)
}

pub fn role(received: &Value) -> Option<AdministratorRole> {
    parse_login(received).role
}

pub fn parse_asm<S: Copy>(response: &AsmStateResponse<S>) -> Option<S> {
    response.current_state
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared::domain::CountyAsmState;

    use super::*;

    #[test]
    fn reads_role_and_stage() {
        let body = json!({"role": "STATE", "stage": "SECOND_FACTOR_AUTHENTICATED"});
        assert_eq!(role(&body), Some(AdministratorRole::State));
        assert!(is_second_factor_authenticated(&body));
    }

    #[test]
    fn tolerates_unexpected_bodies() {
        assert_eq!(role(&json!("ok")), None);
        assert!(!is_second_factor_authenticated(&json!({})));
    }

    #[test]
    fn asm_state_is_passed_through() {
        let response = AsmStateResponse {
            current_state: Some(CountyAsmState::CvrsOk),
            enabled_ui_events: vec![],
        };
        assert_eq!(parse_asm(&response), Some(CountyAsmState::CvrsOk));
    }
}
