use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Body the server attaches to most responses, success or failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerMessage {
    #[serde(default)]
    pub result: Option<String>,
}

impl ServerMessage {
    /// Pulls `result` out of an arbitrary JSON body, if it has one.
    pub fn from_body(body: &Value) -> Self {
        Self {
            result: body
                .get("result")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("server rejected request with status {status}: {}", message.as_deref().unwrap_or("no message"))]
pub struct ServerRejection {
    pub status: u16,
    pub message: Option<String>,
}

impl ServerRejection {
    pub fn new(status: u16, body: &Value) -> Self {
        Self {
            status,
            message: ServerMessage::from_body(body).result,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rejection_reads_result_message() {
        let rejection = ServerRejection::new(400, &json!({"result": "bad seed"}));
        assert_eq!(rejection.message.as_deref(), Some("bad seed"));
        assert_eq!(
            rejection.to_string(),
            "server rejected request with status 400: bad seed"
        );
        assert!(!rejection.is_unauthorized());
    }

    #[test]
    fn rejection_tolerates_bodies_without_result() {
        let rejection = ServerRejection::new(401, &json!([1, 2]));
        assert!(rejection.message.is_none());
        assert!(rejection.is_unauthorized());
    }
}
