use thiserror::Error;

/// Outcome of a request that did not end in an `_OK` action.
///
/// Every variant is raised only after the matching terminal action has been
/// dispatched, so callers can ignore it when the store is all they need.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("server responded with status {status}")]
    Send { status: u16 },
    #[error("not authorized")]
    Unauthorized,
    #[error("network failure: {0}")]
    Network(String),
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl RequestError {
    pub fn from_status(status: u16) -> Self {
        if status == 401 {
            Self::Unauthorized
        } else {
            Self::Send { status }
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(value: reqwest::Error) -> Self {
        Self::Network(value.to_string())
    }
}

impl From<url::ParseError> for RequestError {
    fn from(value: url::ParseError) -> Self {
        Self::Internal(format!("invalid endpoint: {value}"))
    }
}
