use std::time::Duration;

use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Ok,
    Danger,
    Warning,
}

/// A toast shown to the user. `timeout` is how long it stays up; `None`
/// means the front end's default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub timeout: Option<Duration>,
}

impl Notice {
    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Ok, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Danger, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn log(&self) {
        match self.level {
            NoticeLevel::Ok => info!(message = %self.message, "notice"),
            NoticeLevel::Warning => warn!(message = %self.message, "notice"),
            NoticeLevel::Danger => error!(message = %self.message, "notice"),
        }
    }
}
