use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

const DEFAULT_SERVER_URL: &str = "http://localhost:8888";
const SETTINGS_FILE: &str = "rla-client.toml";
/// Floor for both poll delays; a zero delay would poll in a tight loop.
pub const MIN_POLL_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub server_url: String,
    pub poll_delay: Duration,
    /// Used by the county dashboard poll while a CVR export is in flight.
    pub uploading_poll_delay: Duration,
    pub request_timeout: Duration,
    pub session_path: PathBuf,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            poll_delay: Duration::from_millis(5000),
            uploading_poll_delay: Duration::from_millis(5000),
            request_timeout: Duration::from_secs(30),
            session_path: PathBuf::from(".rla-session.json"),
        }
    }
}

pub fn load_settings() -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        apply_file_settings(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("RLA_SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(ms) = env_u64("APP__POLL_DELAY_MS") {
        settings.poll_delay = poll_delay(ms);
    }
    if let Some(ms) = env_u64("APP__UPLOADING_POLL_DELAY_MS") {
        settings.uploading_poll_delay = poll_delay(ms);
    }
    if let Some(secs) = env_u64("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout = Duration::from_secs(secs);
    }

    if let Ok(v) = std::env::var("APP__SESSION_PATH") {
        settings.session_path = PathBuf::from(v);
    }

    settings.server_url = normalize_server_url(&settings.server_url);
    settings
}

fn apply_file_settings(settings: &mut ClientSettings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) else {
        return;
    };

    if let Some(v) = file_cfg.get("server_url").and_then(toml::Value::as_str) {
        settings.server_url = v.to_string();
    }
    if let Some(ms) = file_cfg.get("poll_delay_ms").and_then(toml::Value::as_integer) {
        settings.poll_delay = poll_delay(ms.max(0) as u64);
    }
    if let Some(ms) = file_cfg
        .get("uploading_poll_delay_ms")
        .and_then(toml::Value::as_integer)
    {
        settings.uploading_poll_delay = poll_delay(ms.max(0) as u64);
    }
    if let Some(secs) = file_cfg
        .get("request_timeout_secs")
        .and_then(toml::Value::as_integer)
    {
        settings.request_timeout = Duration::from_secs(secs.max(0) as u64);
    }
    if let Some(v) = file_cfg.get("session_path").and_then(toml::Value::as_str) {
        settings.session_path = PathBuf::from(v);
    }
}

fn poll_delay(ms: u64) -> Duration {
    Duration::from_millis(ms).max(MIN_POLL_DELAY)
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok()?.trim().parse().ok()
}

pub fn normalize_server_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_SERVER_URL.to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_trailing_slashes_and_blank_urls() {
        assert_eq!(
            normalize_server_url(" http://rla.example:8888/// "),
            "http://rla.example:8888"
        );
        assert_eq!(normalize_server_url("   "), DEFAULT_SERVER_URL);
    }

    #[test]
    fn file_settings_override_defaults() {
        let mut settings = ClientSettings::default();
        apply_file_settings(
            &mut settings,
            r#"
server_url = "http://audit.local"
poll_delay_ms = 250
uploading_poll_delay_ms = 100
session_path = "/tmp/rla.json"
"#,
        );
        assert_eq!(settings.server_url, "http://audit.local");
        assert_eq!(settings.poll_delay, Duration::from_millis(250));
        assert_eq!(settings.uploading_poll_delay, MIN_POLL_DELAY);
        assert_eq!(settings.session_path, PathBuf::from("/tmp/rla.json"));
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn zero_poll_delays_are_raised_to_the_floor() {
        let mut settings = ClientSettings::default();
        apply_file_settings(&mut settings, "poll_delay_ms = 0\nuploading_poll_delay_ms = -5\n");
        assert_eq!(settings.poll_delay, MIN_POLL_DELAY);
        assert_eq!(settings.uploading_poll_delay, MIN_POLL_DELAY);
        assert_eq!(poll_delay(1_000), Duration::from_millis(1_000));
    }

    #[test]
    fn malformed_file_leaves_defaults() {
        let mut settings = ClientSettings::default();
        apply_file_settings(&mut settings, "server_url = [");
        assert_eq!(settings, ClientSettings::default());
    }
}
