use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use url::Url;

use crate::error::RequestError;

/// HTTP client bound to one RLA server. The cookie store carries the
/// server-side session between requests.
#[derive(Clone, Debug)]
pub struct Transport {
    http: Client,
    base: Url,
}

impl Transport {
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Self::with_client(http, server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self> {
        let mut base = Url::parse(server_url)
            .with_context(|| format!("invalid server url '{server_url}'"))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { http, base })
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolves a server path such as `cvr/id/12` or `contest/county?3`.
    pub fn endpoint(&self, path: &str) -> Result<Url, RequestError> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_keep_base_path_and_query() {
        let transport =
            Transport::new("http://localhost:8888/corla", Duration::from_secs(1)).expect("new");
        assert_eq!(
            transport.endpoint("/county-dashboard").expect("url").as_str(),
            "http://localhost:8888/corla/county-dashboard"
        );
        assert_eq!(
            transport.endpoint("contest/county?3").expect("url").as_str(),
            "http://localhost:8888/corla/contest/county?3"
        );
    }

    #[test]
    fn rejects_unparseable_server_url() {
        assert!(Transport::new("not a url", Duration::from_secs(1)).is_err());
    }
}
