//! HTTP client implementation for Fritz!Box communication
//!
//! One invocation performs a session login followed by a single POST of the
//! SmartHome page (`data.lua`, page `sh`). Sessions are not reused across
//! invocations.

use crate::client::session::{challenge_response, SessionInfo};
use crate::client::SmartHomeClient;
use crate::config::FritzboxConfig;
use crate::error::{FritzboxError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const LOGIN_PATH: &str = "login_sid.lua?version=2";
const DATA_PATH: &str = "data.lua";

/// HTTP client for the Fritz!Box web interface
#[derive(Debug)]
pub struct FritzboxHttpClient {
    /// HTTP client instance
    client: Client,

    /// Base URL of the router
    base_url: Url,

    /// Login settings
    config: FritzboxConfig,
}

impl FritzboxHttpClient {
    /// Create a new HTTP client
    pub fn new(config: FritzboxConfig) -> Result<Self> {
        let mut client_builder = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(format!("fritzbox-smarthome/{}", env!("CARGO_PKG_VERSION")));

        if !config.verify_ssl {
            warn!("SSL verification disabled - accepting the router's self-signed certificate");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder
            .build()
            .map_err(|e| FritzboxError::connection(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.url.clone(),
            config,
        })
    }

    /// Build URL for a router page
    fn build_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| FritzboxError::connection(format!("Invalid URL path {path}: {e}")))
    }

    /// Map transport failures and error statuses to plugin errors
    async fn check(result: reqwest::Result<Response>) -> Result<Response> {
        let response = result.map_err(|e| {
            if e.is_timeout() {
                FritzboxError::timeout(format!("HTTP request failed: {e}"))
            } else if e.is_connect() {
                FritzboxError::connection(format!("HTTP request failed: {e}"))
            } else {
                FritzboxError::Http(e)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            debug!("HTTP request successful: {status}");
            return Ok(response);
        }

        let response_text = response.text().await.unwrap_or_default();
        let error_msg = format!("HTTP error {status}: {response_text}");
        Err(match status.as_u16() {
            401 | 403 => FritzboxError::authentication(error_msg),
            _ => FritzboxError::connection(error_msg),
        })
    }

    /// Log in and return a valid session id
    pub async fn login(&self) -> Result<String> {
        let url = self.build_url(LOGIN_PATH)?;
        info!("Logging in to Fritz!Box at {}", self.base_url);

        let text = Self::check(self.client.get(url.clone()).send().await)
            .await?
            .text()
            .await?;
        let session = SessionInfo::parse(&text)?;

        if session.block_time > 0 {
            debug!("Router blocks logins for {}s, waiting", session.block_time);
            tokio::time::sleep(Duration::from_secs(session.block_time)).await;
        }

        let response = challenge_response(&session.challenge, &self.config.password)?;
        let form = [
            ("username", self.config.username.as_str()),
            ("response", response.as_str()),
        ];

        let text = Self::check(self.client.post(url).form(&form).send().await)
            .await?
            .text()
            .await?;
        let session = SessionInfo::parse(&text)?;

        if !session.is_valid() {
            return Err(FritzboxError::authentication(
                "Fritz!Box rejected the login, check fritzbox_username and fritzbox_password",
            ));
        }

        debug!("Session established");
        Ok(session.sid)
    }
}

#[async_trait]
impl SmartHomeClient for FritzboxHttpClient {
    async fn fetch_device_list(&self) -> Result<serde_json::Value> {
        let sid = self.login().await?;

        debug!("requesting SmartHome device list");
        let url = self.build_url(DATA_PATH)?;
        let form = [
            ("xhr", "1"),
            ("lang", "en"),
            ("page", "sh"),
            ("xhrId", "all"),
            ("sid", sid.as_str()),
            ("no_sidrenew", ""),
        ];

        let text = Self::check(self.client.post(url).form(&form).send().await)
            .await?
            .text()
            .await?;

        let data: serde_json::Value = serde_json::from_str(&text)?;
        debug!("SmartHome data: {data:#}");
        Ok(data)
    }
}
