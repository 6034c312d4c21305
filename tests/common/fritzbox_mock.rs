//! WireMock-based Fritz!Box mocking infrastructure
//!
//! Simulates the session login (`login_sid.lua?version=2`) and the
//! SmartHome data page (`data.lua`) of a router.

use fritzbox_smarthome::config::FritzboxConfig;
use serde_json::Value;
use std::time::Duration;
use url::Url;
use wiremock::{
    matchers::{body_string_contains, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_PASSWORD: &str = "1example!";
pub const TEST_SID: &str = "9f3c1a0b2d4e6f70";
pub const PBKDF2_CHALLENGE: &str = "2$10000$5A1711$2000$5A1722";
pub const PBKDF2_RESPONSE: &str =
    "5A1722$1798a1672bca7c6463d6b245f82b53703b0f50813401b03e4045a5861e689adb";

/// `SessionInfo` document as returned by `login_sid.lua`
pub fn session_info(sid: &str, challenge: &str, block_time: u64) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?><SessionInfo><SID>{sid}</SID><Challenge>{challenge}</Challenge><BlockTime>{block_time}</BlockTime><Rights></Rights><Users><User last="1">fritz1234</User></Users></SessionInfo>"#
    )
}

/// Mock Fritz!Box for testing
pub struct MockFritzbox {
    pub server: MockServer,
    pub base_url: String,
}

impl MockFritzbox {
    /// Start a router without any endpoints
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    /// Start a router that accepts [`TEST_PASSWORD`] and serves `devices`
    pub async fn with_devices(devices: Value) -> Self {
        let mock = Self::start().await;
        mock.mock_challenge(PBKDF2_CHALLENGE, 0).await;
        mock.mock_login_accepted().await;
        mock.mock_device_list(devices).await;
        mock
    }

    /// Plugin configuration pointing at this router
    pub fn config(&self) -> FritzboxConfig {
        let mut config = FritzboxConfig::new(
            Url::parse(&self.base_url).expect("valid mock URL"),
            TEST_PASSWORD,
        );
        config.timeout = Duration::from_secs(5);
        config
    }

    /// Answer the initial login request with a challenge
    pub async fn mock_challenge(&self, challenge: &str, block_time: u64) {
        Mock::given(method("GET"))
            .and(path("/login_sid.lua"))
            .and(query_param("version", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(session_info(
                "0000000000000000",
                challenge,
                block_time,
            )))
            .mount(&self.server)
            .await;
    }

    /// Grant a session for the expected challenge response
    pub async fn mock_login_accepted(&self) {
        Mock::given(method("POST"))
            .and(path("/login_sid.lua"))
            .and(body_string_contains("response=5A1722"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(session_info(TEST_SID, "", 0)),
            )
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Refuse every login attempt
    pub async fn mock_login_rejected(&self) {
        Mock::given(method("POST"))
            .and(path("/login_sid.lua"))
            .respond_with(ResponseTemplate::new(200).set_body_string(session_info(
                "0000000000000000",
                "2$10000$5A1711$2000$5A1733",
                10,
            )))
            .mount(&self.server)
            .await;
    }

    /// Serve `devices` for requests carrying the granted session
    pub async fn mock_device_list(&self, devices: Value) {
        Mock::given(method("POST"))
            .and(path("/data.lua"))
            .and(body_string_contains("page=sh"))
            .and(body_string_contains(format!("sid={TEST_SID}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(devices))
            .mount(&self.server)
            .await;
    }

    /// Answer the data page with a fixed status and body
    pub async fn mock_data_error(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path("/data.lua"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }
}
