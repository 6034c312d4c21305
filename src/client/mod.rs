//! Fritz!Box client implementations

pub mod http_client;
pub mod session;

pub use http_client::FritzboxHttpClient;

use crate::error::Result;
use async_trait::async_trait;

/// Source of the SmartHome device list
#[async_trait]
pub trait SmartHomeClient: Send + Sync {
    /// Log in (if needed) and fetch the raw `{data: {devices: [...]}}` document
    async fn fetch_device_list(&self) -> Result<serde_json::Value>;
}
