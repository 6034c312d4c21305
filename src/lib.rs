//! AVM Fritz!Box SmartHome plugin for Munin
//!
//! Logs in to a Fritz!Box, fetches the SmartHome device list and reports
//! temperatures, thermostat modes, humidity, battery levels and power
//! measurements as Munin multigraph output.
//!
//! # Modules
//!
//! - [`client`]: session login and device list retrieval
//! - [`devices`]: raw device document model and normalization
//! - [`munin`]: graph plan plus `config` and value emitters
//! - [`plugin`]: dispatch of the Munin invocation modes

pub mod client;
pub mod config;
pub mod devices;
pub mod error;
pub mod logging;
pub mod munin;
pub mod plugin;

// Re-export main types for convenience
pub use client::{FritzboxHttpClient, SmartHomeClient};
pub use config::{FritzboxConfig, PluginEnv};
pub use devices::NormalizedDevice;
pub use error::{FritzboxError, Result};
pub use plugin::Mode;
