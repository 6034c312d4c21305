//! Configuration management for the Fritz!Box SmartHome plugin
//!
//! Munin hands plugin settings over as environment variables (`env.*` lines in
//! the plugin configuration), so everything here is read from the process
//! environment.

use crate::error::{FritzboxError, Result};
use std::{env, time::Duration};
use url::Url;

/// Fritz!Box connection configuration
#[derive(Debug, Clone)]
pub struct FritzboxConfig {
    /// Base URL of the router (e.g., "http://192.168.178.1/")
    pub url: Url,

    /// Username for the session login, empty for password-only setups
    pub username: String,

    /// Password for the session login
    pub password: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Enable SSL/TLS verification
    pub verify_ssl: bool,
}

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

impl FritzboxConfig {
    /// Create a configuration for the given router URL
    pub fn new(url: Url, password: impl Into<String>) -> Self {
        Self {
            url,
            username: String::new(),
            password: password.into(),
            timeout: DEFAULT_TIMEOUT,
            verify_ssl: true,
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let host = non_empty_var("fritzbox_ip")
            .ok_or_else(|| FritzboxError::config("fritzbox_ip is not set"))?;
        let password = env::var("fritzbox_password")
            .map_err(|_| FritzboxError::config("fritzbox_password is not set"))?;

        let use_tls = match non_empty_var("fritzbox_use_tls") {
            Some(value) => parse_switch("fritzbox_use_tls", &value)?,
            None => false,
        };

        let mut config = Self::new(host_url(&host, use_tls)?, password);

        if let Some(username) = non_empty_var("fritzbox_username") {
            config.username = username;
        }

        if let Some(verify) = non_empty_var("fritzbox_verify_ssl") {
            config.verify_ssl = parse_switch("fritzbox_verify_ssl", &verify)?;
        }

        if let Some(timeout) = non_empty_var("fritzbox_timeout") {
            config.timeout = Duration::from_secs(timeout.parse().map_err(|e| {
                FritzboxError::config(format!("Invalid fritzbox_timeout: {e}"))
            })?);
        }

        Ok(config)
    }
}

/// Settings that shape the plugin output rather than the router session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginEnv {
    /// Munin host name override, printed at the end of the config output
    pub host_name: Option<String>,

    /// Munin asked for config and values in a single run
    pub dirty_config: bool,
}

impl PluginEnv {
    /// Load plugin settings from environment variables
    pub fn from_env() -> Self {
        Self {
            host_name: non_empty_var("host_name"),
            dirty_config: env::var("MUNIN_CAP_DIRTYCONFIG").is_ok_and(|v| v == "1"),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn host_url(host: &str, use_tls: bool) -> Result<Url> {
    let url_str = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else if use_tls {
        format!("https://{host}")
    } else {
        format!("http://{host}")
    };

    url_str
        .parse()
        .map_err(|e| FritzboxError::config(format!("Invalid fritzbox_ip: {e}")))
}

fn parse_switch(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(FritzboxError::config(format!(
            "Invalid {key}: {other}. Use 1/0 or true/false"
        ))),
    }
}
