//! Munin invocation modes

use crate::client::SmartHomeClient;
use crate::config::PluginEnv;
use crate::devices::{normalize, sort_by_display_name, NormalizedDevice};
use crate::error::Result;
use crate::munin::{emit_config, emit_values, GraphPlan, PluginOutput};
use clap::ValueEnum;
use std::fmt;
use tracing::debug;

/// Argument munin-node passes to the plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    /// Print current values
    #[default]
    Fetch,
    /// Print graph definitions (followed by values when dirty config is enabled)
    Config,
    /// Report whether the plugin can run on this node
    Autoconf,
    /// Fetch with diagnostic output of the normalized devices
    Debug,
}

/// Fetch the device list and return it normalized and sorted
pub async fn load_devices(client: &dyn SmartHomeClient) -> Result<Vec<NormalizedDevice>> {
    let raw = client.fetch_device_list().await?;
    let devices = normalize(&raw)?;
    debug!("normalized {} devices", devices.len());
    Ok(sort_by_display_name(devices))
}

/// Answer munin-node's `autoconf` probe
pub fn autoconf(out: &mut dyn PluginOutput) -> Result<()> {
    out.line("yes")
}

/// Message printed on stderr when an invocation in `mode` fails
pub fn failure_message(mode: Mode, err: &dyn fmt::Display) -> String {
    match mode {
        Mode::Fetch => format!("Couldn't retrieve fritzbox smarthome data: {err}"),
        Mode::Config | Mode::Autoconf | Mode::Debug => err.to_string(),
    }
}

/// Run one invocation in `mode`, writing plugin output to `out`
pub async fn run(
    mode: Mode,
    client: &dyn SmartHomeClient,
    env: &PluginEnv,
    out: &mut dyn PluginOutput,
) -> Result<()> {
    match mode {
        Mode::Autoconf => autoconf(out),
        Mode::Fetch => {
            let devices = load_devices(client).await?;
            emit_values(&GraphPlan::new(&devices), out)
        }
        Mode::Config => {
            let devices = load_devices(client).await?;
            let plan = GraphPlan::new(&devices);
            emit_config(&plan, env.host_name.as_deref(), out)?;
            if env.dirty_config {
                out.blank()?;
                emit_values(&plan, out)?;
            }
            Ok(())
        }
        Mode::Debug => {
            let devices = load_devices(client).await?;
            for line in serde_json::to_string_pretty(&devices)?.lines() {
                out.line(line)?;
            }
            out.blank()?;
            emit_values(&GraphPlan::new(&devices), out)
        }
    }
}
