//! Munin plugin entry point
//!
//! Invoked by munin-node as `fritzbox_smart_home [config|autoconf|debug]`;
//! no argument means fetch. Router settings come from the plugin
//! environment (`fritzbox_ip`, `fritzbox_password`, ...).

use anyhow::Context;
use clap::Parser;
use fritzbox_smarthome::{
    config::{FritzboxConfig, PluginEnv},
    logging::{init_logging, LogConfig},
    munin::WriterOutput,
    plugin::{self, Mode},
    FritzboxError, FritzboxHttpClient,
};
use tracing::{error, info, Level};

/// AVM Fritz!Box SmartHome plugin for Munin
#[derive(Parser, Debug)]
#[command(name = "fritzbox_smart_home")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Plugin mode; omit to print current values
    #[arg(value_enum)]
    mode: Option<Mode>,
}

async fn run(mode: Mode) -> anyhow::Result<()> {
    let env = PluginEnv::from_env();
    let mut out = WriterOutput::new(std::io::stdout().lock());

    if mode == Mode::Autoconf {
        plugin::autoconf(&mut out)?;
        out.finish()?;
        return Ok(());
    }

    let config = FritzboxConfig::from_env().context("Invalid plugin configuration")?;
    info!("Using Fritz!Box at {}", config.url);
    let client = FritzboxHttpClient::new(config)?;

    plugin::run(mode, &client, &env, &mut out).await?;
    out.finish()?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let mode = cli.mode.unwrap_or_default();

    let mut log_config = LogConfig::from_env();
    if mode == Mode::Debug {
        log_config = log_config.at_least(Level::DEBUG);
        log_config.stderr = true;
    }
    if let Err(e) = init_logging(log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    if let Err(e) = run(mode).await {
        let category = e
            .downcast_ref::<FritzboxError>()
            .map_or("internal", FritzboxError::category);
        error!(category, "{mode:?} failed: {e:#}");
        eprintln!("{}", plugin::failure_message(mode, &format_args!("{e:#}")));
        std::process::exit(1);
    }
}
