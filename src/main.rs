//! netwatch - network interface connection status widget
//!
//! This is the binary entry point. All logic lives in the workspace crates.

use std::path::{Path, PathBuf};

use clap::Parser;
use netwatch_app::config::{default_config_path, load_settings, try_load_settings, Settings};
use netwatch_app::{JsonSink, NetworkModule, SignalAction, Signals, TextSink};
use netwatch_core::prelude::*;

/// netwatch - show the connection state of a network interface
#[derive(Parser, Debug)]
#[command(name = "netwatch")]
#[command(about = "Show the connection state of a network interface", long_about = None)]
struct Args {
    /// Interface to watch (e.g. wg0, tun0); overrides the config file
    #[arg(value_name = "INTERFACE")]
    interface: Option<String>,

    /// Seconds between probes; overrides the config file
    #[arg(short, long, value_name = "SECS")]
    interval: Option<u64>,

    /// Emit NDJSON events instead of plain text lines
    #[arg(long)]
    json: bool,

    /// Settings file (default: <config_dir>/netwatch/config.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Args {
    /// Command line values win over the settings file
    fn apply_overrides(&self, mut settings: Settings) -> Settings {
        if let Some(interface) = &self.interface {
            settings.interface = Some(interface.clone());
        }
        if let Some(secs) = self.interval {
            settings.refresh_interval_secs = secs;
        }
        settings
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    if let Err(e) = netwatch_core::logging::init() {
        eprintln!("netwatch: logging disabled: {}", e);
    }

    let config_path = args.config.clone().or_else(default_config_path);
    let settings = args.apply_overrides(
        config_path
            .as_deref()
            .map(load_settings)
            .unwrap_or_default(),
    );

    let interface = settings.interface.clone().ok_or(Error::NoInterface)?;

    let module = NetworkModule::new(&interface);
    module.apply_settings(&settings);
    info!(
        "Watching {} every {:?}",
        interface,
        module.scheduler().interval()
    );

    let handle = if args.json {
        module.spawn(JsonSink::stdout())
    } else {
        module.spawn(TextSink::stdout())
    };

    let mut signals = Signals::new()?;
    loop {
        match signals.recv().await {
            SignalAction::Reload => reload(&module, &args, config_path.as_deref()),
            SignalAction::Shutdown => break,
        }
    }

    handle.stop().await;
    info!("netwatch stopped");
    Ok(())
}

/// Re-read the settings file and swap renderer and interval on the live module.
///
/// An unreadable or invalid file leaves the running configuration untouched.
fn reload(module: &NetworkModule, args: &Args, config_path: Option<&Path>) {
    let Some(path) = config_path else {
        warn!("Reload requested but no config file location is known");
        return;
    };

    match try_load_settings(path) {
        Ok(settings) => {
            let settings = args.apply_overrides(settings);
            module.apply_settings(&settings);
            info!(
                "Reloaded {} (interval {:?})",
                path.display(),
                settings.refresh_interval()
            );
        }
        Err(e) => warn!("Keeping current settings, reload failed: {}", e),
    }
}
