//! # WLAN HAL Binary
//!
//! Brings the WLAN subsystem up, keeps it running until a shutdown signal
//! arrives, then tears it down.
//!
//! # Usage
//!
//! ```bash
//! # Run with the configured devices
//! wlan_hal --config /etc/wlan/wlan_hal.toml
//!
//! # Run one simulated device, verbose logging
//! wlan_hal -s -v
//!
//! # Start, print a diagnostic dump, stop
//! wlan_hal -s --dump
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use wlan_common::config::{ConfigLoader, LogLevel};
use wlan_common::consts::DEFAULT_CONFIG_PATH;
use wlan_common::event::{
    CallbackResult, EventListener, ListenerId, WifiEventCallback, WifiEventCallbackV1_5,
};
use wlan_common::hal::config::WifiHalConfig;
use wlan_common::status::WifiStatus;
use wlan_hal::driver_registry::{ConfiguredHalFactory, DriverRegistry};
use wlan_hal::drivers::register_all_drivers;
use wlan_hal::feature_flags::DefaultFeatureFlags;
use wlan_hal::iface_tool::SimulatedInterfaceTool;
use wlan_hal::mode_controller::SimulatedModeController;
use wlan_hal::wifi::Wifi;

const LOG_LISTENER: ListenerId = ListenerId(0);
const SIGNAL_POLL: Duration = Duration::from_millis(100);

/// WLAN HAL - root lifecycle controller with pluggable drivers
#[derive(Parser, Debug)]
#[command(name = "wlan_hal")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "WLAN HAL root lifecycle controller with pluggable driver architecture")]
#[command(long_about = None)]
struct Args {
    /// Path to configuration file (wlan_hal.toml)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Ignore the config file and run one simulated device
    #[arg(short = 's', long)]
    simulate: bool,

    /// Start, print a diagnostic dump to stdout and stop
    #[arg(long)]
    dump: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs (and the dump) in JSON format
    #[arg(long)]
    json: bool,
}

/// Listener that mirrors controller events into the log.
struct LogListener;

impl WifiEventCallback for LogListener {
    fn on_start(&self) -> CallbackResult {
        info!("event: started");
        Ok(())
    }

    fn on_stop(&self) -> CallbackResult {
        info!("event: stopped");
        Ok(())
    }

    fn on_failure(&self, status: &WifiStatus) -> CallbackResult {
        error!("event: failure ({}: {})", status.code, status.description);
        Ok(())
    }
}

impl WifiEventCallbackV1_5 for LogListener {
    fn on_subsystem_restart(&self, status: &WifiStatus) -> CallbackResult {
        warn!("event: subsystem restart ({})", status.description);
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = run() {
        error!("WLAN HAL failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let loaded = if args.simulate {
        Ok(WifiHalConfig::simulation())
    } else {
        WifiHalConfig::load(&args.config)
    };

    let level = loaded
        .as_ref()
        .map_or(LogLevel::default(), |config| config.shared.log_level);
    setup_tracing(&args, level);
    let config = loaded?;
    if args.simulate {
        info!("Simulation mode enabled, ignoring {:?}", args.config);
    } else {
        info!("Loaded configuration from {:?}", args.config);
    }
    config.validate()?;

    info!(
        "{} v{} starting with {} device(s)...",
        config.shared.service_name,
        env!("CARGO_PKG_VERSION"),
        config.devices.len()
    );

    let mut registry = DriverRegistry::new();
    register_all_drivers(&mut registry)?;
    info!("Available drivers: {:?}", registry.list_drivers());
    let factory = ConfiguredHalFactory::new(registry, config.devices.clone());

    let wifi = Wifi::new(
        Arc::new(SimulatedInterfaceTool::new()),
        &factory,
        Arc::new(SimulatedModeController::new()),
        Arc::new(DefaultFeatureFlags::from(&config.features)),
    )?;
    wifi.register_event_callback(LOG_LISTENER, EventListener::V1_5(Arc::new(LogListener)))?;

    wifi.start()?;

    if args.dump {
        let options = if args.json {
            vec!["--json".to_string()]
        } else {
            Vec::new()
        };
        wifi.debug(&mut std::io::stdout(), &options);
    } else {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        ctrlc::set_handler(move || {
            info!("Received shutdown signal");
            flag.store(false, Ordering::SeqCst);
        })?;

        info!("Running, chips: {:?}", wifi.get_chip_ids()?);
        while running.load(Ordering::SeqCst) {
            thread::sleep(SIGNAL_POLL);
        }
    }

    wifi.stop()?;
    info!("{} shutdown complete", config.shared.service_name);
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments and configured level.
fn setup_tracing(args: &Args, configured: LogLevel) {
    let directive = if args.verbose {
        LogLevel::Debug.as_directive()
    } else {
        configured.as_directive()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
