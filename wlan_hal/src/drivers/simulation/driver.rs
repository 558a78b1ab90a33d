//! Simulation driver implementation.
//!
//! The `SimulationDriver` implements the `HalDriver` trait by reporting the
//! chips listed in its `DeviceConfig`. Session acquisition sleeps for the
//! configured latency, and `fail_init` / `fail_shutdown` inject faults.

use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};
use wlan_common::hal::config::DeviceConfig;
use wlan_common::hal::driver::{
    DriverDiagnostics, DriverEvent, DriverEventHandler, HalDriver, HalError,
};
use wlan_common::hal::types::ChipDescriptor;

const FIRMWARE_VERSION: &str = "sim-fw-1.0";

/// Handle for raising a simulated subsystem restart from outside the driver.
///
/// Only fires while the driver session is held.
#[derive(Clone, Default)]
pub struct RestartTrigger {
    sink: Arc<Mutex<Option<DriverEventHandler>>>,
}

impl RestartTrigger {
    /// Raise `DriverEvent::SubsystemRestart`. Returns `false` if no session
    /// is held.
    pub fn fire(&self, reason: &str) -> bool {
        let handler = self.sink.lock().clone();
        match handler {
            Some(handler) => {
                warn!("Simulated subsystem restart: {}", reason);
                handler(DriverEvent::SubsystemRestart {
                    reason: reason.to_string(),
                });
                true
            }
            None => false,
        }
    }
}

/// Simulation driver implementing the HalDriver trait.
pub struct SimulationDriver {
    /// Driver name
    name: &'static str,
    /// Driver version
    version: &'static str,
    /// Device this instance serves
    device: DeviceConfig,
    /// Session held
    initialized: bool,
    /// Event sink of the current session
    restart: RestartTrigger,
    init_count: u64,
    shutdown_count: u64,
    /// Session start (for uptime in diagnostics)
    started_at: Option<Instant>,
}

impl SimulationDriver {
    /// Create a new simulation driver for one configured device.
    pub fn new(device: &DeviceConfig) -> Self {
        Self {
            name: "simulation",
            version: env!("CARGO_PKG_VERSION"),
            device: device.clone(),
            initialized: false,
            restart: RestartTrigger::default(),
            init_count: 0,
            shutdown_count: 0,
            started_at: None,
        }
    }

    /// Trigger usable for raising a subsystem restart while started.
    pub fn restart_trigger(&self) -> RestartTrigger {
        self.restart.clone()
    }
}

impl HalDriver for SimulationDriver {
    fn name(&self) -> &'static str {
        self.name
    }

    fn version(&self) -> &'static str {
        self.version
    }

    fn init(&mut self, events: DriverEventHandler) -> Result<(), HalError> {
        let latency = self.device.start_latency();
        if !latency.is_zero() {
            debug!("Simulating firmware load for {:?}", latency);
            thread::sleep(latency);
        }

        if self.device.fail_init {
            return Err(HalError::InitFailed(
                "simulated firmware load failure".to_string(),
            ));
        }

        *self.restart.sink.lock() = Some(events);
        self.initialized = true;
        self.init_count += 1;
        self.started_at = Some(Instant::now());
        info!(
            "Simulation driver initialized with {} chip(s)",
            self.device.chips.len()
        );
        Ok(())
    }

    fn enumerate_chips(&self) -> Vec<ChipDescriptor> {
        if !self.initialized {
            return Vec::new();
        }
        self.device.chip_descriptors()
    }

    fn shutdown(&mut self) -> Result<(), HalError> {
        *self.restart.sink.lock() = None;
        self.initialized = false;
        self.shutdown_count += 1;
        self.started_at = None;

        if self.device.fail_shutdown {
            return Err(HalError::ShutdownFailed(
                "simulated bus error during release".to_string(),
            ));
        }
        info!("Simulation driver shutdown complete");
        Ok(())
    }

    fn diagnostics(&self) -> Option<DriverDiagnostics> {
        let uptime_ms = self
            .started_at
            .map(|t| t.elapsed().as_millis())
            .unwrap_or_default();
        Some(DriverDiagnostics {
            init_count: self.init_count,
            shutdown_count: self.shutdown_count,
            firmware_version: Some(FIRMWARE_VERSION.to_string()),
            custom: Some(format!(
                "{{\"chips\":{},\"uptime_ms\":{}}}",
                self.device.chips.len(),
                uptime_ms
            )),
        })
    }
}
