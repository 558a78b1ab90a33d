//! Simulation driver module.
//!
//! This module provides a software simulation driver for development and
//! testing without WLAN hardware. Chips, start latency and faults come from
//! the device's `DeviceConfig`.

mod driver;

pub use driver::{RestartTrigger, SimulationDriver};

use wlan_common::hal::config::DeviceConfig;
use wlan_common::hal::driver::HalDriver;

/// Factory function to create a simulation driver instance.
pub fn create_driver(device: &DeviceConfig) -> Box<dyn HalDriver> {
    Box::new(SimulationDriver::new(device))
}
