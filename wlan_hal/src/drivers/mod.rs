//! Driver implementations.
//!
//! This module contains all built-in drivers:
//!
//! - [`simulation`] - Software simulation driver for development and testing
//!
//! # Adding New Drivers
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement the `HalDriver` trait from `wlan_common::hal::driver`
//! 3. Register the driver in [`register_all_drivers`]

pub mod simulation;

use crate::driver_registry::DriverRegistry;
use wlan_common::consts::SIMULATION_DRIVER_NAME;
use wlan_common::hal::driver::HalError;

/// Register all built-in drivers.
///
/// # Errors
/// Fails if one of the built-in names is already taken in `registry`.
pub fn register_all_drivers(registry: &mut DriverRegistry) -> Result<(), HalError> {
    registry.register(SIMULATION_DRIVER_NAME, simulation::create_driver)?;
    Ok(())
}
