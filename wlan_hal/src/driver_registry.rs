//! Driver registry for vendor drivers.
//!
//! Provides a `DriverRegistry` struct for registering and retrieving driver
//! factories by name, and `ConfiguredHalFactory`, which turns the configured
//! device list into driver instances for the controller. Constructor
//! injection only; there is no global registry.

use std::collections::HashMap;
use tracing::debug;
use wlan_common::hal::config::DeviceConfig;
use wlan_common::hal::driver::{DriverFactory, HalDriver, HalError, LegacyHalFactory};

/// Registry of available drivers.
///
/// Constructed at startup, populated via `register()`, and handed to a
/// [`ConfiguredHalFactory`].
pub struct DriverRegistry {
    factories: HashMap<&'static str, DriverFactory>,
}

impl DriverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a driver factory.
    ///
    /// # Errors
    /// Returns `HalError::ConfigError` if a driver with the same name is
    /// already registered.
    pub fn register(&mut self, name: &'static str, factory: DriverFactory) -> Result<(), HalError> {
        if self.factories.contains_key(name) {
            return Err(HalError::ConfigError(format!(
                "Driver '{name}' is already registered"
            )));
        }
        self.factories.insert(name, factory);
        debug!("Registered driver '{}'", name);
        Ok(())
    }

    /// Get a driver factory by name.
    pub fn get_factory(&self, name: &str) -> Option<DriverFactory> {
        self.factories.get(name).copied()
    }

    /// Create a driver instance for a configured device.
    ///
    /// # Errors
    /// Returns `HalError::DriverNotFound` if the device names an unknown driver.
    pub fn create_driver(&self, device: &DeviceConfig) -> Result<Box<dyn HalDriver>, HalError> {
        let factory = self
            .get_factory(&device.driver)
            .ok_or_else(|| HalError::DriverNotFound(device.driver.clone()))?;
        Ok(factory(device))
    }

    /// List all registered driver names, sorted.
    pub fn list_drivers(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// [`LegacyHalFactory`] creating one driver per configured device.
pub struct ConfiguredHalFactory {
    registry: DriverRegistry,
    devices: Vec<DeviceConfig>,
}

impl ConfiguredHalFactory {
    /// Bind a populated registry to the configured devices.
    pub fn new(registry: DriverRegistry, devices: Vec<DeviceConfig>) -> Self {
        Self { registry, devices }
    }
}

impl LegacyHalFactory for ConfiguredHalFactory {
    fn create_instances(&self) -> Result<Vec<Box<dyn HalDriver>>, HalError> {
        self.devices
            .iter()
            .map(|device| self.registry.create_driver(device))
            .collect()
    }
}
