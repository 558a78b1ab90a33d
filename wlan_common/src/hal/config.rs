//! HAL configuration types.
//!
//! This module contains the configuration loaded from `wlan_hal.toml`:
//! - `WifiHalConfig` - Main configuration
//! - `DeviceConfig` - One physical device and the driver that serves it
//! - `ChipConfig` - Chips a (simulated) device reports
//! - `FeatureConfig` - Device feature switches
//!
//! # TOML Example
//!
//! ```toml
//! [shared]
//! service_name = "wlan-hal"
//!
//! [features]
//! ap_mac_randomization_disabled = false
//!
//! [[devices]]
//! driver = "simulation"
//! start_latency_ms = 20
//!
//! [[devices.chips]]
//! iface = "wlan0"
//! capabilities = "D2D_RTT | AP_MAC_RANDOMIZATION"
//! ```

use crate::config::{ConfigError, SharedConfig};
use crate::consts::{MAX_CHIPS_PER_DEVICE, MAX_DEVICES, SIMULATION_DRIVER_NAME};
use crate::hal::types::{ChipCapabilities, ChipDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Main configuration loaded from `wlan_hal.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WifiHalConfig {
    /// Shared service settings.
    #[serde(default)]
    pub shared: SharedConfig,

    /// Physical devices, in controller index order.
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,

    /// Feature switches.
    #[serde(default)]
    pub features: FeatureConfig,
}

/// One physical device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Registered driver name serving this device.
    pub driver: String,

    /// Chips the device reports once started.
    #[serde(default)]
    pub chips: Vec<ChipConfig>,

    /// Simulated session acquisition latency.
    #[serde(default)]
    pub start_latency_ms: u64,

    /// Fault injection: session acquisition fails.
    #[serde(default)]
    pub fail_init: bool,

    /// Fault injection: session release reports an error.
    #[serde(default)]
    pub fail_shutdown: bool,
}

impl DeviceConfig {
    /// Simulated device reporting one chip per interface name.
    pub fn simulated<I, S>(ifaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            driver: SIMULATION_DRIVER_NAME.to_string(),
            chips: ifaces
                .into_iter()
                .map(|iface| ChipConfig {
                    iface: iface.into(),
                    capabilities: ChipCapabilities::empty(),
                })
                .collect(),
            start_latency_ms: 0,
            fail_init: false,
            fail_shutdown: false,
        }
    }

    /// Session acquisition latency as a `Duration`.
    pub fn start_latency(&self) -> Duration {
        Duration::from_millis(self.start_latency_ms)
    }

    /// Chip descriptors this device reports.
    pub fn chip_descriptors(&self) -> Vec<ChipDescriptor> {
        self.chips
            .iter()
            .map(|chip| ChipDescriptor::new(&chip.iface).with_capabilities(chip.capabilities))
            .collect()
    }
}

/// A chip reported by a device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChipConfig {
    /// Network interface bound to the chip.
    pub iface: String,

    /// Reported capabilities.
    #[serde(default)]
    pub capabilities: ChipCapabilities,
}

/// Device feature switches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Suppress soft AP MAC randomization on every chip.
    #[serde(default)]
    pub ap_mac_randomization_disabled: bool,
}

impl WifiHalConfig {
    /// Single simulated device with one `wlan0` chip.
    pub fn simulation() -> Self {
        Self {
            devices: vec![DeviceConfig::simulated(["wlan0"])],
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Validation Rules
    /// 1. Shared config is valid
    /// 2. `1 <= devices.len() <= MAX_DEVICES`
    /// 3. Every device names a driver
    /// 4. `chips.len() <= MAX_CHIPS_PER_DEVICE` per device
    /// 5. Interface names are non-empty and unique across all devices
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;

        if self.devices.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one device must be configured".to_string(),
            ));
        }
        if self.devices.len() > MAX_DEVICES {
            return Err(ConfigError::ValidationError(format!(
                "Too many devices: {} (max {})",
                self.devices.len(),
                MAX_DEVICES
            )));
        }

        let mut ifaces = HashSet::new();
        for (idx, device) in self.devices.iter().enumerate() {
            if device.driver.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "device {idx}: driver name cannot be empty"
                )));
            }
            if device.chips.len() > MAX_CHIPS_PER_DEVICE {
                return Err(ConfigError::ValidationError(format!(
                    "device {idx}: too many chips: {} (max {})",
                    device.chips.len(),
                    MAX_CHIPS_PER_DEVICE
                )));
            }
            for chip in &device.chips {
                if chip.iface.is_empty() {
                    return Err(ConfigError::ValidationError(format!(
                        "device {idx}: chip interface name cannot be empty"
                    )));
                }
                if !ifaces.insert(chip.iface.as_str()) {
                    return Err(ConfigError::ValidationError(format!(
                        "Duplicate interface name: {}",
                        chip.iface
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;

    const SAMPLE: &str = r#"
[shared]
service_name = "wlan-lab"

[features]
ap_mac_randomization_disabled = true

[[devices]]
driver = "simulation"
start_latency_ms = 15

[[devices.chips]]
iface = "wlan0"
capabilities = "D2D_RTT | AP_MAC_RANDOMIZATION"

[[devices.chips]]
iface = "wlan1"

[[devices]]
driver = "simulation"
fail_init = true
"#;

    #[test]
    fn test_parse_sample() {
        let config = WifiHalConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.shared.service_name, "wlan-lab");
        assert!(config.features.ap_mac_randomization_disabled);
        assert_eq!(config.devices.len(), 2);
        assert_eq!(config.devices[0].start_latency(), Duration::from_millis(15));
        assert!(config.devices[1].fail_init);
        assert!(config.devices[1].chips.is_empty());

        let descriptors = config.devices[0].chip_descriptors();
        assert_eq!(descriptors.len(), 2);
        assert!(descriptors[0]
            .capabilities
            .contains(ChipCapabilities::AP_MAC_RANDOMIZATION));
        assert!(descriptors[1].capabilities.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_device() {
        let config = WifiHalConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
        assert!(WifiHalConfig::simulation().validate().is_ok());
    }

    #[test]
    fn test_validate_duplicate_iface() {
        let mut config = WifiHalConfig::simulation();
        config.devices.push(DeviceConfig::simulated(["wlan0"]));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("wlan0"));
    }

    #[test]
    fn test_validate_empty_driver_name() {
        let mut config = WifiHalConfig::simulation();
        config.devices[0].driver = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_too_many_chips() {
        let ifaces: Vec<String> = (0..=MAX_CHIPS_PER_DEVICE).map(|i| format!("wlan{i}")).collect();
        let config = WifiHalConfig {
            devices: vec![DeviceConfig::simulated(ifaces)],
            ..WifiHalConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
