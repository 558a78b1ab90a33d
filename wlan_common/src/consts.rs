//! System-wide constants for the WLAN HAL workspace.
//!
//! Single source of truth for identifiers, limits and default paths.

/// Canonical service name (used for logging and diagnostics).
pub const WIFI_SERVICE_NAME: &str = "wlan_hal";

/// First chip identifier handed out by the controller.
///
/// Identifiers grow monotonically from here and are never reused.
pub const FIRST_CHIP_ID: u32 = 1;

/// Chip mode identifier for station operation.
pub const STA_CHIP_MODE_ID: u32 = 0;

/// Chip mode identifier for soft access point operation.
pub const AP_CHIP_MODE_ID: u32 = 1;

/// Maximum number of physical devices a single controller manages.
pub const MAX_DEVICES: usize = 8;

/// Maximum number of chips a single device may report.
pub const MAX_CHIPS_PER_DEVICE: usize = 4;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/wlan/wlan_hal.toml";

/// Name of the built-in simulation driver.
pub const SIMULATION_DRIVER_NAME: &str = "simulation";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_consistent() {
        assert!(FIRST_CHIP_ID > 0);
        assert_ne!(STA_CHIP_MODE_ID, AP_CHIP_MODE_ID);
        assert!(MAX_DEVICES > 0);
        assert!(MAX_CHIPS_PER_DEVICE > 0);
    }
}
