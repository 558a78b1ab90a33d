//! Feature flags backed by configuration.

use wlan_common::hal::config::FeatureConfig;
use wlan_common::hal::feature_flags::{FeatureFlags, default_chip_modes};
use wlan_common::hal::types::ChipMode;

/// Feature flags using the default chip mode table.
#[derive(Debug, Clone, Default)]
pub struct DefaultFeatureFlags {
    ap_mac_randomization_disabled: bool,
}

impl DefaultFeatureFlags {
    /// Create flags with an explicit AP MAC randomization switch.
    pub fn new(ap_mac_randomization_disabled: bool) -> Self {
        Self {
            ap_mac_randomization_disabled,
        }
    }
}

impl From<&FeatureConfig> for DefaultFeatureFlags {
    fn from(config: &FeatureConfig) -> Self {
        Self::new(config.ap_mac_randomization_disabled)
    }
}

impl FeatureFlags for DefaultFeatureFlags {
    fn chip_modes(&self, is_primary: bool) -> Vec<ChipMode> {
        default_chip_modes(is_primary)
    }

    fn is_ap_mac_randomization_disabled(&self) -> bool {
        self.ap_mac_randomization_disabled
    }
}
