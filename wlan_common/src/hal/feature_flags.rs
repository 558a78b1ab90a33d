//! Build/device feature flags capability.

use crate::consts::{AP_CHIP_MODE_ID, STA_CHIP_MODE_ID};
use crate::hal::types::{ChipMode, IfaceType};

/// Device feature switches consulted when chips are created.
pub trait FeatureFlags: Send + Sync {
    /// Modes offered by a chip. The primary chip is the first chip
    /// discovered by a `start()`.
    fn chip_modes(&self, is_primary: bool) -> Vec<ChipMode>;

    /// When true, chips never advertise soft AP MAC randomization.
    fn is_ap_mac_randomization_disabled(&self) -> bool;
}

/// Modes offered by default: the primary chip supports station and access
/// point operation, secondary chips only access point.
pub fn default_chip_modes(is_primary: bool) -> Vec<ChipMode> {
    let ap = ChipMode::new(AP_CHIP_MODE_ID, [IfaceType::Ap]);
    if is_primary {
        vec![
            ChipMode::new(STA_CHIP_MODE_ID, [IfaceType::Sta, IfaceType::P2p, IfaceType::Nan]),
            ap,
        ]
    } else {
        vec![ap]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_chip_offers_sta_and_ap() {
        let modes = default_chip_modes(true);
        let ids: Vec<_> = modes.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![STA_CHIP_MODE_ID, AP_CHIP_MODE_ID]);
    }

    #[test]
    fn secondary_chip_offers_ap_only() {
        let modes = default_chip_modes(false);
        assert_eq!(modes.len(), 1);
        assert_eq!(modes[0].ifaces, vec![IfaceType::Ap]);
    }
}
