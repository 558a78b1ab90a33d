//! Chip and mode types shared between drivers and the controller.
//!
//! - `ChipId` / `ChipModeId` - Identifiers
//! - `ChipCapabilities` - Capability bits reported per chip
//! - `ChipDescriptor` - What a driver reports for each discovered chip
//! - `ChipMode` / `IfaceType` - Modes a chip can be configured into

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Controller-assigned chip identifier. Unique for the process lifetime.
pub type ChipId = u32;

/// Identifier of a chip operating mode.
pub type ChipModeId = u32;

bitflags! {
    /// Capabilities a driver reports for a chip.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ChipCapabilities: u32 {
        /// Firmware memory dump supported.
        const DEBUG_MEMORY_FIRMWARE_DUMP = 1 << 0;
        /// Driver memory dump supported.
        const DEBUG_MEMORY_DRIVER_DUMP = 1 << 1;
        /// Connectivity event ring buffer supported.
        const DEBUG_RING_BUFFER_CONNECT_EVENT = 1 << 2;
        /// Host wake reason statistics supported.
        const DEBUG_HOST_WAKE_REASON_STATS = 1 << 3;
        /// Transmit power limiting supported.
        const SET_TX_POWER_LIMIT = 1 << 4;
        /// Device-to-device round trip time measurement.
        const D2D_RTT = 1 << 5;
        /// Device-to-access-point round trip time measurement.
        const D2AP_RTT = 1 << 6;
        /// Soft AP MAC address randomization.
        const AP_MAC_RANDOMIZATION = 1 << 7;
    }
}

/// Interface types a chip mode can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IfaceType {
    /// Station (client).
    Sta,
    /// Soft access point.
    Ap,
    /// Wi-Fi Direct.
    P2p,
    /// Neighbor awareness networking.
    Nan,
}

/// A mode the chip can be configured into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipMode {
    /// Mode identifier.
    pub id: ChipModeId,
    /// Interfaces available while in this mode.
    pub ifaces: Vec<IfaceType>,
}

impl ChipMode {
    /// Create a mode from its identifier and hosted interfaces.
    pub fn new(id: ChipModeId, ifaces: impl Into<Vec<IfaceType>>) -> Self {
        Self {
            id,
            ifaces: ifaces.into(),
        }
    }
}

/// Driver-reported description of a discovered chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipDescriptor {
    /// Network interface name bound to the chip (e.g. `wlan0`).
    pub iface_name: String,
    /// Capabilities reported by the driver.
    #[serde(default)]
    pub capabilities: ChipCapabilities,
}

impl ChipDescriptor {
    /// Descriptor with no capabilities.
    pub fn new(iface_name: impl Into<String>) -> Self {
        Self {
            iface_name: iface_name.into(),
            capabilities: ChipCapabilities::empty(),
        }
    }

    /// Builder-style capability setter.
    pub fn with_capabilities(mut self, capabilities: ChipCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}
