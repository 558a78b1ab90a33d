//! Prelude module for common re-exports.
//!
//! `use wlan_common::prelude::*;` brings in the types most consumers need
//! without listing individual paths.

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};
pub use crate::hal::config::{ChipConfig, DeviceConfig, FeatureConfig, WifiHalConfig};

// ─── Status ─────────────────────────────────────────────────────────
pub use crate::status::{StatusCode, WifiError, WifiResult, WifiStatus};

// ─── Driver & Capabilities ──────────────────────────────────────────
pub use crate::hal::driver::{
    DriverEvent, DriverEventHandler, DriverFactory, HalDriver, HalError, LegacyHalFactory,
};
pub use crate::hal::feature_flags::FeatureFlags;
pub use crate::hal::iface_tool::InterfaceTool;
pub use crate::hal::mode_controller::ModeController;
pub use crate::hal::types::{ChipCapabilities, ChipDescriptor, ChipId, ChipMode, ChipModeId, IfaceType};

// ─── Events ─────────────────────────────────────────────────────────
pub use crate::event::{
    CallbackError, CallbackResult, ChipEvent, EventListener, ListenerId, WifiChipEventCallback,
    WifiEvent, WifiEventCallback, WifiEventCallbackV1_5,
};
