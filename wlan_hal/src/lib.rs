//! # WLAN HAL Library
//!
//! Root lifecycle controller for the WLAN hardware abstraction, with a
//! pluggable driver architecture.
//!
//! Drivers implement the `HalDriver` trait defined in
//! `wlan_common::hal::driver`; the controller owns one driver handle per
//! physical device and the chips those drivers report while started.
//!
//! # Module Structure
//!
//! - [`wifi`] - `Wifi` controller: start/stop state machine, chip lookup
//! - [`legacy_hal`] - Per-device driver handle
//! - [`chip`] - Logical chip handles and mode changes
//! - [`callback`] - Listener registry shared by controller and chips
//! - [`driver_registry`] - Driver factory registration
//! - [`drivers`] - Driver implementations
//! - [`mode_controller`], [`iface_tool`], [`feature_flags`] - Simulated and
//!   default capability adapters
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        wlan_hal (single crate)                   │
//! │  ┌─────────────┐    ┌──────────────┐    ┌─────────────────────┐  │
//! │  │  Listeners  │◄───│    Wifi      │◄───│  Driver Registry    │  │
//! │  │ (callback)  │    │ (lifecycle)  │    │  + HAL factory      │  │
//! │  └─────────────┘    └──┬────────┬──┘    └─────────────────────┘  │
//! │                        │        │                                │
//! │                        ▼        ▼                                │
//! │              ┌────────────┐  ┌────────────┐                      │
//! │              │ LegacyHal  │◄─│  WifiChip  │ (Weak back-ref)      │
//! │              │ (per dev)  │  │ (per chip) │                      │
//! │              └─────┬──────┘  └────────────┘                      │
//! │                    ▼                                             │
//! │              ┌────────────┐                                      │
//! │              │ HalDriver  │ (trait object)                       │
//! │              └────────────┘                                      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]

pub mod callback;
pub mod chip;
pub mod driver_registry;
pub mod drivers;
pub mod feature_flags;
pub mod iface_tool;
pub mod legacy_hal;
pub mod mode_controller;
pub mod wifi;

// Re-export key types for convenience
pub use crate::chip::WifiChip;
pub use crate::driver_registry::{ConfiguredHalFactory, DriverRegistry};
pub use crate::legacy_hal::LegacyHal;
pub use crate::wifi::{ControllerSnapshot, RunState, Wifi};
