//! Hardware abstraction types and capability contracts.
//!
//! This module contains the driver trait and the capability traits the
//! lifecycle controller consumes, plus the configuration types describing
//! which devices to bring up.

pub mod config;
pub mod driver;
pub mod feature_flags;
pub mod iface_tool;
pub mod mode_controller;
pub mod types;
