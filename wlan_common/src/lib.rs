//! WLAN Common Library
//!
//! This crate provides the shared types, capability traits and configuration
//! loading utilities used by all WLAN HAL workspace crates.
//!
//! # Module Structure
//!
//! - [`hal`] - Driver trait, chip types and capability traits (mode controller,
//!   interface tool, feature flags)
//! - [`event`] - Listener callback traits and the versioned listener variant
//! - [`status`] - Status codes and the API-level error type
//! - [`config`] - Configuration loading traits and types
//! - [`consts`] - Workspace-wide constants
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! Add to your `Cargo.toml` with alias for shorter imports:
//! ```toml
//! [dependencies]
//! wlan = { package = "wlan_common", path = "../wlan_common" }
//! ```
//!
//! Then import:
//! ```rust
//! use wlan_common::config::{ConfigLoader, SharedConfig};
//! use wlan_common::status::{StatusCode, WifiError};
//! ```

pub mod config;
pub mod consts;
pub mod event;
pub mod hal;
pub mod prelude;
pub mod status;
