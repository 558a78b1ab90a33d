//! HAL driver trait and error types.
//!
//! This module defines:
//! - `HalDriver` trait - Interface for pluggable vendor driver sessions
//! - `HalError` enum - Error types for driver and capability operations
//! - `DriverEvent` / `DriverEventHandler` - Asynchronous driver notifications
//! - `DriverFactory` / `LegacyHalFactory` - Driver instantiation
//! - `DriverDiagnostics` struct - Optional driver diagnostics

use crate::hal::config::DeviceConfig;
use crate::hal::types::ChipDescriptor;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Error types for HAL operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HalError {
    /// Driver session could not be acquired.
    #[error("Initialization failed: {0}")]
    InitFailed(String),

    /// Driver session could not be released cleanly.
    #[error("Shutdown failed: {0}")]
    ShutdownFailed(String),

    /// Operation requires a started driver.
    #[error("Driver not started: {0}")]
    NotStarted(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Driver not found in the registry.
    #[error("Driver not found: {0}")]
    DriverNotFound(String),

    /// Mode controller rejected a request.
    #[error("Mode controller error: {0}")]
    ModeError(String),

    /// Network interface manipulation failed.
    #[error("Interface error: {0}")]
    InterfaceError(String),
}

/// Asynchronous notification raised by a driver outside any request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverEvent {
    /// The vendor subsystem crashed and is restarting.
    SubsystemRestart {
        /// Driver-provided reason.
        reason: String,
    },
}

/// Sink the driver uses to raise [`DriverEvent`]s.
///
/// Handed to the driver on every `init()`; may be called from any thread.
pub type DriverEventHandler = Arc<dyn Fn(DriverEvent) + Send + Sync>;

/// Factory function type creating a driver for one configured device.
pub type DriverFactory = fn(&DeviceConfig) -> Box<dyn HalDriver>;

/// Source of driver instances, one per physical device.
///
/// Consulted exactly once, when the controller is constructed.
pub trait LegacyHalFactory {
    /// Create the driver instances in device index order.
    fn create_instances(&self) -> Result<Vec<Box<dyn HalDriver>>, HalError>;
}

/// Optional driver diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DriverDiagnostics {
    /// Number of successful session acquisitions.
    pub init_count: u64,
    /// Number of session releases.
    pub shutdown_count: u64,
    /// Firmware version string, if known.
    pub firmware_version: Option<String>,
    /// Driver-specific diagnostics (JSON string)
    pub custom: Option<String>,
}

/// Trait defining the interface for vendor driver sessions.
///
/// The controller owns one driver per physical device and manages it
/// through this trait.
///
/// # Lifecycle
///
/// 1. `init()` - Acquire the driver session (may block on firmware load)
/// 2. `enumerate_chips()` - Report chips while the session is held
/// 3. `shutdown()` - Release the session
///
/// `init()` and `shutdown()` may be called again after a full cycle.
///
/// # Timing Contracts
///
/// | Operation | Max Duration | Notes |
/// |-----------|--------------|-------|
/// | `init()` | 10 seconds | Firmware download |
/// | `enumerate_chips()` | 100 ms | Reports current driver view |
/// | `shutdown()` | 1 second | Must release even in error states |
pub trait HalDriver: Send {
    /// Returns the driver's unique identifier (e.g., "simulation").
    fn name(&self) -> &'static str;

    /// Returns the driver's semantic version.
    fn version(&self) -> &'static str;

    /// Acquire the driver session.
    ///
    /// `events` stays valid for the lifetime of the session.
    ///
    /// # Errors
    /// Return `HalError::InitFailed` if the session cannot be acquired.
    fn init(&mut self, events: DriverEventHandler) -> Result<(), HalError>;

    /// Report the chips currently visible to the driver.
    ///
    /// May report fewer chips than physically present while the driver is
    /// still initializing; callers do not retry.
    fn enumerate_chips(&self) -> Vec<ChipDescriptor>;

    /// Release the driver session.
    ///
    /// Called even if the session is in an error state; should release as
    /// much as possible before returning an error.
    fn shutdown(&mut self) -> Result<(), HalError>;

    /// Get driver-specific diagnostics.
    /// Default: None
    fn diagnostics(&self) -> Option<DriverDiagnostics> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestDriver {
        initialized: bool,
    }

    impl HalDriver for TestDriver {
        fn name(&self) -> &'static str {
            "test"
        }

        fn version(&self) -> &'static str {
            "0.1.0"
        }

        fn init(&mut self, _events: DriverEventHandler) -> Result<(), HalError> {
            self.initialized = true;
            Ok(())
        }

        fn enumerate_chips(&self) -> Vec<ChipDescriptor> {
            if self.initialized {
                vec![ChipDescriptor::new("wlan0")]
            } else {
                Vec::new()
            }
        }

        fn shutdown(&mut self) -> Result<(), HalError> {
            self.initialized = false;
            Ok(())
        }
    }

    #[test]
    fn test_hal_error_display() {
        let err = HalError::InitFailed("firmware missing".to_string());
        assert!(err.to_string().contains("firmware missing"));

        let err = HalError::DriverNotFound("simulation".to_string());
        assert!(err.to_string().contains("simulation"));
    }

    #[test]
    fn test_default_diagnostics_is_none() {
        let mut driver = TestDriver { initialized: false };
        assert!(driver.diagnostics().is_none());
        assert!(driver.enumerate_chips().is_empty());

        driver.init(Arc::new(|_: DriverEvent| {})).unwrap();
        assert_eq!(driver.enumerate_chips().len(), 1);
        driver.shutdown().unwrap();
        assert!(driver.enumerate_chips().is_empty());
    }
}
