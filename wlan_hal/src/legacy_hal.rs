//! Owned wrapper around one vendor driver instance.
//!
//! A `LegacyHal` is created per physical device when the controller is
//! constructed and lives as long as the controller. It tracks whether the
//! driver session is held and makes `start`/`stop` idempotent.
//!
//! The session lock is held across driver init and shutdown. `is_started`
//! and `info` never wait on it.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use serde::Serialize;
use tracing::{debug, info, warn};
use wlan_common::hal::driver::{DriverDiagnostics, DriverEventHandler, HalDriver, HalError};
use wlan_common::hal::types::ChipDescriptor;

/// Diagnostic view of a driver handle.
#[derive(Debug, Clone, Serialize)]
pub struct LegacyHalInfo {
    /// Device index.
    pub index: usize,
    /// Driver name.
    pub driver: &'static str,
    /// Driver version.
    pub version: &'static str,
    /// Session held.
    pub started: bool,
    /// A start or stop was in flight; diagnostics were skipped.
    pub busy: bool,
    /// Driver-provided diagnostics.
    pub diagnostics: Option<DriverDiagnostics>,
}

/// Driver handle for one physical device.
pub struct LegacyHal {
    index: usize,
    name: &'static str,
    version: &'static str,
    /// Written only under `session`.
    started: AtomicBool,
    session: Mutex<Box<dyn HalDriver>>,
}

impl LegacyHal {
    /// Wrap a freshly created driver. The session is not acquired yet.
    pub fn new(index: usize, driver: Box<dyn HalDriver>) -> Self {
        Self {
            index,
            name: driver.name(),
            version: driver.version(),
            started: AtomicBool::new(false),
            session: Mutex::new(driver),
        }
    }

    /// Device index (stable for the process lifetime).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Driver name.
    pub fn driver_name(&self) -> &'static str {
        self.name
    }

    /// Whether the driver session is held.
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Acquire the driver session. No-op if already started.
    ///
    /// # Errors
    /// Propagates the driver's init error; `started` stays false.
    pub fn start(&self, events: DriverEventHandler) -> Result<(), HalError> {
        let mut driver = self.session.lock();
        if self.is_started() {
            debug!("Driver #{} ({}) already started", self.index, self.name);
            return Ok(());
        }

        driver.init(events)?;
        self.started.store(true, Ordering::Release);
        info!("Driver #{} started: {} v{}", self.index, self.name, self.version);
        Ok(())
    }

    /// Release the driver session. No-op if already stopped.
    ///
    /// The handle is marked stopped even if the driver reports an error.
    pub fn stop(&self) -> Result<(), HalError> {
        let mut driver = self.session.lock();
        if !self.is_started() {
            debug!("Driver #{} ({}) already stopped", self.index, self.name);
            return Ok(());
        }

        let result = driver.shutdown();
        self.started.store(false, Ordering::Release);
        match &result {
            Ok(()) => info!("Driver #{} stopped: {}", self.index, self.name),
            Err(e) => warn!("Driver #{} ({}) stopped with error: {}", self.index, self.name, e),
        }
        result
    }

    /// Chips currently reported by the driver.
    ///
    /// # Errors
    /// `HalError::NotStarted` if the session is not held.
    pub fn enumerate_chips(&self) -> Result<Vec<ChipDescriptor>, HalError> {
        let driver = self.session.lock();
        if !self.is_started() {
            return Err(HalError::NotStarted(format!(
                "driver #{} ({}) cannot enumerate chips",
                self.index, self.name
            )));
        }
        Ok(driver.enumerate_chips())
    }

    /// Diagnostic snapshot.
    ///
    /// Does not wait for an in-flight start or stop: the snapshot is marked
    /// `busy` and carries no driver diagnostics instead.
    pub fn info(&self) -> LegacyHalInfo {
        let diagnostics = self.session.try_lock().map(|driver| driver.diagnostics());
        LegacyHalInfo {
            index: self.index,
            driver: self.name,
            version: self.version,
            started: self.is_started(),
            busy: diagnostics.is_none(),
            diagnostics: diagnostics.flatten(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wlan_common::hal::driver::DriverEvent;

    #[derive(Default)]
    struct Counters {
        inits: AtomicUsize,
        shutdowns: AtomicUsize,
    }

    struct TestDriver {
        counters: Arc<Counters>,
        fail_init: bool,
        fail_shutdown: bool,
    }

    impl HalDriver for TestDriver {
        fn name(&self) -> &'static str {
            "test"
        }

        fn version(&self) -> &'static str {
            "0.1.0"
        }

        fn init(&mut self, _events: DriverEventHandler) -> Result<(), HalError> {
            if self.fail_init {
                return Err(HalError::InitFailed("no firmware".into()));
            }
            self.counters.inits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn enumerate_chips(&self) -> Vec<ChipDescriptor> {
            vec![ChipDescriptor::new("wlan0"), ChipDescriptor::new("wlan1")]
        }

        fn shutdown(&mut self) -> Result<(), HalError> {
            self.counters.shutdowns.fetch_add(1, Ordering::SeqCst);
            if self.fail_shutdown {
                return Err(HalError::ShutdownFailed("bus hung".into()));
            }
            Ok(())
        }
    }

    fn handle(fail_init: bool, fail_shutdown: bool) -> (LegacyHal, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let driver = TestDriver {
            counters: Arc::clone(&counters),
            fail_init,
            fail_shutdown,
        };
        (LegacyHal::new(0, Box::new(driver)), counters)
    }

    fn no_events() -> DriverEventHandler {
        Arc::new(|_: DriverEvent| {})
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let (hal, counters) = handle(false, false);

        hal.start(no_events()).unwrap();
        hal.start(no_events()).unwrap();
        assert!(hal.is_started());
        assert_eq!(counters.inits.load(Ordering::SeqCst), 1);

        hal.stop().unwrap();
        hal.stop().unwrap();
        assert!(!hal.is_started());
        assert_eq!(counters.shutdowns.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_start_leaves_handle_stopped() {
        let (hal, _) = handle(true, false);
        assert!(matches!(
            hal.start(no_events()),
            Err(HalError::InitFailed(_))
        ));
        assert!(!hal.is_started());
    }

    #[test]
    fn failed_stop_still_releases() {
        let (hal, counters) = handle(false, true);
        hal.start(no_events()).unwrap();

        assert!(hal.stop().is_err());
        assert!(!hal.is_started());
        // A second stop does not touch the driver again.
        assert!(hal.stop().is_ok());
        assert_eq!(counters.shutdowns.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn enumerate_requires_started() {
        let (hal, _) = handle(false, false);
        assert!(matches!(
            hal.enumerate_chips(),
            Err(HalError::NotStarted(_))
        ));

        hal.start(no_events()).unwrap();
        let chips = hal.enumerate_chips().unwrap();
        assert_eq!(chips.len(), 2);
        assert_eq!(chips[1].iface_name, "wlan1");
    }

    #[test]
    fn info_reflects_session() {
        let (hal, _) = handle(false, false);
        assert!(!hal.info().started);
        hal.start(no_events()).unwrap();
        let info = hal.info();
        assert!(info.started);
        assert_eq!(info.driver, "test");
        assert_eq!(info.index, 0);
        assert!(!info.busy);
    }

    #[test]
    fn info_does_not_wait_for_session() {
        let (hal, _) = handle(false, false);
        hal.start(no_events()).unwrap();

        let held = hal.session.lock();
        let info = hal.info();
        assert!(info.busy);
        assert!(info.started);
        assert!(info.diagnostics.is_none());
        assert!(hal.is_started());
        drop(held);

        assert!(!hal.info().busy);
    }
}
