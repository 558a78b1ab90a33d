//! Root lifecycle controller.
//!
//! `Wifi` owns one [`LegacyHal`] per physical device, the chips discovered
//! while started, and the controller-level listener registry.
//!
//! # Locking
//!
//! - `transition` serializes whole `start()`/`stop()` operations. It is held
//!   across driver I/O and across the closing broadcast, so listeners see
//!   events in transition order. A listener calling `start()`/`stop()` from
//!   inside that broadcast gets `Busy` instead of deadlocking.
//! - `state` guards the run phase and the chip map. It is only held for
//!   short sections and never across driver or mode-controller calls.
//!
//! Lock order: `state`, then a chip's own lock, then a driver session lock.
//! Readers only ever observe `Stopped`, `Started` or `Stopping`; chips are
//! published together with `Started` and drained together with `Stopping`.

use crate::callback::CallbackRegistry;
use crate::chip::{ChipInfo, WifiChip};
use crate::legacy_hal::{LegacyHal, LegacyHalInfo};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread::{self, ThreadId};
use tracing::{debug, error, info, warn};
use wlan_common::consts::FIRST_CHIP_ID;
use wlan_common::event::{EventListener, ListenerId, WifiEvent};
use wlan_common::hal::driver::{DriverEvent, DriverEventHandler, HalError, LegacyHalFactory};
use wlan_common::hal::feature_flags::FeatureFlags;
use wlan_common::hal::iface_tool::InterfaceTool;
use wlan_common::hal::mode_controller::ModeController;
use wlan_common::hal::types::ChipId;
use wlan_common::status::{StatusCode, WifiError, WifiResult, WifiStatus};

/// Run state visible to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    /// Initial state; no driver session held.
    Stopped,
    /// Drivers started and chips published.
    Started,
    /// Teardown in progress.
    Stopping,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Stopped => "STOPPED",
            RunState::Started => "STARTED",
            RunState::Stopping => "STOPPING",
        };
        f.write_str(s)
    }
}

/// Internal phase. `Starting` is reported as `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Stopped,
    Starting,
    Started,
    Stopping,
}

impl Phase {
    const fn visible(self) -> RunState {
        match self {
            Phase::Stopped | Phase::Starting => RunState::Stopped,
            Phase::Started => RunState::Started,
            Phase::Stopping => RunState::Stopping,
        }
    }
}

struct ControllerState {
    phase: Phase,
    chips: BTreeMap<ChipId, Arc<WifiChip>>,
}

/// Run state and chip ids read under one lock acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerSnapshot {
    /// Visible run state.
    pub run_state: RunState,
    /// Published chip ids, ascending.
    pub chip_ids: Vec<ChipId>,
}

#[derive(Serialize)]
struct DebugReport {
    run_state: RunState,
    listeners: usize,
    next_chip_id: ChipId,
    drivers: Vec<LegacyHalInfo>,
    chips: Vec<ChipInfo>,
}

/// The root lifecycle controller.
pub struct Wifi {
    iface_tool: Arc<dyn InterfaceTool>,
    mode_controller: Arc<dyn ModeController>,
    feature_flags: Arc<dyn FeatureFlags>,
    /// Driver handles in device index order, fixed at construction.
    legacy_hals: Vec<Arc<LegacyHal>>,
    listeners: Arc<CallbackRegistry<EventListener>>,
    /// Never reset; ids are unique for the process lifetime.
    next_chip_id: AtomicU32,
    transition: Mutex<()>,
    /// Thread delivering a transition event, if any.
    broadcasting: Mutex<Option<ThreadId>>,
    state: Mutex<ControllerState>,
}

impl Wifi {
    /// Create the controller and its driver handles.
    ///
    /// The factory is consulted once; no driver session is acquired until
    /// `start()`.
    ///
    /// # Errors
    /// Propagates the factory's error (e.g. an unknown driver name).
    pub fn new(
        iface_tool: Arc<dyn InterfaceTool>,
        factory: &dyn LegacyHalFactory,
        mode_controller: Arc<dyn ModeController>,
        feature_flags: Arc<dyn FeatureFlags>,
    ) -> Result<Self, HalError> {
        let legacy_hals: Vec<_> = factory
            .create_instances()?
            .into_iter()
            .enumerate()
            .map(|(index, driver)| Arc::new(LegacyHal::new(index, driver)))
            .collect();

        info!("Wifi controller created with {} driver(s)", legacy_hals.len());

        Ok(Self {
            iface_tool,
            mode_controller,
            feature_flags,
            legacy_hals,
            listeners: Arc::new(CallbackRegistry::new("wifi")),
            next_chip_id: AtomicU32::new(FIRST_CHIP_ID),
            transition: Mutex::new(()),
            broadcasting: Mutex::new(None),
            state: Mutex::new(ControllerState {
                phase: Phase::Stopped,
                chips: BTreeMap::new(),
            }),
        })
    }

    /// Visible run state.
    pub fn run_state(&self) -> RunState {
        self.state.lock().phase.visible()
    }

    /// True only while `Started`.
    pub fn is_started(&self) -> bool {
        self.run_state() == RunState::Started
    }

    /// Run state and published chip ids, read atomically.
    pub fn snapshot(&self) -> ControllerSnapshot {
        let state = self.state.lock();
        ControllerSnapshot {
            run_state: state.phase.visible(),
            chip_ids: state.chips.keys().copied().collect(),
        }
    }

    /// Number of driver handles.
    pub fn driver_count(&self) -> usize {
        self.legacy_hals.len()
    }

    /// Bring the subsystem up.
    ///
    /// Succeeds immediately if already started. Fails with `Busy` while a
    /// stop is in progress or when called from a listener of a transition
    /// event. A start overlapping another in-flight start waits for it and
    /// then re-evaluates.
    ///
    /// # Errors
    /// `UnknownFailure` if the mode controller or any driver fails, or chip
    /// ids are exhausted; the controller is rolled back to `Stopped` and
    /// listeners get `on_failure`.
    pub fn start(&self) -> WifiResult<()> {
        self.ensure_not_reentrant("start")?;
        if self.state.lock().phase == Phase::Stopping {
            return Err(WifiError::Busy("stop in progress".to_string()));
        }

        let _transition = self.transition.lock();
        {
            let mut state = self.state.lock();
            match state.phase {
                Phase::Started => {
                    debug!("start() while started, nothing to do");
                    return Ok(());
                }
                Phase::Stopping | Phase::Starting => {
                    return Err(WifiError::Busy("transition in progress".to_string()));
                }
                Phase::Stopped => state.phase = Phase::Starting,
            }
        }

        info!("Starting Wifi subsystem");
        match self.bring_up() {
            Ok(chips) => {
                let count = chips.len();
                {
                    let mut state = self.state.lock();
                    state.chips = chips.into_iter().map(|chip| (chip.id(), chip)).collect();
                    state.phase = Phase::Started;
                }
                info!("Wifi subsystem started with {} chip(s)", count);
                self.broadcast(&WifiEvent::Started);
                Ok(())
            }
            Err(err) => {
                self.state.lock().phase = Phase::Stopped;
                error!("Wifi subsystem failed to start: {}", err);
                self.broadcast(&WifiEvent::Failure(WifiStatus::from(&err)));
                Err(err)
            }
        }
    }

    /// Tear the subsystem down.
    ///
    /// Succeeds immediately if already stopped. `on_stop` is broadcast even
    /// when some driver fails to stop.
    ///
    /// # Errors
    /// `UnknownFailure` listing every driver or mode-controller failure.
    /// `Busy` when called from a listener of a transition event.
    pub fn stop(&self) -> WifiResult<()> {
        self.ensure_not_reentrant("stop")?;
        let _transition = self.transition.lock();
        let chips: Vec<Arc<WifiChip>> = {
            let mut state = self.state.lock();
            match state.phase {
                Phase::Stopped => {
                    debug!("stop() while stopped, nothing to do");
                    return Ok(());
                }
                Phase::Starting | Phase::Stopping => {
                    return Err(WifiError::Busy("transition in progress".to_string()));
                }
                Phase::Started => {}
            }
            state.phase = Phase::Stopping;
            let chips: Vec<_> = std::mem::take(&mut state.chips).into_values().collect();
            for chip in &chips {
                chip.invalidate();
            }
            chips
        };

        info!("Stopping Wifi subsystem ({} chip(s))", chips.len());
        for chip in &chips {
            chip.release();
            if let Err(e) = self.iface_tool.set_up_state(chip.iface_name(), false) {
                warn!("Failed to bring {} down: {}", chip.iface_name(), e);
            }
        }
        drop(chips);

        let mut failures = Vec::new();
        for hal in &self.legacy_hals {
            if let Err(e) = hal.stop() {
                failures.push(format!("driver #{}: {}", hal.index(), e));
            }
        }
        if let Err(e) = self.mode_controller.revert() {
            failures.push(format!("mode controller: {e}"));
        }

        self.state.lock().phase = Phase::Stopped;
        if failures.is_empty() {
            info!("Wifi subsystem stopped");
        } else {
            warn!("Wifi subsystem stopped with {} failure(s)", failures.len());
        }
        self.broadcast(&WifiEvent::Stopped);

        if failures.is_empty() {
            Ok(())
        } else {
            Err(WifiError::UnknownFailure(failures.join("; ")))
        }
    }

    /// Ids of the published chips, ascending.
    ///
    /// # Errors
    /// `NotAvailable` unless started.
    pub fn get_chip_ids(&self) -> WifiResult<Vec<ChipId>> {
        let state = self.state.lock();
        if state.phase != Phase::Started {
            return Err(not_available(state.phase));
        }
        Ok(state.chips.keys().copied().collect())
    }

    /// Shared handle to a published chip.
    ///
    /// # Errors
    /// `NotAvailable` unless started, `ChipNotFound` for an unknown id.
    pub fn get_chip(&self, chip_id: ChipId) -> WifiResult<Arc<WifiChip>> {
        let state = self.state.lock();
        if state.phase != Phase::Started {
            return Err(not_available(state.phase));
        }
        state
            .chips
            .get(&chip_id)
            .cloned()
            .ok_or(WifiError::ChipNotFound(chip_id))
    }

    /// Register a controller-level listener. Legal in every state;
    /// re-registering an id replaces the previous listener.
    pub fn register_event_callback(&self, id: ListenerId, listener: EventListener) -> WifiResult<()> {
        debug!("Registering {} (schema {})", id, listener.version());
        self.listeners.register(id, listener);
        Ok(())
    }

    /// Drop a listener, e.g. when its transport reports death.
    pub fn unregister_event_callback(&self, id: ListenerId) -> bool {
        self.listeners.unregister(id)
    }

    /// Number of registered controller-level listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Write a diagnostic dump to `out`.
    ///
    /// `--json` selects a JSON document; otherwise a text dump is written.
    /// Never changes the run state; write failures are logged and dropped.
    pub fn debug(&self, out: &mut dyn Write, options: &[String]) {
        let report = self.debug_report();
        let json = options.iter().any(|opt| opt == "--json");
        let result = if json {
            serde_json::to_writer_pretty(&mut *out, &report)
                .map_err(std::io::Error::from)
                .and_then(|()| writeln!(out))
        } else {
            write_text_report(out, &report)
        };
        if let Err(e) = result.and_then(|()| out.flush()) {
            warn!("debug dump failed: {}", e);
        }
    }

    fn debug_report(&self) -> DebugReport {
        let (run_state, chips) = {
            let state = self.state.lock();
            (
                state.phase.visible(),
                state.chips.values().cloned().collect::<Vec<_>>(),
            )
        };
        DebugReport {
            run_state,
            listeners: self.listeners.len(),
            next_chip_id: self.next_chip_id.load(Ordering::SeqCst),
            drivers: self.legacy_hals.iter().map(|hal| hal.info()).collect(),
            chips: chips
                .iter()
                .map(|chip| ChipInfo {
                    iface_up: self.iface_tool.get_up_state(chip.iface_name()),
                    ..chip.info()
                })
                .collect(),
        }
    }

    /// Mode controller, drivers, chip enumeration, interfaces up.
    /// Rolls back everything it touched before returning an error.
    fn bring_up(&self) -> WifiResult<Vec<Arc<WifiChip>>> {
        if let Err(e) = self.mode_controller.select_and_enter() {
            self.revert_mode();
            return Err(WifiError::UnknownFailure(format!(
                "mode controller failed to select a configuration: {e}"
            )));
        }

        let mut started: Vec<&Arc<LegacyHal>> = Vec::with_capacity(self.legacy_hals.len());
        for hal in &self.legacy_hals {
            if let Err(e) = hal.start(self.driver_events()) {
                self.roll_back(&started);
                return Err(WifiError::UnknownFailure(format!(
                    "driver #{} ({}) failed to start: {e}",
                    hal.index(),
                    hal.driver_name()
                )));
            }
            started.push(hal);
        }

        let mut chips: Vec<Arc<WifiChip>> = Vec::new();
        for hal in &self.legacy_hals {
            let descriptors = match hal.enumerate_chips() {
                Ok(descriptors) => descriptors,
                Err(e) => {
                    self.abandon(&chips, &started);
                    return Err(WifiError::UnknownFailure(format!(
                        "driver #{} failed to enumerate chips: {e}",
                        hal.index()
                    )));
                }
            };
            for descriptor in descriptors {
                let Ok(id) = self
                    .next_chip_id
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |id| id.checked_add(1))
                else {
                    self.abandon(&chips, &started);
                    return Err(WifiError::UnknownFailure("chip ids exhausted".to_string()));
                };
                let is_primary = chips.is_empty();
                debug!(
                    "Chip {} on driver #{}: {}{}",
                    id,
                    hal.index(),
                    descriptor.iface_name,
                    if is_primary { " (primary)" } else { "" }
                );
                chips.push(Arc::new(WifiChip::new(
                    id,
                    is_primary,
                    descriptor,
                    hal,
                    Arc::clone(&self.mode_controller),
                    self.feature_flags.as_ref(),
                )));
            }
        }

        for chip in &chips {
            if let Err(e) = self.iface_tool.set_up_state(chip.iface_name(), true) {
                warn!("Failed to bring {} up: {}", chip.iface_name(), e);
            }
        }
        Ok(chips)
    }

    fn abandon(&self, chips: &[Arc<WifiChip>], started: &[&Arc<LegacyHal>]) {
        for chip in chips {
            chip.release();
        }
        self.roll_back(started);
    }

    /// Best-effort stop of `started` plus mode revert. Failures are logged only.
    fn roll_back(&self, started: &[&Arc<LegacyHal>]) {
        warn!("Rolling back {} started driver(s)", started.len());
        for hal in started.iter().rev() {
            if let Err(e) = hal.stop() {
                warn!("Rollback: driver #{} failed to stop: {}", hal.index(), e);
            }
        }
        self.revert_mode();
    }

    fn revert_mode(&self) {
        if let Err(e) = self.mode_controller.revert() {
            warn!("Rollback: mode controller failed to revert: {}", e);
        }
    }

    /// Sink handed to each driver session; forwards subsystem restarts.
    fn driver_events(&self) -> DriverEventHandler {
        let listeners = Arc::clone(&self.listeners);
        Arc::new(move |event: DriverEvent| match event {
            DriverEvent::SubsystemRestart { reason } => {
                warn!("Subsystem restart reported: {}", reason);
                let event = WifiEvent::SubsystemRestart(WifiStatus::new(
                    StatusCode::UnknownFailure,
                    reason,
                ));
                listeners.broadcast(|listener| listener.deliver(&event));
            }
        })
    }

    fn ensure_not_reentrant(&self, op: &str) -> WifiResult<()> {
        if *self.broadcasting.lock() == Some(thread::current().id()) {
            warn!("{}() called from a transition event listener, refusing", op);
            return Err(WifiError::Busy(format!("{op}() called from an event listener")));
        }
        Ok(())
    }

    /// Fan out a transition event. Only called with `transition` held.
    fn broadcast(&self, event: &WifiEvent) {
        *self.broadcasting.lock() = Some(thread::current().id());
        let report = self.listeners.broadcast(|listener| listener.deliver(event));
        *self.broadcasting.lock() = None;
        debug!(
            "{:?} delivered to {} listener(s) ({} failed, {} dropped)",
            event, report.delivered, report.failed, report.dropped
        );
    }
}

impl Drop for Wifi {
    fn drop(&mut self) {
        if self.state.get_mut().phase == Phase::Started {
            warn!("Wifi controller dropped while started, stopping");
            if let Err(e) = self.stop() {
                warn!("Stop on drop failed: {}", e);
            }
        }
    }
}

fn not_available(phase: Phase) -> WifiError {
    WifiError::NotAvailable(format!("Wifi is {}", phase.visible()))
}

fn write_text_report(out: &mut dyn Write, report: &DebugReport) -> std::io::Result<()> {
    writeln!(out, "Wifi: {}", report.run_state)?;
    writeln!(
        out,
        "  listeners: {}, next chip id: {}",
        report.listeners, report.next_chip_id
    )?;
    for driver in &report.drivers {
        writeln!(
            out,
            "  driver #{}: {} v{} started={}{}",
            driver.index,
            driver.driver,
            driver.version,
            driver.started,
            if driver.busy { " (busy)" } else { "" }
        )?;
        if let Some(diag) = &driver.diagnostics {
            writeln!(
                out,
                "    sessions: {} up / {} down, firmware: {}",
                diag.init_count,
                diag.shutdown_count,
                diag.firmware_version.as_deref().unwrap_or("-")
            )?;
        }
    }
    for chip in &report.chips {
        let mode = match (chip.busy, chip.mode) {
            (true, _) => "busy".to_string(),
            (false, Some(mode)) => mode.to_string(),
            (false, None) => "-".to_string(),
        };
        writeln!(
            out,
            "  chip {}: {} {} driver=#{} primary={} mode={} listeners={}",
            chip.id,
            chip.iface_name,
            if chip.iface_up { "up" } else { "down" },
            chip.device_index,
            chip.is_primary,
            mode,
            chip.listeners
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver_registry::{ConfiguredHalFactory, DriverRegistry};
    use crate::drivers::register_all_drivers;
    use crate::feature_flags::DefaultFeatureFlags;
    use crate::iface_tool::SimulatedInterfaceTool;
    use crate::mode_controller::SimulatedModeController;
    use wlan_common::event::{CallbackResult, WifiEventCallback};
    use wlan_common::hal::config::DeviceConfig;

    struct Fixture {
        wifi: Wifi,
        ifaces: Arc<SimulatedInterfaceTool>,
        modes: Arc<SimulatedModeController>,
    }

    fn fixture(devices: Vec<DeviceConfig>) -> Fixture {
        let mut registry = DriverRegistry::new();
        register_all_drivers(&mut registry).unwrap();
        let factory = ConfiguredHalFactory::new(registry, devices);
        let ifaces = Arc::new(SimulatedInterfaceTool::new());
        let modes = Arc::new(SimulatedModeController::new());
        let wifi = Wifi::new(
            ifaces.clone(),
            &factory,
            modes.clone(),
            Arc::new(DefaultFeatureFlags::default()),
        )
        .unwrap();
        Fixture { wifi, ifaces, modes }
    }

    #[derive(Default)]
    struct Log(Mutex<Vec<&'static str>>);

    impl WifiEventCallback for Log {
        fn on_start(&self) -> CallbackResult {
            self.0.lock().push("start");
            Ok(())
        }
        fn on_stop(&self) -> CallbackResult {
            self.0.lock().push("stop");
            Ok(())
        }
        fn on_failure(&self, _status: &WifiStatus) -> CallbackResult {
            self.0.lock().push("failure");
            Ok(())
        }
    }

    #[test]
    fn start_publishes_chips_and_brings_ifaces_up() {
        let f = fixture(vec![
            DeviceConfig::simulated(["wlan0", "wlan1"]),
            DeviceConfig::simulated(["wlan2"]),
        ]);
        assert_eq!(f.wifi.driver_count(), 2);
        assert_eq!(f.wifi.run_state(), RunState::Stopped);

        f.wifi.start().unwrap();
        assert!(f.wifi.is_started());
        assert!(f.modes.is_driver_loaded());
        assert_eq!(f.wifi.get_chip_ids().unwrap(), vec![1, 2, 3]);
        assert_eq!(f.ifaces.up_ifaces(), vec!["wlan0", "wlan1", "wlan2"]);

        let primary = f.wifi.get_chip(1).unwrap();
        assert!(primary.is_primary());
        assert!(!f.wifi.get_chip(3).unwrap().is_primary());
        assert_eq!(f.wifi.get_chip(3).unwrap().iface_name(), "wlan2");
    }

    #[test]
    fn stop_tears_everything_down() {
        let f = fixture(vec![DeviceConfig::simulated(["wlan0"])]);
        f.wifi.start().unwrap();
        let chip = f.wifi.get_chip(1).unwrap();

        f.wifi.stop().unwrap();
        assert_eq!(f.wifi.run_state(), RunState::Stopped);
        assert!(!f.modes.is_driver_loaded());
        assert!(f.ifaces.up_ifaces().is_empty());
        assert!(!chip.is_valid());
        assert!(matches!(
            f.wifi.get_chip_ids(),
            Err(WifiError::NotAvailable(_))
        ));
    }

    #[test]
    fn unknown_chip_is_not_found() {
        let f = fixture(vec![DeviceConfig::simulated(["wlan0"])]);
        assert_eq!(
            f.wifi.get_chip(1).err().map(|e| e.code()),
            Some(StatusCode::NotAvailable)
        );
        f.wifi.start().unwrap();
        assert!(matches!(
            f.wifi.get_chip(99),
            Err(WifiError::ChipNotFound(99))
        ));
    }

    #[test]
    fn failed_start_notifies_and_rolls_back() {
        let mut broken = DeviceConfig::simulated(["wlan1"]);
        broken.fail_init = true;
        let f = fixture(vec![DeviceConfig::simulated(["wlan0"]), broken]);
        let log = Arc::new(Log::default());
        f.wifi
            .register_event_callback(ListenerId(1), EventListener::V1_0(log.clone()))
            .unwrap();

        let err = f.wifi.start().unwrap_err();
        assert_eq!(err.code(), StatusCode::UnknownFailure);
        assert_eq!(f.wifi.run_state(), RunState::Stopped);
        assert!(!f.modes.is_driver_loaded());
        assert_eq!(*log.0.lock(), vec!["failure"]);
        // Listeners survive a failed start.
        assert_eq!(f.wifi.listener_count(), 1);
    }

    #[test]
    fn stop_reports_driver_failure_but_still_stops() {
        let mut sticky = DeviceConfig::simulated(["wlan0"]);
        sticky.fail_shutdown = true;
        let f = fixture(vec![sticky, DeviceConfig::simulated(["wlan1"])]);
        let log = Arc::new(Log::default());
        f.wifi
            .register_event_callback(ListenerId(1), EventListener::V1_0(log.clone()))
            .unwrap();

        f.wifi.start().unwrap();
        let err = f.wifi.stop().unwrap_err();
        assert!(err.to_string().contains("driver #0"));
        assert_eq!(f.wifi.run_state(), RunState::Stopped);
        assert_eq!(*log.0.lock(), vec!["start", "stop"]);
    }

    #[test]
    fn snapshot_is_consistent() {
        let f = fixture(vec![DeviceConfig::simulated(["wlan0"])]);
        assert_eq!(
            f.wifi.snapshot(),
            ControllerSnapshot {
                run_state: RunState::Stopped,
                chip_ids: Vec::new()
            }
        );
        f.wifi.start().unwrap();
        assert_eq!(f.wifi.snapshot().chip_ids, vec![1]);
    }

    #[test]
    fn debug_dump_text_and_json() {
        let f = fixture(vec![DeviceConfig::simulated(["wlan0"])]);
        f.wifi.start().unwrap();

        let mut text = Vec::new();
        f.wifi.debug(&mut text, &[]);
        let text = String::from_utf8(text).unwrap();
        assert!(text.starts_with("Wifi: STARTED"));
        assert!(text.contains("chip 1: wlan0 up"));

        let mut json = Vec::new();
        f.wifi.debug(&mut json, &["--json".to_string()]);
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["run_state"], "STARTED");
        assert_eq!(value["chips"][0]["iface_name"], "wlan0");
        assert_eq!(value["chips"][0]["iface_up"], true);
        assert_eq!(value["drivers"][0]["driver"], "simulation");
        assert_eq!(value["drivers"][0]["busy"], false);
        assert!(f.wifi.is_started());
    }

    #[test]
    fn chip_id_exhaustion_fails_start() {
        let f = fixture(vec![DeviceConfig::simulated(["wlan0", "wlan1"])]);
        f.wifi.next_chip_id.store(u32::MAX - 1, Ordering::SeqCst);

        let err = f.wifi.start().unwrap_err();
        assert_eq!(err.code(), StatusCode::UnknownFailure);
        assert!(err.to_string().contains("chip ids exhausted"));
        assert_eq!(f.wifi.run_state(), RunState::Stopped);
        assert!(!f.modes.is_driver_loaded());
        assert!(f.ifaces.up_ifaces().is_empty());
        // No id wrapped around to the start of the range.
        assert_eq!(f.wifi.next_chip_id.load(Ordering::SeqCst), u32::MAX);
    }

    #[test]
    fn debug_swallows_write_errors() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("pipe closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let f = fixture(vec![DeviceConfig::simulated(["wlan0"])]);
        f.wifi.debug(&mut Broken, &[]);
        f.wifi.debug(&mut Broken, &["--json".to_string()]);
        assert_eq!(f.wifi.run_state(), RunState::Stopped);
    }
}
