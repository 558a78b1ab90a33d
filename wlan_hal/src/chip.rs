//! Logical chip handle.
//!
//! A `WifiChip` is created by the controller for every chip a driver reports
//! during `start()`. The controller owns it; clients get shared `Arc`s. The
//! chip only keeps a `Weak` back-reference to its driver handle.
//!
//! After `stop()` the chip is invalidated and every operation on it fails with
//! [`WifiError::ChipInvalid`].

use crate::callback::{BroadcastReport, CallbackRegistry};
use crate::legacy_hal::LegacyHal;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};
use wlan_common::event::{ChipEvent, ListenerId, WifiChipEventCallback};
use wlan_common::hal::feature_flags::FeatureFlags;
use wlan_common::hal::mode_controller::ModeController;
use wlan_common::hal::types::{ChipCapabilities, ChipDescriptor, ChipId, ChipMode, ChipModeId};
use wlan_common::status::{WifiError, WifiResult, WifiStatus};

/// Diagnostic view of a chip.
#[derive(Debug, Clone, Serialize)]
pub struct ChipInfo {
    /// Chip identifier.
    pub id: ChipId,
    /// Interface name.
    pub iface_name: String,
    /// Primary chip flag.
    pub is_primary: bool,
    /// Index of the owning driver handle.
    pub device_index: usize,
    /// Current mode, if configured.
    pub mode: Option<ChipModeId>,
    /// A mode change was in flight; `mode` was not read.
    pub busy: bool,
    /// Interface administratively up, as reported by the interface tool.
    pub iface_up: bool,
    /// Handle still valid.
    pub valid: bool,
    /// Registered chip-level listeners.
    pub listeners: usize,
}

struct ChipState {
    current_mode: Option<ChipModeId>,
}

/// One logical chip bound to a driver handle.
pub struct WifiChip {
    id: ChipId,
    is_primary: bool,
    device_index: usize,
    iface_name: String,
    capabilities: ChipCapabilities,
    available_modes: Vec<ChipMode>,
    legacy_hal: Weak<LegacyHal>,
    mode_controller: Arc<dyn ModeController>,
    valid: AtomicBool,
    /// Serializes mode changes against `release()`.
    state: Mutex<ChipState>,
    callbacks: CallbackRegistry<Arc<dyn WifiChipEventCallback>>,
}

impl WifiChip {
    /// Create a chip for a driver-reported descriptor.
    pub fn new(
        id: ChipId,
        is_primary: bool,
        descriptor: ChipDescriptor,
        legacy_hal: &Arc<LegacyHal>,
        mode_controller: Arc<dyn ModeController>,
        feature_flags: &dyn FeatureFlags,
    ) -> Self {
        let mut capabilities = descriptor.capabilities;
        if feature_flags.is_ap_mac_randomization_disabled() {
            capabilities.remove(ChipCapabilities::AP_MAC_RANDOMIZATION);
        }

        Self {
            id,
            is_primary,
            device_index: legacy_hal.index(),
            iface_name: descriptor.iface_name,
            capabilities,
            available_modes: feature_flags.chip_modes(is_primary),
            legacy_hal: Arc::downgrade(legacy_hal),
            mode_controller,
            valid: AtomicBool::new(true),
            state: Mutex::new(ChipState { current_mode: None }),
            callbacks: CallbackRegistry::new("chip"),
        }
    }

    /// Chip identifier.
    pub fn id(&self) -> ChipId {
        self.id
    }

    /// True for the first chip discovered by a `start()`.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Network interface bound to this chip.
    pub fn iface_name(&self) -> &str {
        &self.iface_name
    }

    /// False once the controller has stopped.
    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    /// Capabilities, with feature-flag masking applied.
    pub fn capabilities(&self) -> WifiResult<ChipCapabilities> {
        self.ensure_valid()?;
        Ok(self.capabilities)
    }

    /// Modes this chip can be configured into.
    pub fn available_modes(&self) -> WifiResult<Vec<ChipMode>> {
        self.ensure_valid()?;
        Ok(self.available_modes.clone())
    }

    /// Current mode.
    ///
    /// # Errors
    /// `NotAvailable` until a mode change has succeeded.
    pub fn mode(&self) -> WifiResult<ChipModeId> {
        self.ensure_valid()?;
        self.state.lock().current_mode.ok_or_else(|| {
            WifiError::NotAvailable(format!("chip {} is not configured", self.id))
        })
    }

    /// Register a chip-level listener (replace semantics).
    pub fn register_event_callback(
        &self,
        id: ListenerId,
        callback: Arc<dyn WifiChipEventCallback>,
    ) -> WifiResult<()> {
        self.ensure_valid()?;
        self.callbacks.register(id, callback);
        Ok(())
    }

    /// Remove a chip-level listener.
    pub fn unregister_event_callback(&self, id: ListenerId) -> bool {
        self.callbacks.unregister(id)
    }

    /// Switch the chip into `mode_id`.
    ///
    /// On success the mode is recorded and chip listeners get
    /// `on_chip_mode_changed`; on failure the previous mode is kept and
    /// listeners get `on_chip_reconfigure_failure`.
    pub fn request_mode_change(&self, mode_id: ChipModeId) -> WifiResult<()> {
        let outcome = {
            let mut state = self.state.lock();
            self.ensure_valid()?;

            if !self.available_modes.iter().any(|mode| mode.id == mode_id) {
                return Err(WifiError::InvalidMode {
                    chip_id: self.id,
                    mode_id,
                });
            }
            if state.current_mode == Some(mode_id) {
                debug!("Chip {} already in mode {}", self.id, mode_id);
                return Ok(());
            }

            let outcome = self.mode_controller.enter_mode(self.id, mode_id);
            if outcome.is_ok() {
                state.current_mode = Some(mode_id);
            }
            outcome
        };

        match outcome {
            Ok(()) => {
                info!("Chip {} entered mode {}", self.id, mode_id);
                self.broadcast(&ChipEvent::ModeChanged {
                    chip_id: self.id,
                    mode_id,
                });
                Ok(())
            }
            Err(e) => {
                let err = WifiError::from(e);
                warn!("Chip {} failed to enter mode {}: {}", self.id, mode_id, err);
                self.broadcast(&ChipEvent::ReconfigureFailure {
                    chip_id: self.id,
                    status: WifiStatus::from(&err),
                });
                Err(err)
            }
        }
    }

    /// Diagnostic snapshot. Never waits for an in-flight mode change.
    ///
    /// `iface_up` is left false; the controller fills it in.
    pub fn info(&self) -> ChipInfo {
        let mode = self.state.try_lock().map(|state| state.current_mode);
        ChipInfo {
            id: self.id,
            iface_name: self.iface_name.clone(),
            is_primary: self.is_primary,
            device_index: self.device_index,
            mode: mode.flatten(),
            busy: mode.is_none(),
            iface_up: false,
            valid: self.is_valid(),
            listeners: self.callbacks.len(),
        }
    }

    /// Mark the handle stale. Cheap; called under the controller state lock.
    pub(crate) fn invalidate(&self) {
        self.valid.store(false, Ordering::Release);
    }

    /// Wait for an in-flight mode change to finish and drop chip listeners.
    pub(crate) fn release(&self) {
        self.invalidate();
        drop(self.state.lock());
        self.callbacks.clear();
        debug!("Chip {} released", self.id);
    }

    fn ensure_valid(&self) -> WifiResult<()> {
        if !self.is_valid() {
            return Err(WifiError::ChipInvalid(self.id));
        }
        match self.legacy_hal.upgrade() {
            Some(hal) if hal.is_started() => Ok(()),
            _ => Err(WifiError::ChipInvalid(self.id)),
        }
    }

    fn broadcast(&self, event: &ChipEvent) -> BroadcastReport {
        self.callbacks.broadcast(|cb| event.deliver(cb.as_ref()))
    }
}
