//! Listener callback contracts.
//!
//! Controller-level listeners come in two schema versions. A listener
//! declares its version when it registers by choosing an [`EventListener`]
//! variant; one registry stores both and [`EventListener::deliver`] only hands
//! each listener the events its schema knows about.
//!
//! Chip-level listeners ([`WifiChipEventCallback`]) are a separate channel:
//! registering at the controller does not subscribe to chip events.

use crate::hal::types::{ChipId, ChipModeId};
use crate::status::WifiStatus;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Identity of a registered listener, assigned by the transport.
///
/// Registering twice with the same identity replaces the stored handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// Failure reported by a listener while an event is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackError {
    /// The remote end is gone; the registration should be dropped.
    #[error("listener is dead")]
    Dead,

    /// Delivery failed but the listener may still be alive.
    #[error("delivery failed: {0}")]
    Failed(String),
}

/// Result of delivering one event to one listener.
pub type CallbackResult = Result<(), CallbackError>;

/// Base controller event schema.
pub trait WifiEventCallback: Send + Sync {
    /// The subsystem finished starting.
    fn on_start(&self) -> CallbackResult;

    /// The subsystem finished stopping.
    fn on_stop(&self) -> CallbackResult;

    /// A start attempt failed.
    fn on_failure(&self, status: &WifiStatus) -> CallbackResult;
}

/// Extended controller event schema adding subsystem restart notifications.
pub trait WifiEventCallbackV1_5: WifiEventCallback {
    /// The vendor subsystem crashed and is restarting.
    fn on_subsystem_restart(&self, status: &WifiStatus) -> CallbackResult;
}

/// Controller-level event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WifiEvent {
    /// `start()` completed.
    Started,
    /// `stop()` completed.
    Stopped,
    /// `start()` failed and rolled back.
    Failure(WifiStatus),
    /// A driver reported a subsystem restart.
    SubsystemRestart(WifiStatus),
}

/// A registered controller-level listener, tagged by schema version.
#[derive(Clone)]
pub enum EventListener {
    /// Base schema.
    V1_0(Arc<dyn WifiEventCallback>),
    /// Extended schema.
    V1_5(Arc<dyn WifiEventCallbackV1_5>),
}

impl EventListener {
    /// Deliver one event, skipping events the listener's schema lacks.
    pub fn deliver(&self, event: &WifiEvent) -> CallbackResult {
        match (self, event) {
            (EventListener::V1_0(cb), WifiEvent::Started) => cb.on_start(),
            (EventListener::V1_5(cb), WifiEvent::Started) => cb.on_start(),
            (EventListener::V1_0(cb), WifiEvent::Stopped) => cb.on_stop(),
            (EventListener::V1_5(cb), WifiEvent::Stopped) => cb.on_stop(),
            (EventListener::V1_0(cb), WifiEvent::Failure(status)) => cb.on_failure(status),
            (EventListener::V1_5(cb), WifiEvent::Failure(status)) => cb.on_failure(status),
            (EventListener::V1_5(cb), WifiEvent::SubsystemRestart(status)) => {
                cb.on_subsystem_restart(status)
            }
            (EventListener::V1_0(_), WifiEvent::SubsystemRestart(_)) => Ok(()),
        }
    }

    /// Schema version label.
    pub fn version(&self) -> &'static str {
        match self {
            EventListener::V1_0(_) => "1.0",
            EventListener::V1_5(_) => "1.5",
        }
    }
}

impl fmt::Debug for EventListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventListener").field(&self.version()).finish()
    }
}

/// Chip-level event schema.
pub trait WifiChipEventCallback: Send + Sync {
    /// The chip entered a new mode.
    fn on_chip_mode_changed(&self, chip_id: ChipId, mode_id: ChipModeId) -> CallbackResult;

    /// A mode change request failed; the previous mode is kept.
    fn on_chip_reconfigure_failure(&self, chip_id: ChipId, status: &WifiStatus) -> CallbackResult;
}

/// Chip-level event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChipEvent {
    /// Mode change committed.
    ModeChanged {
        /// Chip that changed.
        chip_id: ChipId,
        /// New mode.
        mode_id: ChipModeId,
    },
    /// Mode change failed.
    ReconfigureFailure {
        /// Chip the request was made on.
        chip_id: ChipId,
        /// Failure status.
        status: WifiStatus,
    },
}

impl ChipEvent {
    /// Deliver to a chip-level listener.
    pub fn deliver(&self, cb: &dyn WifiChipEventCallback) -> CallbackResult {
        match self {
            ChipEvent::ModeChanged { chip_id, mode_id } => cb.on_chip_mode_changed(*chip_id, *mode_id),
            ChipEvent::ReconfigureFailure { chip_id, status } => {
                cb.on_chip_reconfigure_failure(*chip_id, status)
            }
        }
    }
}
