//! Mode controller capability.
//!
//! The mode controller owns the policy deciding which physical configuration
//! (driver/firmware mode) the hardware runs in. The lifecycle controller calls
//! it while starting and stopping; chips call it to switch operating modes.

use crate::hal::driver::HalError;
use crate::hal::types::{ChipId, ChipModeId};

/// Contract for the device mode controller.
///
/// Implementations must be callable from any thread. None of the methods is
/// invoked while the controller's state lock is held.
pub trait ModeController: Send + Sync {
    /// Select the configuration to bring up and enter it (e.g. load the
    /// kernel driver). Called once per `start()` before any driver starts.
    fn select_and_enter(&self) -> Result<(), HalError>;

    /// Switch one chip into the given mode.
    fn enter_mode(&self, chip_id: ChipId, mode_id: ChipModeId) -> Result<(), HalError>;

    /// Undo `select_and_enter`. Called on `stop()` and on failed starts.
    fn revert(&self) -> Result<(), HalError>;
}
