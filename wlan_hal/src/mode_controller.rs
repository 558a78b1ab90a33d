//! Simulated mode controller.
//!
//! Models the kernel driver being loaded by `select_and_enter` and unloaded by
//! `revert`, and remembers the mode each chip was last switched into.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use tracing::{debug, info};
use wlan_common::hal::driver::HalError;
use wlan_common::hal::mode_controller::ModeController;
use wlan_common::hal::types::{ChipId, ChipModeId};

#[derive(Debug, Default)]
struct ModeState {
    driver_loaded: bool,
    chip_modes: BTreeMap<ChipId, ChipModeId>,
}

/// Mode controller keeping its state in memory.
#[derive(Debug, Default)]
pub struct SimulatedModeController {
    state: Mutex<ModeState>,
}

impl SimulatedModeController {
    /// Create a controller with the driver unloaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `select_and_enter` is in effect.
    pub fn is_driver_loaded(&self) -> bool {
        self.state.lock().driver_loaded
    }

    /// Mode last entered by a chip.
    pub fn chip_mode(&self, chip_id: ChipId) -> Option<ChipModeId> {
        self.state.lock().chip_modes.get(&chip_id).copied()
    }
}

impl ModeController for SimulatedModeController {
    fn select_and_enter(&self) -> Result<(), HalError> {
        let mut state = self.state.lock();
        if !state.driver_loaded {
            state.driver_loaded = true;
            info!("Mode controller: driver loaded");
        }
        Ok(())
    }

    fn enter_mode(&self, chip_id: ChipId, mode_id: ChipModeId) -> Result<(), HalError> {
        let mut state = self.state.lock();
        if !state.driver_loaded {
            return Err(HalError::ModeError(format!(
                "cannot enter mode {mode_id} on chip {chip_id}: driver not loaded"
            )));
        }
        state.chip_modes.insert(chip_id, mode_id);
        debug!("Mode controller: chip {} -> mode {}", chip_id, mode_id);
        Ok(())
    }

    fn revert(&self) -> Result<(), HalError> {
        let mut state = self.state.lock();
        state.driver_loaded = false;
        state.chip_modes.clear();
        info!("Mode controller: driver unloaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_mode_requires_loaded_driver() {
        let controller = SimulatedModeController::new();
        assert!(controller.enter_mode(1, 0).is_err());

        controller.select_and_enter().unwrap();
        controller.enter_mode(1, 0).unwrap();
        assert_eq!(controller.chip_mode(1), Some(0));

        controller.revert().unwrap();
        assert!(!controller.is_driver_loaded());
        assert_eq!(controller.chip_mode(1), None);
    }
}
