//! In-memory interface tool.
//!
//! Tracks administrative up/down state per interface name without touching
//! the host network stack. Used by the simulation setup and by tests.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use tracing::debug;
use wlan_common::hal::driver::HalError;
use wlan_common::hal::iface_tool::InterfaceTool;

/// Interface tool keeping state in memory.
#[derive(Debug, Default)]
pub struct SimulatedInterfaceTool {
    up: Mutex<HashMap<String, bool>>,
    broken: Mutex<HashSet<String>>,
}

impl SimulatedInterfaceTool {
    /// Create a tool with every interface down.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fault injection: every state change on `iface_name` fails.
    pub fn break_iface(&self, iface_name: &str) {
        self.broken.lock().insert(iface_name.to_string());
    }

    /// Interfaces currently up, sorted.
    pub fn up_ifaces(&self) -> Vec<String> {
        let mut ifaces: Vec<String> = self
            .up
            .lock()
            .iter()
            .filter(|(_, up)| **up)
            .map(|(name, _)| name.clone())
            .collect();
        ifaces.sort();
        ifaces
    }
}

impl InterfaceTool for SimulatedInterfaceTool {
    fn set_up_state(&self, iface_name: &str, up: bool) -> Result<(), HalError> {
        if self.broken.lock().contains(iface_name) {
            return Err(HalError::InterfaceError(format!(
                "cannot set {iface_name} {}",
                if up { "up" } else { "down" }
            )));
        }
        self.up.lock().insert(iface_name.to_string(), up);
        debug!("Interface {} is now {}", iface_name, if up { "up" } else { "down" });
        Ok(())
    }

    fn get_up_state(&self, iface_name: &str) -> bool {
        self.up.lock().get(iface_name).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_up_state() {
        let tool = SimulatedInterfaceTool::new();
        assert!(!tool.get_up_state("wlan0"));

        tool.set_up_state("wlan0", true).unwrap();
        tool.set_up_state("wlan1", true).unwrap();
        tool.set_up_state("wlan1", false).unwrap();
        assert!(tool.get_up_state("wlan0"));
        assert_eq!(tool.up_ifaces(), vec!["wlan0".to_string()]);
    }

    #[test]
    fn broken_iface_fails() {
        let tool = SimulatedInterfaceTool::new();
        tool.break_iface("wlan0");
        assert!(matches!(
            tool.set_up_state("wlan0", true),
            Err(HalError::InterfaceError(_))
        ));
        assert!(!tool.get_up_state("wlan0"));
    }
}
