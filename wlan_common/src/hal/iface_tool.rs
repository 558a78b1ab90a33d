//! Network interface capability.

use crate::hal::driver::HalError;

/// Contract for network interface side effects performed during start/stop.
///
/// Failures are treated as best-effort by the controller: logged, never fatal.
pub trait InterfaceTool: Send + Sync {
    /// Bring the interface administratively up or down.
    fn set_up_state(&self, iface_name: &str, up: bool) -> Result<(), HalError>;

    /// Current administrative state of the interface.
    fn get_up_state(&self, iface_name: &str) -> bool;
}
