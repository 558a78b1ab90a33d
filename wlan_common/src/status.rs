//! Status codes and the API-level error type.
//!
//! Every operation exposed by the controller either succeeds or fails with a
//! [`WifiError`]. The transport boundary flattens errors into a
//! [`WifiStatus`] (code plus description) via [`WifiStatus::from_result`].

use crate::hal::driver::HalError;
use crate::hal::types::{ChipId, ChipModeId};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Status code surfaced to callers at the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCode {
    /// Operation completed.
    Success,
    /// Queried while the subsystem is not started.
    NotAvailable,
    /// A lower layer was used before it was started.
    NotStarted,
    /// Another lifecycle operation is in progress; retry later.
    Busy,
    /// Unknown or stale identifier.
    NotFound,
    /// Request arguments were rejected.
    InvalidArgs,
    /// Aggregated lower-layer failure.
    UnknownFailure,
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusCode::Success => "SUCCESS",
            StatusCode::NotAvailable => "NOT_AVAILABLE",
            StatusCode::NotStarted => "NOT_STARTED",
            StatusCode::Busy => "BUSY",
            StatusCode::NotFound => "NOT_FOUND",
            StatusCode::InvalidArgs => "INVALID_ARGS",
            StatusCode::UnknownFailure => "UNKNOWN_FAILURE",
        };
        f.write_str(name)
    }
}

/// Errors returned by controller and chip operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WifiError {
    /// The subsystem is not started.
    #[error("not available: {0}")]
    NotAvailable(String),

    /// A driver handle was used before being started.
    #[error("not started: {0}")]
    NotStarted(String),

    /// A stop is in progress.
    #[error("busy: {0}")]
    Busy(String),

    /// No chip with this identifier exists.
    #[error("chip {0} not found")]
    ChipNotFound(ChipId),

    /// The chip handle was invalidated by a stop.
    #[error("chip {0} is no longer valid")]
    ChipInvalid(ChipId),

    /// The requested mode is not offered by the chip.
    #[error("chip {chip_id} does not support mode {mode_id}")]
    InvalidMode {
        /// Chip the request was made on.
        chip_id: ChipId,
        /// Rejected mode identifier.
        mode_id: ChipModeId,
    },

    /// One or more lower-layer operations failed.
    #[error("unknown failure: {0}")]
    UnknownFailure(String),
}

impl WifiError {
    /// Boundary status code for this error.
    pub const fn code(&self) -> StatusCode {
        match self {
            WifiError::NotAvailable(_) => StatusCode::NotAvailable,
            WifiError::NotStarted(_) => StatusCode::NotStarted,
            WifiError::Busy(_) => StatusCode::Busy,
            WifiError::ChipNotFound(_) | WifiError::ChipInvalid(_) => StatusCode::NotFound,
            WifiError::InvalidMode { .. } => StatusCode::InvalidArgs,
            WifiError::UnknownFailure(_) => StatusCode::UnknownFailure,
        }
    }
}

impl From<HalError> for WifiError {
    fn from(err: HalError) -> Self {
        match err {
            HalError::NotStarted(msg) => WifiError::NotStarted(msg),
            other => WifiError::UnknownFailure(other.to_string()),
        }
    }
}

/// A result type using `WifiError`.
pub type WifiResult<T> = Result<T, WifiError>;

/// Status as delivered across the service boundary and to listeners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiStatus {
    /// Status code.
    pub code: StatusCode,
    /// Human readable description, empty on success.
    pub description: String,
}

impl WifiStatus {
    /// Successful status.
    pub fn success() -> Self {
        Self {
            code: StatusCode::Success,
            description: String::new(),
        }
    }

    /// Status with an explicit code and description.
    pub fn new(code: StatusCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
        }
    }

    /// Flatten an operation result into a boundary status.
    pub fn from_result<T>(result: &WifiResult<T>) -> Self {
        match result {
            Ok(_) => Self::success(),
            Err(e) => Self::from(e),
        }
    }

    /// True if the code is `Success`.
    pub fn is_success(&self) -> bool {
        self.code == StatusCode::Success
    }
}

impl From<&WifiError> for WifiStatus {
    fn from(err: &WifiError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            WifiError::NotAvailable("stopped".into()).code(),
            StatusCode::NotAvailable
        );
        assert_eq!(WifiError::Busy("stopping".into()).code(), StatusCode::Busy);
        assert_eq!(WifiError::ChipNotFound(7).code(), StatusCode::NotFound);
        assert_eq!(WifiError::ChipInvalid(7).code(), StatusCode::NotFound);
        assert_eq!(
            WifiError::InvalidMode {
                chip_id: 1,
                mode_id: 9
            }
            .code(),
            StatusCode::InvalidArgs
        );
    }

    #[test]
    fn test_hal_error_conversion() {
        let err: WifiError = HalError::InitFailed("firmware load".into()).into();
        assert_eq!(err.code(), StatusCode::UnknownFailure);
        assert!(err.to_string().contains("firmware load"));

        let err: WifiError = HalError::NotStarted("enumerate".into()).into();
        assert_eq!(err.code(), StatusCode::NotStarted);
    }

    #[test]
    fn test_status_from_result() {
        let ok: WifiResult<()> = Ok(());
        assert!(WifiStatus::from_result(&ok).is_success());

        let failed: WifiResult<()> = Err(WifiError::ChipNotFound(3));
        let status = WifiStatus::from_result(&failed);
        assert_eq!(status.code, StatusCode::NotFound);
        assert_eq!(status.description, "chip 3 not found");
    }

    #[test]
    fn test_status_code_display() {
        assert_eq!(StatusCode::UnknownFailure.to_string(), "UNKNOWN_FAILURE");
        assert_eq!(StatusCode::Success.to_string(), "SUCCESS");
    }
}
