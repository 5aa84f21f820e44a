// ── Core error types ──
//
// User-facing errors from airpure-core. Consumers never see transport or
// decode failures raw; the `From<airpure_api::Error>` impl translates them
// into domain-appropriate variants. The expected caller reaction to any of
// the connection variants is "mark the device unavailable and retry on the
// next refresh cycle", not a crash.

use thiserror::Error;

use crate::fields::Axis;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach purifier: {message}")]
    DeviceUnreachable { message: String },

    #[error("Key exchange with purifier failed: {message}")]
    HandshakeFailed { message: String },

    #[error("Protocol error: {message}")]
    Protocol { message: String },

    // ── Command errors ───────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("No value '{label}' in the {axis} table for this model")]
    UnknownValue { axis: Axis, label: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<airpure_api::Error> for CoreError {
    fn from(err: airpure_api::Error) -> Self {
        match err {
            airpure_api::Error::Handshake { message } => CoreError::HandshakeFailed { message },
            airpure_api::Error::Decode { message } => CoreError::Protocol { message },
            airpure_api::Error::DeviceUnreachable { message } => {
                CoreError::DeviceUnreachable { message }
            }
            airpure_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid device URL: {e}"),
            },
        }
    }
}
