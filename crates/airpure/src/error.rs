//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use airpure_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Cannot reach the purifier: {message}")]
    #[diagnostic(
        code(airpure::unreachable),
        help(
            "Check that the device is powered and on your network.\n\
             The firmware serves plain HTTP on port 80; try: ping <host>"
        )
    )]
    Unreachable { message: String },

    #[error("Key exchange with the purifier failed: {message}")]
    #[diagnostic(
        code(airpure::handshake),
        help(
            "The device may be busy with its own app session.\n\
             Wait a few seconds and retry."
        )
    )]
    Handshake { message: String },

    #[error("Protocol error: {message}")]
    #[diagnostic(code(airpure::protocol))]
    Protocol { message: String },

    // ── Usage ────────────────────────────────────────────────────────
    #[error("No device host given")]
    #[diagnostic(
        code(airpure::no_host),
        help("Pass --host <ip> or set the AIRPURE_HOST environment variable.")
    )]
    NoHost,

    #[error("Invalid value: {reason}")]
    #[diagnostic(code(airpure::validation))]
    Validation { reason: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(airpure::config))]
    Config { message: String },

    // ── Serialization ────────────────────────────────────────────────
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Unreachable { .. } | Self::Handshake { .. } => exit_code::CONNECTION,
            Self::NoHost | Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DeviceUnreachable { message } => CliError::Unreachable { message },
            CoreError::HandshakeFailed { message } => CliError::Handshake { message },
            CoreError::Protocol { message } => CliError::Protocol { message },
            CoreError::ValidationFailed { message } => CliError::Validation { reason: message },
            CoreError::UnknownValue { axis, label } => CliError::Validation {
                reason: format!("'{label}' is not a valid {axis} value for this model"),
            },
            CoreError::Config { message } => CliError::Config { message },
        }
    }
}
