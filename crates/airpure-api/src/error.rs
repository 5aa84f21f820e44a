use thiserror::Error;

/// Top-level error type for the `airpure-api` crate.
///
/// Covers every failure mode of the device protocol: key exchange, payload
/// decryption, and transport. `airpure-core` maps these into user-facing
/// diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    /// Key exchange failed (transport failure or malformed handshake
    /// response from the security endpoint).
    #[error("Handshake failed: {message}")]
    Handshake { message: String },

    /// An encrypted payload could not be decoded (padding, base64, UTF-8 or
    /// JSON failure after decryption). Almost always means the session key
    /// is stale: the device invalidates keys on its own schedule.
    #[error("Payload decode failed: {message}")]
    Decode { message: String },

    /// The device could not be reached, or kept rejecting the session key
    /// after the retry budget was spent.
    #[error("Device unreachable: {message}")]
    DeviceUnreachable { message: String },

    /// URL parsing error.
    #[error("Invalid device URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns `true` if this error indicates a stale or rejected session
    /// key, i.e. a fresh handshake might resolve it.
    pub fn is_stale_key(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    pub(crate) fn unreachable(err: &reqwest::Error) -> Self {
        Self::DeviceUnreachable {
            message: err.to_string(),
        }
    }
}
