// Shared transport configuration for building reqwest::Client instances.
//
// The purifier's embedded server speaks plain HTTP on the LAN, so unlike a
// cloud API there is no TLS story here; the config covers timeout and
// user-agent only. One client instance is shared between the security
// endpoint (handshake) and the encrypted resources.

use std::time::Duration;

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent("airpure/0.1.0")
            .build()
            .map_err(|e| crate::error::Error::DeviceUnreachable {
                message: format!("failed to build HTTP client: {e}"),
            })
    }
}
