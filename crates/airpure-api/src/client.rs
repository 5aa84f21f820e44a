// Session-keyed HTTP client for the purifier's encrypted resources.
//
// Wraps `reqwest::Client` with the session-key lifecycle: negotiate on first
// use, decrypt every response, and renegotiate exactly once when the device
// rejects the current key. Endpoint wrappers (status, filters, etc.) are
// implemented as inherent methods in `resources.rs` to keep this module
// focused on transport mechanics.

use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use crate::crypto::{self, SessionKey};
use crate::error::Error;
use crate::handshake;
use crate::transport::TransportConfig;

/// Client for one purifier.
///
/// The session key lives behind a mutex that is held for the whole duration
/// of each operation: the device is a single embedded HTTP server, so
/// requests against one instance are serialized, and a key rotation always
/// completes (or fails) before the next operation sees the key slot.
///
/// Key state machine, per instance:
/// `NoKey → (handshake ok) → Keyed → (decode/write failure) → NoKey`,
/// with at most one re-handshake attempt per failed operation.
pub struct AirClient {
    http: reqwest::Client,
    base_url: Url,
    key: Mutex<Option<SessionKey>>,
}

impl AirClient {
    /// Create a client for the device at `host` (IP or hostname; the
    /// firmware serves plain HTTP on port 80).
    pub fn new(host: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let base_url = Url::parse(&format!("http://{host}/"))?;
        Ok(Self {
            http: transport.build_client()?,
            base_url,
            key: Mutex::new(None),
        })
    }

    /// Create a client with a pre-built `reqwest::Client` and base URL.
    ///
    /// Used by tests pointing the client at a mock device.
    pub fn from_reqwest(base_url: Url, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url,
            key: Mutex::new(None),
        }
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch and decrypt an encrypted resource.
    ///
    /// Negotiates a session key if none is held. A decode failure (the
    /// stale-key signal) triggers exactly one renegotiate-and-retry; a second
    /// decode failure surfaces as [`Error::DeviceUnreachable`]. Transport
    /// failures are not retried at this layer.
    pub async fn get(&self, path: &str) -> Result<Map<String, Value>, Error> {
        let url = self.base_url.join(path)?;
        let mut key = self.key.lock().await;

        if key.is_none() {
            *key = Some(handshake::negotiate(&self.http, &self.base_url).await?);
        }
        let current = key.as_ref().expect("session key was just ensured");

        match self.fetch_and_decrypt(&url, current).await {
            Ok(fields) => Ok(fields),
            Err(e) if e.is_stale_key() => {
                warn!("session key rejected by {}, renegotiating", self.base_url);
                *key = None;
                let fresh = handshake::negotiate(&self.http, &self.base_url).await?;
                let fields = self.fetch_and_decrypt(&url, &fresh).await.map_err(retry_exhausted)?;
                *key = Some(fresh);
                Ok(fields)
            }
            Err(e) => Err(e),
        }
    }

    /// Encrypt `values` and PUT them to an encrypted resource.
    ///
    /// The map holds only the fields being changed. A rejected write (the
    /// device answers writes under a stale key with an error status) follows
    /// the same single renegotiate-and-retry policy as [`AirClient::get`].
    pub async fn put(&self, path: &str, values: &Map<String, Value>) -> Result<(), Error> {
        let url = self.base_url.join(path)?;
        let mut key = self.key.lock().await;

        if key.is_none() {
            *key = Some(handshake::negotiate(&self.http, &self.base_url).await?);
        }
        let current = key.as_ref().expect("session key was just ensured");

        match self.send_encrypted(&url, values, current).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_stale_key() => {
                warn!("write rejected by {}, renegotiating", self.base_url);
                *key = None;
                let fresh = handshake::negotiate(&self.http, &self.base_url).await?;
                self.send_encrypted(&url, values, &fresh)
                    .await
                    .map_err(retry_exhausted)?;
                *key = Some(fresh);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch_and_decrypt(
        &self,
        url: &Url,
        key: &SessionKey,
    ) -> Result<Map<String, Value>, Error> {
        debug!("GET {}", url);
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::unreachable(&e))?;
        let body = response.text().await.map_err(|e| Error::unreachable(&e))?;
        crypto::decrypt_payload(&body, key)
    }

    async fn send_encrypted(
        &self,
        url: &Url,
        values: &Map<String, Value>,
        key: &SessionKey,
    ) -> Result<(), Error> {
        let body = crypto::encrypt_payload(values, key);
        debug!("PUT {}", url);
        let response = self
            .http
            .put(url.clone())
            .body(body)
            .send()
            .await
            .map_err(|e| Error::unreachable(&e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            // Writes under a stale key come back as an error status, not a
            // decryptable body; treat any rejection as the stale-key signal.
            Err(Error::Decode {
                message: format!("device rejected write (HTTP {status})"),
            })
        }
    }
}

/// A stale-key failure that survived the one-retry budget is no longer a
/// retryable condition; the device is effectively unreachable.
fn retry_exhausted(err: Error) -> Error {
    if err.is_stale_key() {
        Error::DeviceUnreachable {
            message: format!("device rejected a freshly negotiated session key: {err}"),
        }
    } else {
        err
    }
}
