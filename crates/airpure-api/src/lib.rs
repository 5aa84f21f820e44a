// airpure-api: Async Rust client for the Philips air purifier local HTTP protocol
//
// The purifier exposes a small HTTP server whose bodies are AES-128-CBC
// encrypted under a session key negotiated via a Diffie-Hellman handshake.
// This crate owns the wire mechanics only: handshake, payload codec, and the
// session-keyed client with its rekey-on-stale-key policy. Semantic
// translation of field codes lives in `airpure-core`.

pub mod client;
pub mod crypto;
pub mod error;
pub mod handshake;
pub mod resources;
pub mod transport;

pub use client::AirClient;
pub use crypto::SessionKey;
pub use error::Error;
pub use transport::TransportConfig;
