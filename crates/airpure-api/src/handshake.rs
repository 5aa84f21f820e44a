// Diffie-Hellman key exchange against the device's security endpoint.
//
// The firmware uses a classic prime-field exchange with fixed 1024-bit
// parameters and derives an AES key-decryption key from the first 16 bytes
// of the 128-byte big-endian shared secret. The device's public value is not
// authenticated (trust-on-first-use); that matches the firmware's own
// protocol and is required for wire compatibility.

use std::sync::LazyLock;

use num_bigint::BigUint;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::crypto::{self, SessionKey};
use crate::error::Error;

/// Key exchange endpoint, relative to the device root.
pub(crate) const SECURITY_PATH: &str = "di/v1/products/0/security";

/// Fixed 1024-bit generator, shared by every firmware revision.
///
/// Public (together with [`DH_MODULUS_HEX`]) so that test harnesses can run
/// the device side of the derivation.
pub const DH_GENERATOR_HEX: &str = "A4D1CBD5C3FD34126765A442EFB99905F8104DD258AC507FD6406CFF14266D31266FEA1E5C41564B777E690F5504F213160217B4B01B886A5E91547F9E2749F4D7FBD7D3B9A92EE1909D0D2263F80A76A6A24C087A091F531DBF0A0169B6A28AD662A4D18E73AFA32D779D5918D08BC8858F4DCEF97C2A24855E6EEB22B3B2E5";

/// Fixed 1024-bit prime modulus.
pub const DH_MODULUS_HEX: &str = "B10B8F96A080E01DDE92DE5EAE5D54EC52C99FBCFB06A3C69A6A9DCA52D23B616073E28675A23D189838EF1E2EE652C013ECB4AEA906112324975C3CD49B83BFACCBDD7D90C4BD7098488E9C219A73724EFFD6FAE5644738FAA31A4FF55BCCC0A151AF5F0DC8B4BD45BF37DF365C1A65E68CFDA76D4DA708DF1FB2BC2E4A4371";

static DH_G: LazyLock<BigUint> = LazyLock::new(|| {
    BigUint::parse_bytes(DH_GENERATOR_HEX.as_bytes(), 16).expect("generator constant is valid hex")
});

static DH_P: LazyLock<BigUint> = LazyLock::new(|| {
    BigUint::parse_bytes(DH_MODULUS_HEX.as_bytes(), 16).expect("modulus constant is valid hex")
});

#[derive(Serialize)]
struct KeyExchangeRequest {
    diffie: String,
}

#[derive(Deserialize)]
struct KeyExchangeResponse {
    key: String,
    hellman: String,
}

/// Negotiate a fresh session key with the device at `base_url`.
///
/// Every invocation draws a new ephemeral exponent; private values are never
/// reused across handshakes. Transport failures and malformed responses both
/// surface as [`Error::Handshake`].
pub async fn negotiate(http: &reqwest::Client, base_url: &Url) -> Result<SessionKey, Error> {
    let url = base_url.join(SECURITY_PATH)?;

    let private = fresh_exponent();
    let public = DH_G.modpow(&private, &DH_P);

    debug!("PUT {} (key exchange)", url);
    let response = http
        .put(url)
        .json(&KeyExchangeRequest {
            diffie: format!("{public:x}"),
        })
        .send()
        .await
        .map_err(|e| Error::Handshake {
            message: e.to_string(),
        })?;

    let exchange: KeyExchangeResponse = response.json().await.map_err(|e| Error::Handshake {
        message: format!("malformed handshake response: {e}"),
    })?;

    let device_public =
        BigUint::parse_bytes(exchange.hellman.as_bytes(), 16).ok_or_else(|| Error::Handshake {
            message: "device public value is not hex".into(),
        })?;
    let shared = device_public.modpow(&private, &DH_P);
    let kdk = key_decryption_key(&shared);

    let blob = hex::decode(&exchange.key).map_err(|e| Error::Handshake {
        message: format!("key blob is not hex: {e}"),
    })?;
    let plaintext = crypto::decrypt_raw(&blob, &kdk).map_err(|e| Error::Handshake {
        message: format!("cannot unwrap session key: {e}"),
    })?;
    let key_bytes: [u8; 16] = plaintext
        .get(..16)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| Error::Handshake {
            message: "decrypted key blob shorter than 16 bytes".into(),
        })?;

    debug!("session key negotiated");
    Ok(SessionKey::from_bytes(key_bytes))
}

/// Uniformly random 256-bit ephemeral private exponent.
fn fresh_exponent() -> BigUint {
    let mut buf = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut buf);
    BigUint::from_bytes_be(&buf)
}

/// First 16 bytes of the shared secret serialized as a 128-byte big-endian
/// integer. The left padding matters: secrets smaller than 1024 bits keep
/// their leading zero bytes.
fn key_decryption_key(shared: &BigUint) -> [u8; 16] {
    let bytes = shared.to_bytes_be();
    let mut padded = [0u8; 128];
    // shared < P, so bytes.len() <= 128
    padded[128 - bytes.len()..].copy_from_slice(&bytes);
    let mut kdk = [0u8; 16];
    kdk.copy_from_slice(&padded[..16]);
    kdk
}
