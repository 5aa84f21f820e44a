// Payload codec for the purifier's encrypted wire frames.
//
// Framing, as dictated by the device firmware:
//
//   base64( AES-128-CBC( zero IV, session key, PKCS7( "AA" + compact JSON ) ) )
//
// The all-zero IV and the fixed two-character prefix are protocol constants.
// The zero IV means equal plaintexts encrypt identically under one session
// key; that weakness is inherited from the firmware and must be reproduced
// bit-for-bit to interoperate with the physical device.

use std::fmt;

use aes::cipher::block_padding::{NoPadding, Pkcs7};
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Map, Value};

use crate::error::Error;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// Fixed literal prepended to every plaintext before padding.
const MESSAGE_PREFIX: &[u8] = b"AA";

/// The protocol-mandated all-zero initialization vector.
const ZERO_IV: [u8; 16] = [0u8; 16];

/// AES key for the current authenticated session.
///
/// Created by the key exchange, owned by the [`AirClient`](crate::AirClient),
/// and discarded whenever the device rejects it. Never persisted; the `Debug`
/// impl is redacted so key material cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionKey([u8; 16]);

impl SessionKey {
    /// Wrap raw key bytes, as produced by the handshake (or a test vector).
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey(..)")
    }
}

/// Encrypt a command map into a wire frame.
///
/// Infallible: the key and IV lengths are fixed and JSON object maps always
/// serialize.
pub fn encrypt_payload(values: &Map<String, Value>, key: &SessionKey) -> String {
    let mut plaintext = Vec::with_capacity(64);
    plaintext.extend_from_slice(MESSAGE_PREFIX);
    serde_json::to_writer(&mut plaintext, values).expect("JSON object maps always serialize");

    let cipher = Aes128CbcEnc::new_from_slices(key.as_bytes(), &ZERO_IV)
        .expect("key and IV lengths are fixed");
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(&plaintext);

    BASE64.encode(ciphertext)
}

/// Decrypt a wire frame back into a field map.
///
/// Every failure mode (base64, padding, UTF-8, JSON) surfaces as
/// [`Error::Decode`]: under a wrong key the padding check fails for all but
/// roughly 1-in-256 ciphertexts, and the JSON parse catches the rest, so a
/// decode failure is the session-staleness signal the client retries on.
pub fn decrypt_payload(body: &str, key: &SessionKey) -> Result<Map<String, Value>, Error> {
    let ciphertext = BASE64.decode(body.trim()).map_err(|e| Error::Decode {
        message: format!("invalid base64: {e}"),
    })?;

    let cipher = Aes128CbcDec::new_from_slices(key.as_bytes(), &ZERO_IV)
        .expect("key and IV lengths are fixed");
    let plaintext = cipher
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| Error::Decode {
            message: "bad PKCS#7 padding".into(),
        })?;

    if plaintext.len() < MESSAGE_PREFIX.len() {
        return Err(Error::Decode {
            message: "plaintext shorter than message prefix".into(),
        });
    }
    let text = std::str::from_utf8(&plaintext[MESSAGE_PREFIX.len()..]).map_err(|e| {
        Error::Decode {
            message: format!("plaintext is not UTF-8: {e}"),
        }
    })?;

    serde_json::from_str(text).map_err(|e| Error::Decode {
        message: format!("plaintext is not a JSON object: {e}"),
    })
}

/// Raw AES-128-CBC decrypt with the zero IV and no padding removal.
///
/// Used on the handshake key blob, where the firmware pads with garbage the
/// client is expected to truncate rather than unpad.
pub(crate) fn decrypt_raw(ciphertext: &[u8], key: &[u8; 16]) -> Result<Vec<u8>, Error> {
    if ciphertext.is_empty() || ciphertext.len() % 16 != 0 {
        return Err(Error::Decode {
            message: format!("ciphertext length {} is not a block multiple", ciphertext.len()),
        });
    }
    let cipher =
        Aes128CbcDec::new_from_slices(key, &ZERO_IV).expect("key and IV lengths are fixed");
    cipher
        .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
        .map_err(|_| Error::Decode {
            message: "raw block decrypt failed".into(),
        })
}
