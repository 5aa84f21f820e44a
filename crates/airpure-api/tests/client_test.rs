// Integration tests for `AirClient` using a wiremock mock device.
//
// The mock implements the firmware side of the protocol through its own code
// path: the Diffie-Hellman derivation, the session-key wrapping, and the
// AES-CBC frame codec. A successful decode therefore proves the G^(ab) mod P
// symmetry between client and device, not just internal consistency.
#![allow(clippy::unwrap_used)]

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use airpure_api::AirClient;

mod mock_device {
    use aes::cipher::block_padding::{NoPadding, Pkcs7};
    use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use num_bigint::BigUint;
    use serde_json::Value;
    use wiremock::{Request, Respond, ResponseTemplate};

    use airpure_api::handshake::{DH_GENERATOR_HEX, DH_MODULUS_HEX};

    type Enc = cbc::Encryptor<aes::Aes128>;
    type Dec = cbc::Decryptor<aes::Aes128>;

    const IV: [u8; 16] = [0u8; 16];

    /// The session key every handshake with the mock device yields.
    pub const SESSION_KEY: [u8; 16] = *b"0123456789abcdef";

    /// A key the mock never hands out; frames under it simulate staleness.
    pub const STALE_KEY: [u8; 16] = [0x42; 16];

    pub fn encrypt_frame(values: &Value, key: &[u8; 16]) -> String {
        let plaintext = format!("AA{values}");
        let ciphertext = Enc::new_from_slices(key, &IV)
            .unwrap()
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
        BASE64.encode(ciphertext)
    }

    pub fn decrypt_frame(body: &[u8], key: &[u8; 16]) -> Value {
        let ciphertext = BASE64.decode(body).unwrap();
        let plaintext = Dec::new_from_slices(key, &IV)
            .unwrap()
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .unwrap();
        serde_json::from_slice(&plaintext[2..]).unwrap()
    }

    /// Device side of the key exchange: fixed private exponent, session key
    /// wrapped under the first 16 bytes of the 128-byte big-endian shared
    /// secret, exactly as the firmware does it.
    pub struct KeyExchange;

    impl Respond for KeyExchange {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let g = BigUint::parse_bytes(DH_GENERATOR_HEX.as_bytes(), 16).unwrap();
            let p = BigUint::parse_bytes(DH_MODULUS_HEX.as_bytes(), 16).unwrap();

            let body: Value = serde_json::from_slice(&request.body).unwrap();
            let client_public =
                BigUint::parse_bytes(body["diffie"].as_str().unwrap().as_bytes(), 16).unwrap();

            let device_private = BigUint::from(0x00fe_dcbau32);
            let device_public = g.modpow(&device_private, &p);
            let shared = client_public.modpow(&device_private, &p);

            let mut padded = [0u8; 128];
            let bytes = shared.to_bytes_be();
            padded[128 - bytes.len()..].copy_from_slice(&bytes);

            let blob = Enc::new_from_slices(&padded[..16], &IV)
                .unwrap()
                .encrypt_padded_vec_mut::<NoPadding>(&SESSION_KEY);

            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "key": hex::encode(blob),
                "hellman": format!("{device_public:x}"),
            }))
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, AirClient) {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/di/v1/products/0/security"))
        .respond_with(mock_device::KeyExchange)
        .mount(&server)
        .await;

    let base_url = url::Url::parse(&server.uri()).unwrap();
    let client = AirClient::from_reqwest(base_url, reqwest::Client::new());
    (server, client)
}

async fn handshake_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/di/v1/products/0/security")
        .count()
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_get_status_negotiates_and_decrypts() {
    let (server, client) = setup().await;

    let status = json!({"pwr": "1", "mode": "M", "om": "2", "pm25": 6});
    Mock::given(method("GET"))
        .and(path("/di/v1/products/1/air"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            mock_device::encrypt_frame(&status, &mock_device::SESSION_KEY),
        ))
        .mount(&server)
        .await;

    let fields = client.get_status().await.unwrap();

    assert_eq!(fields.get("pwr"), Some(&json!("1")));
    assert_eq!(fields.get("om"), Some(&json!("2")));
    assert_eq!(fields.get("pm25"), Some(&json!(6)));
    assert_eq!(handshake_count(&server).await, 1);
}

#[tokio::test]
async fn test_session_key_reused_across_requests() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/di/v1/products/1/air"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            mock_device::encrypt_frame(&json!({"pwr": "1"}), &mock_device::SESSION_KEY),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/di/v1/products/1/fltsts"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            mock_device::encrypt_frame(
                &json!({"fltsts0": 240, "fltsts1": 2260, "fltsts2": 2260}),
                &mock_device::SESSION_KEY,
            ),
        ))
        .mount(&server)
        .await;

    client.get_status().await.unwrap();
    let filters = client.get_filters().await.unwrap();

    assert_eq!(filters.get("fltsts0"), Some(&json!(240)));
    // One handshake serves both requests.
    assert_eq!(handshake_count(&server).await, 1);
}

#[tokio::test]
async fn test_set_values_encrypts_changed_fields_only() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/di/v1/products/1/air"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let values = json!({"pwr": "1", "mode": "M"}).as_object().cloned().unwrap();
    client.set_values(&values).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let write = requests
        .iter()
        .find(|r| r.url.path() == "/di/v1/products/1/air")
        .expect("no write reached the device");
    let decoded = mock_device::decrypt_frame(&write.body, &mock_device::SESSION_KEY);
    assert_eq!(decoded, json!({"mode": "M", "pwr": "1"}));
}

// ── Rekey policy tests ──────────────────────────────────────────────

#[tokio::test]
async fn test_single_decode_failure_triggers_one_rekey() {
    let (server, client) = setup().await;

    // First response is encrypted under a key the client will never hold,
    // simulating a session the device has expired. The retry gets a good one.
    Mock::given(method("GET"))
        .and(path("/di/v1/products/1/air"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            mock_device::encrypt_frame(&json!({"pwr": "1"}), &mock_device::STALE_KEY),
        ))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/di/v1/products/1/air"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            mock_device::encrypt_frame(&json!({"pwr": "1"}), &mock_device::SESSION_KEY),
        ))
        .mount(&server)
        .await;

    let fields = client.get_status().await.unwrap();

    assert_eq!(fields.get("pwr"), Some(&json!("1")));
    // Initial keying plus exactly one renewal.
    assert_eq!(handshake_count(&server).await, 2);
}

#[tokio::test]
async fn test_two_decode_failures_surface_unreachable_without_third_handshake() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/di/v1/products/1/air"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            mock_device::encrypt_frame(&json!({"pwr": "1"}), &mock_device::STALE_KEY),
        ))
        .mount(&server)
        .await;

    let result = client.get_status().await;

    assert!(
        matches!(result, Err(airpure_api::Error::DeviceUnreachable { .. })),
        "expected DeviceUnreachable, got: {result:?}"
    );
    assert_eq!(handshake_count(&server).await, 2);
}

#[tokio::test]
async fn test_rejected_write_rekeys_once_then_succeeds() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/di/v1/products/1/air"))
        .respond_with(ResponseTemplate::new(400))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/di/v1/products/1/air"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let values = json!({"om": "2"}).as_object().cloned().unwrap();
    client.set_values(&values).await.unwrap();

    assert_eq!(handshake_count(&server).await, 2);
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_unreachable_device_fails_the_handshake() {
    // Nothing listens here; the very first step (key exchange) fails.
    let base_url = url::Url::parse("http://127.0.0.1:9/").unwrap();
    let client = AirClient::from_reqwest(base_url, reqwest::Client::new());

    let result = client.get_status().await;

    assert!(
        matches!(result, Err(airpure_api::Error::Handshake { .. })),
        "expected Handshake error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_malformed_handshake_response_is_a_handshake_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/di/v1/products/0/security"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"nope": true})))
        .mount(&server)
        .await;

    let base_url = url::Url::parse(&server.uri()).unwrap();
    let client = AirClient::from_reqwest(base_url, reqwest::Client::new());

    let result = client.get_status().await;

    assert!(
        matches!(result, Err(airpure_api::Error::Handshake { .. })),
        "expected Handshake error, got: {result:?}"
    );
}
