// High-level facade: one purifier, refreshed and commanded.
//
// Owns the field dictionary and keeps it in sync with the model the firmware
// reports, so a refresh against an AC3829 automatically picks up that model's
// table overrides before translation.

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use airpure_api::{AirClient, TransportConfig};

use crate::command::Command;
use crate::convert;
use crate::error::CoreError;
use crate::fields::{FieldDictionary, codes};
use crate::model::DeviceState;

/// A connected purifier.
pub struct Purifier {
    client: AirClient,
    dict: RwLock<FieldDictionary>,
}

impl Purifier {
    /// Connect to the device at `host`.
    ///
    /// No network traffic happens here; the session is negotiated lazily on
    /// the first operation.
    pub fn new(host: &str, transport: &TransportConfig) -> Result<Self, CoreError> {
        let client = AirClient::new(host, transport)?;
        Ok(Self::from_client(client))
    }

    /// Wrap an existing transport client.
    pub fn from_client(client: AirClient) -> Self {
        Self {
            client,
            dict: RwLock::new(FieldDictionary::default()),
        }
    }

    /// Fetch status, filters, and firmware info and translate them into a
    /// normalized snapshot.
    ///
    /// The reported model name re-selects the dictionary profile before
    /// translation, so model-specific table entries apply from the first
    /// complete refresh onward.
    pub async fn refresh(&self) -> Result<DeviceState, CoreError> {
        let firmware = self.client.get_firmware().await?;
        let status = self.client.get_status().await?;
        let filters = self.client.get_filters().await?;

        let model = firmware.get(codes::MODEL_NAME).and_then(Value::as_str);
        let dict = FieldDictionary::for_model(model);
        *self.dict.write().await = dict;
        debug!(model = ?model, profile = dict.profile().name, "refreshed");

        Ok(convert::translate(&status, &filters, &firmware, &dict))
    }

    /// Stable device identifier (the MAC address from the wifi resource).
    pub async fn device_id(&self) -> Result<String, CoreError> {
        let wifi = self.client.get_wifi().await?;
        wifi.get(codes::MAC_ADDRESS)
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| CoreError::Protocol {
                message: "wifi resource carries no MAC address".to_owned(),
            })
    }

    /// Resolve and send a command.
    pub async fn execute(&self, command: &Command) -> Result<(), CoreError> {
        let dict = *self.dict.read().await;
        let fields = command.to_fields(&dict)?;
        info!(?command, "sending command");
        self.client.set_values(&fields).await?;
        Ok(())
    }

    /// The dictionary selected by the last refresh.
    pub async fn dictionary(&self) -> FieldDictionary {
        *self.dict.read().await
    }
}
