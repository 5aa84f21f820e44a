// Named device resources.
//
// The firmware exposes a handful of fixed paths under /di/v1/products; all of
// them are encrypted except the security endpoint used by the handshake.

use serde_json::{Map, Value};

use crate::client::AirClient;
use crate::error::Error;

/// Operational state (read) and command target (write).
pub const STATUS_PATH: &str = "di/v1/products/1/air";

/// Filter wear counters.
pub const FILTERS_PATH: &str = "di/v1/products/1/fltsts";

/// Firmware and model information.
pub const FIRMWARE_PATH: &str = "di/v1/products/0/firmware";

/// Network information, including the MAC-derived device identifier.
pub const WIFI_PATH: &str = "di/v1/products/0/wifi";

impl AirClient {
    /// Current operational state (power, mode, speed, sensors, ...).
    ///
    /// `GET /di/v1/products/1/air`
    pub async fn get_status(&self) -> Result<Map<String, Value>, Error> {
        self.get(STATUS_PATH).await
    }

    /// Filter wear status (`fltsts0/1/2`, optional `wicksts`).
    ///
    /// `GET /di/v1/products/1/fltsts`
    pub async fn get_filters(&self) -> Result<Map<String, Value>, Error> {
        self.get(FILTERS_PATH).await
    }

    /// Firmware and model info (`name`, `version`).
    ///
    /// `GET /di/v1/products/0/firmware`
    pub async fn get_firmware(&self) -> Result<Map<String, Value>, Error> {
        self.get(FIRMWARE_PATH).await
    }

    /// Network info (`macaddress`, `ssid`, ...).
    ///
    /// `GET /di/v1/products/0/wifi`
    pub async fn get_wifi(&self) -> Result<Map<String, Value>, Error> {
        self.get(WIFI_PATH).await
    }

    /// Write changed fields to the operational state.
    ///
    /// `PUT /di/v1/products/1/air` with the encrypted command frame.
    pub async fn set_values(&self, values: &Map<String, Value>) -> Result<(), Error> {
        self.put(STATUS_PATH, values).await
    }
}
