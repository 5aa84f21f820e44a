// Normalized device-state snapshot.
//
// Produced by `convert::translate` after each refresh cycle and consumed
// read-only by the host. Every field is optional: a field the firmware did
// not report stays `None` rather than defaulting to zero/false, so the host
// can distinguish "off" from "not supported by this model".

use serde::Serialize;

/// Normalized view of the purifier's state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<bool>,

    /// Displayed fan speed label ("silent", "2", "turbo", or a program
    /// label when an automatic mode drives the fan).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fan_speed: Option<String>,

    /// Speed as a percentage of the active model's ordered step list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_percentage: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset_mode: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,

    // ── Sensors ──────────────────────────────────────────────────────
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_humidity: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pm25: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergen_index: Option<u32>,

    // ── Panel / accessories ──────────────────────────────────────────
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_brightness: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_light: Option<bool>,

    /// Which index the display shows ("PM2.5", "IAI", model-specific extras).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_index: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_level: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_lock: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_hours: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_minutes_remaining: Option<u32>,

    // ── Identity ─────────────────────────────────────────────────────
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    // ── Filter wear ──────────────────────────────────────────────────
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_filter: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hepa_filter: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbon_filter: Option<u32>,

    /// Humidifier wick, only on 2-in-1 models.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wick_filter: Option<u32>,
}
