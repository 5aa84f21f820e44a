// Raw field maps → normalized DeviceState.
//
// Pure translation, no I/O. Firmware dialects are sloppy about value types
// (the same sensor arrives as 6 on one model and "6" on another), so all
// numeric reads coerce both forms. Unknown codes pass through verbatim
// instead of failing, to stay forward-compatible with firmware the
// dictionary does not know yet.

use serde_json::{Map, Value};

use crate::fields::{self, Axis, FieldDictionary, codes};
use crate::model::DeviceState;

/// Translate the raw status, filter, and firmware maps into a snapshot.
pub fn translate(
    status: &Map<String, Value>,
    filters: &Map<String, Value>,
    firmware: &Map<String, Value>,
    dict: &FieldDictionary,
) -> DeviceState {
    let mut state = DeviceState::default();

    if let Some(model) = firmware.get(codes::MODEL_NAME).and_then(Value::as_str) {
        state.model = Some(model.to_owned());
    }

    if let Some(pwr) = string_field(status, codes::POWER) {
        state.power = Some(pwr == "1");
    }

    state.pm25 = uint_field(status, codes::PM25);
    state.humidity = uint_field(status, codes::HUMIDITY);
    state.target_humidity = uint_field(status, codes::TARGET_HUMIDITY);
    state.allergen_index = uint_field(status, codes::ALLERGEN_INDEX);
    state.temperature = int_field(status, codes::TEMPERATURE);

    if let Some(func) = string_field(status, codes::FUNCTION) {
        state.function = Some(dict.resolve(Axis::Function, &func));
    }

    let mode_label = string_field(status, codes::MODE).map(|m| dict.resolve(Axis::Mode, &m));
    let speed_label = string_field(status, codes::SPEED).map(|s| dict.resolve(Axis::Speed, &s));
    state.preset_mode = mode_label.clone();
    state.fan_speed = display_speed(mode_label, speed_label);
    state.speed_percentage = state
        .fan_speed
        .as_deref()
        .and_then(|label| fields::speed_to_percentage(dict.profile().speeds, label));

    state.light_brightness = uint_field(status, codes::BRIGHTNESS);
    if let Some(uil) = string_field(status, codes::DISPLAY_LIGHT) {
        state.display_light = match dict.resolve(Axis::DisplayLight, &uil).as_str() {
            "on" => Some(true),
            "off" => Some(false),
            _ => None,
        };
    }
    if let Some(ddp) = string_field(status, codes::USED_INDEX) {
        state.used_index = Some(dict.resolve(Axis::UsedIndex, &ddp));
    }
    state.water_level = uint_field(status, codes::WATER_LEVEL);
    state.child_lock = bool_field(status, codes::CHILD_LOCK);
    state.timer_hours = uint_field(status, codes::TIMER);
    state.timer_minutes_remaining = uint_field(status, codes::TIMER_REMAINING);

    state.pre_filter = uint_field(filters, codes::PRE_FILTER);
    state.hepa_filter = uint_field(filters, codes::HEPA_FILTER);
    state.carbon_filter = uint_field(filters, codes::CARBON_FILTER);
    state.wick_filter = uint_field(filters, codes::WICK_FILTER);

    state
}

/// Displayed fan speed, following the historical silent-override contract:
/// the display seeds from the mode's label and only a non-silent speed in
/// manual mode replaces it, so a manual step selection is never overwritten
/// by the idle/silent label.
fn display_speed(mode_label: Option<String>, speed_label: Option<String>) -> Option<String> {
    match (mode_label, speed_label) {
        (Some(mode), Some(speed)) => {
            if mode == fields::MODE_MANUAL && speed != fields::SPEED_SILENT {
                Some(speed)
            } else {
                Some(mode)
            }
        }
        (Some(mode), None) => Some(mode),
        (None, speed) => speed,
    }
}

// ── Tolerant value coercion ─────────────────────────────────────────

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn uint_field(map: &Map<String, Value>, key: &str) -> Option<u32> {
    match map.get(key)? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn int_field(map: &Map<String, Value>, key: &str) -> Option<i32> {
    match map.get(key)? {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn bool_field(map: &Map<String, Value>, key: &str) -> Option<bool> {
    match map.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.as_str() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_u64().map(|v| v != 0),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn map(value: serde_json::Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn empty() -> Map<String, Value> {
        Map::new()
    }

    #[test]
    fn manual_mode_with_numbered_step_shows_the_step() {
        let status = map(json!({"pwr": "1", "mode": "M", "om": "2"}));
        let state = translate(&status, &empty(), &empty(), &FieldDictionary::default());

        assert_eq!(state.power, Some(true));
        assert_eq!(state.preset_mode.as_deref(), Some("manual"));
        assert_eq!(state.fan_speed.as_deref(), Some("2"));
        assert_eq!(state.speed_percentage, Some(60));
    }

    #[test]
    fn manual_mode_with_silent_step_keeps_the_mode_label() {
        let status = map(json!({"mode": "M", "om": "s"}));
        let state = translate(&status, &empty(), &empty(), &FieldDictionary::default());
        assert_eq!(state.fan_speed.as_deref(), Some("manual"));
    }

    #[test]
    fn automatic_program_label_wins_over_reported_step() {
        let status = map(json!({"mode": "A", "om": "1"}));
        let state = translate(&status, &empty(), &empty(), &FieldDictionary::default());
        assert_eq!(state.preset_mode.as_deref(), Some("allergen"));
        assert_eq!(state.fan_speed.as_deref(), Some("allergen"));
        // Program labels are not on the speed scale.
        assert_eq!(state.speed_percentage, None);
    }

    #[test]
    fn absent_fields_stay_unset() {
        let status = map(json!({"pwr": "0"}));
        let state = translate(&status, &empty(), &empty(), &FieldDictionary::default());

        assert_eq!(state.power, Some(false));
        assert_eq!(
            state,
            DeviceState {
                power: Some(false),
                ..DeviceState::default()
            }
        );
    }

    #[test]
    fn sensors_coerce_numbers_and_numeric_strings() {
        let status = map(json!({
            "pm25": 6,
            "rh": "43",
            "rhset": 60,
            "temp": 21,
            "iaql": "2",
            "aqil": 75,
            "wl": 100,
            "dt": 0,
            "dtrs": "25",
        }));
        let state = translate(&status, &empty(), &empty(), &FieldDictionary::default());

        assert_eq!(state.pm25, Some(6));
        assert_eq!(state.humidity, Some(43));
        assert_eq!(state.target_humidity, Some(60));
        assert_eq!(state.temperature, Some(21));
        assert_eq!(state.allergen_index, Some(2));
        assert_eq!(state.light_brightness, Some(75));
        assert_eq!(state.water_level, Some(100));
        assert_eq!(state.timer_hours, Some(0));
        assert_eq!(state.timer_minutes_remaining, Some(25));
    }

    #[test]
    fn unknown_codes_pass_through_verbatim() {
        let status = map(json!({"mode": "GT", "func": "PHX"}));
        let state = translate(&status, &empty(), &empty(), &FieldDictionary::default());
        assert_eq!(state.preset_mode.as_deref(), Some("GT"));
        assert_eq!(state.function.as_deref(), Some("PHX"));
    }

    #[test]
    fn panel_fields_translate_through_the_dictionary() {
        let status = map(json!({"uil": "1", "ddp": "1", "cl": true}));
        let state = translate(&status, &empty(), &empty(), &FieldDictionary::default());
        assert_eq!(state.display_light, Some(true));
        assert_eq!(state.used_index.as_deref(), Some("PM2.5"));
        assert_eq!(state.child_lock, Some(true));
    }

    #[test]
    fn filters_and_model_come_from_their_own_resources() {
        let filters = map(json!({
            "fltsts0": 240,
            "fltsts1": 2260,
            "fltsts2": 2260,
            "wicksts": 4320,
        }));
        let firmware = map(json!({"name": "AC2729/10", "version": "0.2.1"}));
        let state = translate(&empty(), &filters, &firmware, &FieldDictionary::default());

        assert_eq!(state.pre_filter, Some(240));
        assert_eq!(state.hepa_filter, Some(2260));
        assert_eq!(state.carbon_filter, Some(2260));
        assert_eq!(state.wick_filter, Some(4320));
        assert_eq!(state.model.as_deref(), Some("AC2729/10"));
    }
}
