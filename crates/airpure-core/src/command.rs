// Typed write operations.
//
// Each command resolves to the raw field map the firmware expects, with the
// validation the device would otherwise fail silently on. Resolution is pure;
// the facade owns sending the result.

use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::fields::{self, Axis, FieldDictionary, codes};

/// Discrete humidifier targets; anything else is ignored by the firmware.
const HUMIDITY_TARGETS: [u32; 4] = [40, 50, 60, 70];

/// Brightness steps the light ring accepts.
const BRIGHTNESS_STEPS: [u32; 5] = [0, 25, 50, 75, 100];

/// Maximum off-timer, in hours.
const TIMER_MAX_HOURS: u32 = 12;

/// A write operation against the purifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    TurnOn,
    TurnOff,
    /// Select a fan speed step by its semantic label ("silent", "2", "turbo").
    SetSpeed { speed: String },
    /// Select a fan speed by percentage of the model's step list; 0 turns
    /// the device off.
    SetPercentage { percentage: u8 },
    /// Select a preset mode by its semantic label ("auto", "sleep", ...).
    SetPresetMode { mode: String },
    /// Switch between purification and combined purification/humidification.
    SetFunction { function: String },
    SetTargetHumidity { percent: u32 },
    SetLightBrightness { percent: u32 },
    SetChildLock { lock: bool },
    /// Off-timer in hours; 0 cancels.
    SetTimer { hours: u32 },
    SetDisplayLight { on: bool },
    /// Select which air-quality index the display shows.
    SetUsedIndex { index: String },
}

impl Command {
    /// Resolve to the raw fields to PUT on the status resource.
    pub fn to_fields(&self, dict: &FieldDictionary) -> Result<Map<String, Value>, CoreError> {
        let mut fields = Map::new();
        match self {
            Command::TurnOn => {
                fields.insert(codes::POWER.into(), "1".into());
            }
            Command::TurnOff => {
                fields.insert(codes::POWER.into(), "0".into());
            }
            Command::SetSpeed { speed } => {
                let profile = dict.profile();
                if !profile.speeds.contains(&speed.as_str()) {
                    return Err(CoreError::UnknownValue {
                        axis: Axis::Speed,
                        label: speed.clone(),
                    });
                }
                let code = dict.reverse_resolve(Axis::Speed, speed)?;
                if profile.set_speed_forces_manual {
                    let manual = dict.reverse_resolve(Axis::Mode, fields::MODE_MANUAL)?;
                    fields.insert(codes::MODE.into(), manual.into());
                }
                fields.insert(codes::SPEED.into(), code.into());
            }
            Command::SetPercentage { percentage } => {
                if *percentage == 0 {
                    fields.insert(codes::POWER.into(), "0".into());
                } else {
                    let speeds = dict.profile().speeds;
                    let step = fields::percentage_to_speed(speeds, *percentage).ok_or_else(
                        || CoreError::ValidationFailed {
                            message: format!("percentage {percentage} is out of range (0-100)"),
                        },
                    )?;
                    return Command::SetSpeed {
                        speed: step.to_owned(),
                    }
                    .to_fields(dict);
                }
            }
            Command::SetPresetMode { mode } => {
                if !dict.profile().modes.contains(&mode.as_str()) {
                    return Err(CoreError::UnknownValue {
                        axis: Axis::Mode,
                        label: mode.clone(),
                    });
                }
                let code = dict.reverse_resolve(Axis::Mode, mode)?;
                fields.insert(codes::MODE.into(), code.into());
            }
            Command::SetFunction { function } => {
                let code = dict.reverse_resolve(Axis::Function, function)?;
                fields.insert(codes::FUNCTION.into(), code.into());
            }
            Command::SetTargetHumidity { percent } => {
                if !HUMIDITY_TARGETS.contains(percent) {
                    return Err(CoreError::ValidationFailed {
                        message: format!(
                            "target humidity must be one of {HUMIDITY_TARGETS:?}, got {percent}"
                        ),
                    });
                }
                fields.insert(codes::TARGET_HUMIDITY.into(), (*percent).into());
            }
            Command::SetLightBrightness { percent } => {
                if !BRIGHTNESS_STEPS.contains(percent) {
                    return Err(CoreError::ValidationFailed {
                        message: format!(
                            "brightness must be one of {BRIGHTNESS_STEPS:?}, got {percent}"
                        ),
                    });
                }
                fields.insert(codes::BRIGHTNESS.into(), (*percent).into());
                // Brightness 0 also darkens the panel light.
                let uil = if *percent == 0 { "0" } else { "1" };
                fields.insert(codes::DISPLAY_LIGHT.into(), uil.into());
            }
            Command::SetChildLock { lock } => {
                fields.insert(codes::CHILD_LOCK.into(), (*lock).into());
            }
            Command::SetTimer { hours } => {
                if *hours > TIMER_MAX_HOURS {
                    return Err(CoreError::ValidationFailed {
                        message: format!(
                            "timer must be 0-{TIMER_MAX_HOURS} hours, got {hours}"
                        ),
                    });
                }
                fields.insert(codes::TIMER.into(), (*hours).into());
            }
            Command::SetDisplayLight { on } => {
                let code = if *on { "1" } else { "0" };
                fields.insert(codes::DISPLAY_LIGHT.into(), code.into());
            }
            Command::SetUsedIndex { index } => {
                let code = dict.reverse_resolve(Axis::UsedIndex, index)?;
                fields.insert(codes::USED_INDEX.into(), code.into());
            }
        }
        Ok(fields)
    }
}
