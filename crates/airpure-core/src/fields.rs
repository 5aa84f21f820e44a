// Field dictionary: firmware field codes ↔ semantic labels.
//
// The firmware speaks in one/two-character codes ("M", "s", "PH"). Each
// semantic axis has a closed default table; hardware models may layer
// override entries on top (newer firmware dialects extend some axes). All
// per-model variation — speed step lists, supported preset modes, whether a
// speed write must force manual mode — lives here as data, so the client and
// translator stay free of model branches.

use std::fmt;

use crate::error::CoreError;

/// Raw protocol keys, as they appear in the JSON payloads.
pub mod codes {
    pub const POWER: &str = "pwr";
    pub const MODE: &str = "mode";
    pub const SPEED: &str = "om";
    pub const FUNCTION: &str = "func";
    pub const BRIGHTNESS: &str = "aqil";
    pub const DISPLAY_LIGHT: &str = "uil";
    pub const USED_INDEX: &str = "ddp";
    pub const HUMIDITY: &str = "rh";
    pub const TARGET_HUMIDITY: &str = "rhset";
    pub const ALLERGEN_INDEX: &str = "iaql";
    pub const TEMPERATURE: &str = "temp";
    pub const PM25: &str = "pm25";
    pub const WATER_LEVEL: &str = "wl";
    pub const CHILD_LOCK: &str = "cl";
    pub const TIMER: &str = "dt";
    pub const TIMER_REMAINING: &str = "dtrs";
    pub const PRE_FILTER: &str = "fltsts0";
    pub const HEPA_FILTER: &str = "fltsts1";
    pub const CARBON_FILTER: &str = "fltsts2";
    pub const WICK_FILTER: &str = "wicksts";
    /// Model name, from the firmware resource.
    pub const MODEL_NAME: &str = "name";
    /// MAC-derived device identifier, from the wifi resource.
    pub const MAC_ADDRESS: &str = "macaddress";
}

/// Semantic axes with code↔label tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Power,
    Mode,
    Speed,
    Function,
    DisplayLight,
    UsedIndex,
}

impl Axis {
    /// Every axis, for table-wide property checks.
    pub const ALL: [Axis; 6] = [
        Axis::Power,
        Axis::Mode,
        Axis::Speed,
        Axis::Function,
        Axis::DisplayLight,
        Axis::UsedIndex,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Power => "power",
            Axis::Mode => "mode",
            Axis::Speed => "speed",
            Axis::Function => "function",
            Axis::DisplayLight => "display-light",
            Axis::UsedIndex => "used-index",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic labels used by more than one module.
pub const MODE_MANUAL: &str = "manual";
pub const SPEED_SILENT: &str = "silent";

type Table = &'static [(&'static str, &'static str)];

const POWER_TABLE: Table = &[("1", "on"), ("0", "off")];

const MODE_TABLE: Table = &[
    ("P", "auto"),
    ("A", "allergen"),
    ("S", "sleep"),
    ("M", "manual"),
    ("B", "bacteria"),
    ("N", "night"),
];

const SPEED_TABLE: Table = &[
    ("s", "silent"),
    ("t", "turbo"),
    ("1", "1"),
    ("2", "2"),
    ("3", "3"),
];

const FUNCTION_TABLE: Table = &[
    ("P", "purification"),
    ("PH", "purification_humidification"),
];

const DISPLAY_LIGHT_TABLE: Table = &[("1", "on"), ("0", "off")];

const USED_INDEX_TABLE: Table = &[("1", "PM2.5"), ("0", "IAI")];

fn default_table(axis: Axis) -> Table {
    match axis {
        Axis::Power => POWER_TABLE,
        Axis::Mode => MODE_TABLE,
        Axis::Speed => SPEED_TABLE,
        Axis::Function => FUNCTION_TABLE,
        Axis::DisplayLight => DISPLAY_LIGHT_TABLE,
        Axis::UsedIndex => USED_INDEX_TABLE,
    }
}

/// Per-hardware-model variation, layered over the defaults.
#[derive(Debug)]
pub struct ModelProfile {
    /// Model name prefix as reported by the firmware resource ("AC2729").
    pub name: &'static str,
    /// Ordered speed labels; the percentage scale derives from this list,
    /// not from a universal fixed scale.
    pub speeds: &'static [&'static str],
    /// Preset modes this hardware supports.
    pub modes: &'static [&'static str],
    /// Whether a speed write must also force manual mode (some firmware
    /// ignores the speed field while an automatic program is active).
    pub set_speed_forces_manual: bool,
    /// Model-specific table entries consulted before the defaults.
    overrides: &'static [(Axis, Table)],
}

const DEFAULT_PROFILE: ModelProfile = ModelProfile {
    name: "default",
    speeds: &["silent", "1", "2", "3", "turbo"],
    modes: &["auto", "allergen", "sleep", "manual"],
    set_speed_forces_manual: true,
    overrides: &[],
};

const MODELS: &[ModelProfile] = &[
    ModelProfile {
        name: "AC1214",
        speeds: &["silent", "1", "2", "3", "turbo"],
        modes: &["auto", "allergen", "night", "manual"],
        set_speed_forces_manual: true,
        overrides: &[],
    },
    ModelProfile {
        name: "AC2729",
        speeds: &["silent", "1", "2", "3", "turbo"],
        modes: &["auto", "allergen", "sleep", "manual"],
        set_speed_forces_manual: true,
        overrides: &[],
    },
    ModelProfile {
        name: "AC2889",
        speeds: &["silent", "1", "2", "3", "turbo"],
        modes: &["auto", "allergen", "sleep", "manual", "bacteria"],
        set_speed_forces_manual: false,
        overrides: &[],
    },
    ModelProfile {
        // 2-in-1 purifier/humidifier; its display can rotate a humidity
        // readout through the used-index selector.
        name: "AC3829",
        speeds: &["silent", "1", "2", "3", "turbo"],
        modes: &["auto", "allergen", "sleep", "manual"],
        set_speed_forces_manual: true,
        overrides: &[(Axis::UsedIndex, &[("3", "humidity")])],
    },
];

/// Bidirectional code↔label resolver for one active model.
///
/// Cheap to copy: it only holds a reference into the static tables.
#[derive(Debug, Clone, Copy)]
pub struct FieldDictionary {
    profile: &'static ModelProfile,
}

impl Default for FieldDictionary {
    fn default() -> Self {
        Self {
            profile: &DEFAULT_PROFILE,
        }
    }
}

impl FieldDictionary {
    /// Dictionary for the model the firmware reports.
    ///
    /// Firmware names carry a regional suffix ("AC2729/10"), so matching is
    /// by prefix; unknown or missing models fall back to the default profile.
    pub fn for_model(model: Option<&str>) -> Self {
        let profile = model
            .and_then(|name| MODELS.iter().find(|m| name.starts_with(m.name)))
            .unwrap_or(&DEFAULT_PROFILE);
        Self { profile }
    }

    /// The active model profile.
    pub fn profile(&self) -> &'static ModelProfile {
        self.profile
    }

    /// Look up the semantic label for a raw code, if the axis knows it.
    pub fn try_resolve(&self, axis: Axis, code: &str) -> Option<&'static str> {
        self.override_table(axis)
            .and_then(|table| lookup_code(table, code))
            .or_else(|| lookup_code(default_table(axis), code))
    }

    /// Semantic label for a raw code, falling back to the code itself.
    ///
    /// The fallback keeps translation forward-compatible with firmware
    /// values the dictionary does not know yet.
    pub fn resolve(&self, axis: Axis, code: &str) -> String {
        self.try_resolve(axis, code)
            .map_or_else(|| code.to_owned(), str::to_owned)
    }

    /// Raw code for a semantic label.
    ///
    /// Unlike forward resolution this fails: writing an unknown label to the
    /// device would be silently ignored at best.
    pub fn reverse_resolve(&self, axis: Axis, label: &str) -> Result<&'static str, CoreError> {
        self.override_table(axis)
            .and_then(|table| lookup_label(table, label))
            .or_else(|| lookup_label(default_table(axis), label))
            .ok_or_else(|| CoreError::UnknownValue {
                axis,
                label: label.to_owned(),
            })
    }

    fn override_table(&self, axis: Axis) -> Option<Table> {
        self.profile
            .overrides
            .iter()
            .find(|(a, _)| *a == axis)
            .map(|(_, table)| *table)
    }
}

fn lookup_code(table: Table, code: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}

fn lookup_label(table: Table, label: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(_, l)| *l == label)
        .map(|(code, _)| *code)
}

// ── Percentage scale over a model's ordered speed list ──────────────

/// Percentage for a speed label: position on the model's ordered list.
pub fn speed_to_percentage(speeds: &[&str], label: &str) -> Option<u8> {
    let index = speeds.iter().position(|s| *s == label)?;
    let pct = ((index + 1) * 100) / speeds.len();
    u8::try_from(pct).ok()
}

/// Speed label for a percentage (1..=100); 0 means "off", never a step.
pub fn percentage_to_speed<'a>(speeds: &[&'a str], percentage: u8) -> Option<&'a str> {
    if percentage == 0 || percentage > 100 {
        return None;
    }
    let index = (usize::from(percentage) * speeds.len()).div_ceil(100) - 1;
    speeds.get(index).copied()
}
