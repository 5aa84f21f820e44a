//! Domain layer between `airpure-api` and consumers (CLI, automation hosts).
//!
//! This crate owns the semantic side of the purifier protocol:
//!
//! - **[`FieldDictionary`]** — bidirectional mappings between the firmware's
//!   short field codes and semantic labels, parameterized by
//!   [`ModelProfile`] so per-model variation lives in data, not in control
//!   flow scattered across the client.
//!
//! - **[`DeviceState`]** — normalized snapshot of the device (power, speed,
//!   mode, sensors, filters). Every field is optional: what the firmware does
//!   not report stays unset instead of defaulting.
//!
//! - **[`convert::translate`]** — pure function from the raw status/filter/
//!   firmware maps to a [`DeviceState`], tolerant of unknown firmware codes.
//!
//! - **[`Command`]** — typed write operations, resolved to raw field maps
//!   through the dictionary with the validation the device expects.
//!
//! - **[`Purifier`]** — facade tying an [`airpure_api::AirClient`] to the
//!   dictionary for refresh cycles and command execution.

pub mod command;
pub mod convert;
pub mod error;
pub mod fields;
pub mod model;
pub mod purifier;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::Command;
pub use error::CoreError;
pub use fields::{Axis, FieldDictionary, ModelProfile};
pub use model::DeviceState;
pub use purifier::Purifier;

// Transport-layer types consumers need to construct a facade.
pub use airpure_api::{AirClient, TransportConfig};
