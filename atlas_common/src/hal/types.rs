//! Capability boundary value types.
//!
//! This module defines the data structures exchanged with hardware
//! capabilities:
//! - `GamepadSample` - Raw per-cycle gamepad state
//! - `SolenoidState` - Commanded state of a double-acting solenoid
//! - `LiftMode` - Arbitration outcome for the lift axis
//! - `CycleFaults` - Locally-recovered failure flags for one cycle
//! - `DiagnosticsRecord` - Structured snapshot handed to telemetry sinks

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_GAMEPAD_AXES, MAX_GAMEPAD_BUTTONS};

/// Raw gamepad state captured in a single read.
///
/// Axis values are expected in [-1, 1] (triggers report [0, 1]);
/// the sampler clamps on ingest regardless. `pov_degrees` is `None`
/// when the directional pad is not pressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GamepadSample {
    /// Raw axis values, indexed by the binding configuration.
    pub axes: [f64; MAX_GAMEPAD_AXES],
    /// Raw button levels, indexed by the binding configuration.
    pub buttons: [bool; MAX_GAMEPAD_BUTTONS],
    /// Directional pad angle in degrees clockwise from north.
    pub pov_degrees: Option<u16>,
}

impl Default for GamepadSample {
    /// All-neutral sample, substituted when a device read fails.
    fn default() -> Self {
        Self {
            axes: [0.0; MAX_GAMEPAD_AXES],
            buttons: [false; MAX_GAMEPAD_BUTTONS],
            pov_degrees: None,
        }
    }
}

/// Commanded state of a double-acting solenoid.
///
/// The device is bistable: there is no hold/neutral state, so every
/// cycle commands exactly one of the two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum SolenoidState {
    /// Drive the forward port.
    Forward = 0,
    /// Drive the reverse port.
    Reverse = 1,
}

impl SolenoidState {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Forward),
            1 => Some(Self::Reverse),
            _ => None,
        }
    }

    /// Map a boolean driving condition to a solenoid position.
    #[inline]
    pub const fn from_condition(active: bool) -> Self {
        if active { Self::Forward } else { Self::Reverse }
    }
}

impl Default for SolenoidState {
    fn default() -> Self {
        Self::Reverse
    }
}

/// Arbitration outcome for the lift axis in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum LiftMode {
    /// Operator stick or stall button drives the lift directly.
    Manual = 0,
    /// Position controller seeks the selected stage target.
    Auto = 1,
    /// Within tolerance (or sensor unavailable) — zero power.
    Hold = 2,
}

impl LiftMode {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Manual),
            1 => Some(Self::Auto),
            2 => Some(Self::Hold),
            _ => None,
        }
    }
}

impl Default for LiftMode {
    fn default() -> Self {
        Self::Hold
    }
}

bitflags! {
    /// Failure flags accumulated within one cycle.
    ///
    /// Every set bit corresponds to a failure that was recovered
    /// locally (neutral substitution, skipped auto-seek, continued
    /// dispatch). Cleared at the start of each cycle; the diagnostics
    /// record carries the packed bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CycleFaults: u32 {
        /// Driver gamepad read failed; neutral sample substituted.
        const DRIVER_INPUT = 1 << 0;
        /// Operator gamepad read failed; neutral sample substituted.
        const OPERATOR_INPUT = 1 << 1;
        /// Lift position sensor read failed; automatic seek suppressed.
        const LIFT_SENSOR = 1 << 2;
        /// One or more actuator writes failed; remaining writes continued.
        const ACTUATOR_WRITE = 1 << 3;
        /// Telemetry emission failed; snapshot dropped.
        const TELEMETRY = 1 << 4;
    }
}

/// Structured snapshot of key loop variables, emitted at a throttled
/// interval through a [`TelemetrySink`](super::capability::TelemetrySink).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsRecord {
    /// Lift position sensor reading [sensor units].
    pub distance: i32,
    /// Selected stage target [sensor units].
    pub desired_distance: i32,
    /// Index of the selected stage.
    pub stage_index: u8,
    /// Lift power commanded this cycle [-1, 1].
    pub lift_power: f64,
    /// Lift arbitration outcome this cycle.
    pub lift_mode: LiftMode,
    /// Packed [`CycleFaults`] bits observed this cycle.
    pub faults: u32,
}
