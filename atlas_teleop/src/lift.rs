//! Lift control: manual override vs. automatic staged-position seek.
//!
//! The arbitration is priority-ordered and re-evaluated from fresh
//! inputs every cycle — manual always preempts automatic:
//!
//! 1. **Manual** — stick outside the deadband, or stall button held.
//! 2. **Auto** — position error outside the tolerance window.
//! 3. **Hold** — within tolerance, or no usable sensor reading.
//!
//! A stale or unavailable sensor reading fails safe: automatic seek is
//! suppressed for the cycle (never extrapolated), while the operator's
//! direct command remains available.

use atlas_common::hal::types::LiftMode;

use crate::curve::ErrorToPowerCurve;
use crate::drive::clamp_unit;

/// Derived lift command, recomputed every cycle and never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiftCommand {
    /// Normalized lift power [-1, 1].
    pub power: f64,
    /// Arbitration outcome.
    pub mode: LiftMode,
}

impl LiftCommand {
    /// Zero-power hold command.
    #[inline]
    pub const fn hold() -> Self {
        Self {
            power: 0.0,
            mode: LiftMode::Hold,
        }
    }
}

/// Lift arbitration with its tuning and seek curve.
pub struct LiftController {
    /// Stick magnitude below which manual input is ignored.
    deadband: f64,
    /// Position error magnitude [sensor units] considered "arrived".
    tolerance: i32,
    /// Error-to-power curve for automatic seeking.
    curve: Box<dyn ErrorToPowerCurve>,
}

impl LiftController {
    /// Create a controller from validated tuning values.
    pub fn new(deadband: f64, tolerance: i32, curve: Box<dyn ErrorToPowerCurve>) -> Self {
        Self {
            deadband,
            tolerance,
            curve,
        }
    }

    /// Arbitrate one cycle of lift control.
    ///
    /// `distance` is `None` when the sensor read failed this cycle.
    pub fn command(
        &self,
        lift_axis: f64,
        stall_held: bool,
        distance: Option<i32>,
        desired_distance: i32,
    ) -> LiftCommand {
        // Manual override: the stick sign is negated per wiring, so
        // pulling back raises the lift.
        if lift_axis.abs() > self.deadband || stall_held {
            return LiftCommand {
                power: clamp_unit(-lift_axis),
                mode: LiftMode::Manual,
            };
        }

        // Automatic seek, only with a live sensor reading.
        if let Some(distance) = distance {
            let error = desired_distance - distance;
            if error.abs() > self.tolerance {
                return LiftCommand {
                    power: clamp_unit(self.curve.power(error as f64)),
                    mode: LiftMode::Auto,
                };
            }
        }

        LiftCommand::hold()
    }
}

/// Rear-lift axis: always direct-mapped, manual only.
#[inline]
pub fn rear_lift_power(rear_lift_axis: f64) -> f64 {
    clamp_unit(-rear_lift_axis)
}
