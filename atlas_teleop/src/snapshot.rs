//! Per-cycle controller snapshot and input sampling.
//!
//! Defines `PovDirection`, `ControllerSnapshot`, and the sampler that
//! reads both gamepads into one immutable snapshot. A disconnected
//! device never fails the cycle: its half of the snapshot degrades to
//! all-neutral values and the corresponding fault flag is set.

use atlas_common::hal::capability::InputSource;
use atlas_common::hal::types::{CycleFaults, GamepadSample};
use tracing::warn;

use crate::config::Bindings;

/// Normalized directional-pad direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum PovDirection {
    /// Directional pad not pressed.
    #[default]
    None = 0,
    /// Pressed at exactly 0° (north).
    Up = 1,
    /// Pressed at exactly 180° (south).
    Down = 2,
    /// Pressed at any other angle.
    Other = 3,
}

impl PovDirection {
    /// Normalize a raw directional-pad angle.
    ///
    /// `Up` iff the raw angle is exactly 0°, `Down` iff exactly 180°;
    /// any other pressed angle is `Other`.
    #[inline]
    pub const fn from_degrees(degrees: Option<u16>) -> Self {
        match degrees {
            None => Self::None,
            Some(0) => Self::Up,
            Some(180) => Self::Down,
            Some(_) => Self::Other,
        }
    }
}

/// Immutable per-cycle view of both hand controllers.
///
/// Constructed at cycle start, discarded at cycle end; never shared
/// across cycles. Axis values are clamped to their declared ranges on
/// ingest.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControllerSnapshot {
    /// Forward/backward drive axis [-1, 1].
    pub throttle: f64,
    /// Turn axis [-1, 1].
    pub steer: f64,
    /// Manual lift axis [-1, 1].
    pub lift_axis: f64,
    /// Manual rear-lift axis [-1, 1].
    pub rear_lift_axis: f64,
    /// Rear-drive forward trigger [0, 1].
    pub fwd_trigger: f64,
    /// Rear-drive reverse trigger [0, 1].
    pub rev_trigger: f64,
    /// Gear shift solenoid condition.
    pub shift_button: bool,
    /// Manual lift stall hold.
    pub stall_button: bool,
    /// Mechanism fire solenoid condition.
    pub fire_button: bool,
    /// Mechanism unlock solenoid condition.
    pub unlock_button: bool,
    /// Lift sensor re-zero request.
    pub reset_button: bool,
    /// Normalized directional-pad direction.
    pub pov: PovDirection,
}

/// Sample both gamepads into a snapshot.
///
/// A failed device read substitutes [`GamepadSample::default()`] and
/// sets the matching fault flag; the cycle always gets a complete
/// snapshot.
pub fn sample_controllers(
    driver: &dyn InputSource,
    operator: &dyn InputSource,
    bindings: &Bindings,
) -> (ControllerSnapshot, CycleFaults) {
    let mut faults = CycleFaults::empty();

    let driver_sample = driver.sample().unwrap_or_else(|e| {
        warn!("driver gamepad read failed: {e}");
        faults |= CycleFaults::DRIVER_INPUT;
        GamepadSample::default()
    });
    let operator_sample = operator.sample().unwrap_or_else(|e| {
        warn!("operator gamepad read failed: {e}");
        faults |= CycleFaults::OPERATOR_INPUT;
        GamepadSample::default()
    });

    (
        build_snapshot(&driver_sample, &operator_sample, bindings),
        faults,
    )
}

/// Assemble a snapshot from two raw samples using the configured
/// axis/button bindings.
pub fn build_snapshot(
    driver: &GamepadSample,
    operator: &GamepadSample,
    bindings: &Bindings,
) -> ControllerSnapshot {
    ControllerSnapshot {
        throttle: bipolar(driver, bindings.throttle_axis),
        steer: bipolar(driver, bindings.steer_axis),
        lift_axis: bipolar(operator, bindings.lift_axis),
        rear_lift_axis: bipolar(operator, bindings.rear_lift_axis),
        fwd_trigger: unipolar(driver, bindings.fwd_trigger_axis),
        rev_trigger: unipolar(driver, bindings.rev_trigger_axis),
        shift_button: button(driver, bindings.shift_button),
        stall_button: button(operator, bindings.stall_button),
        fire_button: button(operator, bindings.fire_button),
        unlock_button: button(operator, bindings.unlock_button),
        reset_button: button(operator, bindings.reset_button),
        pov: PovDirection::from_degrees(operator.pov_degrees),
    }
}

/// Read a bipolar axis, clamped to [-1, 1]. Out-of-range bindings
/// read neutral.
#[inline]
fn bipolar(sample: &GamepadSample, index: usize) -> f64 {
    sample
        .axes
        .get(index)
        .copied()
        .unwrap_or(0.0)
        .clamp(-1.0, 1.0)
}

/// Read a one-directional trigger axis, clamped to [0, 1].
#[inline]
fn unipolar(sample: &GamepadSample, index: usize) -> f64 {
    sample
        .axes
        .get(index)
        .copied()
        .unwrap_or(0.0)
        .clamp(0.0, 1.0)
}

/// Read a button level. Out-of-range bindings read released.
#[inline]
fn button(sample: &GamepadSample, index: usize) -> bool {
    sample.buttons.get(index).copied().unwrap_or(false)
}
