//! Position-error to power curves for the lift's automatic seek.
//!
//! A curve must be bounded, monotonic, odd-symmetric, continuous
//! through zero, and saturate at ±1. Two interchangeable tunings are
//! provided behind one interface: linear clamp-and-scale (default) and
//! a logistic curve recentred to odd symmetry.

use serde::{Deserialize, Serialize};

/// Strategy interface mapping a position error [sensor units] to a
/// normalized power command.
pub trait ErrorToPowerCurve {
    /// Compute the power command for the given position error.
    ///
    /// The result is always within [-1, 1].
    fn power(&self, error: f64) -> f64;
}

/// Curve selector for configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CurveKind {
    /// [`LinearClamp`] — clamp(error/scale) * gain.
    #[default]
    Linear,
    /// [`Sigmoid`] — logistic curve, softer near the target.
    Sigmoid,
}

/// Linear clamp-and-scale curve.
///
/// `power = clamp(error / scale, -1, 1) * gain`. Saturates at ±gain;
/// `gain` doubles as the overall output ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearClamp {
    /// Error magnitude [sensor units] at which the curve saturates.
    pub scale: f64,
    /// Output ceiling applied after clamping.
    pub gain: f64,
}

impl ErrorToPowerCurve for LinearClamp {
    #[inline]
    fn power(&self, error: f64) -> f64 {
        (error / self.scale).clamp(-1.0, 1.0) * self.gain
    }
}

/// Logistic curve recentred to odd symmetry.
///
/// `power = 2 / (1 + e^(-error/scale)) - 1`. Approaches ±1
/// asymptotically and is steepest through zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sigmoid {
    /// Error magnitude [sensor units] controlling the slope at zero.
    pub scale: f64,
}

impl ErrorToPowerCurve for Sigmoid {
    #[inline]
    fn power(&self, error: f64) -> f64 {
        2.0 / (1.0 + (-error / self.scale).exp()) - 1.0
    }
}
