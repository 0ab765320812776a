//! Drive mapping for the main drivetrain and the auxiliary rear drive.
//!
//! Pure functions of the snapshot — no state, no error paths. Arcade
//! mapping mixes throttle and steer into left/right wheel powers; the
//! rear drive resolves a forward/reverse trigger pair into one signed
//! power.

use serde::{Deserialize, Serialize};

/// Left/right wheel power for the differential drivetrain.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DriveCommand {
    /// Left wheel power [-1, 1].
    pub left: f64,
    /// Right wheel power [-1, 1].
    pub right: f64,
}

/// Per-wheel wiring inversion flags.
///
/// Motors on opposite sides of a differential drivetrain typically
/// spin in opposite directions for forward travel; these flags absorb
/// the physical wiring so the mapping itself stays sign-clean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Negate the left wheel command.
    #[serde(default)]
    pub invert_left: bool,
    /// Negate the right wheel command.
    #[serde(default = "default_invert_right")]
    pub invert_right: bool,
}

fn default_invert_right() -> bool {
    true
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            invert_left: false,
            invert_right: true,
        }
    }
}

/// Clamp a wheel or mechanism power to the normalized command range.
#[inline]
pub fn clamp_unit(power: f64) -> f64 {
    power.clamp(-1.0, 1.0)
}

/// Arcade mapping: one forward/back axis plus one turn axis.
///
/// `left = clamp(throttle + steer)`, `right = clamp(throttle - steer)`,
/// then per-wheel inversion from the wiring flags.
pub fn arcade(throttle: f64, steer: f64, config: &DriveConfig) -> DriveCommand {
    let left = clamp_unit(throttle + steer);
    let right = clamp_unit(throttle - steer);
    DriveCommand {
        left: if config.invert_left { -left } else { left },
        right: if config.invert_right { -right } else { right },
    }
}

/// Resolve the rear-drive trigger pair into one signed power.
///
/// The dominant trigger wins; an exact tie drives forward.
#[inline]
pub fn rear_drive(fwd_trigger: f64, rev_trigger: f64) -> f64 {
    if fwd_trigger >= rev_trigger {
        fwd_trigger
    } else {
        -rev_trigger
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uninverted() -> DriveConfig {
        DriveConfig {
            invert_left: false,
            invert_right: false,
        }
    }

    #[test]
    fn arcade_straight_ahead() {
        let cmd = arcade(0.5, 0.0, &uninverted());
        assert_eq!(cmd.left, 0.5);
        assert_eq!(cmd.right, 0.5);
    }

    #[test]
    fn arcade_turn_in_place() {
        let cmd = arcade(0.0, 0.6, &uninverted());
        assert_eq!(cmd.left, 0.6);
        assert_eq!(cmd.right, -0.6);
    }

    #[test]
    fn arcade_clamps_to_unit_range() {
        // Sweep the full input square; outputs must stay in [-1, 1].
        let config = uninverted();
        let mut v = -1.0;
        while v <= 1.0 {
            let mut w = -1.0;
            while w <= 1.0 {
                let cmd = arcade(v, w, &config);
                assert!(cmd.left >= -1.0 && cmd.left <= 1.0, "left for ({v}, {w})");
                assert!(cmd.right >= -1.0 && cmd.right <= 1.0, "right for ({v}, {w})");
                w += 0.125;
            }
            v += 0.125;
        }

        let saturated = arcade(1.0, 1.0, &config);
        assert_eq!(saturated.left, 1.0);
        assert_eq!(saturated.right, 0.0);
    }

    #[test]
    fn arcade_applies_wiring_inversion() {
        let config = DriveConfig {
            invert_left: false,
            invert_right: true,
        };
        let cmd = arcade(0.5, 0.0, &config);
        assert_eq!(cmd.left, 0.5);
        assert_eq!(cmd.right, -0.5);
    }

    #[test]
    fn rear_drive_dominant_trigger_wins() {
        assert_eq!(rear_drive(0.8, 0.1), 0.8);
        assert_eq!(rear_drive(0.1, 0.8), -0.8);
        assert_eq!(rear_drive(0.0, 0.0), 0.0);
    }

    #[test]
    fn rear_drive_tie_breaks_forward() {
        assert_eq!(rear_drive(0.3, 0.3), 0.3);
    }
}
