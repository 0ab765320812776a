//! Teleop configuration: TOML sections, defaults, and validation.
//!
//! Every tuning value the control core consumes is a named,
//! overridable constant here. All sections except `[shared]` carry
//! full serde defaults, so a minimal config is just a service name.
//! `validate()` runs once at startup; the core never sees an invalid
//! configuration.

use serde::{Deserialize, Serialize};

use atlas_common::config::{ConfigError, SharedConfig};
use atlas_common::consts::{
    CYCLE_PERIOD_MS, DIAGNOSTICS_INTERVAL_MS, MAX_GAMEPAD_AXES, MAX_GAMEPAD_BUTTONS,
};

use crate::curve::{CurveKind, ErrorToPowerCurve, LinearClamp, Sigmoid};
use crate::drive::DriveConfig;
use crate::stage::{StagePolicy, StageTable};

/// Default manual-override deadband.
pub const DEADBAND_DEFAULT: f64 = 0.2;

/// Default "arrived" window [sensor units].
pub const TOLERANCE_DEFAULT: i32 = 200;

/// Default linear-curve saturation scale [sensor units].
pub const SCALE_DEFAULT: f64 = 1024.0;

/// Default seek output ceiling.
pub const GAIN_DEFAULT: f64 = 0.8;

/// Default sigmoid slope scale [sensor units].
pub const SIGMOID_SCALE_DEFAULT: f64 = 100.0;

/// Top-level teleop configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeleopConfig {
    /// Common service fields (log level, instance name).
    pub shared: SharedConfig,
    /// Control loop pacing.
    #[serde(default)]
    pub cycle: CycleConfig,
    /// Drivetrain wiring flags.
    #[serde(default)]
    pub drive: DriveConfig,
    /// Lift tuning and stage table.
    #[serde(default)]
    pub lift: LiftConfig,
    /// Diagnostics throttling.
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
    /// Gamepad axis/button bindings.
    #[serde(default)]
    pub bindings: Bindings,
}

impl TeleopConfig {
    /// Validate all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.cycle.validate()?;
        self.lift.validate()?;
        self.diagnostics.validate()?;
        self.bindings.validate()?;
        Ok(())
    }
}

impl Default for TeleopConfig {
    fn default() -> Self {
        Self {
            shared: SharedConfig {
                log_level: Default::default(),
                service_name: "atlas-teleop".to_string(),
            },
            cycle: CycleConfig::default(),
            drive: DriveConfig::default(),
            lift: LiftConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
            bindings: Bindings::default(),
        }
    }
}

/// Control loop pacing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Fixed cycle period [ms].
    #[serde(default = "default_period_ms")]
    pub period_ms: u64,
}

fn default_period_ms() -> u64 {
    CYCLE_PERIOD_MS
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            period_ms: CYCLE_PERIOD_MS,
        }
    }
}

impl CycleConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.period_ms == 0 {
            return Err(ConfigError::ValidationError(
                "cycle.period_ms must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Lift tuning: arbitration thresholds, seek curve, and stage table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiftConfig {
    /// Stick magnitude below which manual input is ignored.
    #[serde(default = "default_deadband")]
    pub deadband: f64,
    /// Position error magnitude considered "arrived" [sensor units].
    #[serde(default = "default_tolerance")]
    pub tolerance: i32,
    /// Linear-curve saturation scale [sensor units].
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Seek output ceiling (linear curve).
    #[serde(default = "default_gain")]
    pub gain: f64,
    /// Which seek curve to use.
    #[serde(default)]
    pub curve: CurveKind,
    /// Sigmoid slope scale [sensor units] (sigmoid curve only).
    #[serde(default = "default_sigmoid_scale")]
    pub sigmoid_scale: f64,
    /// Ordered stage targets [sensor units].
    #[serde(default = "default_stage_table")]
    pub stage_table: StageTable,
    /// Directional-pad stage policy.
    #[serde(default)]
    pub stage_policy: StagePolicy,
}

fn default_deadband() -> f64 {
    DEADBAND_DEFAULT
}
fn default_tolerance() -> i32 {
    TOLERANCE_DEFAULT
}
fn default_scale() -> f64 {
    SCALE_DEFAULT
}
fn default_gain() -> f64 {
    GAIN_DEFAULT
}
fn default_sigmoid_scale() -> f64 {
    SIGMOID_SCALE_DEFAULT
}

fn default_stage_table() -> StageTable {
    let mut table = StageTable::new();
    let _ = table.push(0);
    let _ = table.push(26000);
    table
}

impl Default for LiftConfig {
    fn default() -> Self {
        Self {
            deadband: DEADBAND_DEFAULT,
            tolerance: TOLERANCE_DEFAULT,
            scale: SCALE_DEFAULT,
            gain: GAIN_DEFAULT,
            curve: CurveKind::default(),
            sigmoid_scale: SIGMOID_SCALE_DEFAULT,
            stage_table: default_stage_table(),
            stage_policy: StagePolicy::default(),
        }
    }
}

impl LiftConfig {
    /// Build the configured seek curve.
    pub fn build_curve(&self) -> Box<dyn ErrorToPowerCurve> {
        match self.curve {
            CurveKind::Linear => Box::new(LinearClamp {
                scale: self.scale,
                gain: self.gain,
            }),
            CurveKind::Sigmoid => Box::new(Sigmoid {
                scale: self.sigmoid_scale,
            }),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.deadband) {
            return Err(ConfigError::ValidationError(format!(
                "lift.deadband must be in [0, 1), got {}",
                self.deadband
            )));
        }
        if self.tolerance <= 0 {
            return Err(ConfigError::ValidationError(format!(
                "lift.tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.scale <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "lift.scale must be positive, got {}",
                self.scale
            )));
        }
        if !(0.0..=1.0).contains(&self.gain) || self.gain == 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "lift.gain must be in (0, 1], got {}",
                self.gain
            )));
        }
        if self.sigmoid_scale <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "lift.sigmoid_scale must be positive, got {}",
                self.sigmoid_scale
            )));
        }
        if self.stage_table.is_empty() {
            return Err(ConfigError::ValidationError(
                "lift.stage_table must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Diagnostics throttling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Minimum interval between emissions [ms].
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_interval_ms() -> u64 {
    DIAGNOSTICS_INTERVAL_MS
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            interval_ms: DIAGNOSTICS_INTERVAL_MS,
        }
    }
}

impl DiagnosticsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "diagnostics.interval_ms must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Gamepad bindings: logical control roles resolved to raw indices.
///
/// Axes index into the driver or operator sample as annotated; one
/// binding table covers both devices.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bindings {
    /// Driver: forward/backward drive axis.
    #[serde(default = "default_throttle_axis")]
    pub throttle_axis: usize,
    /// Driver: turn axis.
    #[serde(default = "default_steer_axis")]
    pub steer_axis: usize,
    /// Driver: rear-drive forward trigger axis.
    #[serde(default = "default_fwd_trigger_axis")]
    pub fwd_trigger_axis: usize,
    /// Driver: rear-drive reverse trigger axis.
    #[serde(default = "default_rev_trigger_axis")]
    pub rev_trigger_axis: usize,
    /// Driver: gear shift button.
    #[serde(default = "default_shift_button")]
    pub shift_button: usize,
    /// Operator: manual lift axis.
    #[serde(default = "default_lift_axis")]
    pub lift_axis: usize,
    /// Operator: rear-lift axis.
    #[serde(default = "default_rear_lift_axis")]
    pub rear_lift_axis: usize,
    /// Operator: lift stall hold button.
    #[serde(default = "default_stall_button")]
    pub stall_button: usize,
    /// Operator: mechanism fire button.
    #[serde(default = "default_fire_button")]
    pub fire_button: usize,
    /// Operator: mechanism unlock button.
    #[serde(default = "default_unlock_button")]
    pub unlock_button: usize,
    /// Operator: sensor re-zero button.
    #[serde(default = "default_reset_button")]
    pub reset_button: usize,
}

fn default_throttle_axis() -> usize {
    1
}
fn default_steer_axis() -> usize {
    4
}
fn default_fwd_trigger_axis() -> usize {
    3
}
fn default_rev_trigger_axis() -> usize {
    2
}
fn default_shift_button() -> usize {
    5
}
fn default_lift_axis() -> usize {
    1
}
fn default_rear_lift_axis() -> usize {
    5
}
fn default_stall_button() -> usize {
    5
}
fn default_fire_button() -> usize {
    0
}
fn default_unlock_button() -> usize {
    1
}
fn default_reset_button() -> usize {
    7
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            throttle_axis: default_throttle_axis(),
            steer_axis: default_steer_axis(),
            fwd_trigger_axis: default_fwd_trigger_axis(),
            rev_trigger_axis: default_rev_trigger_axis(),
            shift_button: default_shift_button(),
            lift_axis: default_lift_axis(),
            rear_lift_axis: default_rear_lift_axis(),
            stall_button: default_stall_button(),
            fire_button: default_fire_button(),
            unlock_button: default_unlock_button(),
            reset_button: default_reset_button(),
        }
    }
}

impl Bindings {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, index) in [
            ("bindings.throttle_axis", self.throttle_axis),
            ("bindings.steer_axis", self.steer_axis),
            ("bindings.fwd_trigger_axis", self.fwd_trigger_axis),
            ("bindings.rev_trigger_axis", self.rev_trigger_axis),
            ("bindings.lift_axis", self.lift_axis),
            ("bindings.rear_lift_axis", self.rear_lift_axis),
        ] {
            if index >= MAX_GAMEPAD_AXES {
                return Err(ConfigError::ValidationError(format!(
                    "{name} out of range: {index} >= {MAX_GAMEPAD_AXES}"
                )));
            }
        }
        for (name, index) in [
            ("bindings.shift_button", self.shift_button),
            ("bindings.stall_button", self.stall_button),
            ("bindings.fire_button", self.fire_button),
            ("bindings.unlock_button", self.unlock_button),
            ("bindings.reset_button", self.reset_button),
        ] {
            if index >= MAX_GAMEPAD_BUTTONS {
                return Err(ConfigError::ValidationError(format!(
                    "{name} out of range: {index} >= {MAX_GAMEPAD_BUTTONS}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_common::config::{ConfigLoader, LogLevel};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_validates() {
        assert!(TeleopConfig::default().validate().is_ok());
    }

    #[test]
    fn minimal_file_gets_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[shared]
service_name = "atlas-teleop-01"
"#
        )
        .unwrap();
        file.flush().unwrap();

        let config = TeleopConfig::load(file.path()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.cycle.period_ms, CYCLE_PERIOD_MS);
        assert_eq!(config.lift.deadband, DEADBAND_DEFAULT);
        assert_eq!(config.lift.tolerance, TOLERANCE_DEFAULT);
        assert_eq!(config.lift.stage_table.as_slice(), [0, 26000]);
        assert_eq!(config.lift.stage_policy, StagePolicy::Step);
        assert_eq!(config.lift.curve, CurveKind::Linear);
        assert!(config.drive.invert_right);
    }

    #[test]
    fn full_file_overrides_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[shared]
log_level = "debug"
service_name = "atlas-teleop-02"

[cycle]
period_ms = 10

[drive]
invert_left = true
invert_right = false

[lift]
deadband = 0.15
tolerance = 150
curve = "sigmoid"
sigmoid_scale = 80.0
stage_table = [0, 12000, 26000]
stage_policy = "jump"

[diagnostics]
interval_ms = 250

[bindings]
throttle_axis = 0
"#
        )
        .unwrap();
        file.flush().unwrap();

        let config = TeleopConfig::load(file.path()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.shared.log_level, LogLevel::Debug);
        assert_eq!(config.cycle.period_ms, 10);
        assert!(config.drive.invert_left);
        assert_eq!(config.lift.curve, CurveKind::Sigmoid);
        assert_eq!(config.lift.stage_table.as_slice(), [0, 12000, 26000]);
        assert_eq!(config.lift.stage_policy, StagePolicy::Jump);
        assert_eq!(config.bindings.throttle_axis, 0);
        assert_eq!(config.bindings.steer_axis, default_steer_axis());
    }

    #[test]
    fn invalid_tuning_is_rejected() {
        let mut config = TeleopConfig::default();
        config.lift.deadband = 1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        let mut config = TeleopConfig::default();
        config.lift.tolerance = 0;
        assert!(config.validate().is_err());

        let mut config = TeleopConfig::default();
        config.lift.gain = 0.0;
        assert!(config.validate().is_err());

        let mut config = TeleopConfig::default();
        config.lift.gain = 1.5;
        assert!(config.validate().is_err());

        let mut config = TeleopConfig::default();
        config.lift.stage_table.clear();
        assert!(config.validate().is_err());

        let mut config = TeleopConfig::default();
        config.cycle.period_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_binding_is_rejected() {
        let mut config = TeleopConfig::default();
        config.bindings.steer_axis = MAX_GAMEPAD_AXES;
        assert!(config.validate().is_err());

        let mut config = TeleopConfig::default();
        config.bindings.reset_button = MAX_GAMEPAD_BUTTONS;
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_stage_table_fails_to_parse() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[shared]
service_name = "atlas-teleop-03"

[lift]
stage_table = [0, 1, 2, 3, 4, 5, 6, 7, 8]
"#
        )
        .unwrap();
        file.flush().unwrap();

        assert!(matches!(
            TeleopConfig::load(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn lift_section_parses_standalone() {
        let lift: LiftConfig = toml::from_str("curve = \"sigmoid\"").unwrap();
        assert_eq!(lift.curve, CurveKind::Sigmoid);
        assert_eq!(lift.deadband, DEADBAND_DEFAULT);
        assert_eq!(lift.stage_table.as_slice(), [0, 26000]);
    }

    #[test]
    fn curve_builder_matches_kind() {
        let config = LiftConfig::default();
        let curve = config.build_curve();
        // Linear default saturates at exactly ±gain.
        assert!((curve.power(1e9) - GAIN_DEFAULT).abs() < 1e-9);

        let sigmoid_config = LiftConfig {
            curve: CurveKind::Sigmoid,
            ..LiftConfig::default()
        };
        let curve = sigmoid_config.build_curve();
        assert!(curve.power(1e9) > 0.999);
    }
}
