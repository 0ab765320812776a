//! Per-cycle orchestration: read → process → write.
//!
//! `TeleopCycle` owns the persistent cross-cycle state (stage selector,
//! diagnostics timer, pending fault set) and the injected hardware
//! capabilities. The decision core itself ([`plan_cycle`]) is a pure
//! function of the fresh inputs, so every control property is testable
//! without devices.
//!
//! `run_cycle` is the single entry point invoked once per fixed period
//! by the scheduling harness. It never blocks and never fails: every
//! capability error degrades to a safe zero-motion default and is
//! reported through the throttled diagnostics record.

use std::time::Duration;

use atlas_common::hal::capability::{InputSource, PositionSource, TelemetrySink};
use atlas_common::hal::types::{CycleFaults, DiagnosticsRecord};
use tracing::{debug, warn};

use crate::config::TeleopConfig;
use crate::diagnostics::{emit_best_effort, DiagnosticsTimer};
use crate::dispatch::{Actuators, CyclePlan, SolenoidPlan};
use crate::drive::{arcade, rear_drive, DriveConfig};
use crate::lift::{rear_lift_power, LiftController};
use crate::snapshot::{sample_controllers, ControllerSnapshot};
use crate::stage::{StageAction, StageSelector};

/// The injected hardware capabilities, one per device family.
pub struct Devices {
    /// Driver hand controller.
    pub driver_pad: Box<dyn InputSource>,
    /// Operator hand controller.
    pub operator_pad: Box<dyn InputSource>,
    /// Absolute lift position sensor.
    pub lift_sensor: Box<dyn PositionSource>,
    /// All actuator outputs.
    pub actuators: Actuators,
    /// Diagnostics output.
    pub telemetry: Box<dyn TelemetrySink>,
}

/// Compute the complete actuator plan for one cycle.
///
/// Pure function of the snapshot, the (possibly unavailable) sensor
/// reading, and the selected stage target.
pub fn plan_cycle(
    drive_config: &DriveConfig,
    lift: &LiftController,
    snapshot: &ControllerSnapshot,
    distance: Option<i32>,
    desired_distance: i32,
) -> CyclePlan {
    CyclePlan {
        drive: arcade(snapshot.throttle, snapshot.steer, drive_config),
        rear_drive: rear_drive(snapshot.fwd_trigger, snapshot.rev_trigger),
        lift: lift.command(
            snapshot.lift_axis,
            snapshot.stall_button,
            distance,
            desired_distance,
        ),
        rear_lift: rear_lift_power(snapshot.rear_lift_axis),
        solenoids: SolenoidPlan::from_buttons(
            snapshot.shift_button,
            snapshot.fire_button,
            snapshot.unlock_button,
        ),
    }
}

/// The teleoperation control loop core.
pub struct TeleopCycle {
    config: TeleopConfig,
    lift: LiftController,
    selector: StageSelector,
    diag_timer: DiagnosticsTimer,
    /// Faults observed since the last diagnostics emission.
    pending_faults: CycleFaults,
    devices: Devices,
}

impl TeleopCycle {
    /// Build the loop core from a validated configuration and the
    /// injected capabilities.
    pub fn new(config: TeleopConfig, devices: Devices) -> Self {
        let lift = LiftController::new(
            config.lift.deadband,
            config.lift.tolerance,
            config.lift.build_curve(),
        );
        let diag_timer =
            DiagnosticsTimer::new(Duration::from_millis(config.diagnostics.interval_ms));
        Self {
            config,
            lift,
            selector: StageSelector::new(),
            diag_timer,
            pending_faults: CycleFaults::empty(),
            devices,
        }
    }

    /// Current stage index.
    pub fn stage_index(&self) -> usize {
        self.selector.index()
    }

    /// Re-entry hook for a fresh teleop session: stage back to 0,
    /// edge latches and the diagnostics window cleared.
    pub fn reset(&mut self) {
        self.selector.reset();
        self.diag_timer.reset();
        self.pending_faults = CycleFaults::empty();
        debug!("teleop cycle state reset");
    }

    /// Execute one control cycle.
    ///
    /// `dt` is the elapsed time since the previous invocation, used
    /// only for diagnostics throttling.
    pub fn run_cycle(&mut self, dt: Duration) {
        // ═══ READ PHASE ═══
        let (snapshot, mut faults) = sample_controllers(
            self.devices.driver_pad.as_ref(),
            self.devices.operator_pad.as_ref(),
            &self.config.bindings,
        );

        let distance = match self.devices.lift_sensor.distance() {
            Ok(d) => Some(d),
            Err(e) => {
                warn!("lift sensor read failed: {e}");
                faults |= CycleFaults::LIFT_SENSOR;
                None
            }
        };

        // ═══ PROCESS PHASE ═══
        let table = &self.config.lift.stage_table;
        let action = self.selector.apply(
            snapshot.pov,
            snapshot.reset_button,
            table.len(),
            self.config.lift.stage_policy,
        );
        if let Some(StageAction::ZeroSensor) = action {
            if let Err(e) = self.devices.lift_sensor.zero() {
                warn!("lift sensor re-zero failed: {e}");
                faults |= CycleFaults::LIFT_SENSOR;
            }
        }

        // Invariant: the selector clamps against the validated,
        // non-empty table, so the index is always in range.
        let desired_distance = table[self.selector.index()];

        let plan = plan_cycle(
            &self.config.drive,
            &self.lift,
            &snapshot,
            distance,
            desired_distance,
        );

        // ═══ WRITE PHASE ═══
        faults |= self.devices.actuators.dispatch(&plan);
        self.pending_faults |= faults;

        if self.diag_timer.tick(dt) {
            let record = DiagnosticsRecord {
                distance: distance.unwrap_or(0),
                desired_distance,
                stage_index: self.selector.index() as u8,
                lift_power: plan.lift.power,
                lift_mode: plan.lift.mode,
                faults: self.pending_faults.bits(),
            };
            let telemetry_fault =
                emit_best_effort(self.devices.telemetry.as_mut(), &record);
            // The emitted record closes the fault window; a failed
            // emission carries over into the next one.
            self.pending_faults = telemetry_fault;
        }
    }
}
