//! Actuator dispatch: the write phase of the cycle.
//!
//! Every power and solenoid command is written unconditionally every
//! cycle — the external safety watchdog is what cuts power on stale
//! commands, not this core. A failed write is logged, flagged, and
//! never aborts the remaining writes.

use atlas_common::hal::capability::{PowerSink, SolenoidSink};
use atlas_common::hal::types::{CycleFaults, SolenoidState};
use tracing::warn;

use crate::drive::DriveCommand;
use crate::lift::LiftCommand;

/// Commanded states for the three double-acting solenoids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolenoidPlan {
    /// Drivetrain gear shifter.
    pub shifter: SolenoidState,
    /// Mechanism fire.
    pub fire: SolenoidState,
    /// Mechanism unlock.
    pub unlock: SolenoidState,
}

impl SolenoidPlan {
    /// Derive all solenoid states from their button conditions.
    #[inline]
    pub const fn from_buttons(shift: bool, fire: bool, unlock: bool) -> Self {
        Self {
            shifter: SolenoidState::from_condition(shift),
            fire: SolenoidState::from_condition(fire),
            unlock: SolenoidState::from_condition(unlock),
        }
    }
}

/// Complete set of actuator commands derived in one cycle.
///
/// Stateless: rebuilt from fresh inputs every cycle, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CyclePlan {
    /// Differential drivetrain command.
    pub drive: DriveCommand,
    /// Auxiliary rear drive power [-1, 1].
    pub rear_drive: f64,
    /// Lift command with its arbitration outcome.
    pub lift: LiftCommand,
    /// Rear-lift power [-1, 1].
    pub rear_lift: f64,
    /// Solenoid states.
    pub solenoids: SolenoidPlan,
}

/// The injected actuator capabilities, grouped for dispatch.
pub struct Actuators {
    /// Left drivetrain side.
    pub left_drive: Box<dyn PowerSink>,
    /// Right drivetrain side.
    pub right_drive: Box<dyn PowerSink>,
    /// Auxiliary rear drive.
    pub rear_drive: Box<dyn PowerSink>,
    /// Lift axis.
    pub lift: Box<dyn PowerSink>,
    /// Rear-lift axis.
    pub rear_lift: Box<dyn PowerSink>,
    /// Gear shift solenoid.
    pub shifter: Box<dyn SolenoidSink>,
    /// Mechanism fire solenoid.
    pub fire: Box<dyn SolenoidSink>,
    /// Mechanism unlock solenoid.
    pub unlock: Box<dyn SolenoidSink>,
}

impl Actuators {
    /// Write the full plan to every sink.
    ///
    /// Returns `ACTUATOR_WRITE` if any individual write failed.
    pub fn dispatch(&mut self, plan: &CyclePlan) -> CycleFaults {
        let mut failed = false;

        for (name, sink, power) in [
            ("left_drive", &mut self.left_drive, plan.drive.left),
            ("right_drive", &mut self.right_drive, plan.drive.right),
            ("rear_drive", &mut self.rear_drive, plan.rear_drive),
            ("lift", &mut self.lift, plan.lift.power),
            ("rear_lift", &mut self.rear_lift, plan.rear_lift),
        ] {
            if let Err(e) = sink.set_power(power) {
                warn!("{name} power write failed: {e}");
                failed = true;
            }
        }

        for (name, sink, state) in [
            ("shifter", &mut self.shifter, plan.solenoids.shifter),
            ("fire", &mut self.fire, plan.solenoids.fire),
            ("unlock", &mut self.unlock, plan.solenoids.unlock),
        ] {
            if let Err(e) = sink.set_state(state) {
                warn!("{name} solenoid write failed: {e}");
                failed = true;
            }
        }

        if failed {
            CycleFaults::ACTUATOR_WRITE
        } else {
            CycleFaults::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{RecordingPowerSink, RecordingSolenoidSink};
    use atlas_common::hal::capability::HalError;
    use atlas_common::hal::types::LiftMode;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct BrokenPowerSink;

    impl PowerSink for BrokenPowerSink {
        fn set_power(&mut self, _power: f64) -> Result<(), HalError> {
            Err(HalError::WriteFailed("bus off".to_string()))
        }
    }

    fn plan() -> CyclePlan {
        CyclePlan {
            drive: DriveCommand {
                left: 0.5,
                right: -0.5,
            },
            rear_drive: 0.3,
            lift: LiftCommand {
                power: 0.8,
                mode: LiftMode::Auto,
            },
            rear_lift: -0.2,
            solenoids: SolenoidPlan::from_buttons(true, false, false),
        }
    }

    fn rig() -> (
        Actuators,
        Rc<RefCell<Vec<f64>>>,
        Rc<RefCell<Vec<SolenoidState>>>,
    ) {
        let (left, left_log) = RecordingPowerSink::new();
        let (shifter, shifter_log) = RecordingSolenoidSink::new();
        let actuators = Actuators {
            left_drive: Box::new(left),
            right_drive: Box::new(RecordingPowerSink::new().0),
            rear_drive: Box::new(RecordingPowerSink::new().0),
            lift: Box::new(RecordingPowerSink::new().0),
            rear_lift: Box::new(RecordingPowerSink::new().0),
            shifter: Box::new(shifter),
            fire: Box::new(RecordingSolenoidSink::new().0),
            unlock: Box::new(RecordingSolenoidSink::new().0),
        };
        (actuators, left_log, shifter_log)
    }

    #[test]
    fn solenoid_plan_from_buttons() {
        let plan = SolenoidPlan::from_buttons(true, false, true);
        assert_eq!(plan.shifter, SolenoidState::Forward);
        assert_eq!(plan.fire, SolenoidState::Reverse);
        assert_eq!(plan.unlock, SolenoidState::Forward);
    }

    #[test]
    fn dispatch_writes_everything() {
        let (mut actuators, left_log, shifter_log) = rig();
        let faults = actuators.dispatch(&plan());
        assert!(faults.is_empty());
        assert_eq!(left_log.borrow().as_slice(), [0.5]);
        assert_eq!(shifter_log.borrow().as_slice(), [SolenoidState::Forward]);
    }

    #[test]
    fn dispatch_continues_past_failed_writes() {
        let (mut actuators, left_log, shifter_log) = rig();
        actuators.rear_drive = Box::new(BrokenPowerSink);

        let faults = actuators.dispatch(&plan());
        assert_eq!(faults, CycleFaults::ACTUATOR_WRITE);
        // Writes before and after the failure still landed.
        assert_eq!(left_log.borrow().len(), 1);
        assert_eq!(shifter_log.borrow().len(), 1);
    }

    #[test]
    fn dispatch_every_cycle_is_unconditional() {
        let (mut actuators, left_log, shifter_log) = rig();
        for _ in 0..3 {
            actuators.dispatch(&plan());
        }
        assert_eq!(left_log.borrow().len(), 3);
        assert_eq!(shifter_log.borrow().len(), 3);
    }
}
