//! Simulation capability implementations.
//!
//! Software stand-ins for every hardware capability, used by the host
//! binary's demo mode and by the test suites. Shared handles use
//! `Rc<RefCell<_>>`: the control loop is single-threaded by design, so
//! scripts and assertions can hold a clone of the same device the
//! cycle drives.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use atlas_common::hal::capability::{
    HalError, InputSource, PositionSource, PowerSink, SolenoidSink, TelemetrySink,
};
use atlas_common::hal::types::{DiagnosticsRecord, GamepadSample, SolenoidState};

// ─── Gamepad ────────────────────────────────────────────────────────

#[derive(Debug)]
struct PadState {
    sample: GamepadSample,
    connected: bool,
}

/// Scriptable gamepad.
///
/// Clones share the same underlying state; tests keep one clone to
/// script inputs while the cycle samples another.
#[derive(Debug, Clone)]
pub struct ScriptedGamepad {
    state: Rc<RefCell<PadState>>,
}

impl ScriptedGamepad {
    /// Create a connected, all-neutral gamepad.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(PadState {
                sample: GamepadSample::default(),
                connected: true,
            })),
        }
    }

    /// Set one raw axis value.
    pub fn set_axis(&self, index: usize, value: f64) {
        self.state.borrow_mut().sample.axes[index] = value;
    }

    /// Set one raw button level.
    pub fn set_button(&self, index: usize, pressed: bool) {
        self.state.borrow_mut().sample.buttons[index] = pressed;
    }

    /// Set the directional-pad angle (`None` = released).
    pub fn set_pov(&self, degrees: Option<u16>) {
        self.state.borrow_mut().sample.pov_degrees = degrees;
    }

    /// Connect or disconnect the device.
    pub fn set_connected(&self, connected: bool) {
        self.state.borrow_mut().connected = connected;
    }

    /// Return all inputs to neutral.
    pub fn release_all(&self) {
        self.state.borrow_mut().sample = GamepadSample::default();
    }
}

impl Default for ScriptedGamepad {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for ScriptedGamepad {
    fn sample(&self) -> Result<GamepadSample, HalError> {
        let state = self.state.borrow();
        if state.connected {
            Ok(state.sample)
        } else {
            Err(HalError::Disconnected("simulated gamepad".to_string()))
        }
    }
}

// ─── Lift plant ─────────────────────────────────────────────────────

#[derive(Debug)]
struct LiftPlantState {
    /// Position [sensor counts].
    position: f64,
    /// Last commanded power [-1, 1].
    power: f64,
    /// Full-power travel rate [counts/s].
    rate: f64,
    /// Simulate a dead sensor.
    failed: bool,
}

/// Simulated lift: one plant behind both the position sensor and the
/// power sink.
///
/// Position integrates the commanded power at the configured
/// full-power rate when [`advance`](Self::advance) is called, so a
/// closed-loop test drives the plant exactly as fast as the cycle
/// commands it.
#[derive(Debug, Clone)]
pub struct SimulatedLift {
    state: Rc<RefCell<LiftPlantState>>,
}

impl SimulatedLift {
    /// Create a plant at position 0 with the given full-power rate
    /// [counts/s].
    pub fn new(rate: f64) -> Self {
        Self {
            state: Rc::new(RefCell::new(LiftPlantState {
                position: 0.0,
                power: 0.0,
                rate,
                failed: false,
            })),
        }
    }

    /// Integrate the last commanded power over `dt`.
    pub fn advance(&self, dt: Duration) {
        let mut state = self.state.borrow_mut();
        state.position += state.power * state.rate * dt.as_secs_f64();
    }

    /// Current position [sensor counts].
    pub fn position(&self) -> i32 {
        self.state.borrow().position as i32
    }

    /// Force the position for test setup.
    pub fn set_position(&self, position: i32) {
        self.state.borrow_mut().position = position as f64;
    }

    /// Last commanded power.
    pub fn power(&self) -> f64 {
        self.state.borrow().power
    }

    /// Make sensor reads fail (the power sink keeps working).
    pub fn set_failed(&self, failed: bool) {
        self.state.borrow_mut().failed = failed;
    }
}

impl PositionSource for SimulatedLift {
    fn distance(&self) -> Result<i32, HalError> {
        let state = self.state.borrow();
        if state.failed {
            Err(HalError::ReadFailed("simulated lift sensor".to_string()))
        } else {
            Ok(state.position as i32)
        }
    }

    fn zero(&mut self) -> Result<(), HalError> {
        self.state.borrow_mut().position = 0.0;
        Ok(())
    }
}

impl PowerSink for SimulatedLift {
    fn set_power(&mut self, power: f64) -> Result<(), HalError> {
        self.state.borrow_mut().power = power.clamp(-1.0, 1.0);
        Ok(())
    }
}

// ─── Recording sinks ────────────────────────────────────────────────

/// Power sink that appends every command to a shared log.
#[derive(Debug)]
pub struct RecordingPowerSink {
    log: Rc<RefCell<Vec<f64>>>,
}

impl RecordingPowerSink {
    /// Create the sink and the shared command log.
    pub fn new() -> (Self, Rc<RefCell<Vec<f64>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        (Self { log: log.clone() }, log)
    }
}

impl PowerSink for RecordingPowerSink {
    fn set_power(&mut self, power: f64) -> Result<(), HalError> {
        self.log.borrow_mut().push(power.clamp(-1.0, 1.0));
        Ok(())
    }
}

/// Solenoid sink that appends every commanded state to a shared log.
#[derive(Debug)]
pub struct RecordingSolenoidSink {
    log: Rc<RefCell<Vec<SolenoidState>>>,
}

impl RecordingSolenoidSink {
    /// Create the sink and the shared command log.
    pub fn new() -> (Self, Rc<RefCell<Vec<SolenoidState>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        (Self { log: log.clone() }, log)
    }
}

impl SolenoidSink for RecordingSolenoidSink {
    fn set_state(&mut self, state: SolenoidState) -> Result<(), HalError> {
        self.log.borrow_mut().push(state);
        Ok(())
    }
}

/// Power sink that traces every command, for demo rigs where nothing
/// consumes the output.
#[derive(Debug)]
pub struct TracePowerSink {
    name: &'static str,
}

impl TracePowerSink {
    /// Create a named trace sink.
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl PowerSink for TracePowerSink {
    fn set_power(&mut self, power: f64) -> Result<(), HalError> {
        tracing::trace!("{}: power {:+.3}", self.name, power.clamp(-1.0, 1.0));
        Ok(())
    }
}

/// Solenoid sink that traces every commanded state.
#[derive(Debug)]
pub struct TraceSolenoidSink {
    name: &'static str,
}

impl TraceSolenoidSink {
    /// Create a named trace sink.
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl SolenoidSink for TraceSolenoidSink {
    fn set_state(&mut self, state: SolenoidState) -> Result<(), HalError> {
        tracing::trace!("{}: {:?}", self.name, state);
        Ok(())
    }
}

/// Telemetry sink that collects every emitted record.
#[derive(Debug)]
pub struct VecTelemetry {
    records: Rc<RefCell<Vec<DiagnosticsRecord>>>,
}

impl VecTelemetry {
    /// Create the sink and the shared record log.
    pub fn new() -> (Self, Rc<RefCell<Vec<DiagnosticsRecord>>>) {
        let records = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                records: records.clone(),
            },
            records,
        )
    }
}

impl TelemetrySink for VecTelemetry {
    fn emit(&mut self, record: &DiagnosticsRecord) -> Result<(), HalError> {
        self.records.borrow_mut().push(*record);
        Ok(())
    }
}
