//! Hardware capability traits and error types.
//!
//! This module defines:
//! - `InputSource` trait - Gamepad sampling capability
//! - `PositionSource` trait - Absolute position feedback capability
//! - `PowerSink` trait - Normalized power output capability
//! - `SolenoidSink` trait - Double-acting solenoid output capability
//! - `TelemetrySink` trait - Structured diagnostics output capability
//! - `HalError` enum - Error type for capability operations
//!
//! The control core is constructed over these traits rather than
//! concrete device types, enabling one implementation per underlying
//! device family (real hardware, simulation, test doubles).

use thiserror::Error;

use crate::hal::types::{DiagnosticsRecord, GamepadSample, SolenoidState};

/// Error types for hardware capability operations.
///
/// Every variant is recoverable from the control core's point of view:
/// a failed read degrades to a neutral substitute and a failed write is
/// logged and skipped. Nothing here may halt the control cycle.
#[derive(Debug, Clone, Error)]
pub enum HalError {
    /// Device is not connected or has dropped off the bus.
    #[error("Device disconnected: {0}")]
    Disconnected(String),

    /// A read returned no usable value (stale or out-of-range sample).
    #[error("Read failed: {0}")]
    ReadFailed(String),

    /// A write was rejected by the underlying driver.
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// The device does not implement the requested operation.
    #[error("Operation not supported: {0}")]
    NotSupported(String),
}

/// Gamepad sampling capability.
///
/// One implementation per controller device family. A single `sample`
/// call captures the complete device state so the per-cycle snapshot is
/// internally consistent.
///
/// # Contract
///
/// - `sample` is a non-blocking best-effort read.
/// - A disconnected device returns `HalError::Disconnected`; the caller
///   substitutes [`GamepadSample::default()`] rather than failing the
///   cycle.
pub trait InputSource {
    /// Capture the current state of the device.
    fn sample(&self) -> Result<GamepadSample, HalError>;
}

/// Absolute position feedback capability for the lift axis.
pub trait PositionSource {
    /// Read the current position in signed sensor units.
    ///
    /// Non-blocking best-effort; a stale or unavailable reading returns
    /// `HalError::ReadFailed` and the caller fails safe (no motion).
    fn distance(&self) -> Result<i32, HalError>;

    /// Re-zero the external position reference at the current position.
    fn zero(&mut self) -> Result<(), HalError>;
}

/// Normalized power output capability.
///
/// Implementations accept values in [-1, 1] and clamp out-of-range
/// commands rather than rejecting them.
pub trait PowerSink {
    /// Command the actuator with a normalized power value.
    fn set_power(&mut self, power: f64) -> Result<(), HalError>;
}

/// Double-acting solenoid output capability.
pub trait SolenoidSink {
    /// Command the solenoid to one of its two positions.
    fn set_state(&mut self, state: SolenoidState) -> Result<(), HalError>;
}

/// Structured diagnostics output capability.
///
/// Emission is fire-and-forget: the control core swallows failures and
/// never blocks on the sink.
pub trait TelemetrySink {
    /// Emit one diagnostics record.
    fn emit(&mut self, record: &DiagnosticsRecord) -> Result<(), HalError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::types::LiftMode;

    struct NeutralPad;

    impl InputSource for NeutralPad {
        fn sample(&self) -> Result<GamepadSample, HalError> {
            Ok(GamepadSample::default())
        }
    }

    struct CountingSink {
        writes: u32,
    }

    impl PowerSink for CountingSink {
        fn set_power(&mut self, _power: f64) -> Result<(), HalError> {
            self.writes += 1;
            Ok(())
        }
    }

    impl TelemetrySink for CountingSink {
        fn emit(&mut self, _record: &DiagnosticsRecord) -> Result<(), HalError> {
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn hal_error_display() {
        let err = HalError::Disconnected("driver gamepad".to_string());
        assert!(err.to_string().contains("driver gamepad"));

        let err = HalError::ReadFailed("lift encoder".to_string());
        assert!(err.to_string().contains("lift encoder"));
    }

    #[test]
    fn traits_are_object_safe() {
        let pad: Box<dyn InputSource> = Box::new(NeutralPad);
        assert!(pad.sample().is_ok());

        let mut sink: Box<dyn PowerSink> = Box::new(CountingSink { writes: 0 });
        assert!(sink.set_power(0.5).is_ok());

        let record = DiagnosticsRecord {
            distance: 0,
            desired_distance: 0,
            stage_index: 0,
            lift_power: 0.0,
            lift_mode: LiftMode::Hold,
            faults: 0,
        };
        let mut tele: Box<dyn TelemetrySink> = Box::new(CountingSink { writes: 0 });
        assert!(tele.emit(&record).is_ok());
    }
}
