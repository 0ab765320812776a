//! # ATLAS Teleop Library
//!
//! Fixed-rate teleoperation control core for a mobile robot with a
//! differential drivetrain, auxiliary rear drive, position-sensed lift,
//! rear-lift axis, and double-acting pneumatic solenoids. Each cycle
//! samples two gamepads and the lift position sensor, arbitrates manual
//! and automatic lift control, maps drive inputs, and writes every
//! actuator command through injected hardware capabilities.
//!
//! ## Cycle Phases
//!
//! 1. **Sample** — gamepads and lift sensor into an immutable snapshot
//! 2. **Process** — stage selection, lift arbitration, drive mapping
//! 3. **Write** — unconditional actuator dispatch + throttled diagnostics
//!
//! ## Fail-Safe Degradation
//!
//! No failure inside the cycle halts subsequent cycles. Dropped inputs
//! substitute neutral values, a stale lift sensor suppresses automatic
//! seeking, and failed actuator writes are logged and skipped. Every
//! recovered failure is reported through [`diagnostics`].

pub mod config;
pub mod curve;
pub mod cycle;
pub mod diagnostics;
pub mod dispatch;
pub mod drive;
pub mod harness;
pub mod lift;
pub mod sim;
pub mod snapshot;
pub mod stage;
