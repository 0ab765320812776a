//! Prelude module for common re-exports.
//!
//! This module provides convenient re-exports of commonly used types
//! so that consumers can do `use atlas_common::prelude::*;` and get
//! the most important types without listing individual paths.

use std::time::Duration;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};

// ─── Capability traits ──────────────────────────────────────────────
pub use crate::hal::capability::{
    HalError, InputSource, PositionSource, PowerSink, SolenoidSink, TelemetrySink,
};

// ─── Boundary types ─────────────────────────────────────────────────
pub use crate::hal::types::{
    CycleFaults, DiagnosticsRecord, GamepadSample, LiftMode, SolenoidState,
};

// ─── System constants ───────────────────────────────────────────────
pub use crate::consts::{CYCLE_PERIOD_MS, MAX_STAGES};

/// Default control cycle period as Duration.
pub const DEFAULT_CYCLE_PERIOD: Duration = Duration::from_millis(CYCLE_PERIOD_MS);
