//! Throttled diagnostics emission.
//!
//! `DiagnosticsTimer` gates emission to at most once per configured
//! interval regardless of cycle frequency. Emission is fire-and-forget:
//! a failing sink sets a fault flag and is otherwise ignored — logging
//! must never perturb the control cycle.

use std::time::Duration;

use atlas_common::hal::capability::{HalError, TelemetrySink};
use atlas_common::hal::types::{CycleFaults, DiagnosticsRecord};
use tracing::{info, warn};

/// Elapsed-time throttle for diagnostics emission.
///
/// Persists across cycles. Accumulates the per-cycle `dt` and becomes
/// due once the configured interval has elapsed; emission resets the
/// accumulator, so consecutive emissions are always at least one
/// interval apart.
#[derive(Debug, Clone)]
pub struct DiagnosticsTimer {
    interval: Duration,
    elapsed: Duration,
}

impl DiagnosticsTimer {
    /// Create a timer that first becomes due after one full interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
        }
    }

    /// Advance by one cycle's elapsed time; returns true when an
    /// emission is due (and consumes the accumulated window).
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed = Duration::ZERO;
            true
        } else {
            false
        }
    }

    /// Restart the window, e.g. on re-entry into teleoperated mode.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

/// Emit one record through the sink, swallowing failures.
///
/// Returns the `TELEMETRY` fault flag on failure so the next record
/// reports the drop.
pub fn emit_best_effort(sink: &mut dyn TelemetrySink, record: &DiagnosticsRecord) -> CycleFaults {
    match sink.emit(record) {
        Ok(()) => CycleFaults::empty(),
        Err(e) => {
            warn!("diagnostics emission failed: {e}");
            CycleFaults::TELEMETRY
        }
    }
}

/// Telemetry sink that renders each record as one structured log event.
///
/// The record is serialized to a single JSON payload field so log
/// collectors get a machine-readable snapshot per emission.
#[derive(Debug, Default)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn emit(&mut self, record: &DiagnosticsRecord) -> Result<(), HalError> {
        let payload = serde_json::to_string(record)
            .map_err(|e| HalError::WriteFailed(e.to_string()))?;
        info!(target: "atlas_teleop::telemetry", %payload, "teleop snapshot");
        Ok(())
    }
}
