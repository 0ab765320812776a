//! Fixed-period invocation harness for the host binary.
//!
//! The harness is a collaborator of the control core, not part of it:
//! it only calls the cycle body once per period and keeps timing
//! statistics. Pacing uses `Instant` plus a sleep of the remaining
//! slice; an overrun cycle is counted and the loop continues — a slow
//! cycle must never stop subsequent cycles.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::warn;

/// O(1) per-cycle timing statistics.
///
/// Updated every cycle with no allocation.
#[derive(Debug, Clone, Default)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycle_count: u64,
    /// Number of cycles that exceeded the period budget.
    pub overruns: u64,
    /// Maximum observed cycle duration [µs].
    pub max_cycle_time_us: u64,
    /// Running sum of cycle durations for average computation [µs].
    pub total_cycle_time_us: u64,
}

impl CycleStats {
    /// Record one cycle duration against the period budget.
    #[inline]
    pub fn record(&mut self, duration: Duration, budget: Duration) {
        let us = duration.as_micros() as u64;
        self.cycle_count += 1;
        self.total_cycle_time_us += us;
        if us > self.max_cycle_time_us {
            self.max_cycle_time_us = us;
        }
        if duration > budget {
            self.overruns += 1;
        }
    }

    /// Average cycle duration [µs] (0 before the first cycle).
    #[inline]
    pub fn avg_cycle_time_us(&self) -> u64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.total_cycle_time_us / self.cycle_count
        }
    }
}

/// Fixed-period cycle loop.
pub struct CycleLoop {
    period: Duration,
    running: Arc<AtomicBool>,
    stats: CycleStats,
}

impl CycleLoop {
    /// Create a loop with the given cycle period.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            running: Arc::new(AtomicBool::new(true)),
            stats: CycleStats::default(),
        }
    }

    /// Shared stop flag; clear it (e.g. from a signal handler) to end
    /// the loop after the current cycle.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Timing statistics collected so far.
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// Run the loop, invoking `body` once per period with the measured
    /// elapsed time since the previous invocation.
    ///
    /// `max_cycles` bounds the run; 0 runs until the stop flag clears.
    pub fn run(&mut self, max_cycles: u64, mut body: impl FnMut(Duration)) {
        let mut previous_start: Option<Instant> = None;

        while self.running.load(Ordering::SeqCst) {
            let cycle_start = Instant::now();
            // First cycle has no predecessor; assume one nominal period.
            let dt = previous_start
                .map(|t| cycle_start.duration_since(t))
                .unwrap_or(self.period);
            previous_start = Some(cycle_start);

            body(dt);

            let elapsed = cycle_start.elapsed();
            self.stats.record(elapsed, self.period);
            if self.stats.overruns == 1 && elapsed > self.period {
                warn!(
                    "cycle overrun: {}µs > {}µs budget",
                    elapsed.as_micros(),
                    self.period.as_micros()
                );
            }

            if max_cycles != 0 && self.stats.cycle_count >= max_cycles {
                break;
            }

            // Sleep the remaining slice; an overrun cycle starts the
            // next one immediately.
            if let Some(remaining) = self.period.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_record_basic() {
        let mut stats = CycleStats::default();
        assert_eq!(stats.avg_cycle_time_us(), 0);

        let budget = Duration::from_millis(20);
        stats.record(Duration::from_micros(500), budget);
        assert_eq!(stats.cycle_count, 1);
        assert_eq!(stats.max_cycle_time_us, 500);
        assert_eq!(stats.avg_cycle_time_us(), 500);
        assert_eq!(stats.overruns, 0);

        stats.record(Duration::from_micros(1500), budget);
        assert_eq!(stats.cycle_count, 2);
        assert_eq!(stats.max_cycle_time_us, 1500);
        assert_eq!(stats.avg_cycle_time_us(), 1000);
    }

    #[test]
    fn stats_count_overruns() {
        let mut stats = CycleStats::default();
        stats.record(Duration::from_millis(25), Duration::from_millis(20));
        assert_eq!(stats.overruns, 1);
    }

    #[test]
    fn bounded_run_executes_exactly_max_cycles() {
        let mut cycle_loop = CycleLoop::new(Duration::from_millis(1));
        let mut calls = 0u64;
        cycle_loop.run(5, |_dt| calls += 1);
        assert_eq!(calls, 5);
        assert_eq!(cycle_loop.stats().cycle_count, 5);
    }

    #[test]
    fn cleared_stop_flag_prevents_cycles() {
        let mut cycle_loop = CycleLoop::new(Duration::from_millis(1));
        cycle_loop.stop_handle().store(false, Ordering::SeqCst);
        let mut calls = 0u64;
        cycle_loop.run(0, |_dt| calls += 1);
        assert_eq!(calls, 0);
    }

    #[test]
    fn first_cycle_dt_is_the_nominal_period() {
        let period = Duration::from_millis(7);
        let mut cycle_loop = CycleLoop::new(period);
        let mut first_dt = Duration::ZERO;
        cycle_loop.run(1, |dt| first_dt = dt);
        assert_eq!(first_dt, period);
    }
}
