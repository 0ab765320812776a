//! # ATLAS Teleop
//!
//! Host binary for the teleoperation control core. Loads the TOML
//! configuration, wires the core to the simulation backend, and runs
//! the fixed-period cycle loop until Ctrl-C (or for a bounded number
//! of cycles with `--cycles`).
//!
//! The simulated demo scripts a short operator sequence — selecting
//! the upper lift stage after one second — so the automatic seek and
//! the throttled diagnostics snapshots are visible in the log output.

use std::path::PathBuf;
use std::process;
use std::sync::atomic::Ordering;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use atlas_common::config::ConfigLoader;
use atlas_teleop::config::TeleopConfig;
use atlas_teleop::cycle::{Devices, TeleopCycle};
use atlas_teleop::diagnostics::TracingTelemetry;
use atlas_teleop::dispatch::Actuators;
use atlas_teleop::harness::CycleLoop;
use atlas_teleop::sim::{ScriptedGamepad, SimulatedLift, TracePowerSink, TraceSolenoidSink};

/// Simulated lift travel rate at full power [sensor counts/s].
const SIM_LIFT_RATE: f64 = 10_000.0;

/// ATLAS Teleop — fixed-rate teleoperation control loop
#[derive(Parser, Debug)]
#[command(name = "atlas_teleop")]
#[command(author = "Team 5499")]
#[command(version)]
#[command(about = "Fixed-rate teleop control loop on the simulation backend")]
struct Args {
    /// Path to the teleop configuration TOML.
    #[arg(default_value = "config/teleop.toml")]
    config: PathBuf,

    /// Number of cycles to run before exiting (0 = until Ctrl-C).
    #[arg(long, default_value_t = 0)]
    cycles: u64,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("ATLAS Teleop v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("ATLAS Teleop shutdown complete");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = TeleopConfig::load(&args.config)?;
    config.validate()?;
    info!(
        "Config OK: service={}, period={}ms, stages={:?}",
        config.shared.service_name,
        config.cycle.period_ms,
        config.lift.stage_table.as_slice(),
    );

    let period = Duration::from_millis(config.cycle.period_ms);
    let (mut cycle, operator, lift) = build_sim_rig(config);

    let mut cycle_loop = CycleLoop::new(period);
    let running = cycle_loop.stop_handle();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        running.store(false, Ordering::SeqCst);
    })?;

    // Fresh teleop session: stage 0, cleared edge latches.
    cycle.reset();
    info!("Entering teleop cycle loop");

    // Scripted operator: press POV up at 1.0 s, release at 1.1 s.
    let press_at = Duration::from_secs(1);
    let release_at = press_at + Duration::from_millis(100);
    let mut elapsed = Duration::ZERO;

    cycle_loop.run(args.cycles, |dt| {
        elapsed += dt;
        if elapsed >= press_at && elapsed < release_at {
            operator.set_pov(Some(0));
        } else {
            operator.set_pov(None);
        }

        cycle.run_cycle(dt);
        lift.advance(dt);
    });

    let stats = cycle_loop.stats();
    info!(
        "Loop done: {} cycles, avg={}µs, max={}µs, overruns={}",
        stats.cycle_count,
        stats.avg_cycle_time_us(),
        stats.max_cycle_time_us,
        stats.overruns,
    );

    Ok(())
}

/// Wire the control core to the simulation backend.
///
/// Returns the core plus the handles the demo script drives: the
/// operator gamepad and the lift plant.
fn build_sim_rig(config: TeleopConfig) -> (TeleopCycle, ScriptedGamepad, SimulatedLift) {
    let driver = ScriptedGamepad::new();
    let operator = ScriptedGamepad::new();
    let lift = SimulatedLift::new(SIM_LIFT_RATE);

    let actuators = Actuators {
        left_drive: Box::new(TracePowerSink::new("left_drive")),
        right_drive: Box::new(TracePowerSink::new("right_drive")),
        rear_drive: Box::new(TracePowerSink::new("rear_drive")),
        lift: Box::new(lift.clone()),
        rear_lift: Box::new(TracePowerSink::new("rear_lift")),
        shifter: Box::new(TraceSolenoidSink::new("shifter")),
        fire: Box::new(TraceSolenoidSink::new("fire")),
        unlock: Box::new(TraceSolenoidSink::new("unlock")),
    };
    let devices = Devices {
        driver_pad: Box::new(driver),
        operator_pad: Box::new(operator.clone()),
        lift_sensor: Box::new(lift.clone()),
        actuators,
        telemetry: Box::new(TracingTelemetry),
    };

    (TeleopCycle::new(config, devices), operator, lift)
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
