//! Cycle benchmark — measure the full teleop cycle on the simulation
//! backend.
//!
//! The control core must stay far under its 20 ms period budget; this
//! benchmarks the complete read → process → write body including the
//! simulated devices, plus the pure decision core on its own.

use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};

use atlas_teleop::config::TeleopConfig;
use atlas_teleop::curve::LinearClamp;
use atlas_teleop::cycle::{plan_cycle, Devices, TeleopCycle};
use atlas_teleop::dispatch::Actuators;
use atlas_teleop::drive::DriveConfig;
use atlas_teleop::lift::LiftController;
use atlas_teleop::sim::{
    ScriptedGamepad, SimulatedLift, TracePowerSink, TraceSolenoidSink, VecTelemetry,
};
use atlas_teleop::snapshot::ControllerSnapshot;

fn bench_rig() -> (TeleopCycle, SimulatedLift) {
    let config = TeleopConfig::default();
    let driver = ScriptedGamepad::new();
    let operator = ScriptedGamepad::new();
    let lift = SimulatedLift::new(10_000.0);

    // Exercise every decision path: drive, rear drive, manual-adjacent
    // stick noise, and an active seek target.
    driver.set_axis(1, 0.4);
    driver.set_axis(4, -0.2);
    driver.set_axis(3, 0.3);
    operator.set_pov(Some(0));

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
        operator_pad: Box::new(operator),
        lift_sensor: Box::new(lift.clone()),
        actuators,
        telemetry: Box::new(VecTelemetry::new().0),
    };

    (TeleopCycle::new(config, devices), lift)
}

fn full_cycle(c: &mut Criterion) {
    let (mut cycle, lift) = bench_rig();
    let dt = Duration::from_millis(20);

    c.bench_function("run_cycle_sim", |b| {
        b.iter(|| {
            cycle.run_cycle(dt);
            lift.advance(dt);
        })
    });
}

fn decision_core(c: &mut Criterion) {
    let drive_config = DriveConfig::default();
    let lift = LiftController::new(
        0.2,
        200,
        Box::new(LinearClamp {
            scale: 1024.0,
            gain: 0.8,
        }),
    );
    let snapshot = ControllerSnapshot {
        throttle: 0.4,
        steer: -0.2,
        fwd_trigger: 0.3,
        ..Default::default()
    };

    c.bench_function("plan_cycle_pure", |b| {
        let mut distance = 0;
        b.iter(|| {
            distance = (distance + 37) % 26000;
            plan_cycle(&drive_config, &lift, &snapshot, Some(distance), 26000)
        })
    });
}

criterion_group!(benches, full_cycle, decision_core);
criterion_main!(benches);
