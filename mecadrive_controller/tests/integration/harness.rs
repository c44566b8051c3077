//! Shared test fixtures: a simulated wheel backend and a reference
//! controller configuration.

use mecadrive_common::config::{
    BaseFrameOffset, ControllerConfig, GeometryConfig, WheelJointsConfig,
};
use mecadrive_common::consts::WHEEL_COUNT;
use mecadrive_common::telemetry::TelemetryRecord;
use mecadrive_common::wheel::WheelSlot;
use mecadrive_controller::actuation::{ActuationError, CommandInterface, StateInterface};
use mecadrive_controller::controller::MecanumController;
use mecadrive_rt::TelemetryDrainer;

pub const SEC: i64 = 1_000_000_000;

/// Simulated wheels: records every complete four-wheel write, and
/// feeds commanded velocities back as measured ones.
#[derive(Debug, Default)]
pub struct SimWheels {
    pub commanded: [f64; WHEEL_COUNT],
    pub writes: Vec<[f64; WHEEL_COUNT]>,
    pub fail_writes: bool,
}

impl CommandInterface for SimWheels {
    fn set_velocity(&mut self, slot: WheelSlot, velocity: f64) -> Result<(), ActuationError> {
        if self.fail_writes {
            return Err(ActuationError {
                slot,
                reason: "injected fault",
            });
        }
        self.commanded[slot.index()] = velocity;
        // The rear-left wheel is last in canonical write order.
        if slot == WheelSlot::RearLeft {
            self.writes.push(self.commanded);
        }
        Ok(())
    }
}

impl StateInterface for SimWheels {
    fn velocity(&self, slot: WheelSlot) -> f64 {
        let v = self.commanded[slot.index()];
        if v.is_nan() { 0.0 } else { v }
    }
}

/// Reference geometry: 0.5 m wheels, projection sum 0.3, no base
/// frame offset. A pure forward command of 1 m/s maps every wheel to
/// exactly 2 rad/s.
pub fn reference_config(timeout_s: f64) -> ControllerConfig {
    let mut config = ControllerConfig {
        controller: Default::default(),
        geometry: GeometryConfig {
            wheel_radius: 0.5,
            base_frame_offset: BaseFrameOffset::default(),
            center_projection_sum: 0.3,
        },
        wheels: WheelJointsConfig {
            front_left: "fl_wheel_joint".into(),
            front_right: "fr_wheel_joint".into(),
            rear_right: "rr_wheel_joint".into(),
            rear_left: "rl_wheel_joint".into(),
            ..Default::default()
        },
    };
    config.controller.reference_timeout = timeout_s;
    config
}

/// Configured and activated controller plus its telemetry drainer.
pub fn active_controller(
    config: ControllerConfig,
) -> (MecanumController, TelemetryDrainer<TelemetryRecord>) {
    let mut controller = MecanumController::new();
    let drainer = controller.configure(config, 0).unwrap();
    controller.activate(0).unwrap();
    (controller, drainer)
}
