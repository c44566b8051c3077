//! End-to-end drive cycles: twist in, wheel velocities out, plus
//! lifecycle transitions around the loop.

use mecadrive_common::command::VelocityCommand;
use mecadrive_common::flags::CycleFlags;
use mecadrive_controller::controller::{ControllerError, MecanumController};
use mecadrive_controller::lifecycle::ControllerState;

use super::harness::{SEC, SimWheels, active_controller, reference_config};

fn assert_wheels_close(actual: [f64; 4], expected: [f64; 4]) {
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert!((a - e).abs() < 1e-12, "got {actual:?}, expected {expected:?}");
    }
}

#[test]
fn forward_twist_maps_to_uniform_wheel_velocity() {
    let (mut controller, _drainer) = active_controller(reference_config(1.0));
    let sender = controller.command_sender();
    let mut hw = SimWheels::default();

    // v_x = 1 m/s, radius 0.5 m: every wheel at +2 rad/s.
    sender.submit(VelocityCommand::new(1.0, 0.0, 0.0, SEC), SEC);
    controller
        .update(SEC + SEC / 10, SEC / 100, &mut hw)
        .unwrap();
    assert_wheels_close(hw.commanded, [2.0, 2.0, 2.0, 2.0]);
}

#[test]
fn spin_twist_uses_the_fixed_sign_pattern() {
    let (mut controller, _drainer) = active_controller(reference_config(1.0));
    let sender = controller.command_sender();
    let mut hw = SimWheels::default();

    // omega_z = 1 rad/s, k = 0.3, radius 0.5:
    // left side backward, right side forward.
    sender.submit(VelocityCommand::new(0.0, 0.0, 1.0, SEC), SEC);
    controller.update(SEC, SEC / 100, &mut hw).unwrap();
    assert_wheels_close(hw.commanded, [-0.6, 0.6, 0.6, -0.6]);
}

#[test]
fn combined_twist_superposes_linearly() {
    let (mut controller, _drainer) = active_controller(reference_config(1.0));
    let sender = controller.command_sender();
    let mut hw = SimWheels::default();

    sender.submit(VelocityCommand::new(1.0, 1.0, 1.0, SEC), SEC);
    controller.update(SEC, SEC / 100, &mut hw).unwrap();
    // (c_x ± c_y ± k·omega) / r with c = (1, 1), omega = 1.
    assert_wheels_close(hw.commanded, [-0.6, 4.6, 0.6, 3.4]);
}

#[test]
fn base_frame_offset_rotates_the_commanded_twist() {
    let mut config = reference_config(1.0);
    // Control frame rotated 90° against the wheel frame.
    config.geometry.base_frame_offset.theta = std::f64::consts::FRAC_PI_2;
    let (mut controller, _drainer) = active_controller(config);
    let sender = controller.command_sender();
    let mut hw = SimWheels::default();

    // Forward in the offset frame is leftward at the wheels.
    sender.submit(VelocityCommand::new(1.0, 0.0, 0.0, SEC), SEC);
    controller.update(SEC, SEC / 100, &mut hw).unwrap();
    assert_wheels_close(hw.commanded, [-2.0, 2.0, -2.0, 2.0]);
}

#[test]
fn base_frame_lever_arm_adds_rotation_coupling() {
    let mut config = reference_config(1.0);
    config.geometry.base_frame_offset.x = 0.5;
    let (mut controller, _drainer) = active_controller(config);
    let sender = controller.command_sender();
    let mut hw = SimWheels::default();

    // Pure spin about an offset center drags a lateral component
    // c_y = -off_x * omega = -0.5 along with it.
    sender.submit(VelocityCommand::new(0.0, 0.0, 1.0, SEC), SEC);
    controller.update(SEC, SEC / 100, &mut hw).unwrap();
    assert_wheels_close(hw.commanded, [0.4, -0.4, 1.6, -1.6]);
}

#[test]
fn quiescent_controller_commands_exact_zeros() {
    let (mut controller, _drainer) = active_controller(reference_config(1.0));
    let mut hw = SimWheels::default();

    // No command published at all: zeros, not NaN.
    for i in 0..3 {
        controller
            .update(SEC + i * SEC / 100, SEC / 100, &mut hw)
            .unwrap();
        assert_eq!(hw.commanded, [0.0; 4]);
    }
    assert_eq!(hw.writes.len(), 3);
}

#[test]
fn deactivation_releases_once_with_nan() {
    let (mut controller, _drainer) = active_controller(reference_config(1.0));
    let mut hw = SimWheels::default();

    controller.update(SEC, SEC / 100, &mut hw).unwrap();
    let writes_before = hw.writes.len();

    controller.deactivate(&mut hw).unwrap();
    assert_eq!(controller.state(), ControllerState::Inactive);
    assert_eq!(hw.writes.len(), writes_before + 1);
    assert!(hw.commanded.iter().all(|v| v.is_nan()));

    // No further writes while inactive.
    assert!(matches!(
        controller.update(2 * SEC, SEC / 100, &mut hw),
        Err(ControllerError::NotActive)
    ));
    assert_eq!(hw.writes.len(), writes_before + 1);

    // Deactivating twice is a rejected transition, not a second release.
    assert!(controller.deactivate(&mut hw).is_err());
    assert_eq!(hw.writes.len(), writes_before + 1);
}

#[test]
fn reactivation_discards_commands_from_the_previous_activation() {
    let (mut controller, _drainer) = active_controller(reference_config(1.0));
    let sender = controller.command_sender();
    let mut hw = SimWheels::default();

    sender.submit(VelocityCommand::new(1.0, 0.0, 0.0, SEC), SEC);
    controller.update(SEC, SEC / 100, &mut hw).unwrap();
    assert_eq!(hw.commanded, [2.0; 4]);

    controller.deactivate(&mut hw).unwrap();
    controller.activate(2 * SEC).unwrap();

    // The old command is gone; the base holds still until a new one.
    let flags = controller.update(2 * SEC, SEC / 100, &mut hw).unwrap();
    assert!(flags.contains(CycleFlags::REF_INVALID));
    assert_eq!(hw.commanded, [0.0; 4]);
}

#[test]
fn lifecycle_requires_configuration_before_activation() {
    let mut controller = MecanumController::new();
    assert_eq!(controller.state(), ControllerState::Unconfigured);
    assert!(controller.activate(0).is_err());

    controller.configure(reference_config(1.0), 0).unwrap();
    assert_eq!(controller.state(), ControllerState::Inactive);
    controller.activate(0).unwrap();
    assert_eq!(controller.state(), ControllerState::Active);
}

#[test]
fn chained_mode_consumes_direct_references() {
    let (mut controller, _drainer) = active_controller(reference_config(1.0));
    let mut hw = SimWheels::default();
    assert!(controller.set_chained_mode(true));

    controller.write_chained_reference(1.0, 0.0, 0.0);
    controller.update(SEC, SEC / 100, &mut hw).unwrap();
    assert_wheels_close(hw.commanded, [2.0; 4]);

    // Slots are single-use; no refill means standstill.
    controller.update(2 * SEC, SEC / 100, &mut hw).unwrap();
    assert_eq!(hw.commanded, [0.0; 4]);

    // Back to standalone: the channel path is live again.
    assert!(controller.set_chained_mode(false));
    let sender = controller.command_sender();
    sender.submit(VelocityCommand::new(0.0, 1.0, 0.0, 3 * SEC), 3 * SEC);
    controller.update(3 * SEC, SEC / 100, &mut hw).unwrap();
    assert_wheels_close(hw.commanded, [-2.0, 2.0, -2.0, 2.0]);
}
