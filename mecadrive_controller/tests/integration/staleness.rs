//! Staleness policy over full control cycles: pass / stop / ignore,
//! zero-timeout single-shot acceptance, and receipt-time rejection.

use mecadrive_common::command::VelocityCommand;
use mecadrive_common::flags::CycleFlags;

use super::harness::{SEC, SimWheels, active_controller, reference_config};

#[test]
fn command_within_timeout_drives_every_cycle() {
    let (mut controller, _drainer) = active_controller(reference_config(1.0));
    let sender = controller.command_sender();
    let mut hw = SimWheels::default();

    sender.submit(VelocityCommand::new(1.0, 0.0, 0.0, SEC), SEC);

    // Unconsumed and fresh: same command keeps driving cycle after cycle.
    for i in 0..5 {
        let now = SEC + (i + 1) * SEC / 100;
        let flags = controller.update(now, SEC / 100, &mut hw).unwrap();
        assert_eq!(flags, CycleFlags::empty());
        assert_eq!(hw.commanded, [2.0; 4]);
    }
}

#[test]
fn expiry_mid_stream_forces_one_stop_cycle() {
    let (mut controller, _drainer) = active_controller(reference_config(1.0));
    let sender = controller.command_sender();
    let mut hw = SimWheels::default();

    sender.submit(VelocityCommand::new(1.0, 0.0, 0.0, SEC), SEC);

    // Fresh.
    controller.update(SEC + SEC / 2, SEC / 100, &mut hw).unwrap();
    assert_eq!(hw.commanded, [2.0; 4]);

    // Just past the window: forced stop, exact zeros.
    let flags = controller
        .update(2 * SEC + SEC / 100, SEC / 100, &mut hw)
        .unwrap();
    assert!(flags.contains(CycleFlags::REF_STALE));
    assert_eq!(hw.commanded, [0.0; 4]);

    // Afterward the spent command is ignored, no repeated stop decision.
    let flags = controller
        .update(2 * SEC + 2 * SEC / 100, SEC / 100, &mut hw)
        .unwrap();
    assert!(flags.contains(CycleFlags::REF_CONSUMED));
    assert_eq!(hw.commanded, [0.0; 4]);
}

#[test]
fn boundary_age_equal_to_timeout_passes() {
    let (mut controller, _drainer) = active_controller(reference_config(1.0));
    let sender = controller.command_sender();
    let mut hw = SimWheels::default();

    sender.submit(VelocityCommand::new(1.0, 0.0, 0.0, SEC), SEC);

    // age == timeout is still within the window.
    let flags = controller.update(2 * SEC, SEC / 100, &mut hw).unwrap();
    assert_eq!(flags, CycleFlags::empty());
    assert_eq!(hw.commanded, [2.0; 4]);
}

#[test]
fn zero_timeout_is_single_shot_per_publish() {
    let (mut controller, _drainer) = active_controller(reference_config(0.0));
    let sender = controller.command_sender();
    let mut hw = SimWheels::default();

    // Age is irrelevant under a zero timeout.
    sender.submit(VelocityCommand::new(0.0, 1.0, 0.0, 1), 500 * SEC);
    let flags = controller.update(500 * SEC, SEC / 100, &mut hw).unwrap();
    assert_eq!(flags, CycleFlags::empty());
    assert_eq!(hw.commanded, [-2.0, 2.0, -2.0, 2.0]);

    // Consumed: the very next cycle reverts to standstill.
    let flags = controller
        .update(500 * SEC + SEC / 100, SEC / 100, &mut hw)
        .unwrap();
    assert!(flags.contains(CycleFlags::REF_CONSUMED));
    assert_eq!(hw.commanded, [0.0; 4]);

    // Each republish buys exactly one driven cycle.
    for i in 0..3 {
        let now = 501 * SEC + i * SEC / 10;
        sender.submit(VelocityCommand::new(0.0, 1.0, 0.0, 1), now);
        let flags = controller.update(now, SEC / 100, &mut hw).unwrap();
        assert_eq!(flags, CycleFlags::empty());
        assert_eq!(hw.commanded, [-2.0, 2.0, -2.0, 2.0]);

        let flags = controller
            .update(now + SEC / 100, SEC / 100, &mut hw)
            .unwrap();
        assert!(flags.contains(CycleFlags::REF_CONSUMED));
        assert_eq!(hw.commanded, [0.0; 4]);
    }
}

#[test]
fn unstamped_submission_gets_receipt_time() {
    let (mut controller, _drainer) = active_controller(reference_config(1.0));
    let sender = controller.command_sender();
    let mut hw = SimWheels::default();

    // Stamp 0 means "no stamp"; receipt time (10 s) is applied, so the
    // command is fresh at 10.5 s.
    assert!(sender.submit(VelocityCommand::new(1.0, 0.0, 0.0, 0), 10 * SEC));
    let flags = controller
        .update(10 * SEC + SEC / 2, SEC / 100, &mut hw)
        .unwrap();
    assert_eq!(flags, CycleFlags::empty());
    assert_eq!(hw.commanded, [2.0; 4]);
}

#[test]
fn stale_on_receipt_is_rejected_at_the_entry_point() {
    let (mut controller, _drainer) = active_controller(reference_config(1.0));
    let sender = controller.command_sender();
    let mut hw = SimWheels::default();

    // Two seconds old on arrival: rejected, channel reset to sentinel.
    assert!(!sender.submit(VelocityCommand::new(1.0, 0.0, 0.0, SEC), 3 * SEC));
    let flags = controller.update(3 * SEC, SEC / 100, &mut hw).unwrap();
    // Sentinel in the channel: no pass, no stop decision either.
    assert!(flags.contains(CycleFlags::REF_INVALID));
    assert_eq!(hw.commanded, [0.0; 4]);
}

#[test]
fn nan_component_never_reaches_the_wheels() {
    let (mut controller, _drainer) = active_controller(reference_config(1.0));
    let sender = controller.command_sender();
    let mut hw = SimWheels::default();

    sender.submit(VelocityCommand::new(1.0, f64::NAN, 0.0, SEC), SEC);
    let flags = controller.update(SEC, SEC / 100, &mut hw).unwrap();
    assert!(flags.contains(CycleFlags::REF_INVALID));
    assert_eq!(hw.commanded, [0.0; 4]);
    assert!(hw.commanded.iter().all(|v| !v.is_nan()));
}

#[test]
fn newer_publish_replaces_consumed_command() {
    let (mut controller, _drainer) = active_controller(reference_config(1.0));
    let sender = controller.command_sender();
    let mut hw = SimWheels::default();

    // Let the first command expire and be consumed.
    sender.submit(VelocityCommand::new(1.0, 0.0, 0.0, SEC), SEC);
    controller.update(3 * SEC, SEC / 100, &mut hw).unwrap();
    controller
        .update(3 * SEC + SEC / 100, SEC / 100, &mut hw)
        .unwrap();
    assert_eq!(hw.commanded, [0.0; 4]);

    // A fresh publish takes over immediately.
    sender.submit(VelocityCommand::new(1.0, 0.0, 0.0, 4 * SEC), 4 * SEC);
    let flags = controller.update(4 * SEC, SEC / 100, &mut hw).unwrap();
    assert_eq!(flags, CycleFlags::empty());
    assert_eq!(hw.commanded, [2.0; 4]);
}
