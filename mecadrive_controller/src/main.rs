//! # Mecadrive Controller
//!
//! Velocity controller daemon for a four-wheel mecanum base.
//!
//! Loads geometry and joint mapping from a TOML file, runs the control
//! cycle against a simulated wheel backend, reads twist commands from
//! stdin (`v_x v_y omega_z [stamp_ns]`, one per line) and emits
//! telemetry as JSON lines on stdout.

use std::io::BufRead;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use clap::Parser;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

use mecadrive_common::command::VelocityCommand;
use mecadrive_common::consts::WHEEL_COUNT;
use mecadrive_common::wheel::WheelSlot;
use mecadrive_controller::actuation::{ActuationError, CommandInterface, StateInterface};
use mecadrive_controller::config::load_config;
use mecadrive_controller::controller::MecanumController;
use mecadrive_controller::cycle::{CycleRunner, MonotonicClock, rt_setup};

/// Mecadrive Controller — mecanum base velocity control loop
#[derive(Parser, Debug)]
#[command(name = "mecadrive_controller")]
#[command(version)]
#[command(about = "Velocity controller for a four-wheel mecanum drive")]
struct Args {
    /// Path to the controller configuration TOML.
    #[arg(default_value = "config/mecadrive.toml")]
    config: PathBuf,

    /// Stop after this many cycles (0 = run until stdin closes).
    #[arg(long, default_value_t = 0)]
    cycles: u64,

    /// CPU core to pin the RT thread to (default: 1).
    #[arg(long, default_value_t = 1)]
    cpu_core: usize,

    /// SCHED_FIFO priority (default: 80).
    #[arg(long, default_value_t = 80)]
    rt_priority: i32,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

/// Simulated wheel backend: commanded velocities are taken over as the
/// measured ones on the next cycle. NaN (released outputs) reads back
/// as standstill.
#[derive(Debug, Default)]
struct SimWheels {
    commanded: [f64; WHEEL_COUNT],
}

impl CommandInterface for SimWheels {
    fn set_velocity(&mut self, slot: WheelSlot, velocity: f64) -> Result<(), ActuationError> {
        self.commanded[slot.index()] = velocity;
        Ok(())
    }
}

impl StateInterface for SimWheels {
    fn velocity(&self, slot: WheelSlot) -> f64 {
        let v = self.commanded[slot.index()];
        if v.is_nan() { 0.0 } else { v }
    }
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("mecadrive_controller v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("mecadrive_controller shutdown complete");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    info!(
        "Config OK: cycle_time={}µs, timeout={}s, radius={}m",
        config.controller.cycle_time_us,
        config.controller.reference_timeout,
        config.geometry.wheel_radius,
    );

    let cycle_time_us = config.controller.cycle_time_us;
    let telemetry_period = Duration::from_micros(
        cycle_time_us as u64 * config.controller.telemetry_interval as u64,
    );
    let frame_id = config.controller.frame_id.clone();

    let clock = MonotonicClock::new();
    let mut controller = MecanumController::new();
    let drainer = controller.configure(config, clock.now_ns())?;
    let sender = controller.command_sender();
    controller.activate(clock.now_ns())?;

    // RT setup (mlockall, affinity, scheduler).
    rt_setup(args.cpu_core, args.rt_priority)?;
    info!(
        "RT setup complete (cpu_core={}, priority={})",
        args.cpu_core, args.rt_priority
    );

    let running = Arc::new(AtomicBool::new(true));

    // Command producer: one twist per stdin line, `v_x v_y omega_z
    // [stamp_ns]`. EOF clears the running flag.
    let producer_running = Arc::clone(&running);
    let producer = thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_command_line(line) {
                Some(cmd) => {
                    sender.submit(cmd, clock.now_ns());
                }
                None => warn!(line, "unparseable command line, expected 'v_x v_y omega_z [stamp_ns]'"),
            }
        }
        info!("command input closed");
        producer_running.store(false, Ordering::SeqCst);
    });

    // Telemetry drain: poll the latest record at the publish cadence
    // and print it as one JSON line, tagged with the frame id.
    let drain_running = Arc::clone(&running);
    let drain = thread::spawn(move || {
        let mut last_stamp = i64::MIN;
        while drain_running.load(Ordering::Relaxed) {
            let record = drainer.latest();
            if record.stamp_ns != last_stamp {
                last_stamp = record.stamp_ns;
                match serde_json::to_string(&record) {
                    Ok(json) => println!("{{\"frame_id\":\"{frame_id}\",\"state\":{json}}}"),
                    Err(e) => warn!(error = %e, "telemetry serialization failed"),
                }
            }
            thread::sleep(telemetry_period);
        }
    });

    let mut runner = CycleRunner::new(
        controller,
        SimWheels::default(),
        clock,
        cycle_time_us,
        Arc::clone(&running),
        args.cycles,
    );
    info!("entering control loop");

    let loop_result = runner.run();
    running.store(false, Ordering::SeqCst);

    // Release the wheels regardless of how the loop ended.
    let (mut controller, mut hw, stats) = runner.into_parts();
    if let Err(e) = controller.deactivate(&mut hw) {
        warn!(error = %e, "deactivation failed");
    }
    info!(
        cycles = stats.cycle_count,
        avg_ns = stats.avg_cycle_ns(),
        max_ns = stats.max_cycle_ns,
        overruns = stats.overruns,
        faults = stats.faulted_cycles,
        "control loop finished"
    );

    let _ = drain.join();
    drop(producer); // stdin thread exits on EOF; do not block shutdown on it.

    loop_result?;
    Ok(())
}

/// Parse `v_x v_y omega_z [stamp_ns]`. A missing stamp yields 0, which
/// the submit path replaces with receipt time.
fn parse_command_line(line: &str) -> Option<VelocityCommand> {
    let mut parts = line.split_whitespace();
    let v_x: f64 = parts.next()?.parse().ok()?;
    let v_y: f64 = parts.next()?.parse().ok()?;
    let omega_z: f64 = parts.next()?.parse().ok()?;
    let stamp_ns: i64 = match parts.next() {
        Some(s) => s.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(VelocityCommand::new(v_x, v_y, omega_z, stamp_ns))
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
