//! Per-cycle controller orchestration.
//!
//! Wires the command channel, staleness policy, kinematics, actuation
//! writer and telemetry reporter behind the lifecycle gate. One
//! [`MecanumController::update`] call is one control cycle: it runs to
//! completion synchronously, takes no contended lock and performs no
//! heap allocation. Cycle timing and the notion of "now" belong to the
//! enclosing scheduler.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use mecadrive_common::command::VelocityCommand;
use mecadrive_common::config::{ControllerConfig, GeometryConfig};
use mecadrive_common::consts::REF_COUNT;
use mecadrive_common::flags::CycleFlags;
use mecadrive_common::telemetry::TelemetryRecord;
use mecadrive_rt::{LatestValue, TelemetryDrainer, telemetry_channel};

use crate::actuation::{ActuationError, ActuationMap, ActuationWriter, CommandInterface, StateInterface};
use crate::config::ConfigError;
use crate::kinematics;
use crate::lifecycle::{ControllerState, InputMode, LifecycleGate, TransitionRejected};
use crate::reference::{self, CommandSender, RefDecision};
use crate::telemetry::{PublishOutcome, TelemetryReporter};

/// Controller-level error.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Lifecycle transition rejected.
    #[error("lifecycle: {0}")]
    Lifecycle(#[from] TransitionRejected),

    /// Configuration load/validation failure.
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    /// Actuation layer rejected a write. Hard per-cycle error.
    #[error("actuation: {0}")]
    Actuation(#[from] ActuationError),

    /// Control cycle invoked outside the Active state.
    #[error("control cycle invoked while not active")]
    NotActive,
}

/// Configuration-derived runtime parameters, immutable while active.
struct RuntimeParams {
    geometry: GeometryConfig,
    timeout_ns: i64,
}

/// The mecanum drive velocity controller.
pub struct MecanumController {
    gate: LifecycleGate,
    /// Single shared slot between the producer context and the cycle.
    channel: Arc<LatestValue<VelocityCommand>>,
    /// Channel version at which the buffered command was consumed
    /// (single-shot / post-expiry marking); `None` = nothing consumed.
    consumed_version: Option<u64>,
    /// The three reference slots {v_x, v_y, ω_z}; NaN = unset. Also the
    /// chaining interface for upstream controllers.
    reference: [f64; REF_COUNT],
    params: Option<RuntimeParams>,
    writer: Option<ActuationWriter>,
    reporter: Option<TelemetryReporter>,
    flags: CycleFlags,
}

impl MecanumController {
    /// Construct an unconfigured controller. The channel starts with
    /// the stop sentinel so a read before any publish is harmless.
    pub fn new() -> Self {
        Self {
            gate: LifecycleGate::new(),
            channel: Arc::new(LatestValue::new(VelocityCommand::stop_sentinel(0))),
            consumed_version: None,
            reference: [f64::NAN; REF_COUNT],
            params: None,
            writer: None,
            reporter: None,
            flags: CycleFlags::empty(),
        }
    }

    /// Apply a validated configuration.
    ///
    /// Repeatable while not active. Resets the command channel to the
    /// stop sentinel and creates the telemetry channel, handing the
    /// drainer back for the transport side.
    pub fn configure(
        &mut self,
        config: ControllerConfig,
        now_ns: i64,
    ) -> Result<TelemetryDrainer<TelemetryRecord>, ControllerError> {
        if self.gate.is_active() {
            return Err(TransitionRejected {
                state: self.gate.state(),
                reason: "configure requires the controller to be inactive",
            }
            .into());
        }

        config.validate().map_err(ConfigError::Validation)?;
        let map = ActuationMap::from_config(&config.wheels)
            .map_err(ConfigError::Validation)?;

        let (publisher, drainer) = telemetry_channel(TelemetryRecord::zeroed(now_ns));

        self.params = Some(RuntimeParams {
            geometry: config.geometry.clone(),
            timeout_ns: config.controller.reference_timeout_ns(),
        });
        self.writer = Some(ActuationWriter::new(map));
        self.reporter = Some(TelemetryReporter::new(
            publisher,
            config.controller.telemetry_interval,
        ));
        self.channel.write(VelocityCommand::stop_sentinel(now_ns));
        self.consumed_version = None;
        self.gate.configured()?;

        info!(
            wheel_radius = config.geometry.wheel_radius,
            timeout_s = config.controller.reference_timeout,
            "controller configured"
        );
        Ok(drainer)
    }

    /// Producer-side handle for the inbound command entry point.
    pub fn command_sender(&self) -> CommandSender {
        let timeout_ns = self.params.as_ref().map_or(0, |p| p.timeout_ns);
        CommandSender::new(Arc::clone(&self.channel), timeout_ns)
    }

    /// Enter Active. Resets the command channel to the stop sentinel so
    /// a command that arrived before activation is never acted on.
    pub fn activate(&mut self, now_ns: i64) -> Result<(), ControllerError> {
        self.gate.activated()?;
        self.channel.write(VelocityCommand::stop_sentinel(now_ns));
        self.consumed_version = None;
        self.reference = [f64::NAN; REF_COUNT];
        info!("controller activated");
        Ok(())
    }

    /// Leave Active, releasing all four actuation outputs with NaN
    /// exactly once ("no command", distinct from commanded zero).
    pub fn deactivate<C: CommandInterface>(&mut self, hw: &mut C) -> Result<(), ControllerError> {
        self.gate.deactivated()?;
        let Some(writer) = &self.writer else {
            return Err(ControllerError::NotActive);
        };
        writer.release(hw)?;
        info!("controller deactivated, actuation released");
        Ok(())
    }

    /// Request standalone/chained input-source switch. Always accepted.
    pub fn set_chained_mode(&mut self, chained: bool) -> bool {
        self.gate.set_mode(if chained {
            InputMode::Chained
        } else {
            InputMode::Standalone
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ControllerState {
        self.gate.state()
    }

    /// Current input mode.
    pub fn mode(&self) -> InputMode {
        self.gate.mode()
    }

    /// The three reference slots as last written this cycle.
    pub fn reference_slots(&self) -> [f64; REF_COUNT] {
        self.reference
    }

    /// Chained-mode write path: an upstream controller deposits its
    /// twist directly, bypassing the staleness policy (the chained
    /// producer is trusted as already real-time-safe).
    pub fn write_chained_reference(&mut self, v_x: f64, v_y: f64, omega_z: f64) {
        self.reference = [v_x, v_y, omega_z];
    }

    /// Execute one control cycle.
    ///
    /// Returns the cycle's diagnostic flags, or the hard per-cycle
    /// error if an actuation write was rejected (telemetry is skipped
    /// in that case). Faults are cycle-local; the next invocation is an
    /// independent attempt with fresh inputs.
    pub fn update<H>(
        &mut self,
        now_ns: i64,
        _period_ns: i64,
        hw: &mut H,
    ) -> Result<CycleFlags, ControllerError>
    where
        H: CommandInterface + StateInterface,
    {
        if !self.gate.is_active() {
            return Err(ControllerError::NotActive);
        }
        let Some(params) = &self.params else {
            return Err(ControllerError::NotActive);
        };
        let Some(writer) = &self.writer else {
            return Err(ControllerError::NotActive);
        };

        self.flags = CycleFlags::empty();

        // Reference phase: only the standalone path consults the
        // channel and the staleness policy; chained references were
        // already deposited directly into the slots.
        if self.gate.mode() == InputMode::Standalone {
            // The version comes paired with the value it validated, so
            // a publish racing this read can never be marked consumed
            // under a stale version.
            let (cmd, version) = self.channel.read_versioned();
            if Some(version) == self.consumed_version {
                // Same publish as the one already consumed.
                self.flags |= CycleFlags::REF_CONSUMED;
            } else {
                match reference::decide(&cmd, now_ns, params.timeout_ns) {
                    RefDecision::Pass(cmd) => {
                        self.reference = [cmd.linear_x, cmd.linear_y, cmd.angular_z];
                        if params.timeout_ns == 0 {
                            // Accept once, then require a fresh publish.
                            self.consumed_version = Some(version);
                        }
                    }
                    RefDecision::Stop => {
                        // Deliberate zero velocity due to expiry, as
                        // distinct from Ignore's "no decision".
                        self.reference = [0.0; REF_COUNT];
                        self.consumed_version = Some(version);
                        self.flags |= CycleFlags::REF_STALE;
                    }
                    RefDecision::Ignore => {
                        self.flags |= CycleFlags::REF_INVALID;
                    }
                }
            }
        }

        // Kinematics phase: NaN references short-circuit to four zeros.
        let wheels = kinematics::wheel_velocities(&self.reference, &params.geometry);

        // Actuation phase.
        let result = match writer.write(hw, &wheels) {
            Ok(()) => {
                // Telemetry phase: best effort, never waits.
                let measured = writer.measured(hw);
                if let Some(reporter) = &mut self.reporter {
                    if reporter.publish(now_ns, &self.reference, &measured)
                        == PublishOutcome::Skipped
                    {
                        self.flags |= CycleFlags::TELEMETRY_SKIPPED;
                    }
                }
                Ok(self.flags)
            }
            Err(e) => {
                self.flags |= CycleFlags::ACTUATION_FAULT;
                Err(e.into())
            }
        };

        // Single-use-per-cycle: reference slots reset after consumption.
        self.reference = [f64::NAN; REF_COUNT];

        result
    }
}

impl Default for MecanumController {
    fn default() -> Self {
        Self::new()
    }
}
