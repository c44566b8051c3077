//! Hardware seam and fixed-order wheel actuation writer.
//!
//! The controller consumes the actuation layer through two narrow
//! traits: four writable velocity outputs and four readable measured
//! velocities, both addressed by [`WheelSlot`] in canonical order.
//! Construction and wiring of the concrete interfaces is the owning
//! process's job; the joint names from the configuration are exposed
//! for that wiring step and kept in fixed-capacity strings so the
//! runtime map stays allocation-free.

use heapless::String as FixedString;
use thiserror::Error;

use mecadrive_common::config::WheelJointsConfig;
use mecadrive_common::consts::{JOINT_NAME_MAX, WHEEL_COUNT};
use mecadrive_common::wheel::WheelSlot;

/// Fixed-capacity joint name.
pub type JointName = FixedString<JOINT_NAME_MAX>;

/// Error raised by the actuation layer for a rejected write.
///
/// Not expected under normal operation; surfaced as a hard per-cycle
/// error and never retried within the cycle.
#[derive(Debug, Error)]
#[error("actuation write rejected for {slot:?} wheel: {reason}")]
pub struct ActuationError {
    /// Wheel whose output rejected the write.
    pub slot: WheelSlot,
    /// Layer-specific failure description.
    pub reason: &'static str,
}

/// Four writable wheel velocity outputs.
pub trait CommandInterface {
    /// Write one wheel's angular velocity demand [rad/s].
    ///
    /// NaN is the designated "release / no command" value on
    /// deactivation, distinct from a commanded zero.
    fn set_velocity(&mut self, slot: WheelSlot, velocity: f64) -> Result<(), ActuationError>;
}

/// Four readable measured wheel velocities.
pub trait StateInterface {
    /// Measured angular velocity [rad/s] for one wheel.
    fn velocity(&self, slot: WheelSlot) -> f64;
}

/// WheelSlot → joint name mapping in canonical order.
///
/// Built once at configuration time; immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct ActuationMap {
    command_names: [JointName; WHEEL_COUNT],
    state_names: [JointName; WHEEL_COUNT],
}

impl ActuationMap {
    /// Build the map from validated wheel configuration.
    ///
    /// Name lengths are bounds-checked by `WheelJointsConfig::validate`;
    /// an oversized name here means validation was skipped.
    pub fn from_config(wheels: &WheelJointsConfig) -> Result<Self, String> {
        let mut map = Self::default();
        for slot in WheelSlot::ALL {
            let cmd = wheels.command_names()[slot.index()];
            let state = wheels.state_names()[slot.index()];
            map.command_names[slot.index()] = JointName::try_from(cmd)
                .map_err(|_| format!("joint name '{cmd}' exceeds {JOINT_NAME_MAX} characters"))?;
            map.state_names[slot.index()] = JointName::try_from(state)
                .map_err(|_| format!("joint name '{state}' exceeds {JOINT_NAME_MAX} characters"))?;
        }
        Ok(map)
    }

    /// Command joint name for a wheel.
    pub fn command_name(&self, slot: WheelSlot) -> &str {
        &self.command_names[slot.index()]
    }

    /// State joint name for a wheel.
    pub fn state_name(&self, slot: WheelSlot) -> &str {
        &self.state_names[slot.index()]
    }
}

/// Fixed-order writer pushing wheel velocities to the actuation layer.
#[derive(Debug, Default)]
pub struct ActuationWriter {
    map: ActuationMap,
}

impl ActuationWriter {
    pub fn new(map: ActuationMap) -> Self {
        Self { map }
    }

    /// The joint name mapping (for wiring and diagnostics).
    pub fn map(&self) -> &ActuationMap {
        &self.map
    }

    /// Write all four wheel velocities in canonical slot order.
    ///
    /// A single rejected write aborts the cycle; remaining outputs are
    /// left as the actuation layer last saw them.
    pub fn write<C: CommandInterface>(
        &self,
        hw: &mut C,
        velocities: &[f64; WHEEL_COUNT],
    ) -> Result<(), ActuationError> {
        for slot in WheelSlot::ALL {
            hw.set_velocity(slot, velocities[slot.index()])?;
        }
        Ok(())
    }

    /// Release all four outputs by writing NaN once.
    ///
    /// Called exactly once on the transition to inactive.
    pub fn release<C: CommandInterface>(&self, hw: &mut C) -> Result<(), ActuationError> {
        for slot in WheelSlot::ALL {
            hw.set_velocity(slot, f64::NAN)?;
        }
        Ok(())
    }

    /// Snapshot the four measured wheel velocities in canonical order.
    pub fn measured<S: StateInterface>(&self, hw: &S) -> [f64; WHEEL_COUNT] {
        let mut out = [0.0; WHEEL_COUNT];
        for slot in WheelSlot::ALL {
            out[slot.index()] = hw.velocity(slot);
        }
        out
    }
}
