//! Outbound controller state record.
//!
//! `#[repr(C)]` with a fixed layout so the record can be copied into
//! the telemetry slot without allocation on the control-cycle side.

use serde::Serialize;
use static_assertions::const_assert_eq;

use crate::consts::{REF_COUNT, WHEEL_COUNT};

/// Snapshot published (best effort) once per control cycle.
///
/// Wheel arrays are indexed by [`crate::wheel::WheelSlot`] in canonical
/// order: front left, front right, rear right, rear left.
#[derive(Debug, Clone, Copy, Serialize)]
#[repr(C)]
pub struct TelemetryRecord {
    /// Snapshot timestamp [ns, monotonic].
    pub stamp_ns: i64,
    /// Measured wheel angular velocities [rad/s].
    pub measured_wheel_velocity: [f64; WHEEL_COUNT],
    /// Reference body twist {v_x [m/s], v_y [m/s], ω_z [rad/s]}.
    pub reference_velocity: [f64; REF_COUNT],
}

const_assert_eq!(core::mem::size_of::<TelemetryRecord>(), 64);

impl TelemetryRecord {
    /// Zeroed record with the given stamp.
    pub const fn zeroed(stamp_ns: i64) -> Self {
        Self {
            stamp_ns,
            measured_wheel_velocity: [0.0; WHEEL_COUNT],
            reference_velocity: [0.0; REF_COUNT],
        }
    }
}

impl Default for TelemetryRecord {
    fn default() -> Self {
        Self::zeroed(0)
    }
}
