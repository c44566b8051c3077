//! Canonical wheel slot ordering for the mecanum base.
//!
//! The ordering below is used consistently for actuation-output
//! indexing, measured-state indexing, and telemetry field naming.
//! It is fixed by the wheel geometry and never reordered at runtime.

use crate::consts::WHEEL_COUNT;

/// One of the four fixed wheel roles.
///
/// Discriminants double as array indices into every per-wheel array
/// in the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum WheelSlot {
    FrontLeft = 0,
    FrontRight = 1,
    RearRight = 2,
    RearLeft = 3,
}

impl WheelSlot {
    /// All slots in canonical order.
    pub const ALL: [WheelSlot; WHEEL_COUNT] = [
        WheelSlot::FrontLeft,
        WheelSlot::FrontRight,
        WheelSlot::RearRight,
        WheelSlot::RearLeft,
    ];

    /// Array index of this slot.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short name used in telemetry and logs.
    pub const fn name(self) -> &'static str {
        match self {
            WheelSlot::FrontLeft => "front_left",
            WheelSlot::FrontRight => "front_right",
            WheelSlot::RearRight => "rear_right",
            WheelSlot::RearLeft => "rear_left",
        }
    }
}
