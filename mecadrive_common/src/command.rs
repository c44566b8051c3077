//! Body-twist velocity command and the stop sentinel.
//!
//! A command is a planar twist (linear x, linear y, angular z) stamped
//! with a monotonic instant. The all-NaN value is the designated
//! "no valid command currently available" sentinel; commands are
//! replaced, never mutated, once published into the channel.

/// A stamped body-frame velocity command.
///
/// Timestamps are nanoseconds on the monotonic clock supplied by the
/// cycle scheduler; producers and the control loop must share it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityCommand {
    /// Forward velocity [m/s].
    pub linear_x: f64,
    /// Lateral velocity [m/s], positive left.
    pub linear_y: f64,
    /// Rotational velocity [rad/s], positive counter-clockwise.
    pub angular_z: f64,
    /// Command timestamp [ns, monotonic].
    pub stamp_ns: i64,
}

impl VelocityCommand {
    /// Construct a stamped command.
    pub const fn new(linear_x: f64, linear_y: f64, angular_z: f64, stamp_ns: i64) -> Self {
        Self {
            linear_x,
            linear_y,
            angular_z,
            stamp_ns,
        }
    }

    /// The stop sentinel: all components NaN, stamped `now`.
    pub const fn stop_sentinel(stamp_ns: i64) -> Self {
        Self {
            linear_x: f64::NAN,
            linear_y: f64::NAN,
            angular_z: f64::NAN,
            stamp_ns,
        }
    }

    /// True if all three components are finite numbers (not the sentinel).
    ///
    /// A single NaN component makes the whole command invalid.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.linear_x.is_nan() && !self.linear_y.is_nan() && !self.angular_z.is_nan()
    }

    /// Command age relative to `now_ns`. Negative for future stamps.
    #[inline]
    pub const fn age_ns(&self, now_ns: i64) -> i64 {
        now_ns - self.stamp_ns
    }
}

impl Default for VelocityCommand {
    fn default() -> Self {
        Self::stop_sentinel(0)
    }
}
