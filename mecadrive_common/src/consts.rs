//! System-wide constants for the mecadrive workspace.
//!
//! Single source of truth for numeric limits and defaults.
//! Imported by all crates — no duplication permitted.

/// Number of driven wheels on the mecanum base.
pub const WHEEL_COUNT: usize = 4;

/// Number of body-twist reference components (linear x, linear y, angular z).
pub const REF_COUNT: usize = 3;

/// Default control cycle time in microseconds (100 Hz = 10 000 µs).
pub const CYCLE_TIME_US: u32 = 10_000;

/// Minimum allowed cycle time [µs].
pub const CYCLE_TIME_US_MIN: u32 = 100;

/// Maximum allowed cycle time [µs].
pub const CYCLE_TIME_US_MAX: u32 = 1_000_000;

/// Default reference command timeout [s]. Zero means single-shot acceptance.
pub const REFERENCE_TIMEOUT_DEFAULT: f64 = 0.5;

/// Default telemetry publish interval [cycles].
pub const TELEMETRY_INTERVAL_DEFAULT: u32 = 1;

/// Default telemetry frame identifier.
pub const FRAME_ID_DEFAULT: &str = "base_link";

/// Maximum length of a wheel joint name.
pub const JOINT_NAME_MAX: usize = 48;
