//! Configuration structures for the mecanum drive controller.
//!
//! All config types use `serde::Deserialize` for TOML loading.
//! Numeric parameters are bounds-checked in `validate()`; validation
//! failures are fatal to initialization — the controller never
//! reaches Active with invalid geometry.

use serde::{Deserialize, Serialize};

use crate::consts::{
    CYCLE_TIME_US, CYCLE_TIME_US_MAX, CYCLE_TIME_US_MIN, FRAME_ID_DEFAULT, JOINT_NAME_MAX,
    REFERENCE_TIMEOUT_DEFAULT, TELEMETRY_INTERVAL_DEFAULT, WHEEL_COUNT,
};

// ─── Controller Settings ────────────────────────────────────────────

/// Top-level controller settings (`[controller]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerSettings {
    /// Reference command timeout [s]. Zero means "accept once, then
    /// require a fresh command" (single-shot acceptance).
    #[serde(default = "default_reference_timeout")]
    pub reference_timeout: f64,

    /// Target cycle time in microseconds (default: 10 000 = 100 Hz).
    #[serde(default = "default_cycle_time_us")]
    pub cycle_time_us: u32,

    /// Telemetry publish interval [cycles] (default: 1).
    #[serde(default = "default_telemetry_interval")]
    pub telemetry_interval: u32,

    /// Frame identifier used only for telemetry tagging.
    #[serde(default = "default_frame_id")]
    pub frame_id: String,
}

fn default_reference_timeout() -> f64 {
    REFERENCE_TIMEOUT_DEFAULT
}
fn default_cycle_time_us() -> u32 {
    CYCLE_TIME_US
}
fn default_telemetry_interval() -> u32 {
    TELEMETRY_INTERVAL_DEFAULT
}
fn default_frame_id() -> String {
    FRAME_ID_DEFAULT.to_string()
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            reference_timeout: default_reference_timeout(),
            cycle_time_us: default_cycle_time_us(),
            telemetry_interval: default_telemetry_interval(),
            frame_id: default_frame_id(),
        }
    }
}

impl ControllerSettings {
    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), String> {
        if !self.reference_timeout.is_finite() || self.reference_timeout < 0.0 {
            return Err(format!(
                "reference_timeout {} must be finite and >= 0",
                self.reference_timeout
            ));
        }
        if self.cycle_time_us < CYCLE_TIME_US_MIN || self.cycle_time_us > CYCLE_TIME_US_MAX {
            return Err(format!(
                "cycle_time_us {} out of range [{}, {}]",
                self.cycle_time_us, CYCLE_TIME_US_MIN, CYCLE_TIME_US_MAX
            ));
        }
        if self.telemetry_interval == 0 {
            return Err("telemetry_interval must be >= 1".to_string());
        }
        if self.frame_id.is_empty() {
            return Err("frame_id must not be empty".to_string());
        }
        Ok(())
    }

    /// Reference timeout in nanoseconds.
    #[inline]
    pub fn reference_timeout_ns(&self) -> i64 {
        (self.reference_timeout * 1e9) as i64
    }
}

// ─── Geometry ───────────────────────────────────────────────────────

/// Static offset from the control reference frame to the wheel-base
/// geometric center.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BaseFrameOffset {
    /// Translation along x [m].
    #[serde(default)]
    pub x: f64,
    /// Translation along y [m].
    #[serde(default)]
    pub y: f64,
    /// Yaw offset [rad].
    #[serde(default)]
    pub theta: f64,
}

/// Wheel-base geometry (`[geometry]` section). Immutable during the
/// control loop's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// Wheel radius [m]. Must be strictly positive — the inverse
    /// kinematics divide by it.
    pub wheel_radius: f64,

    /// Offset from the control reference point to the wheel-base center.
    #[serde(default)]
    pub base_frame_offset: BaseFrameOffset,

    /// Sum of half-track and half-wheelbase projections [m].
    pub center_projection_sum: f64,
}

impl GeometryConfig {
    /// Validate geometry bounds. `wheel_radius == 0` would make the
    /// kinematics undefined, so it is rejected here, at configuration
    /// time, never at control time.
    pub fn validate(&self) -> Result<(), String> {
        if !self.wheel_radius.is_finite() || self.wheel_radius <= 0.0 {
            return Err(format!(
                "wheel_radius {} must be finite and > 0",
                self.wheel_radius
            ));
        }
        if !self.center_projection_sum.is_finite() || self.center_projection_sum < 0.0 {
            return Err(format!(
                "center_projection_sum {} must be finite and >= 0",
                self.center_projection_sum
            ));
        }
        for (name, v) in [
            ("base_frame_offset.x", self.base_frame_offset.x),
            ("base_frame_offset.y", self.base_frame_offset.y),
            ("base_frame_offset.theta", self.base_frame_offset.theta),
        ] {
            if !v.is_finite() {
                return Err(format!("{name} must be finite, got {v}"));
            }
        }
        Ok(())
    }
}

// ─── Wheel Joint Names ──────────────────────────────────────────────

/// Actuation joint names (`[wheels]` section).
///
/// Command names address the four writable velocity outputs; state
/// names address the four readable measured-velocity inputs and
/// default to the command names when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WheelJointsConfig {
    pub front_left: String,
    pub front_right: String,
    pub rear_right: String,
    pub rear_left: String,

    #[serde(default)]
    pub front_left_state: Option<String>,
    #[serde(default)]
    pub front_right_state: Option<String>,
    #[serde(default)]
    pub rear_right_state: Option<String>,
    #[serde(default)]
    pub rear_left_state: Option<String>,
}

impl WheelJointsConfig {
    /// Command joint names in canonical wheel order.
    pub fn command_names(&self) -> [&str; WHEEL_COUNT] {
        [
            &self.front_left,
            &self.front_right,
            &self.rear_right,
            &self.rear_left,
        ]
    }

    /// State joint names in canonical wheel order, falling back to the
    /// command name where no state name is configured.
    pub fn state_names(&self) -> [&str; WHEEL_COUNT] {
        [
            self.front_left_state.as_deref().unwrap_or(&self.front_left),
            self.front_right_state
                .as_deref()
                .unwrap_or(&self.front_right),
            self.rear_right_state.as_deref().unwrap_or(&self.rear_right),
            self.rear_left_state.as_deref().unwrap_or(&self.rear_left),
        ]
    }

    /// Validate that all required names are present, unique and short
    /// enough for the fixed-capacity runtime map.
    pub fn validate(&self) -> Result<(), String> {
        let names = self.command_names();
        for name in names {
            if name.is_empty() {
                return Err("wheel command joint names must not be empty".to_string());
            }
            if name.len() > JOINT_NAME_MAX {
                return Err(format!(
                    "joint name '{name}' exceeds {JOINT_NAME_MAX} characters"
                ));
            }
        }
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                if a == b {
                    return Err(format!("duplicate wheel command joint name '{a}'"));
                }
            }
        }
        for name in self.state_names() {
            if name.len() > JOINT_NAME_MAX {
                return Err(format!(
                    "joint name '{name}' exceeds {JOINT_NAME_MAX} characters"
                ));
            }
        }
        Ok(())
    }
}

// ─── Bundle ─────────────────────────────────────────────────────────

/// Complete controller configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default)]
    pub controller: ControllerSettings,
    pub geometry: GeometryConfig,
    pub wheels: WheelJointsConfig,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            wheel_radius: 0.0,
            base_frame_offset: BaseFrameOffset::default(),
            center_projection_sum: 0.0,
        }
    }
}

impl ControllerConfig {
    /// Run all validation rules.
    pub fn validate(&self) -> Result<(), String> {
        self.controller.validate()?;
        self.geometry.validate()?;
        self.wheels.validate()?;
        Ok(())
    }
}
