//! Mecanum inverse kinematics.
//!
//! Maps a body twist, evaluated at the control reference point, to
//! four wheel angular velocities. Two pure stages:
//!
//! 1. [`center_offset`] — rigid-body velocity transfer from the control
//!    reference frame to the wheel-base geometric center (rotation by
//!    the static yaw offset plus the ω × r correction terms).
//! 2. [`inverse_kinematics`] — the four-wheel mecanum formula. The sign
//!    pattern encodes physical wheel placement and is part of the
//!    contract: left wheels subtract the lateral term, right wheels add
//!    it; the rotational term flips front/rear per side.
//!
//! A NaN reference component short-circuits to four exact zeros —
//! actuation defaults to "hold still", NaN is never forwarded to
//! hardware. A non-positive wheel radius is a configuration-time
//! validation failure and never reaches these functions.

use mecadrive_common::config::GeometryConfig;
use mecadrive_common::consts::{REF_COUNT, WHEEL_COUNT};

/// Transfer a planar twist from the control reference point to the
/// wheel-base center.
///
/// Rotates the linear velocity (v_x, v_y) by `theta`, then applies the
/// rigid-body correction for a point offset by (off_x, off_y) under
/// angular rate ω_z. ω_z itself is unchanged by the rigid transform.
#[inline]
pub fn center_offset(
    v_x: f64,
    v_y: f64,
    omega_z: f64,
    theta: f64,
    off_x: f64,
    off_y: f64,
) -> (f64, f64, f64) {
    let (sin_t, cos_t) = theta.sin_cos();
    let rotated_x = cos_t * v_x - sin_t * v_y;
    let rotated_y = sin_t * v_x + cos_t * v_y;

    (
        rotated_x + off_y * omega_z,
        rotated_y - off_x * omega_z,
        omega_z,
    )
}

/// Four-wheel mecanum inverse kinematics at the wheel-base center.
///
/// `k` is the precomputed sum of half-track and half-wheelbase
/// projections; `radius` must be strictly positive (validated at
/// configuration time). Output order is canonical: FL, FR, RR, RL.
#[inline]
pub fn inverse_kinematics(
    c_x: f64,
    c_y: f64,
    omega_z: f64,
    radius: f64,
    k: f64,
) -> [f64; WHEEL_COUNT] {
    [
        (c_x - c_y - k * omega_z) / radius, // front left
        (c_x + c_y + k * omega_z) / radius, // front right
        (c_x - c_y + k * omega_z) / radius, // rear right
        (c_x + c_y - k * omega_z) / radius, // rear left
    ]
}

/// Full reference-to-wheel pipeline for one control cycle.
///
/// Returns four exact zeros when any reference component is NaN.
pub fn wheel_velocities(reference: &[f64; REF_COUNT], geometry: &GeometryConfig) -> [f64; WHEEL_COUNT] {
    if reference.iter().any(|v| v.is_nan()) {
        return [0.0; WHEEL_COUNT];
    }

    let offset = &geometry.base_frame_offset;
    let (c_x, c_y, omega_z) = center_offset(
        reference[0],
        reference[1],
        reference[2],
        offset.theta,
        offset.x,
        offset.y,
    );

    inverse_kinematics(
        c_x,
        c_y,
        omega_z,
        geometry.wheel_radius,
        geometry.center_projection_sum,
    )
}
