//! # Mecadrive Controller
//!
//! Velocity controller for a four-wheel mecanum-drive mobile base.
//! Converts a desired body-frame twist into four wheel angular
//! velocities every control cycle, tolerating stale or invalid input
//! and exposing its reference slots as a chainable input source for
//! upstream controllers.
//!
//! ## Architecture
//!
//! - [`reference`] — staleness policy and the inbound command entry point
//! - [`kinematics`] — frame-offset transform + inverse kinematics
//! - [`actuation`] — hardware seam and fixed-order wheel writer
//! - [`telemetry`] — best-effort state publication
//! - [`lifecycle`] — Unconfigured → Inactive ↔ Active gate
//! - [`controller`] — per-cycle orchestration
//! - [`cycle`] — deterministic cycle runner and RT setup
//! - [`config`] — TOML loading and validation
//!
//! ## RT discipline
//!
//! The per-cycle path takes no contended lock, performs no heap
//! allocation, and never waits on the telemetry channel. The only
//! state shared with the asynchronous producer context is the
//! single-slot command channel (`mecadrive_rt::LatestValue`).

pub mod actuation;
pub mod config;
pub mod controller;
pub mod cycle;
pub mod kinematics;
pub mod lifecycle;
pub mod reference;
pub mod telemetry;
