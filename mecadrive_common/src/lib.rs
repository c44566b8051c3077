//! Mecadrive Common Library
//!
//! Shared types for the mecanum drive velocity controller workspace:
//! wheel ordering, velocity commands, telemetry payloads, configuration
//! structs with validation, and per-cycle diagnostic flags.
//!
//! # Module Structure
//!
//! - [`wheel`] - Canonical wheel slot ordering
//! - [`command`] - Body-twist velocity command and stop sentinel
//! - [`telemetry`] - Outbound controller state record
//! - [`config`] - Configuration structs (serde + validation)
//! - [`flags`] - Per-cycle diagnostic bitflags
//! - [`consts`] - System-wide constants

pub mod command;
pub mod config;
pub mod consts;
pub mod flags;
pub mod telemetry;
pub mod wheel;
