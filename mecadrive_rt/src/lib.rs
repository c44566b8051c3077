//! RT-safe exchange primitives for the mecadrive workspace.
//!
//! Two boundaries exist between the periodic control cycle and the
//! rest of the system, and each gets exactly one primitive:
//!
//! - [`latest::LatestValue`] — a single-slot seqlock carrying the most
//!   recent velocity command from an asynchronous producer into the
//!   control cycle. The consumer side never blocks and never allocates.
//! - [`telemetry`] — a try-lock publish slot for outbound diagnostics.
//!   The control cycle attempts the lock and skips the cycle's
//!   publication on contention; it never waits.
//!
//! Everything else in the workspace is either immutable after
//! configuration or exclusively owned by the control-cycle context.

pub mod latest;
pub mod telemetry;

pub use latest::LatestValue;
pub use telemetry::{TelemetryDrainer, TelemetryPublisher, telemetry_channel};
