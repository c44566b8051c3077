//! Best-effort controller state publication.
//!
//! Wraps the try-lock telemetry channel with the publish cadence: a
//! snapshot of reference and measured wheel state is attempted every
//! `interval` cycles and silently skipped when the transport side
//! holds the slot. The control cycle is never delayed by publication.

use mecadrive_common::consts::{REF_COUNT, WHEEL_COUNT};
use mecadrive_common::telemetry::TelemetryRecord;
use mecadrive_rt::TelemetryPublisher;

/// Outcome of one cycle's publish attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Record stored in the slot.
    Published,
    /// Slot busy; record dropped, prior record untouched. Not an error.
    Skipped,
    /// This cycle is not on the publish cadence.
    NotDue,
}

/// Controller-side telemetry reporter.
pub struct TelemetryReporter {
    publisher: TelemetryPublisher<TelemetryRecord>,
    /// Publish every N cycles (>= 1, validated at configure time).
    interval: u32,
    cycles_since_publish: u32,
}

impl TelemetryReporter {
    pub fn new(publisher: TelemetryPublisher<TelemetryRecord>, interval: u32) -> Self {
        Self {
            publisher,
            interval: interval.max(1),
            // First cycle publishes immediately.
            cycles_since_publish: interval.max(1),
        }
    }

    /// Attempt this cycle's publication.
    pub fn publish(
        &mut self,
        stamp_ns: i64,
        reference: &[f64; REF_COUNT],
        measured: &[f64; WHEEL_COUNT],
    ) -> PublishOutcome {
        // Saturating: the counter only needs to reach the interval,
        // and a long-lived busy slot must not overflow it.
        self.cycles_since_publish = self.cycles_since_publish.saturating_add(1);
        if self.cycles_since_publish < self.interval {
            return PublishOutcome::NotDue;
        }

        let record = TelemetryRecord {
            stamp_ns,
            measured_wheel_velocity: *measured,
            reference_velocity: *reference,
        };

        if self.publisher.try_publish(record) {
            self.cycles_since_publish = 0;
            PublishOutcome::Published
        } else {
            // Retry next cycle rather than waiting a full interval.
            PublishOutcome::Skipped
        }
    }

    /// Number of records successfully published so far.
    pub fn publish_count(&self) -> u64 {
        self.publisher.publish_count()
    }
}
