//! Try-lock telemetry slot: attempt-and-skip publication.
//!
//! The control cycle calls [`TelemetryPublisher::try_publish`]; if the
//! transport side currently holds the slot the publication is skipped
//! for this cycle and the previously published record stays in place.
//! Publication is diagnostic — a full control cycle is never delayed
//! by it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

struct Shared<T> {
    slot: Mutex<T>,
    /// Count of successful publishes, for change detection by the drainer.
    publishes: AtomicU64,
}

/// Control-cycle side of the telemetry channel.
pub struct TelemetryPublisher<T> {
    shared: Arc<Shared<T>>,
}

/// Transport side of the telemetry channel. May block on the slot.
pub struct TelemetryDrainer<T> {
    shared: Arc<Shared<T>>,
}

/// Create a connected publisher/drainer pair holding `initial`.
pub fn telemetry_channel<T>(initial: T) -> (TelemetryPublisher<T>, TelemetryDrainer<T>) {
    let shared = Arc::new(Shared {
        slot: Mutex::new(initial),
        publishes: AtomicU64::new(0),
    });
    (
        TelemetryPublisher {
            shared: Arc::clone(&shared),
        },
        TelemetryDrainer { shared },
    )
}

impl<T> TelemetryPublisher<T> {
    /// Attempt a non-blocking publish.
    ///
    /// Returns `true` if the record was stored, `false` if the slot was
    /// busy — in which case nothing is written and the call returns
    /// immediately. Busy slots are not an error.
    pub fn try_publish(&self, record: T) -> bool {
        match self.shared.slot.try_lock() {
            Ok(mut guard) => {
                *guard = record;
                drop(guard);
                self.shared.publishes.fetch_add(1, Ordering::Release);
                true
            }
            Err(TryLockError::WouldBlock) => false,
            Err(TryLockError::Poisoned(poisoned)) => {
                // A panicked drainer must not silence telemetry.
                *poisoned.into_inner() = record;
                self.shared.publishes.fetch_add(1, Ordering::Release);
                true
            }
        }
    }

    /// Number of successful publishes so far.
    pub fn publish_count(&self) -> u64 {
        self.shared.publishes.load(Ordering::Acquire)
    }
}

impl<T: Clone> TelemetryDrainer<T> {
    /// Copy out the most recently published record. Blocking is
    /// permitted here — this is the transport side.
    pub fn latest(&self) -> T {
        self.shared
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl<T> TelemetryDrainer<T> {
    /// Number of successful publishes so far. Lets a drainer loop
    /// sleep until the record has actually changed.
    pub fn publish_count(&self) -> u64 {
        self.shared.publishes.load(Ordering::Acquire)
    }

    /// Hold the slot, making concurrent `try_publish` calls skip.
    ///
    /// Used by the transport while serializing a record out, and by
    /// tests to exercise the skip path deterministically.
    pub fn hold(&self) -> MutexGuard<'_, T> {
        self.shared
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
