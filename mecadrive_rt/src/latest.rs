//! Single-slot seqlock latest-value exchange.
//!
//! Version protocol: even = stable, odd = write in progress. A write
//! bumps the version to odd, copies the value, then bumps it to even.
//! A read snapshots the version, copies the value, and retries if the
//! version was odd or moved during the copy.
//!
//! The consumer side takes no lock and performs no allocation; a
//! concurrent write only costs it a retry of a small `Copy` read.
//! Writes are serialized through a writer gate: the producer context
//! is non-periodic and may briefly contend with a lifecycle reset
//! there, never with the consumer.

use std::cell::UnsafeCell;
use std::hint::spin_loop;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering, fence};

/// Lock-free (consumer-side) latest-value cell.
///
/// Holds exactly one value; every write atomically replaces the value
/// visible to the reader, and the reader never observes a torn write.
pub struct LatestValue<T> {
    /// Seqlock version: even = stable, odd = write in progress.
    version: AtomicU64,
    /// The single value slot.
    slot: UnsafeCell<T>,
    /// Serializes writers. Never touched on the read path.
    write_gate: Mutex<()>,
}

// SAFETY: the seqlock version protocol guarantees the reader only
// returns values copied out between two identical even versions, so a
// torn `T` is never observed. `T: Copy` keeps the in-slot copy free of
// drop/ownership hazards.
unsafe impl<T: Copy + Send> Sync for LatestValue<T> {}
unsafe impl<T: Copy + Send> Send for LatestValue<T> {}

impl<T: Copy> LatestValue<T> {
    /// Create a cell holding `initial`. A read before any write
    /// returns `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            version: AtomicU64::new(0),
            slot: UnsafeCell::new(initial),
            write_gate: Mutex::new(()),
        }
    }

    /// Replace the visible value.
    ///
    /// Callable from any non-RT context; completes without unbounded
    /// blocking (writers only ever contend with each other, briefly)
    /// and never invalidates an in-progress [`read`](Self::read).
    pub fn write(&self, value: T) {
        let _gate = self
            .write_gate
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let stable = self.version.load(Ordering::Relaxed);
        debug_assert_eq!(stable % 2, 0, "stable version must be even");

        // Begin write: odd version.
        self.version.store(stable + 1, Ordering::Relaxed);
        fence(Ordering::Release);

        // SAFETY: the writer gate is held; the only other access is the
        // reader's copy, which the version protocol makes it discard.
        unsafe {
            core::ptr::write_volatile(self.slot.get(), value);
        }

        // Complete write: back to even.
        self.version.store(stable + 2, Ordering::Release);
    }

    /// Return the most recent value visible at call time.
    ///
    /// Lock-free and allocation-free; retries while a write is in
    /// flight. Intended to be called once per control cycle.
    pub fn read(&self) -> T {
        self.read_versioned().0
    }

    /// Like [`read`](Self::read), but also returns the (even) version
    /// the copy was validated against.
    ///
    /// The pair is consistent: the returned version is exactly the one
    /// under which the returned value was published, so change
    /// detection keyed on it can never mistake this value for a
    /// different publish.
    pub fn read_versioned(&self) -> (T, u64) {
        loop {
            let before = self.version.load(Ordering::Acquire);
            if before % 2 != 0 {
                // Write in progress.
                spin_loop();
                continue;
            }

            // SAFETY: the copy may race a concurrent write; the version
            // re-check below discards any torn result before it is
            // returned, and `T: Copy` means the temporary needs no drop.
            let value = unsafe { core::ptr::read_volatile(self.slot.get()) };

            fence(Ordering::Acquire);
            let after = self.version.load(Ordering::Acquire);
            if before == after {
                return (value, before);
            }
            spin_loop();
        }
    }

    /// Current seqlock version (even once stable). Monotonic; useful
    /// for change detection without copying the value.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }
}
