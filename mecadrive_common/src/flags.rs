//! Per-cycle diagnostic bitflags.
//!
//! Accumulated by the control cycle and exposed through the runner's
//! status; cleared at the start of every cycle.

use bitflags::bitflags;

bitflags! {
    /// Events observed during a single control cycle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CycleFlags: u8 {
        /// Latest command expired — references forced to zero.
        const REF_STALE         = 0x01;
        /// Latest command had a NaN component — input ignored.
        const REF_INVALID       = 0x02;
        /// Latest command was already consumed (single-shot acceptance).
        const REF_CONSUMED      = 0x04;
        /// An actuation output rejected its write.
        const ACTUATION_FAULT   = 0x08;
        /// Telemetry slot was busy — publication skipped.
        const TELEMETRY_SKIPPED = 0x10;
    }
}
