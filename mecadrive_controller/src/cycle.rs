//! Deterministic cycle scheduler for the control loop.
//!
//! Drives [`MecanumController::update`] at the configured rate with
//! `clock_nanosleep(TIMER_ABSTIME)` on an RT-configured thread, or with
//! `std::thread::sleep` in simulation mode. Supplies (now, period) to
//! the controller; the controller itself is timing-agnostic.
//!
//! ## RT setup sequence
//! 1. `mlockall(MCL_CURRENT | MCL_FUTURE)` — lock all pages.
//! 2. Prefault stack pages.
//! 3. `sched_setaffinity` — pin to an isolated CPU core.
//! 4. `sched_setscheduler(SCHED_FIFO, priority)`.
//!
//! Without the `rt` feature all RT calls are no-ops and the loop paces
//! itself with relative sleeps.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, warn};

use crate::actuation::{CommandInterface, StateInterface};
use crate::controller::MecanumController;

/// Monotonic nanosecond clock shared by the scheduler and the command
/// producers, so command stamps and cycle "now" agree on an epoch.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    /// Nanoseconds since this clock was created.
    #[inline]
    pub fn now_ns(&self) -> i64 {
        self.epoch.elapsed().as_nanos() as i64
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

/// O(1) per-cycle timing statistics, updated with no allocation.
#[derive(Debug, Clone)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycle_count: u64,
    /// Last cycle duration [ns].
    pub last_cycle_ns: i64,
    /// Minimum cycle duration [ns].
    pub min_cycle_ns: i64,
    /// Maximum cycle duration [ns].
    pub max_cycle_ns: i64,
    /// Running sum for average computation.
    pub sum_cycle_ns: i64,
    /// Number of budget overruns detected.
    pub overruns: u64,
    /// Number of cycles whose update returned an error.
    pub faulted_cycles: u64,
    /// Maximum wake-up latency [ns].
    pub max_latency_ns: i64,
}

impl CycleStats {
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: i64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
            faulted_cycles: 0,
            max_latency_ns: 0,
        }
    }

    /// Record a cycle duration. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, duration_ns: i64, latency_ns: i64) {
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        if duration_ns < self.min_cycle_ns {
            self.min_cycle_ns = duration_ns;
        }
        if duration_ns > self.max_cycle_ns {
            self.max_cycle_ns = duration_ns;
        }
        self.sum_cycle_ns += duration_ns;
        if latency_ns > self.max_latency_ns {
            self.max_latency_ns = latency_ns;
        }
    }

    /// Average cycle time [ns] (0 before the first cycle).
    #[inline]
    pub fn avg_cycle_ns(&self) -> i64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.sum_cycle_ns / self.cycle_count as i64
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors during RT setup or cycle execution.
#[derive(Debug, Error)]
pub enum CycleError {
    /// RT system call failed.
    #[error("RT setup error: {0}")]
    RtSetup(String),

    /// Deadline miss under the RT scheduler.
    #[error("cycle overrun: {actual_ns}ns > {budget_ns}ns budget")]
    CycleOverrun {
        /// Actual cycle duration [ns].
        actual_ns: i64,
        /// Configured cycle budget [ns].
        budget_ns: i64,
    },
}

/// Lock all current and future memory pages.
#[cfg(feature = "rt")]
fn rt_mlockall() -> Result<(), CycleError> {
    use nix::sys::mman::{MlockallFlags, mlockall};
    mlockall(MlockallFlags::MCL_CURRENT | MlockallFlags::MCL_FUTURE)
        .map_err(|e| CycleError::RtSetup(format!("mlockall failed: {e}")))?;
    Ok(())
}

#[cfg(not(feature = "rt"))]
fn rt_mlockall() -> Result<(), CycleError> {
    Ok(()) // No-op in simulation mode
}

/// Touch a large stack buffer so its pages are resident before the
/// loop starts.
fn prefault_stack() {
    let mut buf = [0u8; 1024 * 1024];
    for byte in buf.iter_mut() {
        unsafe { core::ptr::write_volatile(byte, 0xFF) };
    }
    core::hint::black_box(&buf);
}

/// Pin the current thread to a specific CPU core.
#[cfg(feature = "rt")]
fn rt_set_affinity(cpu: usize) -> Result<(), CycleError> {
    use nix::sched::{CpuSet, sched_setaffinity};
    use nix::unistd::Pid;

    let mut cpuset = CpuSet::new();
    cpuset
        .set(cpu)
        .map_err(|e| CycleError::RtSetup(format!("CpuSet::set({cpu}) failed: {e}")))?;
    sched_setaffinity(Pid::from_raw(0), &cpuset)
        .map_err(|e| CycleError::RtSetup(format!("sched_setaffinity failed: {e}")))?;
    Ok(())
}

#[cfg(not(feature = "rt"))]
fn rt_set_affinity(_cpu: usize) -> Result<(), CycleError> {
    Ok(()) // No-op in simulation mode
}

/// Set SCHED_FIFO with the given RT priority.
#[cfg(feature = "rt")]
fn rt_set_scheduler(priority: i32) -> Result<(), CycleError> {
    let param = libc::sched_param {
        sched_priority: priority,
    };
    let ret = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };
    if ret != 0 {
        let err = std::io::Error::last_os_error();
        return Err(CycleError::RtSetup(format!(
            "sched_setscheduler(SCHED_FIFO, {priority}) failed: {err}"
        )));
    }
    Ok(())
}

#[cfg(not(feature = "rt"))]
fn rt_set_scheduler(_priority: i32) -> Result<(), CycleError> {
    Ok(()) // No-op in simulation mode
}

/// Perform the full RT setup sequence. Must be called on the cycle
/// thread before entering the loop.
pub fn rt_setup(cpu_core: usize, rt_priority: i32) -> Result<(), CycleError> {
    rt_mlockall()?;
    prefault_stack();
    rt_set_affinity(cpu_core)?;
    rt_set_scheduler(rt_priority)?;
    Ok(())
}

/// The cycle runner: controller + actuation backend + pacing.
///
/// Owns the controller and hardware handle for the duration of the
/// loop; [`CycleRunner::into_parts`] returns them for shutdown
/// handling (deactivation, final release).
pub struct CycleRunner<H> {
    controller: MecanumController,
    hw: H,
    clock: MonotonicClock,
    cycle_time_ns: i64,
    running: Arc<AtomicBool>,
    /// 0 = run until the flag is cleared.
    max_cycles: u64,
    stats: CycleStats,
}

impl<H> CycleRunner<H>
where
    H: CommandInterface + StateInterface,
{
    pub fn new(
        controller: MecanumController,
        hw: H,
        clock: MonotonicClock,
        cycle_time_us: u32,
        running: Arc<AtomicBool>,
        max_cycles: u64,
    ) -> Self {
        Self {
            controller,
            hw,
            clock,
            cycle_time_ns: cycle_time_us as i64 * 1000,
            running,
            max_cycles,
            stats: CycleStats::new(),
        }
    }

    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// Tear down, recovering the controller and hardware handle.
    pub fn into_parts(self) -> (MecanumController, H, CycleStats) {
        (self.controller, self.hw, self.stats)
    }

    /// Enter the cycle loop. Returns when the running flag is cleared
    /// or `max_cycles` is reached; under the RT scheduler the first
    /// deadline miss terminates the loop with `CycleOverrun`.
    pub fn run(&mut self) -> Result<(), CycleError> {
        #[cfg(feature = "rt")]
        {
            self.run_rt_loop()
        }

        #[cfg(not(feature = "rt"))]
        {
            self.run_sim_loop()
        }
    }

    fn finished(&self) -> bool {
        !self.running.load(Ordering::Relaxed)
            || (self.max_cycles > 0 && self.stats.cycle_count >= self.max_cycles)
    }

    /// One controller update. Per-cycle faults are logged and counted;
    /// the next cycle is an independent attempt with fresh inputs.
    fn cycle_body(&mut self) {
        let now_ns = self.clock.now_ns();
        match self.controller.update(now_ns, self.cycle_time_ns, &mut self.hw) {
            Ok(flags) => {
                if !flags.is_empty() {
                    debug!(?flags, "cycle flags");
                }
            }
            Err(e) => {
                self.stats.faulted_cycles += 1;
                warn!(error = %e, "control cycle fault");
            }
        }
    }

    /// RT cycle loop using `clock_nanosleep(TIMER_ABSTIME)` for
    /// drift-free pacing.
    #[cfg(feature = "rt")]
    fn run_rt_loop(&mut self) -> Result<(), CycleError> {
        use nix::time::{ClockId, ClockNanosleepFlags, clock_gettime, clock_nanosleep};

        let clock = ClockId::CLOCK_MONOTONIC;
        // Deadline of the sleep just completed; the first cycle's is
        // "now", so its measured latency is ~0.
        let mut next_wake = clock_gettime(clock)
            .map_err(|e| CycleError::RtSetup(format!("clock_gettime: {e}")))?;

        while !self.finished() {
            let cycle_start = clock_gettime(clock)
                .map_err(|e| CycleError::RtSetup(format!("clock_gettime: {e}")))?;
            // How late this cycle woke relative to the deadline it
            // slept toward.
            let wake_latency_ns = timespec_diff_ns(&cycle_start, &next_wake).max(0);

            self.cycle_body();

            let cycle_end = clock_gettime(clock)
                .map_err(|e| CycleError::RtSetup(format!("clock_gettime: {e}")))?;
            let duration_ns = timespec_diff_ns(&cycle_end, &cycle_start);

            self.stats.record(duration_ns, wake_latency_ns);

            if duration_ns > self.cycle_time_ns {
                self.stats.overruns += 1;
                return Err(CycleError::CycleOverrun {
                    actual_ns: duration_ns,
                    budget_ns: self.cycle_time_ns,
                });
            }

            next_wake = timespec_add_ns(next_wake, self.cycle_time_ns);
            let _ = clock_nanosleep(clock, ClockNanosleepFlags::TIMER_ABSTIME, &next_wake);
        }
        Ok(())
    }

    /// Simulation loop using `std::thread::sleep`. Overruns are
    /// counted but not fatal here.
    #[cfg(not(feature = "rt"))]
    fn run_sim_loop(&mut self) -> Result<(), CycleError> {
        let cycle_duration = std::time::Duration::from_nanos(self.cycle_time_ns as u64);

        while !self.finished() {
            let cycle_start = Instant::now();

            self.cycle_body();

            let elapsed = cycle_start.elapsed();
            let duration_ns = elapsed.as_nanos() as i64;

            self.stats.record(duration_ns, 0);

            if duration_ns > self.cycle_time_ns {
                self.stats.overruns += 1;
            }

            if let Some(remaining) = cycle_duration.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            }
        }
        Ok(())
    }
}

/// Add nanoseconds to a TimeSpec.
#[cfg(feature = "rt")]
fn timespec_add_ns(ts: nix::sys::time::TimeSpec, ns: i64) -> nix::sys::time::TimeSpec {
    use nix::sys::time::TimeSpec;
    let mut secs = ts.tv_sec();
    let mut nanos = ts.tv_nsec() + ns;
    while nanos >= 1_000_000_000 {
        secs += 1;
        nanos -= 1_000_000_000;
    }
    while nanos < 0 {
        secs -= 1;
        nanos += 1_000_000_000;
    }
    TimeSpec::new(secs, nanos)
}

/// Compute the difference (a - b) in nanoseconds.
#[cfg(feature = "rt")]
fn timespec_diff_ns(a: &nix::sys::time::TimeSpec, b: &nix::sys::time::TimeSpec) -> i64 {
    (a.tv_sec() - b.tv_sec()) * 1_000_000_000 + (a.tv_nsec() - b.tv_nsec())
}
