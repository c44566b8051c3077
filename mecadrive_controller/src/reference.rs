//! Reference staleness policy and the inbound command entry point.
//!
//! The policy is a pure three-way decision — the crux of safe behavior
//! under producer silence or network delay:
//!
//! - `Ignore` preserves whatever the previous cycle already asked for
//!   (no regression on transient gaps before the timeout);
//! - `Stop` actively commands the base to halt after expiry;
//! - `Pass` forwards the command into the reference slots.
//!
//! Zero configured timeout means "never expire by age", but acceptance
//! is single-shot: the consumer marks the publish consumed and the same
//! publish is never re-accepted on a later cycle. The stale path marks
//! the publish consumed too, so an expired command stops the base once
//! and is ignored afterwards instead of re-stopping every cycle.

use std::sync::Arc;

use tracing::warn;

use mecadrive_common::command::VelocityCommand;
use mecadrive_rt::LatestValue;

/// Outcome of the per-cycle staleness decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefDecision {
    /// Honor the command: write its twist into the reference slots.
    Pass(VelocityCommand),
    /// Command expired: force the reference slots to exactly {0, 0, 0}.
    Stop,
    /// No valid input this cycle: leave the reference slots untouched.
    Ignore,
}

/// Pure staleness decision for the latest buffered command.
///
/// `timeout_ns == 0` disables age-based expiry entirely; the caller is
/// responsible for the single-shot consumed marking in that case.
#[inline]
pub fn decide(cmd: &VelocityCommand, now_ns: i64, timeout_ns: i64) -> RefDecision {
    if !cmd.is_valid() {
        // NaN is the designated "no valid command yet" sentinel.
        return RefDecision::Ignore;
    }
    if timeout_ns == 0 {
        return RefDecision::Pass(*cmd);
    }
    if cmd.age_ns(now_ns) <= timeout_ns {
        RefDecision::Pass(*cmd)
    } else {
        RefDecision::Stop
    }
}

/// Producer-side handle: the one inbound command entry point.
///
/// Cheap to clone into the asynchronous producer context. Performs the
/// receipt-time staleness check, which is distinct from the per-cycle
/// re-check in [`decide`].
#[derive(Clone)]
pub struct CommandSender {
    channel: Arc<LatestValue<VelocityCommand>>,
    timeout_ns: i64,
}

impl CommandSender {
    pub(crate) fn new(channel: Arc<LatestValue<VelocityCommand>>, timeout_ns: i64) -> Self {
        Self {
            channel,
            timeout_ns,
        }
    }

    /// Submit a command with receipt time `now_ns`.
    ///
    /// A command without a timestamp is stamped `now_ns`. A command
    /// already older than the configured timeout at receipt is
    /// converted to the stop sentinel, with a diagnostic log here in
    /// the producer path — never on the control cycle's hot path.
    ///
    /// Returns `true` if the command was accepted as-is.
    pub fn submit(&self, mut cmd: VelocityCommand, now_ns: i64) -> bool {
        if cmd.stamp_ns == 0 {
            warn!("command timestamp missing, stamping with receipt time");
            cmd.stamp_ns = now_ns;
        }

        let age_ns = cmd.age_ns(now_ns);
        if self.timeout_ns == 0 || age_ns <= self.timeout_ns {
            self.channel.write(cmd);
            true
        } else {
            warn!(
                stamp_ns = cmd.stamp_ns,
                age_ns,
                timeout_ns = self.timeout_ns,
                "rejecting command older than the configured timeout"
            );
            self.channel.write(VelocityCommand::stop_sentinel(now_ns));
            false
        }
    }
}
