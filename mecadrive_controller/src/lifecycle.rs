//! Lifecycle and input-mode gate.
//!
//! Unconfigured → Inactive ↔ Active, with typed transition methods
//! returning a result instead of a plugin-host callback protocol.
//! Unconfigured is left only via a successful configure; configure may
//! be repeated while not active. The input-mode flag selects whether
//! the reference slots are fed from the command channel (standalone)
//! or written directly by an upstream controller (chained); switch
//! requests are always accepted in both directions.

use thiserror::Error;

/// Lifecycle state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    /// Constructed, not yet configured.
    #[default]
    Unconfigured,
    /// Configured and idle; actuation outputs released.
    Inactive,
    /// Running the control cycle.
    Active,
}

/// Reference input source selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// References come from the command channel via the staleness policy.
    #[default]
    Standalone,
    /// References are written directly by an upstream controller,
    /// bypassing the staleness policy.
    Chained,
}

/// Rejected lifecycle transition.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("transition rejected in {state:?}: {reason}")]
pub struct TransitionRejected {
    /// State the gate was in when the request arrived.
    pub state: ControllerState,
    /// Why the transition is not valid.
    pub reason: &'static str,
}

/// The gate itself: current state plus input mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecycleGate {
    state: ControllerState,
    mode: InputMode,
}

impl LifecycleGate {
    pub const fn new() -> Self {
        Self {
            state: ControllerState::Unconfigured,
            mode: InputMode::Standalone,
        }
    }

    #[inline]
    pub const fn state(&self) -> ControllerState {
        self.state
    }

    #[inline]
    pub const fn mode(&self) -> InputMode {
        self.mode
    }

    #[inline]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, ControllerState::Active)
    }

    /// Record a successful configure. Valid from Unconfigured and,
    /// repeatably, from Inactive — never while active.
    pub fn configured(&mut self) -> Result<(), TransitionRejected> {
        match self.state {
            ControllerState::Unconfigured | ControllerState::Inactive => {
                self.state = ControllerState::Inactive;
                Ok(())
            }
            ControllerState::Active => Err(TransitionRejected {
                state: self.state,
                reason: "configure requires the controller to be inactive",
            }),
        }
    }

    /// Enter Active. Valid from Inactive only.
    pub fn activated(&mut self) -> Result<(), TransitionRejected> {
        match self.state {
            ControllerState::Inactive => {
                self.state = ControllerState::Active;
                Ok(())
            }
            _ => Err(TransitionRejected {
                state: self.state,
                reason: "activate requires a configured, inactive controller",
            }),
        }
    }

    /// Leave Active. Valid from Active only.
    pub fn deactivated(&mut self) -> Result<(), TransitionRejected> {
        match self.state {
            ControllerState::Active => {
                self.state = ControllerState::Inactive;
                Ok(())
            }
            _ => Err(TransitionRejected {
                state: self.state,
                reason: "deactivate requires an active controller",
            }),
        }
    }

    /// Request an input-mode switch. Always accepted, both directions;
    /// switching does not invalidate prior state on either path.
    pub fn set_mode(&mut self, mode: InputMode) -> bool {
        self.mode = mode;
        true
    }
}
