// Copyright (c) 2025 - Cowboy AI, Inc.
//! Debounce State Machine
//!
//! Formal FSM for the controlled debounce primitive. Uses the generic
//! StateMachine trait from the parent module.
//!
//! # Responsibility
//!
//! Guarantee the wrapped function runs once per burst of activity, after
//! the burst settles for `delay`.
//!
//! # States
//!
//! - Idle: no burst in progress
//! - Pending: inside a burst; the armed timer marks the earliest moment the
//!   burst can be considered settled
//!
//! # Transitions
//!
//! ```text
//! Idle    --Call-->       Pending   leading: fire now; always arm
//! Pending --Call-->       Pending   re-arm (inactivity window resets)
//! Pending --TimerFired--> Idle      trailing mode: fire with latest args
//!                                   leading mode: burst already fired, silent
//! any     --Cancel-->     Idle      disarm, owed trailing call suppressed
//! ```
//!
//! In leading mode a burst fires exactly once, at its start; every further
//! call in the burst only extends the settling window.

use super::{
    StateMachine, TimingAction, TimingInput, TimingMachine, TransitionError, TransitionResult,
};

/// Phase of a debounce control cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebouncePhase {
    /// No burst in progress, next call starts one
    Idle,

    /// Burst in progress, timer armed for the settling deadline
    Pending,
}

impl DebouncePhase {
    fn name(&self) -> &'static str {
        match self {
            DebouncePhase::Idle => "Idle",
            DebouncePhase::Pending => "Pending",
        }
    }
}

/// Mealy machine for debounce semantics
///
/// `leading` is fixed at construction and selects whether a burst fires at
/// its start (then stays silent) or once at its end with the latest
/// arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebounceMachine {
    leading: bool,
    phase: DebouncePhase,
}

impl DebounceMachine {
    /// Current phase, for inspection
    pub fn phase(&self) -> DebouncePhase {
        self.phase
    }

    fn with_phase(&self, phase: DebouncePhase) -> Self {
        Self {
            leading: self.leading,
            phase,
        }
    }
}

impl StateMachine for DebounceMachine {
    type Input = TimingInput;
    type Output = Vec<TimingAction>;

    fn transition(&self, input: &Self::Input) -> TransitionResult<Self, Self::Output> {
        use DebouncePhase::*;
        use TimingAction::*;
        use TimingInput::*;

        match (self.phase, input) {
            // A call in Idle starts a burst. Leading mode fires at burst
            // start with the arguments just recorded.
            (Idle, Call) if self.leading => {
                Ok((self.with_phase(Pending), vec![Fire, Arm]))
            }
            (Idle, Call) => Ok((self.with_phase(Pending), vec![Arm])),

            // Every in-burst call resets the inactivity window.
            (Pending, Call) => Ok((self.with_phase(Pending), vec![Rearm])),

            // The burst settled. Trailing mode owes the sole fire of the
            // burst; leading mode already fired at burst start.
            (Pending, TimerFired) if self.leading => {
                Ok((self.with_phase(Idle), Vec::new()))
            }
            (Pending, TimerFired) => Ok((self.with_phase(Idle), vec![Fire])),

            // Cancellation is always accepted; from Idle it is a no-op.
            (Pending, Cancel) => Ok((self.with_phase(Idle), vec![Disarm])),
            (Idle, Cancel) => Ok((self.with_phase(Idle), Vec::new())),

            // A fire reaching an idle machine is a stale callback.
            (Idle, TimerFired) => Err(TransitionError::InvalidTransition {
                phase: self.phase.name().to_string(),
                input: input.to_string(),
            }),
        }
    }

    fn valid_inputs(&self) -> Vec<Self::Input> {
        use TimingInput::*;

        match self.phase {
            DebouncePhase::Idle => vec![Call, Cancel],
            DebouncePhase::Pending => vec![Call, TimerFired, Cancel],
        }
    }
}

impl TimingMachine for DebounceMachine {
    fn new(leading: bool) -> Self {
        Self {
            leading,
            phase: DebouncePhase::Idle,
        }
    }

    fn is_idle(&self) -> bool {
        self.phase == DebouncePhase::Idle
    }
}
