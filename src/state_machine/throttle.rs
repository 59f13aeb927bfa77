// Copyright (c) 2025 - Cowboy AI, Inc.
//! Throttle State Machine
//!
//! Formal FSM for the controlled throttle primitive. Uses the generic
//! StateMachine trait from the parent module.
//!
//! # Responsibility
//!
//! Guarantee the wrapped function runs at most once per `delay` window
//! while still reacting to the latest arguments.
//!
//! # States
//!
//! - Idle: no window open
//! - Cooling: a window is ticking; `pending` records whether a call landed
//!   since the window opened (and therefore whether a trailing fire is owed)
//!
//! # Transitions
//!
//! ```text
//! Idle    --Call-->       Cooling   leading: fire now, arm
//!                                   trailing: arm, fire deferred to expiry
//! Cooling --Call-->       Cooling   remember latest args, do NOT re-arm
//! Cooling --TimerFired--> Idle      fire iff a call landed in-window
//! any     --Cancel-->     Idle      disarm, nothing fires
//! ```
//!
//! The window is never extended: a call during `Cooling` only overwrites
//! the arguments the trailing fire will use.

use super::{
    StateMachine, TimingAction, TimingInput, TimingMachine, TransitionError, TransitionResult,
};

/// Phase of a throttle control cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottlePhase {
    /// No window open, next call opens one
    Idle,

    /// Window ticking until the armed timer expires
    Cooling {
        /// A call occurred since the window opened; a trailing fire is owed
        pending: bool,
    },
}

impl ThrottlePhase {
    fn name(&self) -> &'static str {
        match self {
            ThrottlePhase::Idle => "Idle",
            ThrottlePhase::Cooling { .. } => "Cooling",
        }
    }
}

/// Mealy machine for throttle semantics
///
/// `leading` is fixed at construction and selects whether the call that
/// opens a window fires synchronously or is deferred to the window's end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleMachine {
    leading: bool,
    phase: ThrottlePhase,
}

impl ThrottleMachine {
    /// Current phase, for inspection
    pub fn phase(&self) -> ThrottlePhase {
        self.phase
    }

    fn with_phase(&self, phase: ThrottlePhase) -> Self {
        Self {
            leading: self.leading,
            phase,
        }
    }
}

impl StateMachine for ThrottleMachine {
    type Input = TimingInput;
    type Output = Vec<TimingAction>;

    fn transition(&self, input: &Self::Input) -> TransitionResult<Self, Self::Output> {
        use ThrottlePhase::*;
        use TimingAction::*;
        use TimingInput::*;

        match (self.phase, input) {
            // A call in Idle opens a window. Leading mode fires with the
            // arguments just recorded; trailing mode owes the fire to the
            // window's expiry.
            (Idle, Call) if self.leading => Ok((
                self.with_phase(Cooling { pending: false }),
                vec![Fire, Arm],
            )),
            (Idle, Call) => Ok((self.with_phase(Cooling { pending: true }), vec![Arm])),

            // The window is already ticking: only the trailing arguments
            // change. No re-arm.
            (Cooling { .. }, Call) => {
                Ok((self.with_phase(Cooling { pending: true }), Vec::new()))
            }

            // Window expiry: fire the trailing edge iff a call landed
            // in-window, then fall back to Idle with no new timer.
            (Cooling { pending: true }, TimerFired) => {
                Ok((self.with_phase(Idle), vec![Fire]))
            }
            (Cooling { pending: false }, TimerFired) => {
                Ok((self.with_phase(Idle), Vec::new()))
            }

            // Cancellation is always accepted; from Idle it is a no-op.
            (Cooling { .. }, Cancel) => Ok((self.with_phase(Idle), vec![Disarm])),
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
            ThrottlePhase::Idle => vec![Call, Cancel],
            ThrottlePhase::Cooling { .. } => vec![Call, TimerFired, Cancel],
        }
    }
}

impl TimingMachine for ThrottleMachine {
    fn new(leading: bool) -> Self {
        Self {
            leading,
            phase: ThrottlePhase::Idle,
        }
    }

    fn is_idle(&self) -> bool {
        self.phase == ThrottlePhase::Idle
    }
}
