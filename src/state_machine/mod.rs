// Copyright (c) 2025 - Cowboy AI, Inc.
//! Finite State Machine Abstractions for Timing Control
//!
//! This module provides the generic state machine trait used by the
//! controlled timing primitives, plus the shared input/action vocabulary
//! both machines speak. All machines are pure functional - transitions are
//! deterministic functions with no side effects.
//!
//! # State Machine Type
//!
//! Both timing machines are **Mealy Machines**: outputs depend on current
//! state and input:
//!
//! ```text
//! (Phase, Input) → (Phase, Actions)
//! ```
//!
//! The actions are returned as data and performed by the imperative shell
//! in [`crate::control`]; the machines themselves never touch a clock, a
//! timer handle, or the caller's arguments.
//!
//! ```text
//! Pure Machine                        Control Shell
//! ─────────────────                   ─────────────────
//!
//! (Phase, TimingInput)                Vec<TimingAction>
//!      │                                    │
//!      ▼                                    ▼
//! ┌──────────────┐    actions         ┌──────────────┐
//! │ transition() │ ────────────────>  │  execute     │
//! │  pure func   │                    │  fire/arm/.. │
//! └──────────────┘                    └──────────────┘
//! ```
//!
//! # Design Principles
//!
//! 1. **Type Safety**: Phases are strongly typed enums
//! 2. **Pure Functions**: All transitions are pure
//! 3. **Explicit**: All transitions explicitly defined
//! 4. **Total over legal inputs**: the only rejected input is a timer fire
//!    reaching an idle machine, which can only be a stale callback

pub mod debounce;
pub mod throttle;

pub use debounce::DebounceMachine;
pub use throttle::ThrottleMachine;

/// Result of a state transition
pub type TransitionResult<S, O> = Result<(S, O), TransitionError>;

/// Errors that can occur during state transitions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Input is not accepted in the current phase
    #[error("Invalid transition: {input} is not accepted while {phase}")]
    InvalidTransition {
        /// Phase the machine was in
        phase: String,
        /// Input that was rejected
        input: String,
    },
}

/// Trait for finite state machines
///
/// Implement this trait to define a state machine with typed inputs and
/// outputs. Transitions return the successor state rather than mutating.
pub trait StateMachine: Sized + Clone {
    /// Input type that triggers transitions
    type Input;

    /// Output type produced by transitions (use () if none)
    type Output;

    /// Attempt to transition to a new state given an input
    ///
    /// # Returns
    /// - Ok((new_state, output)) if transition is valid
    /// - Err(TransitionError) if transition is invalid
    fn transition(&self, input: &Self::Input) -> TransitionResult<Self, Self::Output>;

    /// Check if a transition is valid without performing it
    fn can_transition(&self, input: &Self::Input) -> bool {
        self.transition(input).is_ok()
    }

    /// Get all valid inputs from current state (if enumerable)
    fn valid_inputs(&self) -> Vec<Self::Input>
    where
        Self::Input: Clone,
    {
        Vec::new()
    }
}

/// Inputs shared by the throttle and debounce machines
///
/// `Call` covers both `schedule` and `invoke` on the public handle - the
/// two operations advance the machine identically. The caller's arguments
/// are not part of the input; the shell records them separately and the
/// machine only decides *whether* they are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingInput {
    /// A public `schedule`/`invoke` call arrived
    Call,

    /// The armed one-shot timer elapsed
    TimerFired,

    /// A public `cancel` call arrived
    Cancel,
}

impl std::fmt::Display for TimingInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimingInput::Call => write!(f, "Call"),
            TimingInput::TimerFired => write!(f, "TimerFired"),
            TimingInput::Cancel => write!(f, "Cancel"),
        }
    }
}

/// Effects emitted by a timing machine, performed by the control shell
///
/// Returned as data rather than performed, in the same spirit as the pure
/// projection effects elsewhere in CIM: the machine stays trivially
/// testable and replayable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingAction {
    /// Invoke the wrapped function with the most recently recorded
    /// arguments, consuming them
    Fire,

    /// Arm the timer port for one `delay`
    Arm,

    /// Disarm the pending timer and arm a fresh one (debounce window reset)
    Rearm,

    /// Disarm the pending timer without firing
    Disarm,
}

/// Common constructor/query surface of the two timing machines
///
/// The control shell is generic over this trait, which is how one shell
/// serves both throttle and debounce semantics.
pub trait TimingMachine: StateMachine<Input = TimingInput, Output = Vec<TimingAction>> {
    /// Machine in its initial (idle) phase
    fn new(leading: bool) -> Self;

    /// True iff no control cycle is in progress (no timer owed)
    fn is_idle(&self) -> bool;
}
