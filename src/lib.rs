//! Functional combinators and controlled timing primitives for the
//! Composable Information Machine
//!
//! The heart of the crate is the pair of controlled rate-limiting
//! primitives - throttle and debounce with explicit
//! cancel/schedule/inspect control - built as pure state machines behind
//! a swappable timer port. Around them sit the stateless function
//! combinators and the optional-value helpers.

pub mod combinators;
pub mod control;
pub mod errors;
pub mod option;
pub mod state_machine;
pub mod timer;

// Re-export commonly used types
pub use control::{
    debounce, make_controlled_debounce, make_controlled_debounce_with, make_controlled_throttle,
    make_controlled_throttle_with, throttle, ControlOptions, Controlled, ControlledDebounce,
    ControlledThrottle,
};
pub use errors::{CombinatorError, CombinatorResult};
pub use option::OptionExt;
pub use timer::{ManualTimer, TimerPort, TokioTimer};
