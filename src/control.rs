// Copyright (c) 2025 - Cowboy AI, Inc.
//! Controlled Timing Primitives
//!
//! The imperative shell around the pure timing machines in
//! [`crate::state_machine`]. A [`Controlled`] handle owns the latest
//! arguments, the armed timer handle, and the machine phase; every public
//! operation advances the machine synchronously and performs whatever
//! actions it emits (fire the wrapped function, arm/re-arm/disarm the
//! timer port).
//!
//! # Surface
//!
//! - [`make_controlled_throttle`] / [`make_controlled_debounce`]: full
//!   handles with `invoke`, `schedule`, `cancel`, `is_scheduled`
//! - [`throttle`] / [`debounce`]: plain wrapped functions, control handle
//!   discarded
//! - `*_with` variants take an explicit [`TimerPort`], which is how the
//!   state machines are driven by a deterministic clock in tests
//!
//! # Concurrency Model
//!
//! All operations run synchronously to completion; the only asynchrony is
//! the timer-fire callback re-entering the same instance. An internal
//! mutex serializes re-entry, and each armed timer captures an epoch so a
//! fire that lost a race with `cancel` (or with a re-arm) is recognized as
//! stale and dropped. The wrapped function itself is always invoked
//! *outside* the state lock; it must not synchronously re-enter its own
//! handle.
//!
//! # Example
//!
//! ```rust,ignore
//! use cim_combinators::{make_controlled_debounce, ControlOptions};
//! use std::time::Duration;
//!
//! let search = make_controlled_debounce(
//!     |query: String| run_search(&query),
//!     ControlOptions::new(Duration::from_millis(300), false),
//! );
//!
//! search.schedule("c".to_string());
//! search.schedule("ci".to_string());
//! search.schedule("cim".to_string());
//! // run_search("cim") fires once, 300ms after the last keystroke.
//! ```

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::errors::{CombinatorError, CombinatorResult};
use crate::state_machine::{
    DebounceMachine, StateMachine, ThrottleMachine, TimingAction, TimingInput, TimingMachine,
};
use crate::timer::{TimerPort, TokioTimer};

/// Options shared by the controlled throttle and debounce factories
///
/// `delay` is the throttle window / debounce inactivity period. `leading`
/// selects whether the first call of a window or burst fires synchronously.
///
/// # Examples
///
/// ```rust,ignore
/// let opts = ControlOptions::new(Duration::from_millis(100), true);
///
/// // Millisecond form validates at construction: negative delays are a
/// // caller contract violation and are rejected rather than clamped.
/// assert!(ControlOptions::from_millis(-1, false).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlOptions {
    /// Throttle window / debounce inactivity period
    pub delay: Duration,

    /// Fire synchronously on the first call of a window or burst
    pub leading: bool,
}

impl ControlOptions {
    /// Create options from a `Duration` (non-negative by construction)
    pub fn new(delay: Duration, leading: bool) -> Self {
        Self { delay, leading }
    }

    /// Create options from signed milliseconds, rejecting a negative delay
    ///
    /// Clamping silently would hide timing bugs, so a negative delay fails
    /// here, at construction.
    pub fn from_millis(delay_ms: i64, leading: bool) -> CombinatorResult<Self> {
        if delay_ms < 0 {
            return Err(CombinatorError::InvalidDelay(delay_ms));
        }
        Ok(Self::new(Duration::from_millis(delay_ms as u64), leading))
    }

    /// Data-last spelling of [`make_controlled_throttle`]
    pub fn controlled_throttle<A, F>(self, callback: F) -> ControlledThrottle<A, F>
    where
        A: Send + 'static,
        F: FnMut(A) + Send + 'static,
    {
        make_controlled_throttle(callback, self)
    }

    /// Data-last spelling of [`make_controlled_debounce`]
    pub fn controlled_debounce<A, F>(self, callback: F) -> ControlledDebounce<A, F>
    where
        A: Send + 'static,
        F: FnMut(A) + Send + 'static,
    {
        make_controlled_debounce(callback, self)
    }
}

/// Per-instance mutable timing state, owned exclusively by the handle
struct ControlState<A, H, M> {
    machine: M,
    /// Latest arguments, overwritten on every call, taken once per fire
    last_args: Option<A>,
    /// Handle of the armed timer; Some iff the machine is not idle
    timer: Option<H>,
    /// Bumped whenever the armed timer is superseded; stale fires compare
    /// against it and drop themselves
    epoch: u64,
}

struct Shared<A, F, P: TimerPort, M> {
    options: ControlOptions,
    port: P,
    callback: Mutex<F>,
    state: Mutex<ControlState<A, P::Handle, M>>,
}

/// A wrapped function paired with explicit control operations
///
/// Produced by [`make_controlled_throttle`] and
/// [`make_controlled_debounce`]. Cheap to clone; clones share one control
/// cycle. Dropping every clone while a timer is pending orphans the fire:
/// the timer callback holds only a weak reference and does nothing.
pub struct Controlled<A, F, P: TimerPort, M> {
    shared: Arc<Shared<A, F, P, M>>,
}

/// Controlled throttle handle (see [`make_controlled_throttle`])
pub type ControlledThrottle<A, F, P = TokioTimer> = Controlled<A, F, P, ThrottleMachine>;

/// Controlled debounce handle (see [`make_controlled_debounce`])
pub type ControlledDebounce<A, F, P = TokioTimer> = Controlled<A, F, P, DebounceMachine>;

impl<A, F, P: TimerPort, M> Clone for Controlled<A, F, P, M> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A, F, P, M> Controlled<A, F, P, M>
where
    A: Send + 'static,
    F: FnMut(A) + Send + 'static,
    P: TimerPort,
    M: TimingMachine + Send + 'static,
{
    fn new(callback: F, options: ControlOptions, port: P) -> Self {
        Self {
            shared: Arc::new(Shared {
                options,
                port,
                callback: Mutex::new(callback),
                state: Mutex::new(ControlState {
                    machine: M::new(options.leading),
                    last_args: None,
                    timer: None,
                    epoch: 0,
                }),
            }),
        }
    }

    /// Record `args` as the latest pending arguments and advance the
    /// control cycle
    ///
    /// Depending on phase and options this fires the wrapped function
    /// synchronously (leading edge), arms or re-arms the timer, or merely
    /// overwrites the arguments a later trailing fire will use.
    pub fn schedule(&self, args: A) {
        let fired = {
            let mut state = self.lock_state();
            state.last_args = Some(args);
            self.advance(&mut state, TimingInput::Call)
        };

        if let Some(args) = fired {
            trace!("firing on the calling stack (leading edge)");
            let mut callback = self.lock_callback();
            (*callback)(args);
        }
    }

    /// Alias of [`Controlled::schedule`]
    ///
    /// The two operations advance the same state machine identically; this
    /// is the one the plain [`throttle`]/[`debounce`] wrappers expose.
    pub fn invoke(&self, args: A) {
        self.schedule(args);
    }

    /// Tear down the pending timer and reset to the initial phase
    ///
    /// Idempotent, and always safe to call defensively: cancelling an idle
    /// handle is a no-op. Once `cancel` returns, no deferred invocation
    /// from the prior cycle will occur.
    pub fn cancel(&self) {
        let mut state = self.lock_state();
        self.advance(&mut state, TimingInput::Cancel);
        state.last_args = None;
        trace!("control cycle cancelled");
    }

    /// True iff a timer is currently pending
    pub fn is_scheduled(&self) -> bool {
        !self.lock_state().machine.is_idle()
    }

    /// Entry point for the timer port's fire callback
    fn on_timer_fired(&self, armed_epoch: u64) {
        let fired = {
            let mut state = self.lock_state();
            if state.epoch != armed_epoch {
                trace!("stale timer fire dropped (cycle superseded)");
                return;
            }
            state.timer = None;
            state.epoch = state.epoch.wrapping_add(1);

            let fired = self.advance(&mut state, TimingInput::TimerFired);
            if fired.is_none() && state.machine.is_idle() {
                // A leading-mode cycle that settles silently leaves its
                // last recorded arguments unread; drop them with the cycle.
                state.last_args = None;
            }
            fired
        };

        if let Some(args) = fired {
            trace!("firing on timer expiry (trailing edge)");
            let mut callback = self.lock_callback();
            (*callback)(args);
        }
    }

    /// Advance the pure machine and perform the actions it emits
    ///
    /// Returns the arguments to fire with, if any; the caller invokes the
    /// wrapped function after releasing the state lock.
    fn advance(
        &self,
        state: &mut ControlState<A, P::Handle, M>,
        input: TimingInput,
    ) -> Option<A> {
        let (next, actions) = match state.machine.transition(&input) {
            Ok(result) => result,
            Err(err) => {
                // Only a stale timer fire is ever rejected; the epoch
                // check catches those before the machine sees them.
                trace!(%err, "machine rejected input");
                return None;
            }
        };
        state.machine = next;

        let mut fired = None;
        for action in actions {
            match action {
                TimingAction::Fire => fired = state.last_args.take(),
                TimingAction::Arm => self.arm(state),
                TimingAction::Rearm => {
                    self.disarm(state);
                    self.arm(state);
                }
                TimingAction::Disarm => self.disarm(state),
            }
        }
        fired
    }

    fn arm(&self, state: &mut ControlState<A, P::Handle, M>) {
        state.epoch = state.epoch.wrapping_add(1);
        let armed_epoch = state.epoch;
        let weak = Arc::downgrade(&self.shared);

        let handle = self.shared.port.arm(
            self.shared.options.delay,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    Controlled { shared }.on_timer_fired(armed_epoch);
                }
            }),
        );
        state.timer = Some(handle);
    }

    fn disarm(&self, state: &mut ControlState<A, P::Handle, M>) {
        state.epoch = state.epoch.wrapping_add(1);
        if let Some(handle) = state.timer.take() {
            self.shared.port.disarm(handle);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ControlState<A, P::Handle, M>> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_callback(&self) -> MutexGuard<'_, F> {
        self.shared
            .callback
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Takes a function and returns a controlled handle which, when used,
/// suppresses calls to the given function to at most one per `delay`
/// window
///
/// With `leading` set, the first call of a window runs synchronously
/// before the throttling starts; a further call inside the window
/// schedules exactly one trailing run with the latest arguments.
///
/// Uses the tokio timer port: `schedule`/`invoke` must be called from
/// within a tokio runtime. See [`make_controlled_throttle_with`] to supply
/// a different port.
pub fn make_controlled_throttle<A, F>(callback: F, options: ControlOptions) -> ControlledThrottle<A, F>
where
    A: Send + 'static,
    F: FnMut(A) + Send + 'static,
{
    make_controlled_throttle_with(callback, options, TokioTimer)
}

/// [`make_controlled_throttle`] with an explicit timer port
pub fn make_controlled_throttle_with<A, F, P>(
    callback: F,
    options: ControlOptions,
    port: P,
) -> ControlledThrottle<A, F, P>
where
    A: Send + 'static,
    F: FnMut(A) + Send + 'static,
    P: TimerPort,
{
    Controlled::new(callback, options, port)
}

/// Takes a function and returns a controlled handle which, when used, only
/// invokes the given function after a period of inactivity
///
/// With `leading` set, the function is invoked immediately at burst start
/// and the rest of the burst stays silent.
///
/// Uses the tokio timer port: `schedule`/`invoke` must be called from
/// within a tokio runtime. See [`make_controlled_debounce_with`] to supply
/// a different port.
pub fn make_controlled_debounce<A, F>(callback: F, options: ControlOptions) -> ControlledDebounce<A, F>
where
    A: Send + 'static,
    F: FnMut(A) + Send + 'static,
{
    make_controlled_debounce_with(callback, options, TokioTimer)
}

/// [`make_controlled_debounce`] with an explicit timer port
pub fn make_controlled_debounce_with<A, F, P>(
    callback: F,
    options: ControlOptions,
    port: P,
) -> ControlledDebounce<A, F, P>
where
    A: Send + 'static,
    F: FnMut(A) + Send + 'static,
    P: TimerPort,
{
    Controlled::new(callback, options, port)
}

/// Plain throttle: at most one run of `callback` per `delay`, trailing
/// edge only, control handle discarded
pub fn throttle<A, F>(callback: F, delay: Duration) -> impl Fn(A)
where
    A: Send + 'static,
    F: FnMut(A) + Send + 'static,
{
    let controlled = make_controlled_throttle(callback, ControlOptions::new(delay, false));
    move |args: A| controlled.invoke(args)
}

/// Plain debounce: one run of `callback` per burst, `delay` after the
/// burst settles, control handle discarded
pub fn debounce<A, F>(callback: F, delay: Duration) -> impl Fn(A)
where
    A: Send + 'static,
    F: FnMut(A) + Send + 'static,
{
    let controlled = make_controlled_debounce(callback, ControlOptions::new(delay, false));
    move |args: A| controlled.invoke(args)
}
