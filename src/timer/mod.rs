// Copyright (c) 2025 - Cowboy AI, Inc.
//! Timer Port - one-shot delayed callbacks behind a trait
//!
//! The timing state machines never talk to a clock directly. They consume
//! this port, which models the single-shot delayed-callback facility of
//! whatever host environment the primitives run in:
//!
//! - [`TokioTimer`]: production port backed by the tokio clock
//! - [`ManualTimer`]: deterministic port for tests, driven by
//!   [`ManualTimer::advance`] with no wall-clock waits
//!
//! The port guarantees only monotonic ordering and
//! at-least-the-requested-delay semantics; scheduling granularity is the
//! implementation's concern.

mod manual;
mod tokio;

pub use manual::ManualTimer;
pub use self::tokio::TokioTimer;

use std::time::Duration;

/// One-shot callback scheduled by the timer port
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Host-supplied facility for "run callback after `delay`"
///
/// `disarm` of a handle whose callback already fired (or which was already
/// disarmed) must be a no-op; the control shell relies on this to make
/// cancellation safe to call defensively.
pub trait TimerPort: Send + Sync + 'static {
    /// Opaque handle to a pending one-shot timer
    type Handle: Send + 'static;

    /// Schedule `callback` to run once, no earlier than `delay` from now
    fn arm(&self, delay: Duration, callback: TimerCallback) -> Self::Handle;

    /// Cancel a still-pending callback; no-op if it already fired
    fn disarm(&self, handle: Self::Handle);
}
