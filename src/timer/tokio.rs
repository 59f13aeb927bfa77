// Copyright (c) 2025 - Cowboy AI, Inc.
//! Tokio-backed Timer Port
//!
//! Arms a one-shot timer by spawning a task that sleeps on the tokio clock
//! and then runs the callback; disarming aborts the task. Under a paused
//! test clock (`start_paused`), armed timers fire as virtual time advances,
//! which keeps async integration tests wait-free.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

use super::{TimerCallback, TimerPort};

/// Production timer port on the tokio runtime
///
/// Arming requires a runtime context: the factories in [`crate::control`]
/// that default to this port must have their `schedule`/`invoke` called
/// from within a tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

impl TimerPort for TokioTimer {
    type Handle = JoinHandle<()>;

    fn arm(&self, delay: Duration, callback: TimerCallback) -> Self::Handle {
        trace!(delay_ms = delay.as_millis() as u64, "arming tokio timer");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        })
    }

    fn disarm(&self, handle: Self::Handle) {
        trace!("disarming tokio timer");
        handle.abort();
    }
}
