// Copyright (c) 2025 - Cowboy AI, Inc.
//! Manual Timer Port - deterministic virtual clock for tests
//!
//! Time only moves when [`ManualTimer::advance`] is called. Armed timers
//! are fired in deadline order as virtual time crosses them, with the
//! registry lock released around each callback so a firing callback may
//! re-enter the port (arm, disarm, query) freely.
//!
//! # Example
//!
//! ```rust,ignore
//! let timer = ManualTimer::new();
//! let handle = make_controlled_debounce_with(on_query, options, timer.clone());
//!
//! handle.schedule("cim".to_string());
//! timer.advance(Duration::from_millis(300)); // trailing edge fires here
//! ```

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::trace;

use super::{TimerCallback, TimerPort};

struct ArmedTimer {
    id: u64,
    deadline: Duration,
    callback: TimerCallback,
}

struct Registry {
    now: Duration,
    next_id: u64,
    armed: Vec<ArmedTimer>,
}

/// Deterministic timer port driven by explicit `advance` calls
///
/// Clones share one virtual clock, so a test can hand a clone to the
/// control shell and keep one for driving time.
#[derive(Clone)]
pub struct ManualTimer {
    registry: Arc<Mutex<Registry>>,
}

impl ManualTimer {
    /// Create a port with virtual time at zero and no armed timers
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                now: Duration::ZERO,
                next_id: 0,
                armed: Vec::new(),
            })),
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of armed, not-yet-fired timers
    pub fn pending(&self) -> usize {
        self.lock().armed.len()
    }

    /// Move virtual time forward by `step`, firing every timer whose
    /// deadline is crossed, in deadline order (arm order breaks ties)
    ///
    /// While a callback runs, virtual time reads as that callback's
    /// deadline, so timestamps recorded inside a fire match the moment the
    /// timer was due rather than the end of the whole step.
    pub fn advance(&self, step: Duration) {
        let target = self.lock().now + step;

        loop {
            let callback = {
                let mut registry = self.lock();
                let due = registry
                    .armed
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.deadline <= target)
                    .min_by_key(|(_, timer)| (timer.deadline, timer.id))
                    .map(|(index, _)| index);

                match due {
                    Some(index) => {
                        let timer = registry.armed.swap_remove(index);
                        registry.now = timer.deadline;
                        trace!(
                            id = timer.id,
                            at_ms = timer.deadline.as_millis() as u64,
                            "manual timer fired"
                        );
                        timer.callback
                    }
                    None => {
                        registry.now = target;
                        break;
                    }
                }
            };

            // Lock released: the callback may arm or disarm timers.
            callback();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ManualTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ManualTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.lock();
        f.debug_struct("ManualTimer")
            .field("now", &registry.now)
            .field("pending", &registry.armed.len())
            .finish()
    }
}

impl TimerPort for ManualTimer {
    type Handle = u64;

    fn arm(&self, delay: Duration, callback: TimerCallback) -> Self::Handle {
        let mut registry = self.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        let deadline = registry.now + delay;
        registry.armed.push(ArmedTimer {
            id,
            deadline,
            callback,
        });
        trace!(id, deadline_ms = deadline.as_millis() as u64, "manual timer armed");
        id
    }

    fn disarm(&self, handle: Self::Handle) {
        let mut registry = self.lock();
        registry.armed.retain(|timer| timer.id != handle);
    }
}
