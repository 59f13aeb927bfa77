// Copyright (c) 2025 - Cowboy AI, Inc.
//! Shared fixtures for the controlled timing suites

use std::sync::{Arc, Mutex};
use std::time::Duration;

use cim_combinators::ManualTimer;

/// Records every invocation of a wrapped callback together with the
/// virtual timestamp it fired at
#[derive(Clone)]
pub struct Recorder<T> {
    calls: Arc<Mutex<Vec<(Duration, T)>>>,
}

impl<T: Send + 'static> Recorder<T> {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Callback suitable for the controlled factories, stamping each call
    /// with the port's current virtual time
    pub fn callback(&self, timer: &ManualTimer) -> impl FnMut(T) + Send + 'static {
        let calls = Arc::clone(&self.calls);
        let timer = timer.clone();
        move |value| calls.lock().unwrap().push((timer.now(), value))
    }

    pub fn calls(&self) -> Vec<(Duration, T)>
    where
        T: Clone,
    {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl<T: Send + 'static> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Millisecond shorthand used throughout the timing scenarios
pub fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}
