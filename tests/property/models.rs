// Copyright (c) 2025 - Cowboy AI, Inc.
//! Reference models for the timing contracts
//!
//! Straight-line executable restatements of the throttle and debounce
//! contracts, stepped op-by-op alongside the real handles. The models
//! track virtual time themselves, so a divergence in fire count, fire
//! time, or fired arguments fails the comparison immediately.

use std::time::Duration;

use proptest::prelude::*;

/// One step of a control scenario
#[derive(Debug, Clone)]
pub enum Op {
    /// `schedule` with a payload
    Call(u32),
    /// Advance virtual time by the given milliseconds
    Advance(u64),
    /// `cancel`
    Cancel,
}

pub fn op_sequence() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        3 => (0u32..1000).prop_map(Op::Call),
        3 => (0u64..250).prop_map(Op::Advance),
        1 => Just(Op::Cancel),
    ];
    prop::collection::vec(op, 0..60)
}

/// Reference model of the throttle contract
///
/// One window per burst of activity; the window opens on a call in idle,
/// never extends, and owes a trailing fire iff a call landed inside it.
pub struct ThrottleModel {
    delay: Duration,
    leading: bool,
    now: Duration,
    window_end: Option<Duration>,
    trailing: Option<u32>,
    pub fires: Vec<(Duration, u32)>,
}

impl ThrottleModel {
    pub fn new(delay: Duration, leading: bool) -> Self {
        Self {
            delay,
            leading,
            now: Duration::ZERO,
            window_end: None,
            trailing: None,
            fires: Vec::new(),
        }
    }

    pub fn armed(&self) -> bool {
        self.window_end.is_some()
    }

    pub fn step(&mut self, op: &Op) {
        match op {
            Op::Call(value) => {
                if self.window_end.is_none() {
                    if self.leading {
                        self.fires.push((self.now, *value));
                    } else {
                        self.trailing = Some(*value);
                    }
                    self.window_end = Some(self.now + self.delay);
                } else {
                    self.trailing = Some(*value);
                }
            }
            Op::Advance(step_ms) => {
                let target = self.now + Duration::from_millis(*step_ms);
                if let Some(end) = self.window_end {
                    if end <= target {
                        if let Some(value) = self.trailing.take() {
                            self.fires.push((end, value));
                        }
                        self.window_end = None;
                    }
                }
                self.now = target;
            }
            Op::Cancel => {
                self.window_end = None;
                self.trailing = None;
            }
        }
    }
}

/// Reference model of the debounce contract
///
/// Every call pushes the settling deadline out by `delay`; the burst
/// fires once, either at its start (leading) or at the deadline with the
/// final arguments (trailing).
pub struct DebounceModel {
    delay: Duration,
    leading: bool,
    now: Duration,
    deadline: Option<Duration>,
    trailing: Option<u32>,
    pub fires: Vec<(Duration, u32)>,
}

impl DebounceModel {
    pub fn new(delay: Duration, leading: bool) -> Self {
        Self {
            delay,
            leading,
            now: Duration::ZERO,
            deadline: None,
            trailing: None,
            fires: Vec::new(),
        }
    }

    pub fn armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn step(&mut self, op: &Op) {
        match op {
            Op::Call(value) => {
                if self.deadline.is_none() && self.leading {
                    self.fires.push((self.now, *value));
                }
                if !self.leading {
                    self.trailing = Some(*value);
                }
                self.deadline = Some(self.now + self.delay);
            }
            Op::Advance(step_ms) => {
                let target = self.now + Duration::from_millis(*step_ms);
                if let Some(deadline) = self.deadline {
                    if deadline <= target {
                        if let Some(value) = self.trailing.take() {
                            self.fires.push((deadline, value));
                        }
                        self.deadline = None;
                    }
                }
                self.now = target;
            }
            Op::Cancel => {
                self.deadline = None;
                self.trailing = None;
            }
        }
    }
}
