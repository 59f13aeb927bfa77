// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Throttle Windows
//!
//! Runs arbitrary call/advance/cancel sequences against the real handle
//! on the manual timer port and checks it op-by-op against the reference
//! model: same fires, same timestamps, same arguments, and the
//! one-outstanding-timer invariant throughout.

use std::time::Duration;

use proptest::prelude::*;

use cim_combinators::{make_controlled_throttle_with, ControlOptions, ManualTimer};

use crate::fixtures::Recorder;
use crate::property::models::{op_sequence, Op, ThrottleModel};

const DELAY: Duration = Duration::from_millis(100);

proptest! {
    /// Property: the handle agrees with the reference model at every step
    #[test]
    fn prop_throttle_matches_reference_model(
        ops in op_sequence(),
        leading in any::<bool>(),
    ) {
        let timer = ManualTimer::new();
        let recorder = Recorder::new();
        let handle = make_controlled_throttle_with(
            recorder.callback(&timer),
            ControlOptions::new(DELAY, leading),
            timer.clone(),
        );
        let mut model = ThrottleModel::new(DELAY, leading);

        for op in &ops {
            match op {
                Op::Call(value) => handle.schedule(*value),
                Op::Advance(step_ms) => timer.advance(Duration::from_millis(*step_ms)),
                Op::Cancel => handle.cancel(),
            }
            model.step(op);

            prop_assert_eq!(handle.is_scheduled(), model.armed());
            prop_assert!(timer.pending() <= 1);
            prop_assert_eq!(&recorder.calls(), &model.fires);
        }
    }

    /// Property: cancel ends the cycle - nothing fires afterwards
    #[test]
    fn prop_cancel_quells_the_cycle(
        ops in op_sequence(),
        leading in any::<bool>(),
    ) {
        let timer = ManualTimer::new();
        let recorder = Recorder::new();
        let handle = make_controlled_throttle_with(
            recorder.callback(&timer),
            ControlOptions::new(DELAY, leading),
            timer.clone(),
        );

        for op in &ops {
            match op {
                Op::Call(value) => handle.schedule(*value),
                Op::Advance(step_ms) => timer.advance(Duration::from_millis(*step_ms)),
                Op::Cancel => handle.cancel(),
            }
        }

        handle.cancel();
        let fired_before = recorder.count();

        timer.advance(DELAY * 10);
        prop_assert_eq!(recorder.count(), fired_before);
        prop_assert!(!handle.is_scheduled());
        prop_assert_eq!(timer.pending(), 0);
    }

    /// Property: every fired value was supplied by some call
    #[test]
    fn prop_fired_values_come_from_calls(
        ops in op_sequence(),
        leading in any::<bool>(),
    ) {
        let timer = ManualTimer::new();
        let recorder = Recorder::new();
        let handle = make_controlled_throttle_with(
            recorder.callback(&timer),
            ControlOptions::new(DELAY, leading),
            timer.clone(),
        );

        let mut supplied = Vec::new();
        for op in &ops {
            match op {
                Op::Call(value) => {
                    supplied.push(*value);
                    handle.schedule(*value);
                }
                Op::Advance(step_ms) => timer.advance(Duration::from_millis(*step_ms)),
                Op::Cancel => handle.cancel(),
            }
        }

        for (_, value) in recorder.calls() {
            prop_assert!(supplied.contains(&value));
        }
    }
}
