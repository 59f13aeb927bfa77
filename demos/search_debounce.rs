// Copyright (c) 2025 - Cowboy AI, Inc.
//! Controlled Timing Example
//!
//! This example demonstrates the controlled timing primitives on the tokio
//! timer port:
//!
//! 1. **Debounced search** - keystrokes settle into a single query
//! 2. **Throttled progress** - a chatty producer reports at most once per
//!    window, leading edge first
//! 3. **Cancellation** - an in-flight cycle torn down before it fires
//!
//! Run with `RUST_LOG=cim_combinators=trace` to watch the arm/fire/cancel
//! decisions as they happen.

use std::time::Duration;

use cim_combinators::{make_controlled_debounce, make_controlled_throttle, ControlOptions};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Controlled Timing Example ===\n");

    // === Example 1: Debounced search-as-you-type ===
    println!("=== Example 1: Debounced search ===");

    let search = make_controlled_debounce(
        |query: String| println!("  searching for {query:?}"),
        ControlOptions::new(Duration::from_millis(300), false),
    );

    for keystroke in ["c", "ci", "cim"] {
        search.schedule(keystroke.to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    println!("  (typing settled, waiting for the trailing edge)");
    tokio::time::sleep(Duration::from_millis(400)).await;

    // === Example 2: Throttled progress reporting ===
    println!("\n=== Example 2: Throttled progress ===");

    let progress = make_controlled_throttle(
        |percent: u32| println!("  progress: {percent}%"),
        ControlOptions::new(Duration::from_millis(250), true),
    );

    for step in 0..=10 {
        progress.schedule(step * 10);
        tokio::time::sleep(Duration::from_millis(60)).await;
    }
    tokio::time::sleep(Duration::from_millis(300)).await;

    // === Example 3: Cancellation ===
    println!("\n=== Example 3: Cancellation ===");

    let autosave = make_controlled_debounce(
        |document: &str| println!("  saving {document} (should not happen)"),
        ControlOptions::new(Duration::from_millis(200), false),
    );

    autosave.schedule("draft.md");
    println!("  scheduled: {}", autosave.is_scheduled());
    autosave.cancel();
    println!("  after cancel: {}", autosave.is_scheduled());

    tokio::time::sleep(Duration::from_millis(400)).await;
    println!("\nDone.");
}
