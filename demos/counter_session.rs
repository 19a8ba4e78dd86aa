//! Headless counter session driving every operation the counter screen offers
//!
//! Run with an optional TOML config path:
//! `RUST_LOG=counterplus=debug cargo run --example counter_session -- counter.toml`

use std::time::Duration;
use counterplus::{CounterConfig, CounterState};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Counter Session ===\n");

    let config = match std::env::args().nth(1) {
        Some(path) => CounterConfig::load(path)?,
        None => CounterConfig {
            initial_interval_secs: 1,
            ..CounterConfig::default()
        },
    };

    println!("1. Starting session with {config:?}");
    let state = CounterState::from_current_runtime(config)?;

    // Subscribers get the current value right away
    println!("\n2. Subscribing to all fields");
    let _count = state.count().watch(|count| println!("   [Count] {count}"));
    let _auto = state.auto_mode().watch(|on| {
        println!("   [Auto Mode] {}", if on { "ON" } else { "OFF" })
    });
    let _interval = state
        .interval()
        .watch(|secs| println!("   [Interval] {secs}s"));
    let _settings = state
        .settings_visible()
        .watch(|visible| println!("   [Settings] {}", if visible { "shown" } else { "hidden" }));

    println!("\n3. +1, +1, -1");
    state.increment();
    state.increment();
    state.decrement();

    println!("\n4. Reset");
    state.reset();

    println!("\n5. Opening settings and adjusting the interval");
    state.toggle_settings_visible();
    state.increase_interval();
    state.decrease_interval();
    state.decrease_interval();
    state.toggle_settings_visible();

    println!("\n6. Starting auto mode");
    state.toggle_auto_mode();
    println!("   [Notice] {}", state.auto_mode_notice());
    tokio::time::sleep(Duration::from_millis(3_500)).await;

    println!("\n7. Stopping auto mode");
    state.toggle_auto_mode();
    println!("   [Notice] {}", state.auto_mode_notice());
    tokio::time::sleep(Duration::from_millis(1_500)).await;

    println!("\n8. Final state: {:?}", state.snapshot());

    println!("\n✓ Counter session complete!");
    Ok(())
}
