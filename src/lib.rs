//! # Counterplus
//!
//! Reactive state for a single-screen counter with an auto-increment mode.
//!
//! ## Signals
//!
//! Observable values the UI subscribes to:
//! - `Signal<T>` - a single current value that notifies subscribers when it changes
//! - `ReadSignal<T>` - read-only view handed to observers
//! - `WatchGuard` - keeps a callback subscription alive
//!
//! ## Store
//!
//! - `CounterState` - count, auto mode flag, interval and settings visibility,
//!   plus the seven operations that change them
//! - `TimerState` - whether the auto-increment task is running
//!
//! ```no_run
//! use counterplus::{CounterConfig, CounterState};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> counterplus::Result<()> {
//! let state = CounterState::from_current_runtime(CounterConfig::default())?;
//! let _guard = state.count().watch(|count| println!("Count: {count}"));
//!
//! state.increment();
//! state.toggle_auto_mode();
//! println!("{}", state.auto_mode_notice());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod signal;
pub mod store;
pub mod timer;

// Re-export main types for convenience
pub use config::CounterConfig;
pub use error::{ConfigError, Error, Result};
pub use signal::{ReadSignal, Signal, WatchGuard};
pub use store::{CounterSnapshot, CounterState};
pub use timer::TimerState;
