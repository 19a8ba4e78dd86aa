//! Auto-increment timer.
//!
//! A two-state machine (idle, running) driving one tokio task that waits the
//! configured interval and bumps the count while auto mode stays on.

mod auto_increment;

pub(crate) use auto_increment::{AutoIncrementTimer, TickTarget};
pub use auto_increment::TimerState;
