//! The counter state store.
//!
//! [`CounterState`] owns the four observable fields of a counter session and
//! the auto-increment timer; all writes go through its operations.

mod counter;

pub use counter::{CounterSnapshot, CounterState};
