//! Observable values.
//!
//! A [`Signal`] holds a single current value and pushes every change to its
//! subscribers:
//! - callback subscribers registered with `watch`, kept alive by a [`WatchGuard`]
//! - async consumers through a `tokio::sync::watch` receiver from `changes`

mod signal;

pub use signal::{ReadSignal, Signal, WatchGuard};
