use crate::config::CounterConfig;
use crate::error::Result;
use crate::signal::{ReadSignal, Signal};
use crate::timer::{AutoIncrementTimer, TickTarget, TimerState};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::runtime::Handle;
use tracing::{debug, info};

/// Plain copy of the observable fields at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub count: i64,
    pub auto_mode: bool,
    pub interval_secs: u32,
    pub settings_visible: bool,
}

/// State of one counter session.
///
/// Observers get read-only views of the fields and drive changes through the
/// operations below, none of which block or fail. Dropping the state cancels
/// the auto-increment task.
pub struct CounterState {
    count: Signal<i64>,
    auto_mode: Signal<bool>,
    interval_secs: Signal<u32>,
    settings_visible: Signal<bool>,
    min_interval_secs: u32,
    max_interval_secs: u32,
    timer: Mutex<AutoIncrementTimer>,
}

impl CounterState {
    /// Create a session whose timer runs on `runtime`.
    pub fn new(config: CounterConfig, runtime: Handle) -> Result<Self> {
        config.validate()?;

        let count = Signal::new(config.initial_count);
        let auto_mode = Signal::new(false);
        let interval_secs = Signal::new(config.initial_interval_secs);
        let timer = AutoIncrementTimer::new(
            runtime,
            TickTarget {
                count: count.clone(),
                auto_mode: auto_mode.clone(),
                interval_secs: interval_secs.clone(),
            },
        );

        debug!(?config, "counter session created");
        Ok(Self {
            count,
            auto_mode,
            interval_secs,
            settings_visible: Signal::new(false),
            min_interval_secs: config.min_interval_secs,
            max_interval_secs: config.max_interval_secs,
            timer: Mutex::new(timer),
        })
    }

    /// Create a session on the tokio runtime running on this thread.
    pub fn from_current_runtime(config: CounterConfig) -> Result<Self> {
        let runtime = Handle::try_current()?;
        Self::new(config, runtime)
    }

    /// Read-only view of the count.
    pub fn count(&self) -> ReadSignal<i64> {
        self.count.read_only()
    }

    /// Read-only view of the auto mode flag.
    pub fn auto_mode(&self) -> ReadSignal<bool> {
        self.auto_mode.read_only()
    }

    /// Read-only view of the auto-increment interval, in seconds.
    pub fn interval(&self) -> ReadSignal<u32> {
        self.interval_secs.read_only()
    }

    /// Read-only view of the settings panel visibility.
    pub fn settings_visible(&self) -> ReadSignal<bool> {
        self.settings_visible.read_only()
    }

    /// Increase the count by one. The count wraps at the `i64` bounds.
    pub fn increment(&self) {
        self.count.update(|count| *count = count.wrapping_add(1));
        debug!(count = self.count.get(), "increment");
    }

    /// Decrease the count by one. The count may go negative.
    pub fn decrement(&self) {
        self.count.update(|count| *count = count.wrapping_sub(1));
        debug!(count = self.count.get(), "decrement");
    }

    /// Set the count back to zero.
    pub fn reset(&self) {
        self.count.set(0);
        debug!("count reset");
    }

    /// Lengthen the auto-increment interval by one second, up to the maximum.
    pub fn increase_interval(&self) {
        let max = self.max_interval_secs;
        self.interval_secs
            .update(|secs| *secs = secs.saturating_add(1).min(max));
        debug!(interval_secs = self.interval_secs.get(), "interval increased");
    }

    /// Shorten the auto-increment interval by one second, down to the minimum.
    pub fn decrease_interval(&self) {
        let min = self.min_interval_secs;
        self.interval_secs
            .update(|secs| *secs = secs.saturating_sub(1).max(min));
        debug!(interval_secs = self.interval_secs.get(), "interval decreased");
    }

    /// Show or hide the settings panel.
    pub fn toggle_settings_visible(&self) {
        self.settings_visible.update(|visible| *visible = !*visible);
        debug!(visible = self.settings_visible.get(), "settings toggled");
    }

    /// Flip auto mode, starting or stopping the timer to match.
    pub fn toggle_auto_mode(&self) {
        self.auto_mode.update(|on| *on = !*on);

        // Follow the flag as it is now: a subscriber may have toggled it again.
        let mut timer = self.timer.lock();
        if self.auto_mode.get() {
            timer.start();
            info!(interval_secs = self.interval_secs.get(), "auto mode on");
        } else {
            timer.stop();
            info!("auto mode off");
        }
    }

    /// Feedback text for the current auto mode setting.
    pub fn auto_mode_notice(&self) -> &'static str {
        if self.auto_mode.get() {
            "Auto mode ON"
        } else {
            "Auto mode OFF"
        }
    }

    /// Whether the auto-increment task is running.
    pub fn timer_state(&self) -> TimerState {
        self.timer.lock().state()
    }

    /// Copy the current field values.
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            count: self.count.get(),
            auto_mode: self.auto_mode.get(),
            interval_secs: self.interval_secs.get(),
            settings_visible: self.settings_visible.get(),
        }
    }
}

impl fmt::Debug for CounterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CounterState")
            .field("state", &self.snapshot())
            .field("timer", &self.timer_state())
            .finish()
    }
}

impl Drop for CounterState {
    fn drop(&mut self) {
        self.timer.get_mut().stop();
        info!(count = self.count.get(), "counter session ended");
    }
}
