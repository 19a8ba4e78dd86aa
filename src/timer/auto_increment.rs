use crate::signal::Signal;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Whether an auto-increment task is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
}

/// Fields the timer task reads and writes.
#[derive(Clone)]
pub(crate) struct TickTarget {
    pub(crate) count: Signal<i64>,
    pub(crate) auto_mode: Signal<bool>,
    pub(crate) interval_secs: Signal<u32>,
}

/// Owner of the single auto-increment task.
///
/// Every cancel bumps `epoch` under its lock, and a task only increments while
/// holding that lock with its own epoch still current. A task that already
/// woke from its wait can therefore never apply a tick after `stop` returns.
pub(crate) struct AutoIncrementTimer {
    runtime: Handle,
    target: TickTarget,
    epoch: Arc<Mutex<u64>>,
    task: Option<JoinHandle<()>>,
}

impl AutoIncrementTimer {
    pub(crate) fn new(runtime: Handle, target: TickTarget) -> Self {
        Self {
            runtime,
            target,
            epoch: Arc::new(Mutex::new(0)),
            task: None,
        }
    }

    /// Cancel any running task and schedule a fresh one.
    pub(crate) fn start(&mut self) {
        if self.cancel() {
            debug!("replacing running auto-increment task");
        }
        let epoch = *self.epoch.lock();
        // The first wait is fixed here, not when the task is first polled.
        let secs = self.target.interval_secs.get();
        let first_deadline = Instant::now() + interval(secs);
        let task = run(self.target.clone(), Arc::clone(&self.epoch), epoch, first_deadline);
        self.task = Some(self.runtime.spawn(task));
        debug!(epoch, interval_secs = secs, "auto-increment timer started");
    }

    /// Cancel the running task, if any.
    pub(crate) fn stop(&mut self) {
        if self.cancel() {
            debug!("auto-increment timer stopped");
        }
    }

    pub(crate) fn state(&self) -> TimerState {
        match &self.task {
            Some(task) if !task.is_finished() => TimerState::Running,
            _ => TimerState::Idle,
        }
    }

    fn cancel(&mut self) -> bool {
        *self.epoch.lock() += 1;
        match self.task.take() {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }
}

impl Drop for AutoIncrementTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn interval(secs: u32) -> Duration {
    Duration::from_secs(u64::from(secs))
}

async fn run(target: TickTarget, gate: Arc<Mutex<u64>>, epoch: u64, first_deadline: Instant) {
    let mut deadline = first_deadline;
    loop {
        tokio::time::sleep_until(deadline).await;
        if !tick(&target, &gate, epoch) {
            break;
        }
        // Read fresh each cycle so interval edits apply from the next wait on.
        deadline = Instant::now() + interval(target.interval_secs.get());
    }
}

/// Apply one increment. Returns false when the task should end.
fn tick(target: &TickTarget, gate: &Mutex<u64>, epoch: u64) -> bool {
    let changed = {
        let current = gate.lock();
        if *current != epoch {
            trace!(epoch, current = *current, "tick suppressed: task cancelled");
            return false;
        }
        if !target.auto_mode.get() {
            trace!(epoch, "tick suppressed: auto mode off");
            return false;
        }
        target.count.apply(|count| *count = count.wrapping_add(1))
    };
    // Callbacks run outside the gate; they may stop the timer themselves.
    if changed {
        target.count.notify();
    }
    debug!(count = target.count.get(), "auto-increment tick");
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(interval: u32) -> TickTarget {
        TickTarget {
            count: Signal::new(0),
            auto_mode: Signal::new(true),
            interval_secs: Signal::new(interval),
        }
    }

    async fn advance(millis: u64) {
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent() {
        let mut timer = AutoIncrementTimer::new(Handle::current(), target(1));
        assert_eq!(timer.state(), TimerState::Idle);
        timer.stop();
        timer.stop();
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_keeps_a_single_task() {
        let fields = target(2);
        let mut timer = AutoIncrementTimer::new(Handle::current(), fields.clone());

        timer.start();
        advance(1_000).await;
        timer.start();
        assert_eq!(timer.state(), TimerState::Running);

        // The first task would have fired at 2s; only the second one, due at 3s, runs.
        advance(1_500).await;
        assert_eq!(fields.count.get(), 0);
        advance(1_000).await;
        assert_eq!(fields.count.get(), 1);
        advance(2_000).await;
        assert_eq!(fields.count.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn task_ends_when_auto_mode_turns_off_mid_wait() {
        let fields = target(3);
        let mut timer = AutoIncrementTimer::new(Handle::current(), fields.clone());

        timer.start();
        advance(1_000).await;
        fields.auto_mode.set(false);
        advance(2_500).await;

        assert_eq!(fields.count.get(), 0);
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn first_wait_uses_interval_read_at_start() {
        let fields = target(3);
        let mut timer = AutoIncrementTimer::new(Handle::current(), fields.clone());

        timer.start();
        fields.interval_secs.set(1);

        advance(1_500).await;
        assert_eq!(fields.count.get(), 0);
        advance(1_600).await;
        assert_eq!(fields.count.get(), 1);
        // Later cycles pick up the shorter interval.
        advance(1_000).await;
        assert_eq!(fields.count.get(), 2);
    }

    #[test]
    fn tick_wraps_at_max() {
        let fields = target(1);
        fields.count.set(i64::MAX);
        let gate = Mutex::new(0);

        assert!(tick(&fields, &gate, 0));
        assert_eq!(fields.count.get(), i64::MIN);
    }

    #[test]
    fn stale_epoch_suppresses_tick() {
        let fields = target(1);
        let gate = Mutex::new(4);

        assert!(!tick(&fields, &gate, 3));
        assert_eq!(fields.count.get(), 0);

        assert!(tick(&fields, &gate, 4));
        assert_eq!(fields.count.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_timer_cancels_task() {
        let fields = target(1);
        let mut timer = AutoIncrementTimer::new(Handle::current(), fields.clone());
        timer.start();
        drop(timer);

        advance(5_000).await;
        assert_eq!(fields.count.get(), 0);
    }
}
