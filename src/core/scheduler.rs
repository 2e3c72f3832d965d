use std::time::Duration;

use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at},
};

use crate::{
    config::MAX_INTERVAL_SECS,
    core::fetcher::{FetchOutcome, FetchRunner},
};

/// The one live repeating timer. Dropping it cancels the timer.
#[derive(Debug)]
pub struct ScheduleHandle {
    task: JoinHandle<()>,
}

impl ScheduleHandle {
    fn cancel(self) {
        drop(self);
    }
}

impl Drop for ScheduleHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[derive(Debug)]
pub enum ScheduleState {
    Stopped,
    Running {
        interval_secs: u64,
        handle: ScheduleHandle,
    },
}

/// Owns the repeating fetch timer.
///
/// All transitions go through `start`, `stop` and `restart`, which guarantees
/// there is never more than one timer alive.
pub struct Scheduler {
    runner: FetchRunner,
    state: ScheduleState,
}

impl Scheduler {
    pub fn new(runner: FetchRunner) -> Self {
        Self {
            runner,
            state: ScheduleState::Stopped,
        }
    }

    pub fn runner(&self) -> &FetchRunner {
        &self.runner
    }

    pub fn state(&self) -> &ScheduleState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ScheduleState::Running { .. })
    }

    pub fn interval_secs(&self) -> Option<u64> {
        match self.state {
            ScheduleState::Running { interval_secs, .. } => Some(interval_secs),
            ScheduleState::Stopped => None,
        }
    }

    /// Starts a timer that fetches every `interval_secs`, the first tick one
    /// full period from now. A timer that is already running is cancelled
    /// first. The interval is clamped to `1..=MAX_INTERVAL_SECS`.
    pub fn start(&mut self, interval_secs: u64) {
        self.stop();

        let interval_secs = interval_secs.clamp(1, MAX_INTERVAL_SECS);
        let period = Duration::from_secs(interval_secs);
        let Some(first_tick) = Instant::now().checked_add(period) else {
            eprintln!("❌ Cannot schedule a fetch {interval_secs}s from now, timer not started");
            return;
        };
        let runner = self.runner.clone();

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(first_tick, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let _ = runner.run();
            }
        });

        self.state = ScheduleState::Running {
            interval_secs,
            handle: ScheduleHandle { task },
        };
    }

    /// Cancels the timer. Returns whether one was running.
    pub fn stop(&mut self) -> bool {
        match std::mem::replace(&mut self.state, ScheduleState::Stopped) {
            ScheduleState::Running { handle, .. } => {
                handle.cancel();
                true
            }
            ScheduleState::Stopped => false,
        }
    }

    pub fn restart(&mut self, interval_secs: u64) {
        self.stop();
        self.start(interval_secs);
    }

    /// Runs one fetch right away, outside the timer.
    pub fn fetch_now(&self) -> JoinHandle<FetchOutcome> {
        self.runner.run()
    }
}
