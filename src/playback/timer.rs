use std::ops::ControlFlow;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::trace;

/// Shortest period a timer accepts; a zero period would spin
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A periodic task that stops when cancelled or dropped.
///
/// The callback runs once per period, starting one period after spawn,
/// until it returns `ControlFlow::Break`.
pub struct TimerHandle {
    name: &'static str,
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Spawn a timer on the current Tokio runtime
    pub fn spawn<F>(name: &'static str, period: Duration, mut on_fire: F) -> Self
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let period = period.max(MIN_PERIOD);
        let first_fire = Instant::now() + period;

        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(first_fire, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                trace!(timer = name, "fire");
                if on_fire().is_break() {
                    break;
                }
            }
        });

        Self { name, task }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True once the callback asked to stop or the timer was cancelled
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the timer. It will not fire again after this returns.
    pub fn cancel(self) {
        self.task.abort();
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
