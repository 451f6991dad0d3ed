use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, MissedTickBehavior};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Periodic tick source backed by a single tokio task.
///
/// At most one task is live at a time. The task ends on its own once the
/// callback returns `false`, and is aborted by `stop` or on drop.
/// `start` must be called from within a tokio runtime.
#[derive(Debug)]
pub struct TickDriver {
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl TickDriver {
    /// `period` is raised to 1ms if smaller; tokio intervals reject zero.
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(MIN_PERIOD),
            handle: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Spawn the tick task. The first fire is one period from now; each
    /// fire passes the instant the callback actually ran, not the interval
    /// deadline, so late or bunched wakeups stay visible to the caller.
    /// Returns `false` (and spawns nothing) when a task is already live.
    pub fn start<F>(&mut self, mut on_tick: F) -> bool
    where
        F: FnMut(Instant) -> bool + Send + 'static,
    {
        if self.is_running() {
            tracing::debug!("tick driver already running");
            return false;
        }
        let period = self.period;
        self.handle = Some(tokio::spawn(async move {
            let mut interval = interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !on_tick(tokio::time::Instant::now().into_std()) {
                    tracing::debug!("tick driver finished");
                    break;
                }
            }
        }));
        tracing::debug!(period_ms = period.as_millis() as u64, "tick driver started");
        true
    }

    /// Abort the tick task. Returns `false` when there was none.
    pub fn stop(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                tracing::debug!("tick driver stopped");
                true
            }
            None => false,
        }
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
