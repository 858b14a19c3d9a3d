use std::future::Future;
use std::sync::Arc;

use rocket::tokio::{self, sync::Notify, task::JoinHandle, time::Duration};

/// How often views refresh their data from the API.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// A task that runs once straight away and then repeatedly at a fixed period,
/// until cancelled. Dropping the handle also cancels it.
///
/// Each run is awaited before the next period starts, so runs of the same task
/// never overlap.
pub struct PeriodicTask {
    task_handle: JoinHandle<()>,
    signal: Arc<Notify>,
}

impl PeriodicTask {
    /// Start running `tick` every `period`.
    pub fn spawn<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        // Create the synchronisation signal.
        let signal = Arc::new(Notify::new());

        let task_signal = signal.clone();
        let task_handle = tokio::spawn(async move {
            loop {
                tick().await;
                // Wait for the period to elapse, or for an early trigger.
                tokio::select! {
                    _ = tokio::time::sleep(period) => {}
                    _ = task_signal.notified() => {}
                }
            }
        });

        Self {
            task_handle,
            signal,
        }
    }

    /// Run the next tick now instead of waiting for the rest of the period.
    pub fn trigger_now(&self) {
        self.signal.notify_one();
    }

    /// Has the task stopped, e.g. because `tick` panicked?
    pub fn is_finished(&self) -> bool {
        self.task_handle.is_finished()
    }

    /// Stop the task. A tick in progress is abandoned at its next await point.
    pub fn cancel(self) {
        self.task_handle.abort();
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.task_handle.abort();
    }
}
