use std::future::Future;
use std::sync::Arc;

use rocket::tokio::{self, sync::Notify, task::JoinHandle, time::Duration};

/// A task run repeatedly on a fixed period until cancelled.
/// A run can also be triggered early, which restarts the period.
pub struct PeriodicTask {
    handle: JoinHandle<()>,
    signal: Arc<Notify>,
}

impl PeriodicTask {
    /// Start running `task` every `period`. The first run happens one period
    /// from now, or on the first trigger.
    pub fn new<F, Fut>(period: Duration, mut task: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let signal = Arc::new(Notify::new());

        let task_signal = signal.clone();
        let handle = tokio::spawn(async move {
            loop {
                // Either the period elapses or we are woken early; run either way.
                let _ = tokio::time::timeout(period, task_signal.notified()).await;
                task().await;
            }
        });

        Self { handle, signal }
    }

    /// Run the task now instead of waiting for the period to elapse.
    pub fn trigger_now(&self) {
        self.signal.notify_one();
    }

    /// Stop the task. A run in progress is abandoned at its next await point.
    pub async fn cancel(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rocket::tokio::sync::mpsc;

    use super::*;

    #[rocket::async_test]
    async fn runs_on_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let task = PeriodicTask::new(Duration::from_millis(10), move || {
            let tx = tx.clone();
            async move {
                let _ = tx.send(());
            }
        });

        for _ in 0..3 {
            tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .unwrap()
                .unwrap();
        }
        task.cancel().await;
    }

    #[rocket::async_test]
    async fn trigger_and_cancel() {
        let runs = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let counter = runs.clone();
        let task = PeriodicTask::new(Duration::from_secs(3600), move || {
            let tx = tx.clone();
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                let _ = tx.send(());
            }
        });

        task.trigger_now();
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        task.cancel().await;
        // The sender lived in the task, so the channel is now closed.
        assert_eq!(rx.recv().await, None);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}
