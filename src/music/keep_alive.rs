use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Periodic voice connection probe. The task is aborted when the handle drops.
#[derive(Debug)]
pub struct KeepAlive {
    task: JoinHandle<()>,
}

impl KeepAlive {
    /// Ticks every `interval` and calls `probe`; the task ends as soon as the
    /// probe reports the connection gone, after running `on_lost`.
    pub fn spawn<P, Fut, L, LFut>(interval: Duration, mut probe: P, on_lost: L) -> Self
    where
        P: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send,
        L: FnOnce() -> LFut + Send + 'static,
        LFut: Future<Output = ()> + Send,
    {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if !probe().await {
                    on_lost().await;
                    return;
                }
            }
        });
        Self { task }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn cancel(self) {
        self.task.abort();
    }
}

impl Drop for KeepAlive {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_probe_fails() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let lost = Arc::new(AtomicUsize::new(0));

        let probe_ticks = Arc::clone(&ticks);
        let lost_count = Arc::clone(&lost);
        let keep_alive = KeepAlive::spawn(
            Duration::from_secs(30),
            move || {
                let ticks = Arc::clone(&probe_ticks);
                async move { ticks.fetch_add(1, Ordering::SeqCst) < 2 }
            },
            move || async move {
                lost_count.fetch_add(1, Ordering::SeqCst);
            },
        );

        tokio::time::sleep(Duration::from_secs(100)).await;
        tokio::task::yield_now().await;

        assert_eq!(ticks.load(Ordering::SeqCst), 3);
        assert_eq!(lost.load(Ordering::SeqCst), 1);
        assert!(!keep_alive.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_task() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let probe_ticks = Arc::clone(&ticks);
        let keep_alive = KeepAlive::spawn(
            Duration::from_secs(30),
            move || {
                let ticks = Arc::clone(&probe_ticks);
                async move {
                    ticks.fetch_add(1, Ordering::SeqCst);
                    true
                }
            },
            || async {},
        );

        tokio::time::sleep(Duration::from_secs(31)).await;
        drop(keep_alive);
        tokio::time::sleep(Duration::from_secs(120)).await;

        assert_eq!(ticks.load(Ordering::SeqCst), 1);
    }
}
