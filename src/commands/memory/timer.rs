use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

pub const TICK: Duration = Duration::from_secs(1);

/// Counts whole seconds while a game is running.
///
/// At most one ticking task exists per timer. Each run gets its own counter, so
/// an aborted task that was mid-increment can never bleed into the next game.
#[derive(Debug, Default)]
pub struct GameTimer {
    elapsed: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl GameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels any previous run and starts counting from zero.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn start(&mut self) {
        self.stop();

        let counter = Arc::new(AtomicU64::new(0));
        self.elapsed = Arc::clone(&counter);
        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + TICK, TICK);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                counter.fetch_add(1, Ordering::Relaxed);
            }
        }));
    }

    /// Freezes the counter. Stopping a stopped timer does nothing.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            // Detach the frozen value from the aborted task.
            let value = self.elapsed.load(Ordering::Relaxed);
            self.elapsed = Arc::new(AtomicU64::new(value));
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed.load(Ordering::Relaxed)
    }
}

impl Drop for GameTimer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn counts_one_per_second() {
        let mut timer = GameTimer::new();
        timer.start();
        sleep(Duration::from_millis(3_500)).await;
        assert_eq!(timer.elapsed_seconds(), 3);
        assert!(timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_freezes_and_is_idempotent() {
        let mut timer = GameTimer::new();
        timer.start();
        sleep(Duration::from_millis(2_500)).await;
        timer.stop();
        timer.stop();
        sleep(Duration::from_secs(5)).await;
        assert_eq!(timer.elapsed_seconds(), 2);
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_previous_run() {
        let mut timer = GameTimer::new();
        timer.start();
        sleep(Duration::from_millis(4_500)).await;
        timer.start();
        assert_eq!(timer.elapsed_seconds(), 0);
        sleep(Duration::from_millis(1_500)).await;
        assert_eq!(timer.elapsed_seconds(), 1);
    }

    #[tokio::test]
    async fn never_started_reads_zero() {
        let mut timer = GameTimer::new();
        timer.stop();
        assert_eq!(timer.elapsed_seconds(), 0);
    }
}
