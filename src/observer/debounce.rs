use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

/// Quiet period after the last qualifying change before a pass runs.
pub const QUIESCENCE_WINDOW: Duration = Duration::from_millis(100);

/// Trailing-edge debouncer.
///
/// Owns the single pending timer: the first [`Debouncer::trigger`] moves it
/// from idle to pending, every further trigger restarts the window, and the
/// action runs once the window passes without a trigger. There is no leading
/// edge. Must be created inside a tokio runtime.
#[derive(Debug, Clone)]
pub struct Debouncer {
    tx: mpsc::UnboundedSender<()>,
    pending: Arc<AtomicBool>,
}

impl Debouncer {
    pub fn spawn<F>(window: Duration, mut action: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        let pending = Arc::new(AtomicBool::new(false));
        let flag = pending.clone();

        tokio::spawn(async move {
            while rx.recv().await.is_some() {
                let mut open = true;
                loop {
                    tokio::select! {
                        received = rx.recv() => {
                            if received.is_none() {
                                open = false;
                                break;
                            }
                        }
                        _ = tokio::time::sleep(window) => break,
                    }
                }

                flag.store(false, Ordering::SeqCst);
                action();

                if !open {
                    break;
                }
            }
        });

        Self { tx, pending }
    }

    /// Request the action, restarting the quiescence window.
    pub fn trigger(&self) {
        self.pending.store(true, Ordering::SeqCst);
        if self.tx.send(()).is_err() {
            tracing::warn!("Debouncer task has stopped; trigger dropped");
        }
    }

    /// Whether a trigger is waiting for the window to pass.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting() -> (Arc<AtomicUsize>, impl FnMut() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        (count, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_into_one_call() {
        let (count, action) = counting();
        let debouncer = Debouncer::spawn(QUIESCENCE_WINDOW, action);

        for _ in 0..10 {
            debouncer.trigger();
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(debouncer.is_pending());
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_only_after_full_window_since_last_trigger() {
        let (count, action) = counting();
        let debouncer = Debouncer::spawn(QUIESCENCE_WINDOW, action);

        debouncer.trigger();
        tokio::time::sleep(Duration::from_millis(90)).await;
        debouncer.trigger();
        tokio::time::sleep(Duration::from_millis(90)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_run_separately() {
        let (count, action) = counting();
        let debouncer = Debouncer::spawn(QUIESCENCE_WINDOW, action);

        debouncer.trigger();
        tokio::time::sleep(Duration::from_millis(200)).await;
        debouncer.trigger();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_debouncer_never_fires() {
        let (count, action) = counting();
        let debouncer = Debouncer::spawn(QUIESCENCE_WINDOW, action);

        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(!debouncer.is_pending());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
