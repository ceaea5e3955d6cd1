//! Edit-coalescing trigger.

use std::sync::Mutex;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Single-slot cancellable timer.
///
/// Re-arming replaces the pending shot, so a burst of triggers collapses
/// into the one action scheduled by the last of them. A zero delay runs the
/// action immediately on the calling thread.
pub struct DebouncedTrigger {
    runtime: Handle,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl DebouncedTrigger {
    /// Trigger scheduling its shots on the given runtime.
    #[must_use]
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            pending: Mutex::new(None),
        }
    }

    /// Arm (or re-arm) the trigger: run `action` once after `delay`, unless
    /// superseded by a later arm or cancelled first.
    pub fn arm(&self, delay: Duration, action: impl FnOnce() + Send + 'static) {
        let mut pending = self.pending.lock().unwrap();
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        if delay.is_zero() {
            drop(pending);
            action();
            return;
        }

        *pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        }));
    }

    /// Drop the pending shot, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().unwrap().take() {
            previous.abort();
        }
    }

    /// Whether a shot is scheduled and has not fired yet.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.pending
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl std::fmt::Debug for DebouncedTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebouncedTrigger")
            .field("armed", &self.is_armed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fires_after_delay() {
        let trigger = DebouncedTrigger::new(Handle::current());
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        trigger.arm(Duration::from_millis(10), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(trigger.is_armed());

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!trigger.is_armed());
    }

    #[tokio::test]
    async fn test_rearm_supersedes_pending_shot() {
        let trigger = DebouncedTrigger::new(Handle::current());
        let fired = Arc::new(AtomicUsize::new(0));

        let first = Arc::clone(&fired);
        trigger.arm(Duration::from_millis(200), move || {
            first.fetch_add(1, Ordering::SeqCst);
        });
        let second = Arc::clone(&fired);
        trigger.arm(Duration::from_millis(10), move || {
            second.fetch_add(10, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(80)).await;
        // Only the replacing shot ran.
        assert_eq!(fired.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn test_cancel_drops_pending_shot() {
        let trigger = DebouncedTrigger::new(Handle::current());
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        trigger.arm(Duration::from_millis(10), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        trigger.cancel();
        assert!(!trigger.is_armed());

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_delay_fires_immediately() {
        let trigger = DebouncedTrigger::new(Handle::current());
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        trigger.arm(Duration::ZERO, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        // No await needed: zero delay runs on the calling thread.
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!trigger.is_armed());
    }
}
