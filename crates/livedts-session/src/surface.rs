//! Editing-surface contract.

/// Listener invoked by the surface on every content change.
pub type ChangeListener = Box<dyn Fn() + Send + Sync>;

/// The text surface being augmented.
///
/// Change-trigger timing is the surface's side of the contract: it invokes
/// subscribed listeners whenever its content changes, and the session turns
/// those invocations into debounced resolution passes.
pub trait EditingSurface: Send + Sync {
    /// Current full text content.
    fn content(&self) -> String;

    /// URI of the document backing the surface.
    fn uri(&self) -> String;

    /// Subscribe to content changes.
    ///
    /// The returned subscription releases the listener when unsubscribed or
    /// dropped.
    fn on_did_change(&self, listener: ChangeListener) -> Subscription;

    /// Re-present the current content so the type checker picks up newly
    /// injected declarations. Preserving the cursor is the surface's
    /// business.
    fn request_refresh(&self);
}

/// Scoped acquisition of a surface listener.
///
/// The release action runs exactly once, on explicit [`unsubscribe`] or on
/// drop, whichever comes first.
///
/// [`unsubscribe`]: Subscription::unsubscribe
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Wrap a release action.
    #[must_use]
    pub fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Subscription with nothing to release.
    #[must_use]
    pub fn noop() -> Self {
        Self { release: None }
    }

    /// Release the underlying listener. Further calls are no-ops.
    pub fn unsubscribe(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("released", &self.release.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_releases_exactly_once() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);
        let mut subscription = Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        subscription.unsubscribe();
        subscription.unsubscribe();
        drop(subscription);

        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_releases() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);
        drop(Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_noop_subscription() {
        let mut subscription = Subscription::noop();
        subscription.unsubscribe();
    }
}
