//! The session: one editing surface wired to the resolution engine.

use crate::debounce::DebouncedTrigger;
use crate::surface::{EditingSurface, Subscription};
use livedts_core::progress::{self, Update};
use livedts_core::{
    paths, DependencyContext, Error, ImportResolver, Options, RecursionBudget, TypingsHost,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// Binds an [`EditingSurface`] to the import resolution engine.
///
/// Edits reported through the surface's change subscription (or
/// [`notify_change`]) are coalesced by the debounce window into resolution
/// passes. Passes are single-flight: a trigger arriving while a pass is in
/// flight is dropped, not queued, and the next edit re-arms the timer.
/// After a pass that added declaration content, the surface is asked to
/// refresh so its type checker sees the new files.
///
/// [`notify_change`]: TypingsSession::notify_change
pub struct TypingsSession {
    inner: Arc<SessionInner>,
    change_subscription: Subscription,
}

struct SessionInner {
    options: Arc<Options>,
    resolver: ImportResolver,
    surface: Arc<dyn EditingSurface>,
    resolving: AtomicBool,
    debounce: DebouncedTrigger,
    runtime: Handle,
}

impl TypingsSession {
    /// Bind the engine to a surface, subscribe to its changes, and run the
    /// initial resolution pass.
    ///
    /// Must be called from within a tokio runtime; debounced passes are
    /// spawned onto it.
    ///
    /// # Errors
    /// Returns an error when the initial pass fails and no `on_error`
    /// callback is configured.
    pub async fn create(
        surface: Arc<dyn EditingSurface>,
        host: Arc<dyn TypingsHost>,
        options: Options,
    ) -> Result<Self, Error> {
        let options = Arc::new(options);
        let inner = Arc::new(SessionInner {
            resolver: ImportResolver::new(Arc::clone(&options), host),
            options,
            surface: Arc::clone(&surface),
            resolving: AtomicBool::new(false),
            debounce: DebouncedTrigger::new(Handle::current()),
            runtime: Handle::current(),
        });

        let change_subscription = surface.on_did_change(Box::new({
            let inner = Arc::downgrade(&inner);
            move || {
                if let Some(inner) = inner.upgrade() {
                    SessionInner::schedule_pass(&inner);
                }
            }
        }));

        inner.run_pass().await?;

        Ok(Self {
            inner,
            change_subscription,
        })
    }

    /// Report an edit, as the change subscription would.
    pub fn notify_change(&self) {
        SessionInner::schedule_pass(&self.inner);
    }

    /// Run a resolution pass right now, bypassing the debounce window.
    pub async fn resolve_now(&self) -> Result<(), Error> {
        self.inner.run_pass().await
    }

    /// Whether a pass is currently in flight.
    #[must_use]
    pub fn is_resolving(&self) -> bool {
        self.inner.resolving.load(Ordering::SeqCst)
    }

    /// Replace the pinned-version map used for package lookups.
    pub fn set_versions(&self, versions: HashMap<String, String>) {
        self.inner.resolver.set_versions(versions);
    }

    /// Clear the configured source cache.
    pub fn clear_cache(&self) {
        self.inner.options.source_cache.clear();
    }

    /// Whether the latest pass added content to the host.
    #[must_use]
    pub fn were_new_imports_resolved(&self) -> bool {
        self.inner.resolver.were_new_imports_resolved()
    }

    /// Release the change subscription and cancel any pending pass.
    ///
    /// Called automatically on drop; safe to call more than once.
    pub fn dispose(&mut self) {
        self.change_subscription.unsubscribe();
        self.inner.debounce.cancel();
    }
}

impl Drop for TypingsSession {
    fn drop(&mut self) {
        // The subscription releases itself; the pending shot must not
        // outlive the session.
        self.inner.debounce.cancel();
    }
}

impl SessionInner {
    /// Handle one change trigger: drop it mid-pass, otherwise re-arm the
    /// debounce timer.
    fn schedule_pass(inner: &Arc<Self>) {
        if inner.resolving.load(Ordering::SeqCst) {
            debug!("Dropping change trigger while a pass is in flight");
            return;
        }

        progress::emit(&inner.options, Update::CodeChanged);

        let weak = Arc::downgrade(inner);
        inner
            .debounce
            .arm(inner.options.debounce_duration, move || {
                if let Some(inner) = weak.upgrade() {
                    let runtime = inner.runtime.clone();
                    runtime.spawn(async move {
                        if let Err(error) = inner.run_pass().await {
                            warn!(error = %error, "Resolution pass failed");
                        }
                    });
                }
            });
    }

    /// One resolution pass over the surface's current content.
    async fn run_pass(&self) -> Result<(), Error> {
        self.resolving.store(true, Ordering::SeqCst);
        progress::emit(&self.options, Update::ResolvingImports);

        let content = self.surface.content();
        let root = paths::dirname(&self.surface.uri()).to_string();
        let result = self
            .resolver
            .resolve_imports_in_file(
                &content,
                &DependencyContext::Root(root),
                RecursionBudget::from_options(&self.options),
            )
            .await;

        let outcome = match result {
            Err(error) => {
                if let Some(ref on_error) = self.options.on_error {
                    on_error(&error.to_string());
                    Ok(())
                } else {
                    Err(error)
                }
            }
            Ok(()) => Ok(()),
        };

        if self.resolver.were_new_imports_resolved() {
            self.surface.request_refresh();
            self.resolver.reset_new_imports_resolved();
        }

        self.resolving.store(false, Ordering::SeqCst);
        outcome
    }
}
