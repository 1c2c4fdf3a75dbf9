//! The UI context: environment precondition and thread affinity.
//!
//! Every Operable operation that touches the focus singleton or a live
//! region runs against a [`UiContext`]. The context is an explicit object
//! constructed once per application (or once per test), not a process-wide
//! singleton, so multiple independent instances can coexist in tests or
//! multi-root applications.
//!
//! # Environment precondition
//!
//! Operations call [`UiContext::ensure_live`] before doing anything else.
//! The check fails fast when invoked from a thread other than the one the
//! context was created on, or after [`UiContext::shutdown`]. Both cases
//! indicate a programming error by the composing layer and surface as
//! [`ContextError`].
//!
//! ```
//! use operable_core::UiContext;
//!
//! let ctx = UiContext::new();
//! ctx.ensure_live("example operation").unwrap();
//! ctx.shutdown();
//! assert!(ctx.ensure_live("example operation").is_err());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::ThreadId;
use std::time::Duration;

use crate::clock::{Clock, MonotonicClock};
use crate::error::ContextError;
use crate::logging::targets;
use crate::scheduler::{Scheduler, TaskId};

/// Thread affinity tracker.
///
/// Records the thread an object was created on and answers whether the
/// current thread is that thread.
#[derive(Debug, Clone, Copy)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl ThreadAffinity {
    /// Create an affinity tracker for the current thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// The thread this affinity is bound to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Check if the current thread matches this affinity.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

/// Per-application context shared by all Operable subsystems.
///
/// Owns the UI thread affinity, a liveness flag, and the [`Scheduler`] that
/// backs every timer-chained behavior. Constructed via [`UiContext::new`]
/// (wall clock) or [`UiContext::with_clock`] (injected clock, for tests).
pub struct UiContext {
    affinity: ThreadAffinity,
    live: AtomicBool,
    scheduler: Arc<Scheduler>,
}

impl UiContext {
    /// Create a context on the current thread, backed by the wall clock.
    pub fn new() -> Arc<Self> {
        Self::with_clock(Arc::new(MonotonicClock))
    }

    /// Create a context on the current thread over an injected clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Arc<Self> {
        Arc::new(Self {
            affinity: ThreadAffinity::current(),
            live: AtomicBool::new(true),
            scheduler: Arc::new(Scheduler::new(clock)),
        })
    }

    /// The scheduler backing this context's deferred work.
    #[inline]
    pub fn scheduler(&self) -> &Arc<Scheduler> {
        &self.scheduler
    }

    /// Schedule a task on this context's scheduler.
    pub fn defer<F>(&self, delay: Duration, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        self.scheduler.schedule(delay, task)
    }

    /// Verify that `operation` may run here and now.
    ///
    /// Fails with [`ContextError::WrongThread`] off the UI thread and with
    /// [`ContextError::ShutDown`] after [`shutdown`](Self::shutdown).
    pub fn ensure_live(&self, operation: &str) -> Result<(), ContextError> {
        if !self.affinity.is_same_thread() {
            return Err(ContextError::WrongThread {
                operation: operation.to_string(),
            });
        }
        if !self.live.load(Ordering::SeqCst) {
            return Err(ContextError::ShutDown {
                operation: operation.to_string(),
            });
        }
        Ok(())
    }

    /// Whether the context is still live.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Mark the context as shut down. Idempotent.
    ///
    /// After this, [`ensure_live`](Self::ensure_live) fails for every
    /// operation; pending scheduled tasks are left to the owner to drain or
    /// drop.
    pub fn shutdown(&self) {
        if self.live.swap(false, Ordering::SeqCst) {
            tracing::debug!(target: targets::CONTEXT, "context shut down");
        }
    }
}

impl std::fmt::Debug for UiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiContext")
            .field("thread_id", &self.affinity.thread_id())
            .field("live", &self.is_live())
            .finish_non_exhaustive()
    }
}
