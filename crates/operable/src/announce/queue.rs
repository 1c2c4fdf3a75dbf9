//! Sequential announcement delivery.
//!
//! Multiple announcements fired close together overlap into garbled speech.
//! The [`AnnouncementQueue`] serializes them: one entry is dispatched at a
//! time, and the next waits a fixed inter-message delay. Within one queue
//! instance delivery is strictly FIFO and exactly one drain loop runs at a
//! time.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use operable_core::logging::targets;
use parking_lot::Mutex;

use super::{AnnounceOptions, Announcer};
use crate::error::AnnounceError;

/// Default pause between consecutive deliveries.
pub const DEFAULT_QUEUE_INTERVAL: Duration = Duration::from_millis(1000);

/// Configuration for an [`AnnouncementQueue`].
#[derive(Debug, Clone, Copy)]
pub struct QueueOptions {
    /// Minimum pause between consecutive deliveries.
    pub interval: Duration,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_QUEUE_INTERVAL,
        }
    }
}

struct QueueEntry {
    message: String,
    options: AnnounceOptions,
}

#[derive(Default)]
struct QueueState {
    entries: VecDeque<QueueEntry>,
    /// Reentrancy guard: at most one drain loop per queue instance.
    draining: bool,
}

struct QueueInner {
    announcer: Announcer,
    interval: Duration,
    state: Mutex<QueueState>,
}

/// FIFO queue that paces announcements so they never overlap.
///
/// Cheap to clone; clones share the same queue and drain loop.
#[derive(Clone)]
pub struct AnnouncementQueue {
    inner: Arc<QueueInner>,
}

impl AnnouncementQueue {
    /// Create a queue over `announcer` with the default interval.
    pub fn new(announcer: Announcer) -> Self {
        Self::with_options(announcer, QueueOptions::default())
    }

    /// Create a queue with an explicit inter-message interval.
    pub fn with_options(announcer: Announcer, options: QueueOptions) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                announcer,
                interval: options.interval,
                state: Mutex::new(QueueState::default()),
            }),
        }
    }

    /// Append a message and start draining if no drain loop is running.
    ///
    /// The entry is announced with the outer debounce bypassed; the queue's
    /// own interval is the pacing mechanism.
    pub fn enqueue(
        &self,
        message: impl Into<String>,
        options: AnnounceOptions,
    ) -> Result<(), AnnounceError> {
        let inner = &self.inner;
        inner.announcer.context().ensure_live("AnnouncementQueue::enqueue")?;

        let start = {
            let mut state = inner.state.lock();
            state.entries.push_back(QueueEntry {
                message: message.into(),
                options,
            });
            if state.draining {
                false
            } else {
                state.draining = true;
                true
            }
        };

        if start {
            Self::dispatch_next(inner);
        }
        Ok(())
    }

    /// Drop all pending entries.
    ///
    /// An already-dispatched announcement cannot be retracted, and the
    /// in-flight inter-message timer keeps running so a subsequent enqueue
    /// still respects the pacing of the loop it joins.
    pub fn clear(&self) {
        let mut state = self.inner.state.lock();
        let dropped = state.entries.len();
        state.entries.clear();
        if dropped > 0 {
            tracing::debug!(target: targets::ANNOUNCE, dropped, "pending announcements dropped");
        }
    }

    /// Number of entries not yet dispatched.
    pub fn pending(&self) -> usize {
        self.inner.state.lock().entries.len()
    }

    /// Whether a drain loop is currently running.
    pub fn is_draining(&self) -> bool {
        self.inner.state.lock().draining
    }

    /// Dispatch the head entry and schedule the next round.
    fn dispatch_next(inner: &Arc<QueueInner>) {
        let entry = {
            let mut state = inner.state.lock();
            match state.entries.pop_front() {
                Some(entry) => entry,
                None => {
                    state.draining = false;
                    return;
                }
            }
        };

        let mut options = entry.options;
        options.delay = Some(Duration::ZERO);
        if let Err(err) = inner.announcer.announce(&entry.message, options) {
            tracing::debug!(target: targets::ANNOUNCE, %err, "queued announcement dropped");
        }

        let weak = Arc::downgrade(inner);
        inner.announcer.context().defer(inner.interval, move || {
            if let Some(inner) = weak.upgrade() {
                Self::dispatch_next(&inner);
            }
        });
    }
}

impl std::fmt::Debug for AnnouncementQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("AnnouncementQueue")
            .field("pending", &state.entries.len())
            .field("draining", &state.draining)
            .field("interval", &self.inner.interval)
            .finish_non_exhaustive()
    }
}
