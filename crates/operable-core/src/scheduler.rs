//! Cooperative one-shot task scheduler.
//!
//! Operable models every suspension point as a deferred task: the micro-delay
//! before a focus trap transfers initial focus, the clear-then-set settle
//! inside a live-region write, and the inter-message pacing of the
//! announcement queue. The scheduler holds those tasks in a min-heap keyed by
//! deadline and runs the due ones when the host pumps [`Scheduler::run_due`]
//! from its event loop.
//!
//! There is no background thread; the scheduler is as cooperative as the UI
//! runtime that owns it. Determinism in tests comes from constructing it over
//! a [`ManualClock`](crate::ManualClock).

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::clock::Clock;
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a scheduled task.
    pub struct TaskId;
}

type Task = Box<dyn FnOnce() + Send>;

/// An entry in the deadline queue (min-heap by run time, then schedule order).
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    id: TaskId,
    run_at: Instant,
    seq: u64,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.run_at == other.run_at && self.seq == other.seq
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other
            .run_at
            .cmp(&self.run_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

struct SchedulerInner {
    /// All live (not yet run, not cancelled) tasks.
    tasks: SlotMap<TaskId, Task>,
    /// Deadline queue. May hold stale entries for cancelled tasks; those are
    /// skipped on pop.
    queue: BinaryHeap<QueueEntry>,
    /// Monotonic sequence counter for FIFO ordering at equal deadlines.
    next_seq: u64,
}

/// Deadline-ordered one-shot task queue over an injected [`Clock`].
pub struct Scheduler {
    clock: Arc<dyn Clock>,
    inner: Mutex<SchedulerInner>,
}

impl Scheduler {
    /// Create a scheduler over the given time source.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            inner: Mutex::new(SchedulerInner {
                tasks: SlotMap::with_key(),
                queue: BinaryHeap::new(),
                next_seq: 0,
            }),
        }
    }

    /// The clock this scheduler runs against.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Schedule `task` to run once `delay` has elapsed.
    ///
    /// Returns a [`TaskId`] that can be used to cancel the task before it
    /// runs. Tasks with equal deadlines run in schedule order.
    pub fn schedule<F>(&self, delay: Duration, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let run_at = self.clock.now() + delay;
        let mut inner = self.inner.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;

        let id = inner.tasks.insert(Box::new(task));
        inner.queue.push(QueueEntry { id, run_at, seq });

        tracing::trace!(target: targets::SCHEDULER, ?id, ?delay, "task scheduled");
        id
    }

    /// Cancel a pending task.
    ///
    /// Returns `true` if the task was still pending. Cancelling an unknown or
    /// already-run id is a no-op.
    pub fn cancel(&self, id: TaskId) -> bool {
        let cancelled = self.inner.lock().tasks.remove(id).is_some();
        if cancelled {
            tracing::trace!(target: targets::SCHEDULER, ?id, "task cancelled");
        }
        cancelled
    }

    /// Run every task whose deadline has passed.
    ///
    /// The set of due tasks is determined against the clock reading taken at
    /// entry, and each task runs with the internal lock released, so tasks
    /// may schedule or cancel further tasks. A task scheduled during this
    /// call with a deadline at or before the entry reading also runs in the
    /// same call.
    ///
    /// Returns the number of tasks dispatched.
    pub fn run_due(&self) -> usize {
        let now = self.clock.now();
        let mut dispatched = 0;

        loop {
            let task = {
                let mut inner = self.inner.lock();
                match inner.queue.peek().copied() {
                    Some(entry) if entry.run_at <= now => {
                        inner.queue.pop();
                        // Stale entries for cancelled tasks are skipped.
                        match inner.tasks.remove(entry.id) {
                            Some(task) => task,
                            None => continue,
                        }
                    }
                    _ => break,
                }
            };

            task();
            dispatched += 1;
        }

        if dispatched > 0 {
            tracing::trace!(target: targets::SCHEDULER, count = dispatched, "ran due tasks");
        }
        dispatched
    }

    /// The deadline of the next pending task, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        let mut inner = self.inner.lock();
        loop {
            let entry = *inner.queue.peek()?;
            if inner.tasks.contains_key(entry.id) {
                return Some(entry.run_at);
            }
            // Drop stale entries for cancelled tasks as we encounter them.
            inner.queue.pop();
        }
    }

    /// Number of pending tasks.
    pub fn pending(&self) -> usize {
        self.inner.lock().tasks.len()
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}
