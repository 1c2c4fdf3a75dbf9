//! Bounded history of recently focused elements.

use crate::host::FocusId;

/// Default number of entries a history stack retains.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Bounded, deduplicating LIFO of recently focused elements.
///
/// Backs the focus trap's restoration path and any caller wanting manual
/// save/restore. Pushing a handle that is already present moves it to the
/// top instead of growing the stack; exceeding capacity silently evicts the
/// oldest (bottom) entry.
#[derive(Debug, Clone)]
pub struct FocusHistoryStack {
    /// Entries ordered oldest-first; the top of the stack is the last element.
    entries: Vec<FocusId>,
    capacity: usize,
}

impl FocusHistoryStack {
    /// Create a stack with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a stack bounded to `capacity` entries.
    ///
    /// A zero capacity is clamped to one; a stack that can hold nothing is
    /// not useful to any caller.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record `id` as the most recently focused element.
    ///
    /// Deduplicates by identity: an already-present handle is moved to the
    /// top without changing the stack length.
    pub fn push(&mut self, id: FocusId) {
        if let Some(pos) = self.entries.iter().position(|&e| e == id) {
            self.entries.remove(pos);
        } else if self.entries.len() == self.capacity {
            // Evict the oldest entry.
            self.entries.remove(0);
        }
        self.entries.push(id);
    }

    /// Remove and return the most recent entry.
    pub fn pop(&mut self) -> Option<FocusId> {
        self.entries.pop()
    }

    /// The most recent entry without removing it.
    pub fn peek(&self) -> Option<FocusId> {
        self.entries.last().copied()
    }

    /// Remove a specific handle wherever it sits in the stack.
    ///
    /// Useful when the host detaches an element and its handle should no
    /// longer be offered as a restore target.
    pub fn remove(&mut self, id: FocusId) -> bool {
        if let Some(pos) = self.entries.iter().position(|&e| e == id) {
            self.entries.remove(pos);
            true
        } else {
            false
        }
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The bound this stack was created with.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for FocusHistoryStack {
    fn default() -> Self {
        Self::new()
    }
}
