//! Error types for the operability subsystems.
//!
//! Structurally impossible requests (an empty trap, an out-of-range
//! navigation index) and environment violations surface synchronously as
//! errors. Best-effort failures never do. A missing restore target, an empty
//! announcement, or re-activating an active trap degrades to
//! `tracing` diagnostics at the call site.

use operable_core::ContextError;

use crate::announce::Politeness;
use crate::host::FocusId;

/// Errors establishing or restoring trapped focus.
#[derive(Debug, thiserror::Error)]
pub enum FocusError {
    /// The trap container has no focusable descendants and cannot itself be
    /// made focusable. A trap with zero reachable targets is a contract
    /// violation by the composing layer.
    #[error("focus trap has no focusable targets in container {container:?}")]
    NoFocusableTargets {
        /// The container the trap was asked to constrain.
        container: FocusId,
    },

    /// Environment precondition violation.
    #[error(transparent)]
    Context(#[from] ContextError),
}

/// Errors moving the active member of a roving collection.
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    /// There is no valid active member to establish over zero items.
    #[error("cannot establish an active member over an empty collection")]
    EmptyCollection,

    /// An explicit navigation target fell outside the collection.
    #[error("navigation index {index} out of range for {len} item(s)")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The collection length at the time of the request.
        len: usize,
    },

    /// Environment precondition violation.
    #[error(transparent)]
    Context(#[from] ContextError),
}

/// Errors in programmatic announcement-channel requests.
#[derive(Debug, thiserror::Error)]
pub enum AnnounceError {
    /// The requested politeness level has no output lane (the "off" level is
    /// a sink, not a lane).
    #[error("politeness level {0:?} has no output lane")]
    InvalidLane(Politeness),

    /// Environment precondition violation.
    #[error(transparent)]
    Context(#[from] ContextError),
}
